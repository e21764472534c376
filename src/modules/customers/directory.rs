use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::core::{AppError, Result};

/// Deployment-specific identity data for the known customer accounts,
/// loaded once at startup and read-only afterwards.
///
/// The backing file maps upstream customer ids to a display name and an
/// optional billing email:
///
/// ```yaml
/// customers:
///   "8123456789":
///     name: Acme Retail
///     email: billing@acme.example
/// ```
#[derive(Debug, Clone, Default)]
pub struct CustomerDirectory {
    entries: HashMap<u64, CustomerIdentity>,
}

/// One directory entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerIdentity {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DirectoryFile {
    #[serde(default)]
    customers: HashMap<String, CustomerIdentity>,
}

impl CustomerDirectory {
    /// Load the directory from a YAML file. A missing file is not an error;
    /// it yields an empty directory and report rows fall back to "Unknown".
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "customer directory file not found; starting empty");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|err| {
            AppError::configuration(format!(
                "failed to read customer directory {}: {}",
                path.display(),
                err
            ))
        })?;

        let directory = Self::from_yaml(&raw)?;
        info!(
            path = %path.display(),
            customers = directory.len(),
            "customer directory loaded"
        );
        Ok(directory)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let file: DirectoryFile = serde_yaml::from_str(raw)
            .map_err(|err| AppError::configuration(format!("invalid customer directory: {}", err)))?;

        let mut entries = HashMap::with_capacity(file.customers.len());
        for (key, identity) in file.customers {
            let id: u64 = key.trim().parse().map_err(|_| {
                AppError::configuration(format!(
                    "invalid customer id '{}' in directory (expected numeric)",
                    key
                ))
            })?;
            entries.insert(id, identity);
        }

        Ok(Self { entries })
    }

    pub fn from_entries(entries: HashMap<u64, CustomerIdentity>) -> Self {
        Self { entries }
    }

    pub fn identity(&self, customer_id: u64) -> Option<&CustomerIdentity> {
        self.entries.get(&customer_id)
    }

    /// Display name for a customer id, falling back to "Unknown".
    pub fn display_name(&self, customer_id: Option<u64>) -> String {
        customer_id
            .and_then(|id| self.identity(id))
            .map(|identity| identity.name.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// Directory email for a customer id, when one is configured.
    pub fn email(&self, customer_id: Option<u64>) -> Option<String> {
        customer_id
            .and_then(|id| self.identity(id))
            .and_then(|identity| identity.email.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
