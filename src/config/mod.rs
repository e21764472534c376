use std::env;
use std::num::NonZeroU32;

use crate::core::{AppError, Result};

pub mod server;

pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub shop: ShopConfig,
    pub upstream: UpstreamConfig,
    /// Path to the YAML customer directory (id -> name/email). The file is
    /// optional; a missing file yields an empty directory.
    pub customer_directory_path: String,
}

/// Upstream shop connection settings. Domain and token are mandatory; the
/// service refuses to start without them.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    pub domain: String,
    pub access_token: String,
    pub api_version: String,
}

impl ShopConfig {
    /// Base URL for the versioned Admin API.
    pub fn api_base_url(&self) -> String {
        format!("https://{}/admin/api/{}", self.domain, self.api_version)
    }
}

/// Pacing for outbound Admin API calls, shared across every endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub max_requests_per_second: NonZeroU32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig::from_env()?,
            shop: ShopConfig {
                domain: env::var("SHOPIFY_SHOP_DOMAIN").map_err(|_| {
                    AppError::configuration("SHOPIFY_SHOP_DOMAIN not set")
                })?,
                access_token: env::var("SHOPIFY_ACCESS_TOKEN").map_err(|_| {
                    AppError::configuration("SHOPIFY_ACCESS_TOKEN not set")
                })?,
                api_version: env::var("SHOPIFY_API_VERSION")
                    .unwrap_or_else(|_| "2024-01".to_string()),
            },
            upstream: UpstreamConfig {
                max_requests_per_second: env::var("UPSTREAM_MAX_RPS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::configuration("Invalid UPSTREAM_MAX_RPS (expected positive integer)")
                    })?,
            },
            customer_directory_path: env::var("CUSTOMER_DIRECTORY_PATH")
                .unwrap_or_else(|_| "customers.yaml".to_string()),
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.shop.domain.trim().is_empty() {
            return Err(AppError::configuration(
                "SHOPIFY_SHOP_DOMAIN must not be empty",
            ));
        }

        if self.shop.access_token.trim().is_empty() {
            return Err(AppError::configuration(
                "SHOPIFY_ACCESS_TOKEN must not be empty",
            ));
        }

        if self.shop.api_version.trim().is_empty() {
            return Err(AppError::configuration(
                "SHOPIFY_API_VERSION must not be empty",
            ));
        }

        Ok(())
    }
}
