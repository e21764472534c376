//! Upstream Admin API entities, limited to the fields this service consumes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An order as returned by the REST orders listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    /// Display name, e.g. `#1001`.
    pub name: String,
    /// Creation timestamp as sent by the platform (RFC 3339).
    pub created_at: String,
    #[serde(default)]
    pub customer: Option<OrderCustomer>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub fulfillment_status: Option<String>,
}

/// Customer reference embedded in an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCustomer {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
}

/// A single order line.
///
/// `price` arrives as a decimal string on the wire; the platform sends every
/// monetary amount that way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub quantity: i64,
    /// Line-level status. Absent or unrecognized values count as normal.
    #[serde(default, deserialize_with = "lenient_line_status")]
    pub fulfillment_status: Option<LineItemStatus>,
    /// Quantity not yet fulfilled.
    #[serde(default)]
    pub fulfillable_quantity: i64,
    /// Quantity remaining after edits/removals.
    #[serde(default)]
    pub current_quantity: i64,
}

impl LineItem {
    pub fn status(&self) -> LineItemStatus {
        self.fulfillment_status.unwrap_or_default()
    }
}

/// Line-level fulfillment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineItemStatus {
    #[default]
    Normal,
    Removed,
    Cancelled,
    Refunded,
    Returned,
}

impl LineItemStatus {
    /// Lines in these states contribute nothing to fulfilled revenue.
    pub fn is_excluded(self) -> bool {
        !matches!(self, LineItemStatus::Normal)
    }

    fn from_wire(raw: &str) -> Self {
        match raw {
            "removed" => LineItemStatus::Removed,
            "cancelled" => LineItemStatus::Cancelled,
            "refunded" => LineItemStatus::Refunded,
            "returned" => LineItemStatus::Returned,
            _ => LineItemStatus::Normal,
        }
    }
}

/// The platform sends line statuses this service does not act on
/// ("partial", "fulfilled", ...); those all read as normal.
fn lenient_line_status<'de, D>(deserializer: D) -> Result<Option<LineItemStatus>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|status| LineItemStatus::from_wire(&status)))
}

/// A custom metadata entry attached to an order, identified by
/// (namespace, key). The value is an opaque string; see
/// [`crate::modules::reports::services::metafield_values`] for how monetary
/// values are extracted from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metafield {
    pub namespace: String,
    pub key: String,
    pub value: String,
    #[serde(default, rename = "type")]
    pub value_type: Option<String>,
}

/// A fulfillment record fetched via the secondary GraphQL query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fulfillment {
    /// `SUCCESS` indicates a completed fulfillment.
    pub status: String,
    pub line_items: Vec<FulfillmentLineItem>,
}

impl Fulfillment {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

/// A line within a fulfillment: quantity shipped and its total amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillmentLineItem {
    pub quantity: i64,
    pub total_amount: Decimal,
}
