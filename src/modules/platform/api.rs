use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::Result;
use super::models::{Fulfillment, Metafield, Order};

/// Upstream page size for order and customer listings.
pub const PAGE_SIZE: u32 = 250;

/// One page worth of the order listing query.
#[derive(Debug, Clone)]
pub struct OrderPageQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Scope the listing to a single upstream customer.
    pub customer_id: Option<u64>,
    /// Cursor: only orders with ids greater than this are returned.
    pub since_id: Option<u64>,
    pub limit: u32,
}

/// Seam over the upstream Admin API.
///
/// Services depend on this trait rather than the concrete client so the
/// fetch/enrichment pipeline can be exercised against canned responses.
#[async_trait]
pub trait ShopApi: Send + Sync {
    /// One page of fulfilled orders in the window, cursored by `since_id`.
    async fn orders_page(&self, query: &OrderPageQuery) -> Result<Vec<Order>>;

    /// One page (up to 250) of customers, cursored by `since_id`. Returned
    /// as raw JSON objects; the listing endpoint is a passthrough.
    async fn customers_page(&self, since_id: Option<u64>) -> Result<Vec<serde_json::Value>>;

    /// The first 10 metadata entries attached to an order.
    async fn order_metafields(&self, order_id: u64) -> Result<Vec<Metafield>>;

    /// Fulfillment records for an order, via the secondary structured query.
    async fn order_fulfillments(&self, order_id: u64) -> Result<Vec<Fulfillment>>;
}
