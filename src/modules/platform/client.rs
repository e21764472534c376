use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ShopConfig;
use crate::core::{AppError, Result};
use super::api::{OrderPageQuery, ShopApi, PAGE_SIZE};
use super::gate::UpstreamGate;
use super::models::{Fulfillment, FulfillmentLineItem, Metafield, Order};

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shopify Admin API client covering the REST and GraphQL surfaces this
/// service consumes. Every call passes through the shared [`UpstreamGate`]
/// before touching the network. No call is retried; failures are returned
/// to the caller once.
pub struct ShopifyClient {
    http: Client,
    base_url: String,
    access_token: String,
    gate: Arc<UpstreamGate>,
}

impl ShopifyClient {
    pub fn new(shop: &ShopConfig, gate: Arc<UpstreamGate>) -> Result<Self> {
        Self::with_base_url(shop.api_base_url(), shop.access_token.clone(), gate)
    }

    /// Construct against an explicit base URL (also used by tests pointing
    /// at a local mock server).
    pub fn with_base_url(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        gate: Arc<UpstreamGate>,
    ) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            gate,
        })
    }

    /// GET a REST resource and return the raw JSON payload.
    pub async fn get_raw(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        self.gate.acquire().await;
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "upstream GET");

        let response = self
            .http
            .get(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .query(params)
            .send()
            .await?;

        Self::into_json(response).await
    }

    /// POST a JSON body to a REST resource and return the raw JSON payload.
    pub async fn post_raw(&self, path: &str, body: &Value) -> Result<Value> {
        self.gate.acquire().await;
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "upstream POST");

        let response = self
            .http
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(body)
            .send()
            .await?;

        Self::into_json(response).await
    }

    /// Execute a GraphQL query against the Admin API.
    ///
    /// Returns the full response envelope. A non-success HTTP status or a
    /// non-empty `errors` array both map to an upstream error.
    pub async fn graphql(&self, query: &str) -> Result<Value> {
        self.gate.acquire().await;
        let url = format!("{}/graphql.json", self.base_url);
        debug!(%url, "upstream GraphQL");

        let response = self
            .http
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;

        let envelope = Self::into_json(response).await?;

        if let Some(errors) = envelope.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                return Err(AppError::upstream(None, Value::Array(errors.clone()).to_string()));
            }
        }

        Ok(envelope)
    }

    async fn into_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.to_string()
            } else {
                body
            };
            return Err(AppError::upstream(Some(status.as_u16()), message));
        }

        Ok(response.json().await?)
    }

    /// Raw metafields query envelope, exposed for the debug endpoints.
    pub async fn order_metafields_raw(&self, order_id: u64) -> Result<Value> {
        self.graphql(&metafields_query(order_id)).await
    }

    /// Raw fulfillments query envelope, exposed for the debug endpoints.
    pub async fn order_fulfillments_raw(&self, order_id: u64) -> Result<Value> {
        self.graphql(&fulfillments_query(order_id)).await
    }

    /// Recent orders regardless of fulfillment state. Used by the metafield
    /// seeding binary, not by the report path.
    pub async fn recent_orders(&self, limit: u32) -> Result<Vec<Order>> {
        let params = [
            ("status", "any".to_string()),
            ("limit", limit.to_string()),
        ];
        let value = self.get_raw("orders.json", &params).await?;
        let envelope: OrdersEnvelope = serde_json::from_value(value)?;
        Ok(envelope.orders)
    }

    /// Attach a decimal-valued metafield to an order.
    pub async fn create_order_metafield(
        &self,
        order_id: u64,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Result<Value> {
        let body = serde_json::json!({
            "metafield": {
                "namespace": namespace,
                "key": key,
                "type": "number_decimal",
                "value": value,
            }
        });
        self.post_raw(&format!("orders/{}/metafields.json", order_id), &body)
            .await
    }
}

#[async_trait]
impl ShopApi for ShopifyClient {
    async fn orders_page(&self, query: &OrderPageQuery) -> Result<Vec<Order>> {
        let params = order_page_params(query);
        let value = self.get_raw("orders.json", &params).await?;
        let envelope: OrdersEnvelope = serde_json::from_value(value)?;
        Ok(envelope.orders)
    }

    async fn customers_page(&self, since_id: Option<u64>) -> Result<Vec<Value>> {
        let mut params = vec![("limit", PAGE_SIZE.to_string())];
        if let Some(id) = since_id {
            params.push(("since_id", id.to_string()));
        }
        let value = self.get_raw("customers.json", &params).await?;
        let envelope: CustomersEnvelope = serde_json::from_value(value)?;
        Ok(envelope.customers)
    }

    async fn order_metafields(&self, order_id: u64) -> Result<Vec<Metafield>> {
        let envelope = self.order_metafields_raw(order_id).await?;
        let data = graphql_data(envelope)?;
        let parsed: MetafieldsData = serde_json::from_value(data)?;

        Ok(parsed
            .order
            .map(|order| order.metafields.edges.into_iter().map(|edge| edge.node).collect())
            .unwrap_or_default())
    }

    async fn order_fulfillments(&self, order_id: u64) -> Result<Vec<Fulfillment>> {
        let envelope = self.order_fulfillments_raw(order_id).await?;
        let data = graphql_data(envelope)?;
        let parsed: FulfillmentsData = serde_json::from_value(data)?;

        let fulfillments = parsed
            .order
            .map(|order| order.fulfillments)
            .unwrap_or_default()
            .into_iter()
            .map(|node| Fulfillment {
                status: node.status,
                line_items: node
                    .fulfillment_line_items
                    .edges
                    .into_iter()
                    .map(|edge| FulfillmentLineItem {
                        quantity: edge.node.quantity,
                        total_amount: edge.node.original_total_set.shop_money.amount,
                    })
                    .collect(),
            })
            .collect();

        Ok(fulfillments)
    }
}

pub(crate) fn order_page_params(query: &OrderPageQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("status", "any".to_string()),
        ("fulfillment_status", "shipped".to_string()),
        ("limit", query.limit.to_string()),
        ("created_at_min", query.start.to_rfc3339()),
        ("created_at_max", query.end.to_rfc3339()),
    ];
    if let Some(id) = query.customer_id {
        params.push(("customer_id", id.to_string()));
    }
    if let Some(id) = query.since_id {
        params.push(("since_id", id.to_string()));
    }
    params
}

fn metafields_query(order_id: u64) -> String {
    format!(
        r#"query {{ order(id: "gid://shopify/Order/{order_id}") {{ id name metafields(first: 10) {{ edges {{ node {{ namespace key value type }} }} }} }} }}"#
    )
}

fn fulfillments_query(order_id: u64) -> String {
    format!(
        r#"query {{ order(id: "gid://shopify/Order/{order_id}") {{ id fulfillments {{ status fulfillmentLineItems(first: 50) {{ edges {{ node {{ quantity originalTotalSet {{ shopMoney {{ amount }} }} }} }} }} }} }} }}"#
    )
}

fn graphql_data(envelope: Value) -> Result<Value> {
    envelope
        .get("data")
        .cloned()
        .ok_or_else(|| AppError::upstream(None, "GraphQL response missing 'data'"))
}

// REST listing envelopes.

#[derive(Debug, Deserialize)]
struct OrdersEnvelope {
    #[serde(default)]
    orders: Vec<Order>,
}

#[derive(Debug, Deserialize)]
struct CustomersEnvelope {
    #[serde(default)]
    customers: Vec<Value>,
}

// GraphQL response envelopes.

#[derive(Debug, Deserialize)]
struct Connection<T> {
    #[serde(default)]
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
struct MetafieldsData {
    #[serde(default)]
    order: Option<MetafieldsOrder>,
}

#[derive(Debug, Deserialize)]
struct MetafieldsOrder {
    metafields: Connection<Metafield>,
}

#[derive(Debug, Deserialize)]
struct FulfillmentsData {
    #[serde(default)]
    order: Option<FulfillmentsOrder>,
}

#[derive(Debug, Deserialize)]
struct FulfillmentsOrder {
    #[serde(default)]
    fulfillments: Vec<FulfillmentNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FulfillmentNode {
    status: String,
    fulfillment_line_items: Connection<FulfillmentLineItemNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FulfillmentLineItemNode {
    quantity: i64,
    original_total_set: MoneyBag,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoneyBag {
    shop_money: MoneyAmount,
}

#[derive(Debug, Deserialize)]
struct MoneyAmount {
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
}
