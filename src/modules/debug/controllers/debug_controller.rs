//! Raw upstream introspection endpoints.
//!
//! Direct passthroughs of the metafield, fulfillment and customer queries,
//! kept for diagnosing how the platform exposes order metadata. No
//! aggregation happens here.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::app::AppState;
use crate::core::{AppError, Result};

#[derive(Debug, Deserialize)]
pub struct OrderParam {
    #[serde(rename = "orderId")]
    pub order_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerParam {
    #[serde(rename = "customerId")]
    pub customer_id: Option<u64>,
}

fn require_order_id(param: &OrderParam) -> Result<u64> {
    param
        .order_id
        .ok_or_else(|| AppError::validation("missing required query parameter 'orderId'"))
}

/// GET /api/debug/metafields — metafields via the GraphQL query.
pub async fn order_metafields(
    state: web::Data<AppState>,
    param: web::Query<OrderParam>,
) -> Result<HttpResponse> {
    let order_id = require_order_id(&param)?;
    let envelope = state.client.order_metafields_raw(order_id).await?;
    Ok(HttpResponse::Ok().json(envelope))
}

/// GET /api/debug/metafields-rest — metafields via the REST resource.
pub async fn order_metafields_rest(
    state: web::Data<AppState>,
    param: web::Query<OrderParam>,
) -> Result<HttpResponse> {
    let order_id = require_order_id(&param)?;
    let value = state
        .client
        .get_raw(&format!("orders/{}/metafields.json", order_id), &[])
        .await?;
    Ok(HttpResponse::Ok().json(value))
}

/// GET /api/debug/fulfillments — fulfillments via the GraphQL query.
pub async fn order_fulfillments(
    state: web::Data<AppState>,
    param: web::Query<OrderParam>,
) -> Result<HttpResponse> {
    let order_id = require_order_id(&param)?;
    let envelope = state.client.order_fulfillments_raw(order_id).await?;
    Ok(HttpResponse::Ok().json(envelope))
}

/// GET /api/debug/customer — one customer via the REST resource.
pub async fn customer(
    state: web::Data<AppState>,
    param: web::Query<CustomerParam>,
) -> Result<HttpResponse> {
    let customer_id = param
        .customer_id
        .ok_or_else(|| AppError::validation("missing required query parameter 'customerId'"))?;
    let value = state
        .client
        .get_raw(&format!("customers/{}.json", customer_id), &[])
        .await?;
    Ok(HttpResponse::Ok().json(value))
}

/// Configure routes for the debug module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/debug")
            .route("/metafields", web::get().to(order_metafields))
            .route("/metafields-rest", web::get().to(order_metafields_rest))
            .route("/fulfillments", web::get().to(order_fulfillments))
            .route("/customer", web::get().to(customer)),
    );
}
