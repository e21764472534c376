use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::core::Result;
use crate::modules::platform::PAGE_SIZE;

#[derive(Debug, Deserialize)]
pub struct CustomerListQuery {
    pub since_id: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListResponse {
    pub customers: Vec<serde_json::Value>,
    pub count: usize,
    pub has_more: bool,
}

/// GET /api/customers
///
/// One upstream page per call; the caller drives further pagination by
/// passing the last customer id back as `since_id`.
pub async fn list_customers(
    state: web::Data<AppState>,
    query: web::Query<CustomerListQuery>,
) -> Result<HttpResponse> {
    let customers = state.api.customers_page(query.since_id).await?;
    let count = customers.len();

    Ok(HttpResponse::Ok().json(CustomerListResponse {
        customers,
        count,
        has_more: count == PAGE_SIZE as usize,
    }))
}

/// Configure routes for the customers module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/customers", web::get().to(list_customers));
}
