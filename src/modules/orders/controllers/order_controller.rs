use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::core::{AppError, DateRange, Result};
use crate::modules::orders::services::order_fetcher;
use crate::modules::platform::models::Order;

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(rename = "customerId")]
    pub customer_id: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
    pub count: usize,
    pub date_range: DateRangeEcho,
    pub customer_id: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct DateRangeEcho {
    pub start: String,
    pub end: String,
}

/// GET /api/orders
///
/// All fulfilled orders in the window, auto-paginated internally up to the
/// safety ceiling.
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<OrderListQuery>,
) -> Result<HttpResponse> {
    let start = query
        .start
        .as_deref()
        .ok_or_else(|| AppError::validation("missing required query parameter 'start'"))?;
    let end = query
        .end
        .as_deref()
        .ok_or_else(|| AppError::validation("missing required query parameter 'end'"))?;

    let range = DateRange::parse(start, end)?;
    let orders =
        order_fetcher::fetch_all_orders(state.api.as_ref(), &range, query.customer_id).await?;

    let count = orders.len();
    Ok(HttpResponse::Ok().json(OrderListResponse {
        orders,
        count,
        date_range: DateRangeEcho {
            start: start.to_string(),
            end: end.to_string(),
        },
        customer_id: query.customer_id,
    }))
}

/// Configure routes for the orders module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/orders", web::get().to(list_orders));
}
