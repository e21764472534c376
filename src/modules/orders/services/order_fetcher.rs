use tracing::{debug, warn};

use crate::core::{DateRange, Result};
use crate::modules::platform::models::Order;
use crate::modules::platform::{OrderPageQuery, ShopApi, PAGE_SIZE};

/// Hard ceiling on orders collected for a single request. Hitting it stops
/// fetching early and processing continues with what was collected.
pub const MAX_ORDER_FETCH: usize = 10_000;

/// Fetch every fulfilled order in the window, walking `since_id` cursors
/// until a short page arrives or the safety ceiling is crossed.
///
/// A failure on any page aborts the whole fetch; callers propagate it.
pub async fn fetch_all_orders(
    api: &dyn ShopApi,
    range: &DateRange,
    customer_id: Option<u64>,
) -> Result<Vec<Order>> {
    let mut orders: Vec<Order> = Vec::new();
    let mut since_id: Option<u64> = None;

    loop {
        let page = api
            .orders_page(&OrderPageQuery {
                start: range.start,
                end: range.end,
                customer_id,
                since_id,
                limit: PAGE_SIZE,
            })
            .await?;

        debug!(page_len = page.len(), ?since_id, "fetched order page");

        let short_page = page.len() < PAGE_SIZE as usize;
        since_id = page.last().map(|order| order.id);
        orders.extend(page);

        if short_page {
            break;
        }
        if orders.len() > MAX_ORDER_FETCH {
            warn!(
                fetched = orders.len(),
                ceiling = MAX_ORDER_FETCH,
                "order fetch crossed the safety ceiling; continuing with partial set"
            );
            break;
        }
    }

    Ok(orders)
}
