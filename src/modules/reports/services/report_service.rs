use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::core::{DateRange, Result};
use crate::modules::customers::directory::CustomerDirectory;
use crate::modules::orders::services::order_fetcher;
use crate::modules::platform::ShopApi;
use crate::modules::reports::models::{ReportMetadata, ReportMetric, RevenueReport};
use super::enrichment::{enrich_order, EnrichedOrder};
use super::summary::{analytics, summarize};

/// Service producing the monthly revenue report.
///
/// Orchestrates the three phases: paginated order fetch, sequential
/// per-order enrichment (paced by the upstream gate inside the client),
/// and grouping. Only the fetch phase can fail the request.
pub struct ReportService {
    api: Arc<dyn ShopApi>,
    directory: Arc<CustomerDirectory>,
}

impl ReportService {
    pub fn new(api: Arc<dyn ShopApi>, directory: Arc<CustomerDirectory>) -> Self {
        Self { api, directory }
    }

    pub async fn generate(
        &self,
        range: DateRange,
        metric: ReportMetric,
        customer_id: Option<u64>,
    ) -> Result<RevenueReport> {
        info!(
            start = %range.start,
            end = %range.end,
            metric = metric.as_str(),
            ?customer_id,
            "generating revenue report"
        );

        let orders =
            order_fetcher::fetch_all_orders(self.api.as_ref(), &range, customer_id).await?;
        let fetched_orders = orders.len() as u64;

        // Strictly sequential: one order at a time, each call behind the
        // shared upstream gate, to stay under the platform rate limit.
        let mut rows = Vec::with_capacity(orders.len());
        let mut degraded_rows = 0u64;
        for order in &orders {
            let EnrichedOrder { row, quality } =
                enrich_order(self.api.as_ref(), &self.directory, order).await;
            if quality.is_degraded() {
                degraded_rows += 1;
            }
            rows.push(row);
        }

        let summary = summarize(&rows, metric);
        let analytics = analytics(&summary, rows.len() as u64);

        info!(
            orders = rows.len(),
            groups = summary.len(),
            degraded_rows,
            "revenue report generated"
        );

        Ok(RevenueReport {
            analytics,
            metadata: ReportMetadata {
                start: range.start.to_rfc3339(),
                end: range.end.to_rfc3339(),
                metric: metric.as_str().to_string(),
                customer_id,
                generated_at: Utc::now().to_rfc3339(),
                fetched_orders,
                degraded_rows,
            },
            summary,
            detail: rows,
        })
    }
}
