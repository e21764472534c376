use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::app::AppState;
use crate::core::{AppError, DateRange, Result};
use crate::modules::reports::models::ReportMetric;
use crate::modules::reports::services::ReportService;

/// Request body for report generation. Field-level validation happens in
/// the handler so each missing or malformed field gets a descriptive 400.
#[derive(Debug, Deserialize)]
pub struct ReportBody {
    pub start: Option<String>,
    pub end: Option<String>,
    pub metric: Option<String>,
    #[serde(rename = "customerId")]
    pub customer_id: Option<u64>,
}

/// POST /api/report
///
/// Generates the monthly revenue report for the window. Validation failures
/// return 400 before any upstream call; upstream failures during the order
/// fetch propagate with the upstream status.
pub async fn generate_report(
    state: web::Data<AppState>,
    body: web::Json<ReportBody>,
) -> Result<HttpResponse> {
    let start = body
        .start
        .as_deref()
        .ok_or_else(|| AppError::validation("missing required field 'start'"))?;
    let end = body
        .end
        .as_deref()
        .ok_or_else(|| AppError::validation("missing required field 'end'"))?;
    let metric_raw = body
        .metric
        .as_deref()
        .ok_or_else(|| AppError::validation("missing required field 'metric'"))?;

    let metric = ReportMetric::parse(metric_raw)?;
    let range = DateRange::parse(start, end)?;

    let service = ReportService::new(state.api.clone(), state.directory.clone());
    let report = service.generate(range, metric, body.customer_id).await?;

    Ok(HttpResponse::Ok().json(report))
}

/// Configure routes for the reports module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/report", web::post().to(generate_report));
}
