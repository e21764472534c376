use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Which per-order figure a report sums into its groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMetric {
    /// `billing_amount` (line sum plus additional charges)
    Billing,
    /// `actual_spend` (the actual-cost metafield)
    Actual,
}

impl ReportMetric {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "billing" => Ok(ReportMetric::Billing),
            "actual" => Ok(ReportMetric::Actual),
            other => Err(AppError::validation(format!(
                "invalid metric '{}' (expected 'billing' or 'actual')",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportMetric::Billing => "billing",
            ReportMetric::Actual => "actual",
        }
    }

    /// The row figure this metric selects.
    pub fn select(self, row: &ReportRow) -> Decimal {
        match self {
            ReportMetric::Billing => row.billing_amount,
            ReportMetric::Actual => row.actual_spend,
        }
    }
}

/// Identity fields of a report row, resolved from the order and the
/// customer directory before any financials are attached.
#[derive(Debug, Clone)]
pub struct RowIdentity {
    pub order_id: u64,
    pub order_number: String,
    pub date: String,
    pub month: String,
    pub customer_id: Option<u64>,
    pub customer_name: String,
    pub customer_email: Option<String>,
}

/// One fully processed order.
///
/// `billing_amount` is always recomputed as `line_sum + additional_charges`,
/// never taken from the upstream order total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub order_id: u64,
    pub order_number: String,
    pub date: String,
    pub month: String,
    pub customer_id: Option<u64>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub line_sum: Decimal,
    pub additional_charges: Decimal,
    pub billing_amount: Decimal,
    pub actual_spend: Decimal,
    pub profit_margin: Decimal,
}

impl ReportRow {
    pub fn from_amounts(
        identity: RowIdentity,
        line_sum: Decimal,
        additional_charges: Decimal,
        actual_spend: Decimal,
    ) -> Self {
        let billing_amount = line_sum + additional_charges;
        Self {
            order_id: identity.order_id,
            order_number: identity.order_number,
            date: identity.date,
            month: identity.month,
            customer_id: identity.customer_id,
            customer_name: identity.customer_name,
            customer_email: identity.customer_email,
            line_sum,
            additional_charges,
            billing_amount,
            actual_spend,
            profit_margin: profit_margin(billing_amount, actual_spend),
        }
    }

    /// Row for an order whose metadata could not be fetched: the line sum
    /// survives, everything metadata-derived is zeroed, including the margin.
    pub fn degraded(identity: RowIdentity, line_sum: Decimal) -> Self {
        let mut row = Self::from_amounts(identity, line_sum, Decimal::ZERO, Decimal::ZERO);
        row.profit_margin = Decimal::ZERO;
        row
    }

    /// Grouping key: email if present, else the numeric id as text, else
    /// the literal "unknown".
    pub fn customer_key(&self) -> String {
        if let Some(email) = self.customer_email.as_deref() {
            if !email.is_empty() {
                return email.to_string();
            }
        }
        match self.customer_id {
            Some(id) => id.to_string(),
            None => "unknown".to_string(),
        }
    }
}

/// Margin in percent; zero whenever there is nothing billed.
pub fn profit_margin(billing_amount: Decimal, actual_spend: Decimal) -> Decimal {
    if billing_amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (billing_amount - actual_spend) / billing_amount * Decimal::ONE_HUNDRED
}

/// Aggregation bucket: one customer, one calendar month.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryGroup {
    /// Customer key (email, id as text, or "unknown").
    pub customer: String,
    pub customer_name: String,
    /// `YYYY-MM`, UTC.
    pub month: String,
    pub orders: u64,
    /// Sum of the selected metric over the group's rows.
    pub amount: Decimal,
    pub total_billing: Decimal,
    pub total_actual: Decimal,
    /// Comma-joined sorted order numbers.
    pub order_numbers: String,
    /// Recomputed from the aggregated totals, not averaged from rows.
    pub profit_margin: Decimal,
}

/// Report-level rollup across all groups.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAnalytics {
    pub total_revenue: Decimal,
    pub total_orders: u64,
    pub unique_customers: u64,
    /// Mean of the group-level margins, rounded to two decimal places.
    pub avg_profit_margin: Decimal,
}

/// Request echo plus generation facts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub start: String,
    pub end: String,
    pub metric: String,
    pub customer_id: Option<u64>,
    pub generated_at: String,
    pub fetched_orders: u64,
    /// Rows produced through a fallback path rather than full enrichment.
    pub degraded_rows: u64,
}

/// Full report payload.
#[derive(Debug, Clone, Serialize)]
pub struct RevenueReport {
    pub summary: Vec<SummaryGroup>,
    pub detail: Vec<ReportRow>,
    pub analytics: ReportAnalytics,
    pub metadata: ReportMetadata,
}
