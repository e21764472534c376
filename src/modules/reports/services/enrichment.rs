//! Per-order enrichment: the secondary fetches and the fallback chain that
//! turns one upstream order into one report row.
//!
//! Upstream failures here degrade the row, never drop it: a fulfillment
//! fetch failure falls back to the order's own line items, and a metafield
//! fetch failure zeroes the metadata-derived figures. Only the initial order
//! listing can fail a report.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::warn;

use crate::core::month_key;
use crate::modules::customers::directory::CustomerDirectory;
use crate::modules::platform::models::{Fulfillment, Order};
use crate::modules::platform::ShopApi;
use crate::modules::reports::models::{ReportRow, RowIdentity};
use super::metafield_values::extract_charge_fields;

/// How much of the enrichment chain succeeded for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentQuality {
    /// Metafields and fulfillments both fetched; line sum from fulfillments.
    Full,
    /// Fulfillment fetch failed; line sum recomputed from the order's lines.
    FulfillmentFallback,
    /// Metafield fetch failed; metadata figures zeroed, line-item line sum.
    MetafieldsUnavailable,
}

impl EnrichmentQuality {
    pub fn is_degraded(self) -> bool {
        self != EnrichmentQuality::Full
    }
}

/// A report row tagged with how it was produced.
#[derive(Debug, Clone)]
pub struct EnrichedOrder {
    pub row: ReportRow,
    pub quality: EnrichmentQuality,
}

/// Run the enrichment chain for one order. Infallible by design; every
/// upstream error selects a fallback.
pub async fn enrich_order(
    api: &dyn ShopApi,
    directory: &CustomerDirectory,
    order: &Order,
) -> EnrichedOrder {
    let identity = row_identity(order, directory);

    let metafields = match api.order_metafields(order.id).await {
        Ok(metafields) => metafields,
        Err(err) => {
            warn!(
                order_id = order.id,
                error = %err,
                "metafield fetch failed; including order with zeroed metadata figures"
            );
            let line_sum = line_item_fallback_sum(order);
            return EnrichedOrder {
                row: ReportRow::degraded(identity, line_sum),
                quality: EnrichmentQuality::MetafieldsUnavailable,
            };
        }
    };

    let (line_sum, quality) = match api.order_fulfillments(order.id).await {
        Ok(fulfillments) => (fulfilled_line_sum(&fulfillments), EnrichmentQuality::Full),
        Err(err) => {
            warn!(
                order_id = order.id,
                error = %err,
                "fulfillment fetch failed; recomputing line sum from order lines"
            );
            (line_item_fallback_sum(order), EnrichmentQuality::FulfillmentFallback)
        }
    };

    let charges = extract_charge_fields(&metafields);
    EnrichedOrder {
        row: ReportRow::from_amounts(
            identity,
            line_sum,
            charges.additional_charges,
            charges.actual_spend,
        ),
        quality,
    }
}

/// Fulfilled revenue from the fulfillment records: for every line of every
/// successful fulfillment, derive the unit price from the line total and
/// accumulate it back over the quantity. Lines with a non-positive quantity
/// or derived price contribute nothing.
pub fn fulfilled_line_sum(fulfillments: &[Fulfillment]) -> Decimal {
    let mut sum = Decimal::ZERO;
    for fulfillment in fulfillments {
        if !fulfillment.is_success() {
            continue;
        }
        for line in &fulfillment.line_items {
            if line.quantity <= 0 {
                continue;
            }
            let quantity = Decimal::from(line.quantity);
            let unit_price = line.total_amount / quantity;
            if unit_price > Decimal::ZERO {
                sum += unit_price * quantity;
            }
        }
    }
    sum
}

/// Line sum recomputed from the order's own lines: removed, cancelled,
/// refunded and returned lines are skipped; the rest contribute their unit
/// price over the already-fulfilled portion of the quantity.
pub fn line_item_fallback_sum(order: &Order) -> Decimal {
    let mut sum = Decimal::ZERO;
    for item in &order.line_items {
        if item.status().is_excluded() {
            continue;
        }
        let fulfilled_quantity = (item.quantity - item.fulfillable_quantity).max(0);
        sum += item.price * Decimal::from(fulfilled_quantity);
    }
    sum
}

fn row_identity(order: &Order, directory: &CustomerDirectory) -> RowIdentity {
    let customer_id = order.customer.as_ref().and_then(|customer| customer.id);
    let order_email = order
        .customer
        .as_ref()
        .and_then(|customer| customer.email.clone())
        .filter(|email| !email.is_empty());

    RowIdentity {
        order_id: order.id,
        order_number: order.name.clone(),
        date: order.created_at.clone(),
        month: order_month(order),
        customer_id,
        customer_name: directory.display_name(customer_id),
        customer_email: order_email.or_else(|| directory.email(customer_id)),
    }
}

fn order_month(order: &Order) -> String {
    DateTime::parse_from_rfc3339(&order.created_at)
        .map(|parsed| month_key(&parsed.with_timezone(&Utc)))
        .unwrap_or_else(|_| "unknown".to_string())
}
