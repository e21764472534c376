//! Grouping and rollup over the processed rows.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rust_decimal::Decimal;

use crate::modules::reports::models::{
    profit_margin, ReportAnalytics, ReportMetric, ReportRow, SummaryGroup,
};

#[derive(Debug, Default)]
struct GroupAccumulator {
    customer_name: String,
    orders: u64,
    amount: Decimal,
    total_billing: Decimal,
    total_actual: Decimal,
    order_numbers: BTreeSet<String>,
}

/// Group rows by (month, customer key) and roll each group up.
///
/// The output is sorted by month then customer (the map key order). Each
/// group's margin is recomputed from its aggregated totals rather than
/// averaged from the row margins.
pub fn summarize(rows: &[ReportRow], metric: ReportMetric) -> Vec<SummaryGroup> {
    let mut groups: BTreeMap<(String, String), GroupAccumulator> = BTreeMap::new();

    for row in rows {
        let key = (row.month.clone(), row.customer_key());
        let group = groups.entry(key).or_default();
        if group.customer_name.is_empty() {
            group.customer_name = row.customer_name.clone();
        }
        group.orders += 1;
        group.amount += metric.select(row);
        group.total_billing += row.billing_amount;
        group.total_actual += row.actual_spend;
        group.order_numbers.insert(row.order_number.clone());
    }

    groups
        .into_iter()
        .map(|((month, customer), group)| SummaryGroup {
            customer,
            customer_name: group.customer_name,
            month,
            orders: group.orders,
            amount: group.amount,
            total_billing: group.total_billing,
            total_actual: group.total_actual,
            order_numbers: group
                .order_numbers
                .into_iter()
                .collect::<Vec<_>>()
                .join(", "),
            profit_margin: profit_margin(group.total_billing, group.total_actual).round_dp(2),
        })
        .collect()
}

/// Report-level analytics over the finished groups.
pub fn analytics(groups: &[SummaryGroup], total_orders: u64) -> ReportAnalytics {
    let total_revenue = groups.iter().map(|group| group.amount).sum();

    let unique_customers = groups
        .iter()
        .map(|group| group.customer.as_str())
        .collect::<HashSet<_>>()
        .len() as u64;

    // Mean of group margins; a different aggregation than the per-group
    // recomputation above, preserved deliberately.
    let avg_profit_margin = if groups.is_empty() {
        Decimal::ZERO
    } else {
        let margin_sum: Decimal = groups.iter().map(|group| group.profit_margin).sum();
        (margin_sum / Decimal::from(groups.len() as u64)).round_dp(2)
    };

    ReportAnalytics {
        total_revenue,
        total_orders,
        unique_customers,
        avg_profit_margin,
    }
}
