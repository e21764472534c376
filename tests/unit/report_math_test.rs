//! Property-based tests for the report arithmetic and grouping invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;

use shopreport::modules::reports::models::{
    profit_margin, ReportMetric, ReportRow, RowIdentity,
};
use shopreport::modules::reports::services::summary::{analytics, summarize};

const MONTHS: [&str; 3] = ["2024-01", "2024-02", "2024-03"];

// Customer pools exercising every key shape: email, bare id, anonymous.
const CUSTOMERS: [(Option<u64>, Option<&str>); 3] = [
    (Some(9001), Some("a@example.com")),
    (Some(9002), None),
    (None, None),
];

fn identity(order_id: u64, month_idx: usize, customer_idx: usize) -> RowIdentity {
    let (customer_id, email) = CUSTOMERS[customer_idx];
    RowIdentity {
        order_id,
        order_number: format!("#{}", order_id),
        date: format!("{}-10T00:00:00Z", MONTHS[month_idx]),
        month: MONTHS[month_idx].to_string(),
        customer_id,
        customer_name: "Test Customer".to_string(),
        customer_email: email.map(str::to_string),
    }
}

fn money() -> impl Strategy<Value = Decimal> {
    // Cents up to 10,000.00
    (0i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn rows() -> impl Strategy<Value = Vec<ReportRow>> {
    prop::collection::vec(
        (0usize..MONTHS.len(), 0usize..CUSTOMERS.len(), money(), money(), money()),
        0..40,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(index, (month_idx, customer_idx, line_sum, charges, actual))| {
                ReportRow::from_amounts(
                    identity(index as u64 + 1, month_idx, customer_idx),
                    line_sum,
                    charges,
                    actual,
                )
            })
            .collect()
    })
}

proptest! {
    /// billing_amount == line_sum + additional_charges, exactly.
    #[test]
    fn billing_is_line_sum_plus_charges(
        line_sum in money(),
        charges in money(),
        actual in money()
    ) {
        let row = ReportRow::from_amounts(identity(1, 0, 0), line_sum, charges, actual);
        prop_assert_eq!(row.billing_amount, line_sum + charges);
    }

    /// Margin collapses to zero whenever nothing is billed.
    #[test]
    fn margin_is_zero_for_non_positive_billing(actual in money(), billed_cents in -1_000_000i64..=0) {
        let billing = Decimal::new(billed_cents, 2);
        prop_assert_eq!(profit_margin(billing, actual), Decimal::ZERO);
    }

    /// Each group's amount equals the metric sum over exactly its rows, and
    /// the groups partition the row set.
    #[test]
    fn groups_sum_their_members(rows in rows(), use_billing in any::<bool>()) {
        let metric = if use_billing { ReportMetric::Billing } else { ReportMetric::Actual };
        let groups = summarize(&rows, metric);

        for group in &groups {
            let expected: Decimal = rows
                .iter()
                .filter(|row| row.month == group.month && row.customer_key() == group.customer)
                .map(|row| metric.select(row))
                .sum();
            prop_assert_eq!(group.amount, expected);
        }

        let grouped_orders: u64 = groups.iter().map(|group| group.orders).sum();
        prop_assert_eq!(grouped_orders, rows.len() as u64);
    }

    /// Grouping is stable: the number of groups equals the number of
    /// distinct (month, customer key) pairs, and output stays sorted.
    #[test]
    fn grouping_is_stable_and_sorted(rows in rows()) {
        let groups = summarize(&rows, ReportMetric::Billing);

        let distinct: std::collections::HashSet<(String, String)> = rows
            .iter()
            .map(|row| (row.month.clone(), row.customer_key()))
            .collect();
        prop_assert_eq!(groups.len(), distinct.len());

        let keys: Vec<(&str, &str)> = groups
            .iter()
            .map(|group| (group.month.as_str(), group.customer.as_str()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }

    /// Total revenue is the sum of group amounts regardless of metric.
    #[test]
    fn total_revenue_sums_group_amounts(rows in rows(), use_billing in any::<bool>()) {
        let metric = if use_billing { ReportMetric::Billing } else { ReportMetric::Actual };
        let groups = summarize(&rows, metric);
        let rollup = analytics(&groups, rows.len() as u64);

        let expected: Decimal = groups.iter().map(|group| group.amount).sum();
        prop_assert_eq!(rollup.total_revenue, expected);
        prop_assert_eq!(rollup.total_orders, rows.len() as u64);
    }
}
