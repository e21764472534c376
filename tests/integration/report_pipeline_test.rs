//! End-to-end report generation against a canned upstream: pagination,
//! the enrichment fallback chain, grouping, and failure propagation.

#[path = "../helpers/stub_api.rs"]
mod stub_api;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use rust_decimal_macros::dec;

use shopreport::core::{AppError, DateRange};
use shopreport::modules::customers::CustomerDirectory;
use shopreport::modules::orders::services::{fetch_all_orders, PAGE_SIZE};
use shopreport::modules::reports::models::ReportMetric;
use shopreport::modules::reports::services::ReportService;

use stub_api::{line_item, metafield, order, success_fulfillment, StubShopApi};

const DIRECTORY_YAML: &str = r#"
customers:
  "9001":
    name: Acme Retail
    email: billing@acme.example
"#;

fn january_range() -> DateRange {
    DateRange::parse("2024-01-01T00:00:00.000Z", "2024-02-01T00:00:00.000Z").unwrap()
}

fn service(api: Arc<StubShopApi>) -> ReportService {
    let directory = Arc::new(CustomerDirectory::from_yaml(DIRECTORY_YAML).unwrap());
    ReportService::new(api, directory)
}

#[tokio::test]
async fn two_january_orders_roll_into_one_group() {
    let mut stub = StubShopApi::default();
    for (id, created_at) in [(5001u64, "2024-01-10T08:00:00Z"), (5002, "2024-01-20T16:30:00Z")] {
        stub.orders.push(order(id, created_at, Some(9001), Some("ops@acme.example")));
        // line_sum 100: 2 units fulfilled at 50 each.
        stub.fulfillments
            .insert(id, vec![success_fulfillment(&[(2, "100")])]);
        stub.metafields
            .insert(id, vec![metafield("additional_charges", "10")]);
    }

    let report = service(Arc::new(stub))
        .generate(january_range(), ReportMetric::Billing, None)
        .await
        .unwrap();

    assert_eq!(report.detail.len(), 2);
    for row in &report.detail {
        assert_eq!(row.line_sum, dec!(100));
        assert_eq!(row.additional_charges, dec!(10));
        assert_eq!(row.billing_amount, dec!(110));
        assert_eq!(row.customer_name, "Acme Retail");
    }

    assert_eq!(report.summary.len(), 1);
    let group = &report.summary[0];
    assert_eq!(group.month, "2024-01");
    assert_eq!(group.orders, 2);
    assert_eq!(group.amount, dec!(220));
    assert_eq!(group.customer, "ops@acme.example");
    assert_eq!(group.order_numbers, "#5001, #5002");

    assert_eq!(report.analytics.total_revenue, dec!(220));
    assert_eq!(report.analytics.total_orders, 2);
    assert_eq!(report.analytics.unique_customers, 1);
    assert_eq!(report.metadata.degraded_rows, 0);
}

#[tokio::test]
async fn metafield_failure_degrades_but_keeps_the_order() {
    let mut stub = StubShopApi::default();
    let mut broken = order(5001, "2024-01-10T08:00:00Z", Some(9001), Some("ops@acme.example"));
    broken.line_items = vec![line_item("30", 2, 0)];
    stub.orders.push(broken);
    stub.fail_metafields.insert(5001);

    let report = service(Arc::new(stub))
        .generate(january_range(), ReportMetric::Billing, None)
        .await
        .unwrap();

    assert_eq!(report.detail.len(), 1);
    let row = &report.detail[0];
    assert_eq!(row.line_sum, dec!(60));
    assert_eq!(row.additional_charges, dec!(0));
    assert_eq!(row.billing_amount, dec!(60));
    assert_eq!(row.actual_spend, dec!(0));
    assert_eq!(row.profit_margin, dec!(0));
    assert_eq!(report.metadata.degraded_rows, 1);
}

#[tokio::test]
async fn fulfillment_failure_falls_back_to_order_lines() {
    let mut stub = StubShopApi::default();
    let mut degraded = order(5001, "2024-01-10T08:00:00Z", Some(9001), None);
    // 3 ordered, 1 unfulfilled: fallback counts 2 at 10 each.
    degraded.line_items = vec![line_item("10", 3, 1)];
    stub.orders.push(degraded);
    stub.fail_fulfillments.insert(5001);
    stub.metafields.insert(
        5001,
        vec![
            metafield("additional_charges", "5"),
            metafield("actual_total_checkout_price", "20"),
        ],
    );

    let report = service(Arc::new(stub))
        .generate(january_range(), ReportMetric::Billing, None)
        .await
        .unwrap();

    let row = &report.detail[0];
    assert_eq!(row.line_sum, dec!(20));
    assert_eq!(row.additional_charges, dec!(5));
    assert_eq!(row.billing_amount, dec!(25));
    assert_eq!(row.actual_spend, dec!(20));
    assert_eq!(row.profit_margin, dec!(20));
    assert_eq!(report.metadata.degraded_rows, 1);
}

#[tokio::test]
async fn order_fetch_failure_aborts_the_report() {
    let stub = StubShopApi {
        fail_orders_page: true,
        ..StubShopApi::default()
    };

    let err = service(Arc::new(stub))
        .generate(january_range(), ReportMetric::Billing, None)
        .await
        .unwrap_err();

    match err {
        AppError::Upstream { status, .. } => assert_eq!(status, Some(503)),
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn customer_filter_scopes_the_report() {
    let mut stub = StubShopApi::default();
    stub.orders.push(order(5001, "2024-01-10T08:00:00Z", Some(9001), None));
    stub.orders.push(order(5002, "2024-01-11T08:00:00Z", Some(9002), None));

    let report = service(Arc::new(stub))
        .generate(january_range(), ReportMetric::Billing, Some(9001))
        .await
        .unwrap();

    assert_eq!(report.detail.len(), 1);
    assert_eq!(report.detail[0].order_id, 5001);
    assert_eq!(report.metadata.customer_id, Some(9001));
}

#[tokio::test]
async fn pagination_walks_cursors_until_a_short_page() {
    let mut stub = StubShopApi::default();
    for id in 1..=600u64 {
        stub.orders.push(order(id, "2024-01-10T08:00:00Z", Some(9001), None));
    }
    let stub = Arc::new(stub);

    let orders = fetch_all_orders(stub.as_ref(), &january_range(), None)
        .await
        .unwrap();

    assert_eq!(orders.len(), 600);
    // 250 + 250 + 100: the short third page ends the walk.
    assert_eq!(stub.pages_served.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn pagination_stops_past_the_safety_ceiling() {
    let mut stub = StubShopApi::default();
    for id in 1..=10_600u64 {
        stub.orders.push(order(id, "2024-01-10T08:00:00Z", Some(9001), None));
    }
    let stub = Arc::new(stub);

    let orders = fetch_all_orders(stub.as_ref(), &january_range(), None)
        .await
        .unwrap();

    // Fetching stops with the first page that pushes the total past 10,000.
    assert_eq!(orders.len(), 10_250);
    assert_eq!(
        stub.pages_served.load(Ordering::SeqCst),
        10_250 / PAGE_SIZE as usize
    );
}

#[tokio::test]
async fn actual_metric_sums_the_actual_spend_column() {
    let mut stub = StubShopApi::default();
    for (id, actual) in [(5001u64, "80"), (5002, "60")] {
        stub.orders.push(order(id, "2024-01-10T08:00:00Z", Some(9001), Some("ops@acme.example")));
        stub.fulfillments
            .insert(id, vec![success_fulfillment(&[(1, "100")])]);
        stub.metafields
            .insert(id, vec![metafield("actual_total_checkout_price", actual)]);
    }

    let report = service(Arc::new(stub))
        .generate(january_range(), ReportMetric::Actual, None)
        .await
        .unwrap();

    assert_eq!(report.summary.len(), 1);
    assert_eq!(report.summary[0].amount, dec!(140));
    assert_eq!(report.analytics.total_revenue, dec!(140));
}
