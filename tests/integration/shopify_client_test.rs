//! HTTP-level tests of the upstream client against a mock Admin API:
//! authentication header, listing filters, GraphQL parsing, and error
//! mapping.

use std::num::NonZeroU32;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopreport::core::AppError;
use shopreport::modules::platform::{OrderPageQuery, ShopApi, ShopifyClient, UpstreamGate};

const TOKEN: &str = "shpat_test_token";

fn client(server: &MockServer) -> ShopifyClient {
    let gate = Arc::new(UpstreamGate::new(NonZeroU32::new(100).unwrap()));
    ShopifyClient::with_base_url(server.uri(), TOKEN, gate).unwrap()
}

fn page_query() -> OrderPageQuery {
    OrderPageQuery {
        start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        customer_id: None,
        since_id: None,
        limit: 250,
    }
}

#[tokio::test]
async fn orders_page_authenticates_and_filters_to_shipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .and(header("X-Shopify-Access-Token", TOKEN))
        .and(query_param("status", "any"))
        .and(query_param("fulfillment_status", "shipped"))
        .and(query_param("limit", "250"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orders": [{
                "id": 5001u64,
                "name": "#1001",
                "created_at": "2024-01-10T08:00:00-05:00",
                "fulfillment_status": "fulfilled",
                "customer": { "id": 9001u64, "email": "buyer@example.com" },
                "line_items": [{
                    "name": "Widget",
                    "price": "19.99",
                    "quantity": 2,
                    "fulfillable_quantity": 0,
                    "current_quantity": 2
                }]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let orders = client(&server).orders_page(&page_query()).await.unwrap();

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, 5001);
    assert_eq!(orders[0].line_items[0].price, dec!(19.99));
}

#[tokio::test]
async fn orders_page_sends_the_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .and(query_param("since_id", "5001"))
        .and(query_param("customer_id", "9001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orders": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = page_query();
    query.since_id = Some(5001);
    query.customer_id = Some(9001);

    let orders = client(&server).orders_page(&query).await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn upstream_error_status_and_body_are_captured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders.json"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "errors": "internal upstream error" })),
        )
        .mount(&server)
        .await;

    let err = client(&server).orders_page(&page_query()).await.unwrap_err();
    match err {
        AppError::Upstream { status, message } => {
            assert_eq!(status, Some(500));
            assert!(message.contains("internal upstream error"));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn metafields_parse_from_the_graphql_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql.json"))
        .and(header("X-Shopify-Access-Token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "order": {
                    "id": "gid://shopify/Order/5001",
                    "name": "#1001",
                    "metafields": {
                        "edges": [
                            { "node": {
                                "namespace": "custom",
                                "key": "additional_charges",
                                "value": "10.5",
                                "type": "number_decimal"
                            }}
                        ]
                    }
                }
            }
        })))
        .mount(&server)
        .await;

    let metafields = client(&server).order_metafields(5001).await.unwrap();
    assert_eq!(metafields.len(), 1);
    assert_eq!(metafields[0].key, "additional_charges");
    assert_eq!(metafields[0].value, "10.5");
}

#[tokio::test]
async fn missing_order_yields_no_metafields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "order": null } })))
        .mount(&server)
        .await;

    let metafields = client(&server).order_metafields(404404).await.unwrap();
    assert!(metafields.is_empty());
}

#[tokio::test]
async fn graphql_errors_map_to_upstream_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Throttled" }]
        })))
        .mount(&server)
        .await;

    let err = client(&server).order_fulfillments(5001).await.unwrap_err();
    match err {
        AppError::Upstream { status, message } => {
            assert_eq!(status, None);
            assert!(message.contains("Throttled"));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn fulfillments_parse_quantities_and_totals() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "order": {
                    "id": "gid://shopify/Order/5001",
                    "fulfillments": [{
                        "status": "SUCCESS",
                        "fulfillmentLineItems": {
                            "edges": [
                                { "node": {
                                    "quantity": 2,
                                    "originalTotalSet": { "shopMoney": { "amount": "39.98" } }
                                }}
                            ]
                        }
                    }]
                }
            }
        })))
        .mount(&server)
        .await;

    let fulfillments = client(&server).order_fulfillments(5001).await.unwrap();
    assert_eq!(fulfillments.len(), 1);
    assert!(fulfillments[0].is_success());
    assert_eq!(fulfillments[0].line_items[0].quantity, 2);
    assert_eq!(fulfillments[0].line_items[0].total_amount, dec!(39.98));
}

#[tokio::test]
async fn customers_page_forwards_the_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers.json"))
        .and(query_param("limit", "250"))
        .and(query_param("since_id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "customers": [{ "id": 43, "email": "next@example.com" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let customers = client(&server).customers_page(Some(42)).await.unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0]["id"], json!(43));
}
