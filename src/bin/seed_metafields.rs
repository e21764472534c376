//! Seeds sample charge metafields on recent orders of a development shop,
//! so the report endpoints have data to aggregate.
//!
//! Usage: `seed_metafields [max_orders]` (default 10). Reads the same
//! environment as the service.

use std::sync::Arc;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopreport::config::Config;
use shopreport::modules::platform::{ShopifyClient, UpstreamGate};
use shopreport::modules::reports::services::metafield_values::{
    ACTUAL_TOTAL_KEY, ADDITIONAL_CHARGES_KEY,
};

const METAFIELD_NAMESPACE: &str = "custom";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopreport=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let max_orders: u32 = std::env::args()
        .nth(1)
        .map(|raw| raw.parse())
        .transpose()
        .context("max_orders must be a positive integer")?
        .unwrap_or(10);

    let config = Config::from_env().context("loading configuration")?;
    config.validate().context("validating configuration")?;

    let gate = Arc::new(UpstreamGate::new(config.upstream.max_requests_per_second));
    let client = ShopifyClient::new(&config.shop, gate).context("building upstream client")?;

    let orders = client
        .recent_orders(max_orders)
        .await
        .context("fetching recent orders")?;
    tracing::info!(count = orders.len(), "seeding metafields on recent orders");

    for (index, order) in orders.iter().enumerate() {
        let line_total: Decimal = order
            .line_items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();

        // Deterministic sample figures: a small surcharge and an actual
        // cost a bit under the line total.
        let additional = Decimal::from(5) + Decimal::from((index % 4) as u32) * Decimal::new(25, 1);
        let actual = (line_total * Decimal::new(85, 2)).round_dp(2);

        client
            .create_order_metafield(
                order.id,
                METAFIELD_NAMESPACE,
                ADDITIONAL_CHARGES_KEY,
                &additional.to_string(),
            )
            .await
            .with_context(|| format!("seeding {} on order {}", ADDITIONAL_CHARGES_KEY, order.id))?;

        client
            .create_order_metafield(
                order.id,
                METAFIELD_NAMESPACE,
                ACTUAL_TOTAL_KEY,
                &actual.to_string(),
            )
            .await
            .with_context(|| format!("seeding {} on order {}", ACTUAL_TOTAL_KEY, order.id))?;

        tracing::info!(
            order = %order.name,
            additional_charges = %additional,
            actual_total = %actual,
            "seeded"
        );
    }

    Ok(())
}
