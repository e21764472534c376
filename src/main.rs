use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopreport::app::{configure_routes, AppState};
use shopreport::config::Config;
use shopreport::modules::customers::CustomerDirectory;
use shopreport::modules::platform::{ShopApi, ShopifyClient, UpstreamGate};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopreport=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; refuse to start without shop domain and token.
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting shop revenue report service");
    tracing::info!("Upstream shop: {}", config.shop.domain);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let gate = Arc::new(UpstreamGate::new(config.upstream.max_requests_per_second));
    let client = Arc::new(
        ShopifyClient::new(&config.shop, gate).expect("Failed to build upstream client"),
    );
    let directory = Arc::new(
        CustomerDirectory::from_path(&config.customer_directory_path)
            .expect("Failed to load customer directory"),
    );

    let state = AppState {
        api: client.clone() as Arc<dyn ShopApi>,
        client,
        directory,
    };

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes)
    })
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}
