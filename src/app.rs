use std::sync::Arc;

use actix_web::web;

use crate::modules::customers::directory::CustomerDirectory;
use crate::modules::platform::{ShopApi, ShopifyClient};
use crate::modules::{customers, debug, health, orders, reports};

/// Shared per-process state handed to every handler.
///
/// `api` is the seam services depend on; `client` is the concrete upstream
/// client, needed only by the raw debug passthroughs. Both normally point at
/// the same object. Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn ShopApi>,
    pub client: Arc<ShopifyClient>,
    pub directory: Arc<CustomerDirectory>,
}

/// Mount the full HTTP surface.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::controllers::configure);
    cfg.service(
        web::scope("/api")
            .configure(customers::controllers::configure)
            .configure(orders::controllers::configure)
            .configure(reports::controllers::configure)
            .configure(debug::controllers::configure),
    );
}
