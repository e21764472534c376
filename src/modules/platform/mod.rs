pub mod api;
pub mod client;
pub mod gate;
pub mod models;

pub use api::{OrderPageQuery, ShopApi, PAGE_SIZE};
pub use client::ShopifyClient;
pub use gate::UpstreamGate;
