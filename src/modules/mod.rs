pub mod customers;
pub mod debug;
pub mod health;
pub mod orders;
pub mod platform;
pub mod reports;
