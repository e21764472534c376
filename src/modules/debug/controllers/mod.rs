pub mod debug_controller;

pub use debug_controller::configure;
