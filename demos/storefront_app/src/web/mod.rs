// demos/storefront_app/src/web/mod.rs

// Declare child modules
pub mod handlers;
pub mod routes;

// Re-exported so main.rs and the in-crate tests can mount the same routes.
pub use routes::configure_app_routes;
