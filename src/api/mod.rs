//! HTTP API for SafeView Core.

pub mod handlers;
pub mod routes;
pub mod types;

pub use routes::build_router;
