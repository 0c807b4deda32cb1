//! HTTP route wiring.

pub mod api_routes;
pub mod router;
