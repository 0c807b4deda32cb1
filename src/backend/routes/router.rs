/**
 * Router Configuration
 *
 * Combines all route groups into the final Axum router:
 *
 * 1. `GET /ws` - the WebSocket sync endpoint
 * 2. `/api/...` - the CRUD surface (lists, tasks, login)
 * 3. `/static` - uploaded task pictures and other assets
 * 4. Fallback 404
 *
 * CORS is applied last so browser clients served from a different origin
 * (the configured `ALLOWED_ORIGIN`) can reach both surfaces.
 */
use axum::http::{HeaderValue, StatusCode};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::backend::realtime::socket::websocket_handler;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

pub fn create_router(app_state: AppState, allowed_origin: &str) -> Router<()> {
    let router = Router::new().route("/ws", get(websocket_handler));

    let router = configure_api_routes(router);

    let router = router
        .nest_service("/static", ServeDir::new("public"))
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(cors_layer(allowed_origin));

    router.with_state(app_state)
}

fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origin == "*" {
        return layer.allow_origin(Any);
    }
    match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!(
                "[Server] invalid ALLOWED_ORIGIN '{}', falling back to any",
                allowed_origin
            );
            layer.allow_origin(Any)
        }
    }
}
