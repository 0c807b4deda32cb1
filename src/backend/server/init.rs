/**
 * Server Initialization
 *
 * Brings the server up in order:
 *
 * 1. Open the sqlite pool and run migrations (the only hard dependency)
 * 2. Create the presence registry and room router (empty on every start;
 *    room membership never survives a restart - clients re-join on
 *    reconnect)
 * 3. Assemble the router with the CORS policy from configuration
 */
use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{connect_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application.
pub async fn create_app(config: &ServerConfig) -> Result<Router<()>, sqlx::Error> {
    tracing::info!("Initializing CoList backend server");

    let db_pool = connect_database(&config.database_url).await?;

    let app_state = AppState::new(db_pool, config.credentials.clone());
    tracing::info!("Presence registry and room router initialized");

    Ok(create_router(app_state, &config.allowed_origin))
}
