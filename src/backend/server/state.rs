/**
 * Application State Management
 *
 * `AppState` is the central state container for the Axum application:
 *
 * - the presence registry (connection -> identity -> room)
 * - the room broadcast router (per-list fan-out channels)
 * - the sqlite connection pool
 *
 * Presence and rooms are the only server-side shared mutable state. The
 * registry lives behind `Arc<RwLock<>>` and is mutated by socket session
 * tasks; the router carries its own interior locking; the pool is cheap to
 * clone.
 *
 * The `FromRef` implementations let handlers extract just the part of the
 * state they need (most CRUD handlers take only the pool).
 */
use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::backend::auth::AuthCredentials;
use crate::backend::presence::PresenceRegistry;
use crate::backend::realtime::RoomRouter;

#[derive(Clone)]
pub struct AppState {
    /// Live connection identities and their current rooms.
    pub presence: Arc<RwLock<PresenceRegistry>>,
    /// Per-list broadcast channels.
    pub rooms: RoomRouter,
    /// Sqlite connection pool for the list/task store.
    pub db_pool: SqlitePool,
    /// Static login pair from configuration.
    pub credentials: AuthCredentials,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, credentials: AuthCredentials) -> Self {
        Self {
            presence: Arc::new(RwLock::new(PresenceRegistry::new())),
            rooms: RoomRouter::new(),
            db_pool,
            credentials,
        }
    }
}

impl FromRef<AppState> for Arc<RwLock<PresenceRegistry>> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.presence.clone()
    }
}

impl FromRef<AppState> for RoomRouter {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.rooms.clone()
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for AuthCredentials {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.credentials.clone()
    }
}
