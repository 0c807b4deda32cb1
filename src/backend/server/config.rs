/**
 * Server Configuration
 *
 * Configuration is read from environment variables with local-development
 * defaults:
 *
 * - `SERVER_PORT` - listen port (default 3000)
 * - `DATABASE_URL` - sqlite connection string (default `sqlite://colist.db`;
 *   `sqlite::memory:` works for throwaway runs)
 * - `ALLOWED_ORIGIN` - CORS origin for browser clients (default `*`)
 * - `APP_USERNAME` / `APP_PASSWORD` - the static login pair (default
 *   admin/admin)
 *
 * Room and presence state are process-local, so the database is the only
 * startup dependency; a connection failure aborts startup with a clear error
 * instead of limping along without a store.
 */
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::backend::auth::AuthCredentials;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
    pub allowed_origin: String,
    pub credentials: AuthCredentials,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(3000);
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://colist.db".to_string());
        let allowed_origin = std::env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "*".to_string());
        let defaults = AuthCredentials::default();
        let credentials = AuthCredentials {
            username: std::env::var("APP_USERNAME").unwrap_or(defaults.username),
            password: std::env::var("APP_PASSWORD").unwrap_or(defaults.password),
        };
        Self {
            port,
            database_url,
            allowed_origin,
            credentials,
        }
    }
}

/// Open the sqlite pool and bring the schema up to date.
///
/// Foreign keys are switched on per connection so deleting a list cascades
/// to its tasks. (Task parent links carry no foreign key at all: deleting a
/// parent task must leave its children behind.)
pub async fn connect_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database at {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {:?}", e);
        sqlx::Error::Migrate(Box::new(e))
    })?;
    tracing::info!("Database ready");

    Ok(pool)
}
