/**
 * Login Handler
 *
 * POST /api/auth/login checks the request body against the static
 * credential pair carried in the server configuration
 * (`APP_USERNAME`/`APP_PASSWORD`, default admin/admin).
 */
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::backend::auth::AuthCredentials;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub ok: bool,
    pub username: String,
}

/// POST /api/auth/login
pub async fn login(
    State(credentials): State<AuthCredentials>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, StatusCode> {
    if req.username == credentials.username && req.password == credentials.password {
        tracing::info!("[Auth] Login for '{}'", req.username);
        Ok(Json(LoginResponse {
            ok: true,
            username: req.username,
        }))
    } else {
        tracing::warn!("[Auth] Rejected login for '{}'", req.username);
        Err(StatusCode::UNAUTHORIZED)
    }
}
