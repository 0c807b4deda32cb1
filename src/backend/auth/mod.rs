//! Static-credential login.
//!
//! Authentication here is deliberately trivial: a single username/password
//! pair from the environment, no sessions, no tokens. It exists so the
//! deployment can gate the UI, not as a security system.

pub mod handlers;

/// The static username/password pair the login endpoint checks against,
/// taken from `ServerConfig` at startup.
#[derive(Debug, Clone)]
pub struct AuthCredentials {
    pub username: String,
    pub password: String,
}

impl Default for AuthCredentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}
