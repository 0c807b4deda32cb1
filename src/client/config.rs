//! Client configuration.
//!
//! Simple environment passthroughs locating the server: `SERVER_URL` for
//! the CRUD surface and `SOCKET_URL` for the WebSocket endpoint.

/// Where a client finds the server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the HTTP API, e.g. `http://localhost:3000`.
    pub server_url: String,
    /// WebSocket endpoint, e.g. `ws://localhost:3000/ws`.
    pub socket_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let server_url =
            std::env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let socket_url = std::env::var("SOCKET_URL")
            .unwrap_or_else(|_| derive_socket_url(&server_url));
        Self {
            server_url,
            socket_url,
        }
    }
}

fn derive_socket_url(server_url: &str) -> String {
    let ws_base = if let Some(rest) = server_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = server_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        server_url.to_string()
    };
    format!("{}/ws", ws_base.trim_end_matches('/'))
}
