//! Connection-scoped user identity.
//!
//! One identity exists per live socket connection. It is never persisted:
//! it is created when the connection registers, mutated by identity updates
//! and room navigation, and destroyed on disconnect.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name used when the handshake carries none.
pub const DEFAULT_NAME: &str = "Anonymous";

/// Palette assigned to connections that do not pick a color.
pub const COLOR_PALETTE: [&str; 8] = [
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
];

/// The identity of one live connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserIdentity {
    /// Opaque connection identifier, session-scoped.
    pub id: Uuid,
    pub name: String,
    /// Display color, hex string.
    pub color: String,
    /// The list room this connection currently occupies, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<i64>,
}

impl UserIdentity {
    /// Build an identity for a fresh connection, applying defaults for a
    /// missing name or color. The fallback color is derived from the
    /// connection id so anonymous users stay visually distinct.
    pub fn new(id: Uuid, name: Option<String>, color: Option<String>) -> Self {
        let name = match name {
            Some(n) if !n.trim().is_empty() => n,
            _ => DEFAULT_NAME.to_string(),
        };
        let color = color.unwrap_or_else(|| default_color(&id).to_string());
        Self {
            id,
            name,
            color,
            room_id: None,
        }
    }
}

fn default_color(id: &Uuid) -> &'static str {
    let index = id.as_bytes()[0] as usize % COLOR_PALETTE.len();
    COLOR_PALETTE[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let id = Uuid::new_v4();
        let identity = UserIdentity::new(id, None, None);
        assert_eq!(identity.name, DEFAULT_NAME);
        assert!(COLOR_PALETTE.contains(&identity.color.as_str()));
        assert!(identity.room_id.is_none());
    }

    #[test]
    fn test_blank_name_falls_back() {
        let identity = UserIdentity::new(Uuid::new_v4(), Some("   ".to_string()), None);
        assert_eq!(identity.name, DEFAULT_NAME);
    }

    #[test]
    fn test_explicit_identity_kept() {
        let identity = UserIdentity::new(
            Uuid::new_v4(),
            Some("Alice".to_string()),
            Some("#123456".to_string()),
        );
        assert_eq!(identity.name, "Alice");
        assert_eq!(identity.color, "#123456");
    }
}
