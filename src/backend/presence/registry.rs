/**
 * Presence Registry
 *
 * Authoritative mapping of live connection -> identity -> current room.
 *
 * # Lifecycle
 *
 * - `register` is called once when a socket connects
 * - `set_room` / `update_identity` mutate the identity while it lives
 * - `unregister` is called exactly once, on disconnect
 *
 * # Failure Semantics
 *
 * No operation fails. Referencing a connection that already disconnected is
 * an expected race under concurrent load and is treated as a logged no-op,
 * never surfaced to any user.
 *
 * # Room Membership
 *
 * A connection occupies at most one room at a time; joining a room is an
 * implicit leave of any prior room. The roster for a room is a derived view,
 * recomputed by scanning the table on demand rather than stored separately.
 */
use std::collections::HashMap;

use uuid::Uuid;

use crate::shared::identity::UserIdentity;

/// Process-wide table of live connections.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    connections: HashMap<Uuid, UserIdentity>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    /// Register a new connection, applying defaults for a missing name or
    /// color, and return the resulting identity.
    pub fn register(
        &mut self,
        connection_id: Uuid,
        name: Option<String>,
        color: Option<String>,
    ) -> UserIdentity {
        let identity = UserIdentity::new(connection_id, name, color);
        self.connections.insert(connection_id, identity.clone());
        tracing::info!(
            "[Presence] Registered connection {} as '{}' ({} online)",
            connection_id,
            identity.name,
            self.connections.len()
        );
        identity
    }

    /// Update the room occupied by a connection. `None` models "left all
    /// rooms". Unknown connections are a logged no-op.
    pub fn set_room(&mut self, connection_id: Uuid, room_id: Option<i64>) {
        match self.connections.get_mut(&connection_id) {
            Some(identity) => identity.room_id = room_id,
            None => {
                tracing::warn!(
                    "[Presence] set_room for unknown connection {} (already disconnected?)",
                    connection_id
                );
            }
        }
    }

    /// Mutate the name/color of an existing identity. Returns the updated
    /// identity, or `None` (with a warning) if the connection is unknown.
    pub fn update_identity(
        &mut self,
        connection_id: Uuid,
        name: String,
        color: String,
    ) -> Option<UserIdentity> {
        match self.connections.get_mut(&connection_id) {
            Some(identity) => {
                identity.name = name;
                identity.color = color;
                Some(identity.clone())
            }
            None => {
                tracing::warn!(
                    "[Presence] identity update for unknown connection {}",
                    connection_id
                );
                None
            }
        }
    }

    /// The identities currently occupying `room_id`. Order is unspecified;
    /// display layers sort if they need to.
    pub fn roster_for(&self, room_id: i64) -> Vec<UserIdentity> {
        self.connections
            .values()
            .filter(|identity| identity.room_id == Some(room_id))
            .cloned()
            .collect()
    }

    /// Snapshot of every live identity, room or not. Sent to a freshly
    /// connected socket before it joins anything.
    pub fn snapshot(&self) -> Vec<UserIdentity> {
        self.connections.values().cloned().collect()
    }

    pub fn get(&self, connection_id: Uuid) -> Option<&UserIdentity> {
        self.connections.get(&connection_id)
    }

    /// Remove the identity entirely. Returns it so the caller can broadcast
    /// the departed room's roster. Unknown connections are a logged no-op.
    pub fn unregister(&mut self, connection_id: Uuid) -> Option<UserIdentity> {
        let removed = self.connections.remove(&connection_id);
        match &removed {
            Some(identity) => {
                tracing::info!(
                    "[Presence] Unregistered connection {} ('{}', {} online)",
                    connection_id,
                    identity.name,
                    self.connections.len()
                );
            }
            None => {
                tracing::warn!(
                    "[Presence] unregister for unknown connection {}",
                    connection_id
                );
            }
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_roster() {
        let mut registry = PresenceRegistry::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        registry.register(a, Some("Alice".to_string()), None);
        registry.register(b, Some("Bob".to_string()), None);

        registry.set_room(a, Some(7));
        registry.set_room(b, Some(7));

        let roster = registry.roster_for(7);
        assert_eq!(roster.len(), 2);
        assert!(registry.roster_for(3).is_empty());
    }

    #[test]
    fn test_unregister_drops_from_roster() {
        let mut registry = PresenceRegistry::new();
        let a = Uuid::new_v4();
        registry.register(a, None, None);
        registry.set_room(a, Some(7));
        assert_eq!(registry.roster_for(7).len(), 1);

        registry.unregister(a);
        assert!(registry.roster_for(7).is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_room_change_is_implicit_leave() {
        let mut registry = PresenceRegistry::new();
        let a = Uuid::new_v4();
        registry.register(a, None, None);
        registry.set_room(a, Some(7));
        registry.set_room(a, Some(9));

        assert!(registry.roster_for(7).is_empty());
        assert_eq!(registry.roster_for(9).len(), 1);
    }

    #[test]
    fn test_unknown_connection_is_noop() {
        let mut registry = PresenceRegistry::new();
        let ghost = Uuid::new_v4();
        registry.set_room(ghost, Some(1));
        assert!(registry
            .update_identity(ghost, "X".to_string(), "#fff".to_string())
            .is_none());
        assert!(registry.unregister(ghost).is_none());
    }

    #[test]
    fn test_update_identity_reflected_in_roster() {
        let mut registry = PresenceRegistry::new();
        let a = Uuid::new_v4();
        registry.register(a, Some("Old".to_string()), None);
        registry.set_room(a, Some(2));
        registry.update_identity(a, "New".to_string(), "#abcdef".to_string());

        let roster = registry.roster_for(2);
        assert_eq!(roster[0].name, "New");
        assert_eq!(roster[0].color, "#abcdef");
    }
}
