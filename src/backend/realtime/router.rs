/**
 * Room Broadcast Router
 *
 * Groups connections into named rooms (one per list) and fans events out to
 * every member of a room.
 *
 * # Broadcasting
 *
 * Each room owns a `tokio::sync::broadcast` channel. A joining connection
 * subscribes and holds the receiver for as long as it occupies the room;
 * `broadcast` sends to every current subscriber, including the sender's own
 * session. Echo-to-self is deliberate: the sender's confirmed change takes
 * the same client-side merge path as a peer's.
 *
 * # Lifetime
 *
 * No membership persists beyond the process: a restart drops all room state
 * and clients re-join on reconnect. Rooms with no members are dropped on
 * leave so the map does not grow without bound.
 */
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::shared::protocol::ServerEvent;

/// Capacity of each room's broadcast channel.
const ROOM_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug)]
struct Room {
    sender: broadcast::Sender<ServerEvent>,
    members: HashSet<Uuid>,
}

impl Room {
    fn new() -> Self {
        let (sender, _) = broadcast::channel(ROOM_CHANNEL_CAPACITY);
        Self {
            sender,
            members: HashSet::new(),
        }
    }
}

/// Per-room broadcast channels, shared across all session tasks.
#[derive(Debug, Clone, Default)]
pub struct RoomRouter {
    rooms: Arc<Mutex<HashMap<i64, Room>>>,
}

impl RoomRouter {
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add a connection to a room's member set and subscribe it to the
    /// room's event stream. Idempotent: re-joining returns a fresh receiver.
    pub fn join(&self, connection_id: Uuid, room_id: i64) -> broadcast::Receiver<ServerEvent> {
        let mut rooms = self.rooms.lock().unwrap();
        let room = rooms.entry(room_id).or_insert_with(Room::new);
        room.members.insert(connection_id);
        tracing::debug!(
            "[Rooms] {} joined room {} ({} members)",
            connection_id,
            room_id,
            room.members.len()
        );
        room.sender.subscribe()
    }

    /// Remove a connection from a room's member set. Idempotent; no error if
    /// the connection was never a member. Empty rooms are dropped.
    pub fn leave(&self, connection_id: Uuid, room_id: i64) {
        let mut rooms = self.rooms.lock().unwrap();
        if let Some(room) = rooms.get_mut(&room_id) {
            room.members.remove(&connection_id);
            tracing::debug!(
                "[Rooms] {} left room {} ({} members)",
                connection_id,
                room_id,
                room.members.len()
            );
            if room.members.is_empty() {
                rooms.remove(&room_id);
            }
        }
    }

    /// Deliver an event to every current member of a room, including the
    /// sender. Returns the number of subscribers that received it (0 if the
    /// room does not exist, which is fine).
    pub fn broadcast(&self, room_id: i64, event: ServerEvent) -> usize {
        let rooms = self.rooms.lock().unwrap();
        let Some(room) = rooms.get(&room_id) else {
            tracing::debug!("[Rooms] broadcast to empty room {}", room_id);
            return 0;
        };
        match room.sender.send(event) {
            Ok(count) => count,
            Err(_) => {
                // Members registered but every receiver already dropped.
                tracing::debug!("[Rooms] no live subscribers in room {}", room_id);
                0
            }
        }
    }

    /// Observability hook, not required for correctness.
    pub fn member_count(&self, room_id: i64) -> usize {
        self.rooms
            .lock()
            .unwrap()
            .get(&room_id)
            .map(|room| room.members.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_broadcast_reaches_members_including_sender() {
        let router = RoomRouter::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut rx_a = router.join(a, 7);
        let mut rx_b = router.join(b, 7);

        let delivered = router.broadcast(
            7,
            ServerEvent::TaskDeleted {
                room_id: 7,
                task_id: 1,
            },
        );
        assert_eq!(delivered, 2);
        assert!(rx_a.recv().await.is_ok());
        assert!(rx_b.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_room_isolation() {
        let router = RoomRouter::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut rx_a = router.join(a, 7);
        let _rx_b = router.join(b, 3);

        router.broadcast(
            3,
            ServerEvent::TaskDeleted {
                room_id: 3,
                task_id: 1,
            },
        );
        // Nothing was sent to room 7.
        assert!(matches!(
            rx_a.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_fifo_order_within_room() {
        let router = RoomRouter::new();
        let a = Uuid::new_v4();
        let mut rx = router.join(a, 5);
        for task_id in 1..=3 {
            router.broadcast(5, ServerEvent::TaskDeleted { room_id: 5, task_id });
        }
        for expected in 1..=3 {
            match rx.recv().await.unwrap() {
                ServerEvent::TaskDeleted { task_id, .. } => assert_eq!(task_id, expected),
                other => panic!("unexpected event {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_leave_is_idempotent_and_drops_empty_rooms() {
        let router = RoomRouter::new();
        let a = Uuid::new_v4();
        let _rx = router.join(a, 9);
        assert_eq!(router.member_count(9), 1);

        router.leave(a, 9);
        router.leave(a, 9);
        assert_eq!(router.member_count(9), 0);
    }

    #[tokio::test]
    async fn test_broadcast_to_unknown_room_is_noop() {
        let router = RoomRouter::new();
        assert_eq!(
            router.broadcast(
                42,
                ServerEvent::TaskDeleted {
                    room_id: 42,
                    task_id: 1
                }
            ),
            0
        );
    }
}
