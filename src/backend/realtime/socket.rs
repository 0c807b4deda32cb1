/**
 * WebSocket Session Handler
 *
 * One session task per connected client. The session owns the connection's
 * presence lifecycle and the receiver for whichever room the client
 * currently occupies.
 *
 * # Session Flow
 *
 * 1. On upgrade, assign a connection id and register presence (name/color
 *    from the handshake query, defaults applied)
 * 2. Send the full-roster `online-users` snapshot to the new socket
 * 3. Loop: select between incoming client frames and the current room's
 *    broadcast stream, relaying each side
 * 4. On disconnect, unregister presence and re-broadcast the departed
 *    room's roster exactly once
 *
 * # Relay Semantics
 *
 * Task events received here are announcements of changes already committed
 * through the CRUD surface; they are relayed to the room without validation
 * or persistence. Chat text is enriched with the sender's identity and a
 * server-assigned id/timestamp before fan-out.
 *
 * # Robustness
 *
 * Malformed frames are logged and skipped. A lagged broadcast receiver skips
 * ahead instead of dropping the connection.
 */
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::backend::presence::PresenceRegistry;
use crate::backend::realtime::RoomRouter;
use crate::backend::server::state::AppState;
use crate::shared::chat::ChatMessage;
use crate::shared::protocol::{ClientEvent, ServerEvent};

/// Handshake parameters carried on the upgrade request.
#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Handle the WebSocket upgrade (GET /ws).
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, params))
}

async fn handle_socket(socket: WebSocket, state: AppState, params: ConnectParams) {
    let connection_id = Uuid::new_v4();
    state
        .presence
        .write()
        .await
        .register(connection_id, params.name, params.color);

    let (mut sink, mut stream) = socket.split();

    // Pre-join bootstrap: the full roster snapshot, not room-scoped.
    let snapshot = ServerEvent::OnlineUsers {
        users: state.presence.read().await.snapshot(),
    };
    if send_event(&mut sink, &snapshot).await.is_err() {
        tracing::warn!("[Socket] {} dropped during handshake", connection_id);
        state.presence.write().await.unregister(connection_id);
        return;
    }

    let mut room_rx: Option<broadcast::Receiver<ServerEvent>> = None;

    loop {
        tokio::select! {
            frame = next_client_event(&mut stream, connection_id) => {
                match frame {
                    FrameOutcome::Event(event) => {
                        dispatch(&state.presence, &state.rooms, connection_id, event, &mut room_rx)
                            .await;
                    }
                    FrameOutcome::Skip => continue,
                    FrameOutcome::Closed => break,
                }
            }
            event = room_recv(&mut room_rx) => {
                match event {
                    Ok(event) => {
                        if send_event(&mut sink, &event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "[Socket] {} lagged, skipped {} events",
                            connection_id,
                            skipped
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        // Room channel dropped out from under us; detach.
                        room_rx = None;
                    }
                }
            }
        }
    }

    disconnect(&state.presence, &state.rooms, connection_id).await;
}

enum FrameOutcome {
    Event(ClientEvent),
    Skip,
    Closed,
}

async fn next_client_event(
    stream: &mut SplitStream<WebSocket>,
    connection_id: Uuid,
) -> FrameOutcome {
    match stream.next().await {
        Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientEvent>(text.as_str()) {
            Ok(event) => FrameOutcome::Event(event),
            Err(e) => {
                tracing::warn!("[Socket] {} sent malformed frame: {}", connection_id, e);
                FrameOutcome::Skip
            }
        },
        // Pings are answered by axum; binary frames are not part of the protocol.
        Some(Ok(Message::Close(_))) | None => FrameOutcome::Closed,
        Some(Ok(_)) => FrameOutcome::Skip,
        Some(Err(e)) => {
            tracing::warn!("[Socket] {} read error: {}", connection_id, e);
            FrameOutcome::Closed
        }
    }
}

/// Receive from the current room, or park forever when no room is joined.
async fn room_recv(
    room_rx: &mut Option<broadcast::Receiver<ServerEvent>>,
) -> Result<ServerEvent, broadcast::error::RecvError> {
    match room_rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn send_event(
    sink: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    let payload = serde_json::to_string(event).map_err(axum::Error::new)?;
    sink.send(Message::Text(payload.into())).await
}

/// Apply one client event to presence/room state and fan out the results.
pub async fn dispatch(
    presence: &RwLock<PresenceRegistry>,
    rooms: &RoomRouter,
    connection_id: Uuid,
    event: ClientEvent,
    room_rx: &mut Option<broadcast::Receiver<ServerEvent>>,
) {
    match event {
        ClientEvent::JoinRoom { room_id } => {
            // One room per connection: joining is an implicit leave.
            let previous = presence.read().await.get(connection_id).and_then(|i| i.room_id);
            if previous == Some(room_id) {
                return;
            }
            if let Some(prev) = previous {
                rooms.leave(connection_id, prev);
                *room_rx = None;
                presence.write().await.set_room(connection_id, None);
                broadcast_roster(presence, rooms, prev).await;
            }
            *room_rx = Some(rooms.join(connection_id, room_id));
            presence.write().await.set_room(connection_id, Some(room_id));
            broadcast_roster(presence, rooms, room_id).await;
        }
        ClientEvent::LeaveRoom { room_id } => {
            // The registry is authoritative for which room the connection
            // occupies; a leave naming any other room is ignored, so the
            // member set and receiver stay consistent.
            let current = presence.read().await.get(connection_id).and_then(|i| i.room_id);
            if current != Some(room_id) {
                tracing::warn!(
                    "[Socket] {} sent leave-room for {} while in {:?}",
                    connection_id,
                    room_id,
                    current
                );
                return;
            }
            rooms.leave(connection_id, room_id);
            *room_rx = None;
            presence.write().await.set_room(connection_id, None);
            broadcast_roster(presence, rooms, room_id).await;
        }
        ClientEvent::TaskUpdate { room_id, task } => {
            rooms.broadcast(room_id, ServerEvent::TaskUpdated { room_id, task });
        }
        ClientEvent::TaskDelete { room_id, task_id } => {
            rooms.broadcast(room_id, ServerEvent::TaskDeleted { room_id, task_id });
        }
        ClientEvent::TasksReorder { room_id, tasks } => {
            rooms.broadcast(room_id, ServerEvent::TasksReordered { room_id, tasks });
        }
        ClientEvent::ChatMessage { room_id, text } => {
            let sender = presence.read().await.get(connection_id).cloned();
            let Some(sender) = sender else {
                tracing::warn!("[Socket] chat from unknown connection {}", connection_id);
                return;
            };
            let message = ChatMessage::from_text(connection_id, &sender, text);
            rooms.broadcast(room_id, ServerEvent::ChatMessage { message });
        }
        ClientEvent::IdentityUpdate { name, color } => {
            let updated = presence
                .write()
                .await
                .update_identity(connection_id, name, color);
            // Fan out to the sender's current room only.
            if let Some(identity) = updated {
                if let Some(room_id) = identity.room_id {
                    rooms.broadcast(
                        room_id,
                        ServerEvent::IdentityUpdated {
                            connection_id,
                            name: identity.name,
                            color: identity.color,
                        },
                    );
                }
            }
        }
    }
}

/// Recompute and fan out a room's roster after a membership change.
async fn broadcast_roster(presence: &RwLock<PresenceRegistry>, rooms: &RoomRouter, room_id: i64) {
    let users = presence.read().await.roster_for(room_id);
    let delivered = rooms.broadcast(room_id, ServerEvent::OnlineUsers { users });
    tracing::debug!(
        "[Socket] roster for room {} delivered to {} members",
        room_id,
        delivered
    );
}

/// Tear down a connection: unregister presence and notify its room.
pub async fn disconnect(
    presence: &RwLock<PresenceRegistry>,
    rooms: &RoomRouter,
    connection_id: Uuid,
) {
    let removed = presence.write().await.unregister(connection_id);
    if let Some(identity) = removed {
        if let Some(room_id) = identity.room_id {
            rooms.leave(connection_id, room_id);
            broadcast_roster(presence, rooms, room_id).await;
        }
    }
}
