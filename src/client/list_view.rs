//! The client reconciliation layer.
//!
//! One `ListView` per open list, holding the authoritative in-process view
//! of {tasks, online roster, chat transcript, own identity}. Three input
//! streams feed it:
//!
//! 1. **Local optimistic edits** - every mutation applies to the in-memory
//!    list immediately, then issues the CRUD call.
//! 2. **Server CRUD responses** - on success the optimistic entry is
//!    replaced by the server-confirmed entity and the matching announcement
//!    is queued for the socket; on failure the optimistic change is
//!    discarded and the whole list reloads from the store. There is no
//!    fine-grained rollback, and a failed mutation is never announced.
//! 3. **Peer-broadcast events** - applied through [`ListView::apply_remote`]
//!    with idempotent merge rules, so replayed or out-of-order events
//!    converge. Echo-to-self means the client's own confirmed changes also
//!    arrive here.
//!
//! The embedding application owns the socket: it drains
//! [`ListView::take_outgoing`] into the connection and feeds received
//! events into `apply_remote`. Reconnection re-queues `join-room` via
//! [`ListView::rejoin`].

use std::collections::VecDeque;
use std::sync::Arc;

use uuid::Uuid;

use crate::client::api::{ApiError, ListApi};
use crate::client::hierarchy::{build_hierarchy, filter_roots, TaskFilter, TaskNode};
use crate::shared::chat::ChatMessage;
use crate::shared::identity::UserIdentity;
use crate::shared::list::List;
use crate::shared::protocol::{ClientEvent, ServerEvent};
use crate::shared::task::{NewTask, Task, TaskDetails, TaskOrder, TaskPatch};

/// Lifecycle of a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewPhase {
    /// No list loaded.
    #[default]
    Idle,
    /// CRUD fetch of list + tasks in flight.
    Loading,
    /// Tasks held in memory; mutations and merges allowed.
    Ready,
}

pub struct ListView {
    api: Arc<dyn ListApi>,
    phase: ViewPhase,
    slug: Option<String>,
    list: Option<List>,
    tasks: Vec<Task>,
    filter: TaskFilter,
    roster: Vec<UserIdentity>,
    chat: Vec<ChatMessage>,
    /// Own connection id, known once the socket handshake completed.
    self_id: Option<Uuid>,
    outbox: VecDeque<ClientEvent>,
    last_error: Option<String>,
    /// Temp ids for optimistic creates count downward from -1 so they can
    /// never collide with server-assigned rowids.
    next_temp_id: i64,
}

impl ListView {
    pub fn new(api: Arc<dyn ListApi>) -> Self {
        Self {
            api,
            phase: ViewPhase::Idle,
            slug: None,
            list: None,
            tasks: Vec::new(),
            filter: TaskFilter::All,
            roster: Vec::new(),
            chat: Vec::new(),
            self_id: None,
            outbox: VecDeque::new(),
            last_error: None,
            next_temp_id: -1,
        }
    }

    // ----- lifecycle -------------------------------------------------------

    /// Load a list by slug and join its room.
    pub async fn open(&mut self, slug: &str) {
        self.phase = ViewPhase::Loading;
        self.slug = Some(slug.to_string());
        match self.api.fetch_list(slug).await {
            Ok(snapshot) => {
                self.outbox.push_back(ClientEvent::JoinRoom {
                    room_id: snapshot.list.id,
                });
                self.list = Some(snapshot.list);
                self.tasks = snapshot.tasks;
                // Joining the new room implicitly leaves the old one on the
                // server; chat and roster are room-scoped and start empty.
                self.roster.clear();
                self.chat.clear();
                self.phase = ViewPhase::Ready;
            }
            Err(e) => {
                self.phase = ViewPhase::Idle;
                self.slug = None;
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Leave the room and drop all room-scoped state. The chat transcript
    /// is cleared here: chat exists only while the room is occupied.
    pub fn close(&mut self) {
        if let Some(list) = &self.list {
            self.outbox.push_back(ClientEvent::LeaveRoom { room_id: list.id });
        }
        self.phase = ViewPhase::Idle;
        self.slug = None;
        self.list = None;
        self.tasks.clear();
        self.roster.clear();
        self.chat.clear();
    }

    /// Re-queue `join-room` after a socket reconnect.
    pub fn rejoin(&mut self) {
        if let Some(list) = &self.list {
            self.outbox.push_back(ClientEvent::JoinRoom { room_id: list.id });
        }
    }

    /// Record the connection id assigned by the socket handshake.
    pub fn set_connection_id(&mut self, id: Uuid) {
        self.self_id = Some(id);
    }

    // ----- mutations (optimistic, announce on confirm, reload on failure) --

    /// Create a task under `parent_id` (or at the root).
    pub async fn create_task(
        &mut self,
        title: &str,
        parent_id: Option<i64>,
        details: Option<TaskDetails>,
    ) {
        let Some(list) = self.list.clone() else { return };

        let temp_id = self.next_temp_id;
        self.next_temp_id -= 1;
        let sibling_max = self
            .tasks
            .iter()
            .filter(|t| t.list_id == list.id && t.parent_id == parent_id)
            .map(|t| t.task_order)
            .max()
            .unwrap_or(0);
        let now = chrono::Utc::now();
        self.tasks.push(Task {
            id: temp_id,
            list_id: list.id,
            title: title.to_string(),
            description: None,
            is_completed: false,
            task_order: sibling_max + 1,
            parent_id,
            details: details.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        });

        let new = NewTask {
            title: title.to_string(),
            list_id: list.id,
            description: None,
            parent_id,
            details,
        };
        match self.api.create_task(&new).await {
            Ok(confirmed) => {
                // Swap the temp entry for the server-confirmed one; the echo
                // of the announcement will find the id present and be a
                // no-op merge.
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == temp_id) {
                    *slot = confirmed.clone();
                } else {
                    self.upsert(confirmed.clone());
                }
                self.announce_update(list.id, confirmed);
            }
            Err(e) => self.fail_and_reload(e).await,
        }
    }

    /// Partial update of a task.
    pub async fn update_task(&mut self, id: i64, patch: TaskPatch) {
        let Some(list) = self.list.clone() else { return };
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        task.apply_patch(&patch);

        match self.api.update_task(id, &patch).await {
            Ok(confirmed) => {
                self.upsert(confirmed.clone());
                self.announce_update(list.id, confirmed);
            }
            Err(e) => self.fail_and_reload(e).await,
        }
    }

    /// Flip a task's completion state.
    pub async fn toggle_completed(&mut self, id: i64) {
        let Some(current) = self.tasks.iter().find(|t| t.id == id) else {
            return;
        };
        let patch = TaskPatch {
            is_completed: Some(!current.is_completed),
            ..TaskPatch::default()
        };
        self.update_task(id, patch).await;
    }

    /// Move a task under a new parent (or to the root with `None`).
    pub async fn reparent(&mut self, id: i64, parent_id: Option<i64>) {
        let patch = TaskPatch {
            parent_id: Some(parent_id),
            ..TaskPatch::default()
        };
        self.update_task(id, patch).await;
    }

    /// Delete a task. Its children stay and show up as roots until peers
    /// and the store agree otherwise - deletion does not cascade.
    pub async fn delete_task(&mut self, id: i64) {
        let Some(list) = self.list.clone() else { return };
        self.tasks.retain(|t| t.id != id);

        match self.api.delete_task(id).await {
            Ok(_) => {
                self.outbox.push_back(ClientEvent::TaskDelete {
                    room_id: list.id,
                    task_id: id,
                });
            }
            Err(e) => self.fail_and_reload(e).await,
        }
    }

    /// Apply a new sibling ordering (e.g. after a drag), atomically on the
    /// server.
    pub async fn reorder(&mut self, orders: Vec<TaskOrder>) {
        let Some(list) = self.list.clone() else { return };
        for entry in &orders {
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == entry.id) {
                task.task_order = entry.task_order;
            }
        }

        match self.api.reorder_tasks(list.id, &orders).await {
            Ok(confirmed) => {
                for task in &confirmed {
                    self.upsert(task.clone());
                }
                self.outbox.push_back(ClientEvent::TasksReorder {
                    room_id: list.id,
                    tasks: confirmed,
                });
            }
            Err(e) => self.fail_and_reload(e).await,
        }
    }

    // ----- presence & chat -------------------------------------------------

    /// Request a name/color change; the roster entry updates when the
    /// server's `identity-updated` fan-out comes back around.
    pub fn set_identity(&mut self, name: &str, color: &str) {
        self.outbox.push_back(ClientEvent::IdentityUpdate {
            name: name.to_string(),
            color: color.to_string(),
        });
    }

    /// Send chat text. The transcript entry arrives via the room echo,
    /// enriched with identity and a server timestamp.
    pub fn send_chat(&mut self, text: &str) {
        if let Some(list) = &self.list {
            self.outbox.push_back(ClientEvent::ChatMessage {
                room_id: list.id,
                text: text.to_string(),
            });
        }
    }

    // ----- peer event merging ----------------------------------------------

    /// Merge one server-broadcast event into the view.
    ///
    /// Every rule is idempotent and order-independent, so replays and
    /// create/update races converge:
    /// - updated: replace if the id is present, insert if not (an update
    ///   arriving before the create was locally known still lands)
    /// - deleted: remove if present, no-op otherwise
    /// - reordered: copy `task_order` by id; tasks absent from the payload
    ///   are left untouched, never dropped
    /// - roster: full replace
    pub fn apply_remote(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::OnlineUsers { users } => {
                self.roster = users;
            }
            ServerEvent::TaskUpdated { room_id, task } => {
                if self.in_room(room_id) {
                    self.upsert(task);
                }
            }
            ServerEvent::TaskDeleted { room_id, task_id } => {
                if self.in_room(room_id) {
                    self.tasks.retain(|t| t.id != task_id);
                }
            }
            ServerEvent::TasksReordered { room_id, tasks } => {
                if self.in_room(room_id) {
                    for incoming in tasks {
                        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == incoming.id) {
                            task.task_order = incoming.task_order;
                        }
                    }
                }
            }
            ServerEvent::ChatMessage { message } => {
                self.chat.push(message);
            }
            ServerEvent::IdentityUpdated {
                connection_id,
                name,
                color,
            } => {
                if let Some(entry) = self.roster.iter_mut().find(|u| u.id == connection_id) {
                    entry.name = name;
                    entry.color = color;
                }
            }
        }
    }

    // ----- views -----------------------------------------------------------

    /// The display forest for the current filter.
    pub fn visible_tasks(&self) -> Vec<TaskNode> {
        filter_roots(build_hierarchy(&self.tasks), self.filter)
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn list(&self) -> Option<&List> {
        self.list.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn roster(&self) -> &[UserIdentity] {
        &self.roster
    }

    /// Own roster entry, once the connection id is known and the first
    /// roster broadcast arrived.
    pub fn identity(&self) -> Option<&UserIdentity> {
        let id = self.self_id?;
        self.roster.iter().find(|u| u.id == id)
    }

    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    /// Announcements waiting to go out over the socket.
    pub fn take_outgoing(&mut self) -> Vec<ClientEvent> {
        self.outbox.drain(..).collect()
    }

    /// The last failure banner, if any. Non-blocking: mutations keep
    /// working while it shows.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    // ----- internals -------------------------------------------------------

    fn in_room(&self, room_id: i64) -> bool {
        self.list.as_ref().map(|l| l.id) == Some(room_id)
    }

    fn upsert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task,
            None => self.tasks.push(task),
        }
    }

    fn announce_update(&mut self, room_id: i64, task: Task) {
        self.outbox
            .push_back(ClientEvent::TaskUpdate { room_id, task });
    }

    /// The failure path for every mutation: drop optimistic state by
    /// reloading the server's truth, and surface a dismissable banner.
    /// Nothing is announced.
    async fn fail_and_reload(&mut self, error: ApiError) {
        tracing::warn!("[Client] mutation failed, reloading list: {}", error);
        self.last_error = Some(error.to_string());
        self.reload().await;
    }

    /// Replace the in-memory task set with the store's current state.
    pub async fn reload(&mut self) {
        let Some(slug) = self.slug.clone() else { return };
        match self.api.fetch_list(&slug).await {
            Ok(snapshot) => {
                self.list = Some(snapshot.list);
                self.tasks = snapshot.tasks;
                self.phase = ViewPhase::Ready;
            }
            Err(e) => {
                // Keep the stale view rather than blanking the screen.
                self.last_error = Some(e.to_string());
            }
        }
    }
}
