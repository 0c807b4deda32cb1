/**
 * API Route Configuration
 *
 * The CRUD surface consumed by clients:
 *
 * - `POST   /api/lists`                     - create a list
 * - `GET    /api/lists`                     - all lists
 * - `GET    /api/lists/slug/{slug}`         - list + full task set
 * - `PUT    /api/lists/{id}`                - rename a list
 * - `DELETE /api/lists/{id}`                - delete a list (and its tasks)
 * - `PUT    /api/lists/{id}/tasks/reorder`  - atomic order batch
 * - `POST   /api/tasks`                     - create a task
 * - `GET    /api/tasks/{id}`                - fetch a task
 * - `PATCH  /api/tasks/{id}`                - partial update
 * - `DELETE /api/tasks/{id}`                - delete a task (no child cascade)
 * - `POST   /api/auth/login`                - static-credential check
 */
use axum::routing::{get, post, put};
use axum::Router;

use crate::backend::auth;
use crate::backend::lists::handlers as lists;
use crate::backend::server::state::AppState;
use crate::backend::tasks::handlers as tasks;

pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/lists", post(lists::create_list).get(lists::get_lists))
        .route("/api/lists/slug/{slug}", get(lists::get_list_snapshot))
        .route(
            "/api/lists/{id}",
            put(lists::update_list).delete(lists::delete_list),
        )
        .route("/api/lists/{id}/tasks/reorder", put(tasks::reorder_tasks))
        .route("/api/tasks", post(tasks::create_task))
        .route(
            "/api/tasks/{id}",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/api/auth/login", post(auth::handlers::login))
}
