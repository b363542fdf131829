//! Route definitions for the dashboard template set.
//!
//! Mounted at `/template-set` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::template_set;
use crate::state::AppState;

/// Template set routes.
///
/// ```text
/// GET    /            -> get_template_set
/// POST   /actions     -> dispatch_action
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(template_set::get_template_set))
        .route("/actions", post(template_set::dispatch_action))
}
