//! Route definitions for the template registry and query resolution.
//!
//! Mounted at `/templates` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Template routes.
///
/// ```text
/// GET    /types               -> list_types
/// GET    /reserved            -> list_reserved
/// GET    /defaults/{type}     -> get_default
/// POST   /prune               -> prune
/// POST   /resolve             -> resolve
/// POST   /extract             -> extract
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/types", get(templates::list_types))
        .route("/reserved", get(templates::list_reserved))
        .route("/defaults/{type}", get(templates::get_default))
        .route("/prune", post(templates::prune))
        .route("/resolve", post(templates::resolve))
        .route("/extract", post(templates::extract))
}
