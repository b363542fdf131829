pub mod colors;
pub mod health;
pub mod template_set;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /templates/types                  template type picker list (GET)
/// /templates/reserved               reserved dashboard tokens (GET)
/// /templates/defaults/{type}        fresh default template (GET)
/// /templates/prune                  drop unselected values (POST)
/// /templates/resolve                substitute values into a query (POST)
/// /templates/extract                list tokens in a query (POST)
///
/// /template-set                     current snapshot (GET)
/// /template-set/actions             dispatch an action (POST)
///
/// /colors/scales                    palette catalog (GET)
/// /colors/hexes                     line colors for N series (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/templates", templates::router())
        .nest("/template-set", template_set::router())
        .nest("/colors", colors::router())
}
