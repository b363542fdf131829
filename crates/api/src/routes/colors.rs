use axum::routing::{get, post};
use axum::Router;

use crate::handlers::colors;
use crate::state::AppState;

/// Palette routes, mounted at `/colors`.
///
/// ```text
/// GET    /scales      -> list_scales
/// POST   /hexes       -> line_hexes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scales", get(colors::list_scales))
        .route("/hexes", post(colors::line_hexes))
}
