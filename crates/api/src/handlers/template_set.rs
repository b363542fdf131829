//! Handlers for the dashboard's template set.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use panorama_core::template_store::TemplateAction;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /template-set
// ---------------------------------------------------------------------------

/// Current template-set snapshot.
pub async fn get_template_set(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.template_store.snapshot().await;
    Json(DataResponse {
        data: snapshot.as_ref().clone(),
    })
}

// ---------------------------------------------------------------------------
// POST /template-set/actions
// ---------------------------------------------------------------------------

/// Apply one action to the template set and return the new snapshot.
pub async fn dispatch_action(
    State(state): State<AppState>,
    Json(action): Json<TemplateAction>,
) -> AppResult<impl IntoResponse> {
    let action_name = action.name();
    let snapshot = state.template_store.dispatch(action).await?;

    tracing::info!(
        action = action_name,
        revision = snapshot.revision,
        "Dispatched template set action"
    );

    Ok(Json(DataResponse {
        data: snapshot.as_ref().clone(),
    }))
}
