//! Handlers for the template registry and query resolution.
//!
//! Everything here is stateless: requests carry the templates they operate
//! on, so the dashboard UI can resolve queries for unsaved edits too.

use axum::extract::Path;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use panorama_core::template::{remove_unselected_template_values, Template, TemplateType};
use panorama_core::template_registry::{
    self, TimeRange, RESERVED_TEMPLATE_NAMES, TEMPLATE_RANGE, TEMPLATE_TYPES_LIST,
};
use panorama_core::template_resolver::resolve_query;
use panorama_core::tempvar_masking::extract_temp_vars;

use crate::error::AppResult;
use crate::response::DataResponse;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /templates/prune`.
#[derive(Debug, Deserialize)]
pub struct PruneRequest {
    pub templates: Vec<Template>,
}

/// Body for `POST /templates/resolve`.
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub query: String,
    #[serde(default)]
    pub templates: Vec<Template>,
}

/// Result of resolving a query.
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub query: String,
    /// Tokens still present after resolution (reserved or unset).
    pub unresolved: Vec<String>,
}

/// Body for `POST /templates/extract`.
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub query: String,
}

/// Reserved dashboard tokens and the range used for template queries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedResponse {
    pub names: &'static [&'static str],
    pub template_range: TimeRange,
}

// ---------------------------------------------------------------------------
// GET /templates/types
// ---------------------------------------------------------------------------

/// List template types in picker order.
pub async fn list_types() -> impl IntoResponse {
    Json(DataResponse {
        data: TEMPLATE_TYPES_LIST,
    })
}

// ---------------------------------------------------------------------------
// GET /templates/reserved
// ---------------------------------------------------------------------------

/// List the dashboard-level tokens templates may not use.
pub async fn list_reserved() -> impl IntoResponse {
    Json(DataResponse {
        data: ReservedResponse {
            names: &RESERVED_TEMPLATE_NAMES,
            template_range: TEMPLATE_RANGE,
        },
    })
}

// ---------------------------------------------------------------------------
// GET /templates/defaults/{type}
// ---------------------------------------------------------------------------

/// Build a fresh default template of the requested type.
pub async fn get_default(Path(template_type): Path<String>) -> AppResult<impl IntoResponse> {
    let template_type = TemplateType::from_str_wire(&template_type)?;
    let template = template_registry::default_template(template_type);

    tracing::debug!(
        template_type = template_type.as_str(),
        id = %template.id,
        "Built default template"
    );

    Ok(Json(DataResponse { data: template }))
}

// ---------------------------------------------------------------------------
// POST /templates/prune
// ---------------------------------------------------------------------------

/// Drop unselected values from each template.
pub async fn prune(Json(input): Json<PruneRequest>) -> AppResult<impl IntoResponse> {
    let pruned = remove_unselected_template_values(&input.templates);
    Ok(Json(DataResponse { data: pruned }))
}

// ---------------------------------------------------------------------------
// POST /templates/resolve
// ---------------------------------------------------------------------------

/// Substitute template values into a query.
pub async fn resolve(Json(input): Json<ResolveRequest>) -> AppResult<impl IntoResponse> {
    let query = resolve_query(&input.query, &input.templates)?;
    let unresolved = extract_temp_vars(&query);

    tracing::debug!(
        templates = input.templates.len(),
        unresolved = unresolved.len(),
        "Resolved query"
    );

    Ok(Json(DataResponse {
        data: ResolveResponse { query, unresolved },
    }))
}

// ---------------------------------------------------------------------------
// POST /templates/extract
// ---------------------------------------------------------------------------

/// List the complete tokens a query references.
pub async fn extract(Json(input): Json<ExtractRequest>) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: extract_temp_vars(&input.query),
    }))
}
