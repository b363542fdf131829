//! Handlers for line graph color palettes.

use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use panorama_core::color_palette::{get_line_colors_hexes, LineColor, LINE_COLOR_SCALES};

use crate::error::AppResult;
use crate::response::DataResponse;

/// Body for `POST /colors/hexes`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineHexesRequest {
    /// Candidate palette. Kept as raw JSON so a malformed palette falls
    /// back to the default instead of rejecting the request.
    #[serde(default)]
    pub colors: Option<serde_json::Value>,
    pub num_series: usize,
}

/// GET /colors/scales -- every palette in the catalog.
pub async fn list_scales() -> impl IntoResponse {
    Json(DataResponse {
        data: &LINE_COLOR_SCALES,
    })
}

/// POST /colors/hexes -- hex colors for a graph with `numSeries` series.
pub async fn line_hexes(Json(input): Json<LineHexesRequest>) -> AppResult<impl IntoResponse> {
    let colors: Vec<LineColor> = match input.colors {
        Some(raw) => serde_json::from_value(raw).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Unparseable line colors, using default palette");
            Vec::new()
        }),
        None => Vec::new(),
    };
    let hexes = get_line_colors_hexes(&colors, input.num_series)?;

    tracing::debug!(num_series = input.num_series, "Computed line colors");

    Ok(Json(DataResponse { data: hexes }))
}
