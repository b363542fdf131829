use std::sync::Arc;

use panorama_core::template_store::TemplateStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The dashboard's template set.
    pub template_store: Arc<TemplateStore>,
}

impl AppState {
    /// State with an empty template set.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            template_store: Arc::new(TemplateStore::default()),
        }
    }
}
