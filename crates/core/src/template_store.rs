//! Dashboard template-set state container.
//!
//! The template set is held as an immutable [`TemplateSetState`] snapshot.
//! Changes are expressed as [`TemplateAction`]s and applied by the pure
//! [`reduce`] function. [`TemplateStore`] owns the current snapshot and
//! notifies subscribers after every successful dispatch.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::error::CoreError;
use crate::template::{remove_unselected_template_values, Template, TemplateType};
use crate::template_registry::{default_template, is_reserved_name};
use crate::tempvar_masking::token_name;

// ---------------------------------------------------------------------------
// State and actions
// ---------------------------------------------------------------------------

/// Immutable snapshot of a dashboard's templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateSetState {
    /// Incremented by every successful dispatch.
    pub revision: u64,
    pub templates: Vec<Template>,
}

/// A change to the template set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum TemplateAction {
    /// Append a fresh default template of the given type.
    Add(TemplateType),
    /// Replace the template with the same id.
    Replace(Template),
    Remove(Uuid),
    /// Mark exactly one value of a template as selected.
    SelectValue { id: Uuid, value: String },
    /// Reorder templates; must list every current id exactly once.
    Reorder(Vec<Uuid>),
    PruneUnselected,
    /// Replace the whole set, e.g. when a dashboard is loaded.
    Load(Vec<Template>),
}

impl TemplateAction {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Replace(_) => "replace",
            Self::Remove(_) => "remove",
            Self::SelectValue { .. } => "select_value",
            Self::Reorder(_) => "reorder",
            Self::PruneUnselected => "prune_unselected",
            Self::Load(_) => "load",
        }
    }
}

// ---------------------------------------------------------------------------
// Reducer
// ---------------------------------------------------------------------------

/// Apply `action` to `state`, returning the next snapshot.
pub fn reduce(
    state: &TemplateSetState,
    action: TemplateAction,
) -> Result<TemplateSetState, CoreError> {
    let mut templates = state.templates.clone();

    match action {
        TemplateAction::Add(template_type) => {
            let template = default_template(template_type);
            if !template.temp_var.is_empty() {
                ensure_token_available(&templates, &template.temp_var, template.id)?;
            }
            templates.push(template);
        }
        TemplateAction::Replace(template) => {
            validate_token(&template.temp_var)?;
            validate_value_types(&template)?;
            ensure_token_available(&templates, &template.temp_var, template.id)?;
            let slot = position_of(&templates, template.id)?;
            let current = templates[slot].template_type;
            if template.template_type != current {
                return Err(CoreError::Validation(format!(
                    "Template {} is of type '{}' and cannot become '{}'",
                    template.id,
                    current.as_str(),
                    template.template_type.as_str()
                )));
            }
            templates[slot] = template;
        }
        TemplateAction::Remove(id) => {
            let slot = position_of(&templates, id)?;
            templates.remove(slot);
        }
        TemplateAction::SelectValue { id, value } => {
            let slot = position_of(&templates, id)?;
            let template = &mut templates[slot];
            if !template.values.iter().any(|v| v.value == value) {
                return Err(CoreError::Validation(format!(
                    "Template {id} has no value '{value}'"
                )));
            }
            for v in &mut template.values {
                v.selected = v.value == value;
            }
        }
        TemplateAction::Reorder(ids) => {
            let current: HashSet<Uuid> = templates.iter().map(|t| t.id).collect();
            let requested: HashSet<Uuid> = ids.iter().copied().collect();
            if ids.len() != templates.len() || requested != current {
                return Err(CoreError::Validation(
                    "Reorder must list every template id exactly once".to_string(),
                ));
            }
            let mut reordered = Vec::with_capacity(templates.len());
            for id in ids {
                let slot = position_of(&templates, id)?;
                reordered.push(templates.swap_remove(slot));
            }
            templates = reordered;
        }
        TemplateAction::PruneUnselected => {
            templates = remove_unselected_template_values(&templates);
        }
        TemplateAction::Load(loaded) => {
            let mut seen = HashSet::new();
            for template in &loaded {
                validate_token(&template.temp_var)?;
                validate_value_types(template)?;
                if !template.temp_var.is_empty() && !seen.insert(template.temp_var.as_str()) {
                    return Err(CoreError::Conflict(format!(
                        "Template token '{}' is used more than once",
                        template.temp_var
                    )));
                }
            }
            templates = loaded;
        }
    }

    Ok(TemplateSetState {
        revision: state.revision + 1,
        templates,
    })
}

/// Index of the template with `id`.
fn position_of(templates: &[Template], id: Uuid) -> Result<usize, CoreError> {
    templates
        .iter()
        .position(|t| t.id == id)
        .ok_or(CoreError::NotFound {
            entity: "template",
            id,
        })
}

/// An empty token is allowed (not yet named); anything else must be a
/// well-formed, non-reserved `:name:`.
fn validate_token(temp_var: &str) -> Result<(), CoreError> {
    if temp_var.is_empty() {
        return Ok(());
    }
    if token_name(temp_var).is_none() {
        return Err(CoreError::Validation(format!(
            "Template token '{temp_var}' must have the form :name:"
        )));
    }
    if is_reserved_name(temp_var) {
        return Err(CoreError::Validation(format!(
            "Template token '{temp_var}' is reserved by the dashboard"
        )));
    }
    Ok(())
}

/// Every value must carry the value kind of its template's type.
fn validate_value_types(template: &Template) -> Result<(), CoreError> {
    let expected = template.template_type.value_type();
    match template.values.iter().find(|v| v.value_type != expected) {
        Some(v) => Err(CoreError::Validation(format!(
            "Value '{}' of template {} must be tagged '{}'",
            v.value,
            template.id,
            expected.as_str()
        ))),
        None => Ok(()),
    }
}

fn ensure_token_available(
    templates: &[Template],
    temp_var: &str,
    id: Uuid,
) -> Result<(), CoreError> {
    if temp_var.is_empty() {
        return Ok(());
    }
    if templates.iter().any(|t| t.id != id && t.temp_var == temp_var) {
        return Err(CoreError::Conflict(format!(
            "Template token '{temp_var}' is already in use"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Notification sent to subscribers after a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateSetChanged {
    pub revision: u64,
    pub action: &'static str,
}

/// Default buffer capacity for the change notification channel.
const DEFAULT_CAPACITY: usize = 64;

/// Owner of the current template-set snapshot.
///
/// Shared via `Arc<TemplateStore>`. Writers are serialized; readers get a
/// cheap `Arc` clone of the latest snapshot.
pub struct TemplateStore {
    state: RwLock<Arc<TemplateSetState>>,
    sender: broadcast::Sender<TemplateSetChanged>,
}

impl TemplateStore {
    pub fn new(initial: TemplateSetState) -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self {
            state: RwLock::new(Arc::new(initial)),
            sender,
        }
    }

    /// Latest snapshot.
    pub async fn snapshot(&self) -> Arc<TemplateSetState> {
        Arc::clone(&*self.state.read().await)
    }

    /// Apply `action` and notify subscribers.
    ///
    /// On error the current snapshot is left untouched.
    pub async fn dispatch(
        &self,
        action: TemplateAction,
    ) -> Result<Arc<TemplateSetState>, CoreError> {
        let action_name = action.name();
        let mut guard = self.state.write().await;
        let next = Arc::new(reduce(&guard, action)?);
        *guard = Arc::clone(&next);
        drop(guard);

        tracing::debug!(
            revision = next.revision,
            action = action_name,
            templates = next.templates.len(),
            "Template set updated"
        );

        // Ignore the SendError -- it only means there are zero subscribers.
        let _ = self.sender.send(TemplateSetChanged {
            revision: next.revision,
            action: action_name,
        });

        Ok(next)
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<TemplateSetChanged> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new(TemplateSetState::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
