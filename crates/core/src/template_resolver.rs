//! Multi-variable query resolution over the masking primitives.
//!
//! [`TemplateResolver`] owns the partially resolved query and the names
//! already substituted, so the mask / expose-one / insert / unmask cycle
//! cannot be run out of order.
//!
//! Colons that are not part of a complete token are escaped for the
//! lifetime of the resolver. Without that, the permissive pattern used by
//! [`insert_temp_var`] would also rewrite stray colons (`'12:30'`, or a
//! colon inside an earlier substituted value).

use std::collections::HashSet;

use crate::error::CoreError;
use crate::template::Template;
use crate::template_registry::is_reserved_name;
use crate::tempvar_masking::{apply_masks, insert_temp_var, token_name, un_mask, unmask_name};

/// Stand-in for a literal colon while a query is being resolved.
const LITERAL_COLON: char = '\u{1F639}';

/// Stateful resolver for one query.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    masked: String,
    resolved: HashSet<String>,
}

impl TemplateResolver {
    /// Mask every complete token of `query` and escape the remaining colons.
    pub fn new(query: &str) -> Self {
        let masked = apply_masks(query).replace(':', &LITERAL_COLON.to_string());
        Self {
            masked,
            resolved: HashSet::new(),
        }
    }

    /// Substitute `value` for every occurrence of `token` (`:name:`).
    ///
    /// Returns `Ok(false)` when the name was already resolved. Reserved
    /// dashboard tokens are refused so they survive for the time-range stage.
    pub fn resolve(&mut self, token: &str, value: &str) -> Result<bool, CoreError> {
        let name = token_name(token).ok_or_else(|| {
            CoreError::Validation(format!(
                "Template token '{token}' must have the form :name: \
                 using letters, digits, '_' or '-'"
            ))
        })?;
        if is_reserved_name(token) {
            return Err(CoreError::Validation(format!(
                "Template token '{token}' is reserved by the dashboard"
            )));
        }
        if !self.resolved.insert(name.to_string()) {
            return Ok(false);
        }

        let exposed = unmask_name(&self.masked, name);
        let escaped_value = value.replace(':', &LITERAL_COLON.to_string());
        self.masked = insert_temp_var(&exposed, &escaped_value);
        Ok(true)
    }

    /// Whether `name` (without colons) has been substituted.
    pub fn is_resolved(&self, name: &str) -> bool {
        self.resolved.contains(name)
    }

    /// Number of names substituted so far.
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    /// Final query, with every unresolved token restored to `:name:`.
    pub fn finish(self) -> String {
        un_mask(&self.masked).replace(LITERAL_COLON, ":")
    }
}

/// Resolve `query` against a dashboard's templates.
///
/// Each template contributes its [`Template::active_value`]. Templates with
/// an empty token, a reserved token, or no usable value are skipped, which
/// leaves their tokens in place for a later pass.
pub fn resolve_query(query: &str, templates: &[Template]) -> Result<String, CoreError> {
    let mut resolver = TemplateResolver::new(query);

    for template in templates {
        if template.temp_var.is_empty() || is_reserved_name(&template.temp_var) {
            continue;
        }
        let Some(value) = template.active_value() else {
            tracing::debug!(
                temp_var = %template.temp_var,
                "Template has no active value, skipping"
            );
            continue;
        };
        resolver.resolve(&template.temp_var, value)?;
    }

    tracing::debug!(resolved = resolver.resolved_count(), "Resolved query templates");
    Ok(resolver.finish())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
