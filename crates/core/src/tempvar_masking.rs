//! Token masking primitives for template variable substitution.
//!
//! Queries reference template variables as `:name:` tokens. Substitution
//! runs in three passes:
//!
//! 1. [`apply_masks`] protects every complete token by swapping its colons
//!    for [`MASK`].
//! 2. [`insert_temp_var`] replaces any token left unmasked (complete or
//!    partially typed) with a literal value.
//! 3. [`un_mask`] turns every remaining [`MASK`] back into a colon.
//!
//! [`unmask_name`] exposes a single masked name between passes 1 and 2.
//! [`crate::template_resolver::TemplateResolver`] drives the whole cycle.
//!
//! Input queries must not already contain [`MASK`].

use std::sync::LazyLock;

use regex::{Captures, NoExpand, Regex};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Sentinel that stands in for a token's colons while it is masked.
pub const MASK: char = '\u{1F638}';

/// Regex pattern matching a complete `:name:` token, capturing the name.
///
/// The name may be empty, so `::` is a complete token too.
pub const MATCH_WHOLE_TEMPLATES: &str = r":([A-Za-z0-9_-]*):";

/// Regex pattern matching an unmasked token, complete or not.
///
/// A bare `:` matches on purpose: the query editor inserts a variable while
/// the user is still typing its name.
pub const MATCH_INCOMPLETE_TEMPLATES: &str = r":[A-Za-z0-9_-]*:?";

static WHOLE_TEMPLATES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MATCH_WHOLE_TEMPLATES).expect("valid regex"));

static INCOMPLETE_TEMPLATES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MATCH_INCOMPLETE_TEMPLATES).expect("valid regex"));

static MASKED_TEMPLATES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("{MASK}([A-Za-z0-9_-]*){MASK}")).expect("valid regex")
});

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// Mask every complete `:name:` token in `query`.
pub fn apply_masks(query: &str) -> String {
    let replacement = format!("{MASK}${{1}}{MASK}");
    WHOLE_TEMPLATES_RE
        .replace_all(query, replacement.as_str())
        .into_owned()
}

/// Replace every unmasked token in `query` with `value`.
///
/// `value` is inserted literally; `$` has no special meaning.
pub fn insert_temp_var(query: &str, value: &str) -> String {
    INCOMPLETE_TEMPLATES_RE
        .replace_all(query, NoExpand(value))
        .into_owned()
}

/// Restore every masked token to its `:name:` form.
pub fn un_mask(query: &str) -> String {
    query.replace(MASK, ":")
}

/// Masked form of the token `name` (without colons).
pub fn mask_token(name: &str) -> String {
    format!("{MASK}{name}{MASK}")
}

/// Unmask only the occurrences of `name` in an already-masked query.
///
/// Masked tokens are paired left to right, so `:a:b:c:` (masked as
/// `a` and `c`) never exposes a spurious `b`.
pub fn unmask_name(masked_query: &str, name: &str) -> String {
    MASKED_TEMPLATES_RE
        .replace_all(masked_query, |caps: &Captures| {
            if &caps[1] == name {
                format!(":{name}:")
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Complete tokens of `query` in order of first appearance, de-duplicated.
pub fn extract_temp_vars(query: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for m in WHOLE_TEMPLATES_RE.find_iter(query) {
        if !tokens.iter().any(|t| t == m.as_str()) {
            tokens.push(m.as_str().to_string());
        }
    }
    tokens
}

/// The name inside a well-formed `:name:` token, if `token` is one.
pub fn token_name(token: &str) -> Option<&str> {
    let caps = WHOLE_TEMPLATES_RE.captures(token)?;
    let whole = caps.get(0)?;
    if whole.start() != 0 || whole.end() != token.len() {
        return None;
    }
    caps.get(1).map(|m| m.as_str()).filter(|name| !name.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_registry::RESERVED_TEMPLATE_NAMES;

    // -- apply_masks / un_mask --

    #[test]
    fn masks_complete_tokens() {
        let masked = apply_masks("SELECT mean(:field:) FROM :measurement:");
        assert!(!masked.contains(':'));
        assert!(masked.contains(&mask_token("field")));
        assert!(masked.contains(&mask_token("measurement")));
    }

    #[test]
    fn masking_then_unmasking_is_identity() {
        let queries = [
            "SELECT * FROM :measurement: WHERE time > :dashboardTime:",
            ":a::b:",
            "no tokens here",
            "WITH KEY=:tag-key_1:",
            "",
        ];
        for q in queries {
            assert_eq!(un_mask(&apply_masks(q)), q, "{q}");
        }
    }

    #[test]
    fn masking_is_noop_without_tokens() {
        let q = "SELECT mean(value) FROM cpu GROUP BY time(1m)";
        assert_eq!(apply_masks(q), q);
    }

    #[test]
    fn masking_is_idempotent() {
        let once = apply_masks("FROM :db:.:rp:.:m:");
        assert_eq!(apply_masks(&once), once);
    }

    #[test]
    fn masking_leaves_lone_colons() {
        assert_eq!(apply_masks("a: :b"), "a: :b");
    }

    // -- insert_temp_var --

    #[test]
    fn inserts_over_complete_token() {
        assert_eq!(insert_temp_var(":foo:", "X"), "X");
    }

    #[test]
    fn inserts_over_each_token_independently() {
        assert_eq!(insert_temp_var(":foo:bar:baz:", "X"), "XbarX");
    }

    #[test]
    fn inserts_over_partially_typed_token() {
        assert_eq!(
            insert_temp_var("SELECT * FROM :meas", ":measurement:"),
            "SELECT * FROM :measurement:"
        );
    }

    #[test]
    fn bare_colon_matches_permissively() {
        // Regression pin: a lone colon with no name is still a match.
        assert_eq!(insert_temp_var("a : b", "X"), "a X b");
        assert_eq!(insert_temp_var("::", "X"), "X");
    }

    #[test]
    fn insert_treats_value_literally() {
        assert_eq!(insert_temp_var(":v:", "$1 ${x}"), "$1 ${x}");
    }

    #[test]
    fn insert_skips_masked_tokens() {
        let masked = apply_masks("FROM :db: WHERE host = :");
        let inserted = insert_temp_var(&masked, "'web-1'");
        assert_eq!(un_mask(&inserted), "FROM :db: WHERE host = 'web-1'");
    }

    #[test]
    fn reserved_names_survive_when_caller_skips_them() {
        // The primitives do not know about reserved names; a resolution
        // loop must leave them masked.
        for reserved in RESERVED_TEMPLATE_NAMES {
            let q = format!("time > {reserved}");
            let out = un_mask(&insert_temp_var(&apply_masks(&q), "unrelated"));
            assert_eq!(out, q);
        }
    }

    #[test]
    fn reserved_names_are_replaced_if_exposed() {
        let masked = apply_masks("time > :dashboardTime:");
        let exposed = unmask_name(&masked, "dashboardTime");
        assert_eq!(un_mask(&insert_temp_var(&exposed, "now()")), "time > now()");
    }

    // -- unmask_name --

    #[test]
    fn unmask_name_exposes_only_that_name() {
        let masked = apply_masks(":db: :rp: :db:");
        let exposed = unmask_name(&masked, "db");
        assert_eq!(exposed.matches(":db:").count(), 2);
        assert!(exposed.contains(&mask_token("rp")));
    }

    #[test]
    fn unmask_name_pairs_masks_left_to_right() {
        let masked = apply_masks(":a:b:c:");
        assert_eq!(unmask_name(&masked, "b"), masked);
        assert_eq!(un_mask(&unmask_name(&masked, "c")), ":a:b:c:");
    }

    // -- extract_temp_vars / token_name --

    #[test]
    fn extracts_tokens_in_first_appearance_order() {
        let tokens = extract_temp_vars(":m: :db: :m: :rp:");
        assert_eq!(tokens, vec![":m:", ":db:", ":rp:"]);
    }

    #[test]
    fn token_name_requires_whole_token() {
        assert_eq!(token_name(":host:"), Some("host"));
        assert_eq!(token_name(":my-meta-query:"), Some("my-meta-query"));
        assert_eq!(token_name("::"), None);
        assert_eq!(token_name("host"), None);
        assert_eq!(token_name(":host: "), None);
        assert_eq!(token_name(":a:b:"), None);
    }
}
