//! Dashboard template variable model and selection pruning.
//!
//! A [`Template`] is one user-defined dashboard variable. Its `temp_var`
//! token (`:name:`) is substituted into stored queries before they are sent
//! to the backing time-series database. The JSON shape matches what the
//! dashboard UI persists, so field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Template type
// ---------------------------------------------------------------------------

/// The closed set of template variable kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateType {
    #[serde(rename = "databases")]
    Databases,
    #[serde(rename = "measurements")]
    Measurements,
    #[serde(rename = "fieldKeys")]
    FieldKeys,
    #[serde(rename = "tagKeys")]
    TagKeys,
    #[serde(rename = "tagValues")]
    TagValues,
    #[serde(rename = "csv")]
    Csv,
    #[serde(rename = "influxql")]
    MetaQuery,
}

impl TemplateType {
    /// Every variant, in picker order.
    pub const ALL: [TemplateType; 7] = [
        Self::Databases,
        Self::Measurements,
        Self::FieldKeys,
        Self::TagKeys,
        Self::TagValues,
        Self::Csv,
        Self::MetaQuery,
    ];

    /// Parse a wire name (as used in URLs and persisted JSON).
    pub fn from_str_wire(s: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid template type '{s}'. Must be one of: databases, measurements, \
                     fieldKeys, tagKeys, tagValues, csv, influxql"
                ))
            })
    }

    /// Wire name of the variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Databases => "databases",
            Self::Measurements => "measurements",
            Self::FieldKeys => "fieldKeys",
            Self::TagKeys => "tagKeys",
            Self::TagValues => "tagValues",
            Self::Csv => "csv",
            Self::MetaQuery => "influxql",
        }
    }
}

/// The kind tag stamped onto each resolved [`TemplateValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateValueType {
    #[serde(rename = "database")]
    Database,
    #[serde(rename = "measurement")]
    Measurement,
    #[serde(rename = "fieldKey")]
    FieldKey,
    #[serde(rename = "tagKey")]
    TagKey,
    #[serde(rename = "tagValue")]
    TagValue,
    #[serde(rename = "csv")]
    Csv,
    #[serde(rename = "influxql")]
    MetaQuery,
}

impl TemplateValueType {
    /// Wire name of the variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Measurement => "measurement",
            Self::FieldKey => "fieldKey",
            Self::TagKey => "tagKey",
            Self::TagValue => "tagValue",
            Self::Csv => "csv",
            Self::MetaQuery => "influxql",
        }
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// One candidate value of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateValue {
    pub value: String,
    #[serde(rename = "type")]
    pub value_type: TemplateValueType,
    /// Whether the user has chosen this value as the active one.
    pub selected: bool,
    /// Whether this value was the default/initial pick.
    #[serde(default)]
    pub picked: bool,
}

/// Query payload used to fetch a template's candidate values.
///
/// Every field is optional; absent fields are omitted from JSON so the
/// CSV default serializes to `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub influxql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_key: Option<String>,
}

/// A user-defined dashboard variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: Uuid,
    /// Placeholder token as it appears in queries, e.g. `:host:`.
    pub temp_var: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub values: Vec<TemplateValue>,
    #[serde(default)]
    pub query: TemplateQuery,
}

impl Template {
    /// The value to substitute for this template's token.
    ///
    /// Prefers the first selected value, then the first picked value.
    pub fn active_value(&self) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.selected)
            .or_else(|| self.values.iter().find(|v| v.picked))
            .map(|v| v.value.as_str())
    }
}

// ---------------------------------------------------------------------------
// Selection pruning
// ---------------------------------------------------------------------------

/// Keep only the selected values of each template.
///
/// Returns new templates; the input is untouched. Used before persisting a
/// dashboard so only active selections are stored.
pub fn remove_unselected_template_values(templates: &[Template]) -> Vec<Template> {
    templates
        .iter()
        .map(|template| Template {
            values: template
                .values
                .iter()
                .filter(|v| v.selected)
                .cloned()
                .collect(),
            ..template.clone()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn value(v: &str, selected: bool, picked: bool) -> TemplateValue {
        TemplateValue {
            value: v.to_string(),
            value_type: TemplateValueType::TagValue,
            selected,
            picked,
        }
    }

    fn template_with(values: Vec<TemplateValue>) -> Template {
        Template {
            id: Uuid::new_v4(),
            temp_var: ":host:".to_string(),
            template_type: TemplateType::TagValues,
            label: "Host".to_string(),
            values,
            query: TemplateQuery::default(),
        }
    }

    // -- TemplateType wire names --

    #[test]
    fn wire_names_round_trip_through_parser() {
        for t in TemplateType::ALL {
            assert_eq!(TemplateType::from_str_wire(t.as_str()).unwrap(), t);
        }
    }

    #[test]
    fn unknown_wire_name_rejected() {
        let err = TemplateType::from_str_wire("constant").unwrap_err();
        assert!(err.to_string().contains("Invalid template type 'constant'"));
    }

    #[test]
    fn meta_query_serializes_as_influxql() {
        let json = serde_json::to_value(TemplateType::MetaQuery).unwrap();
        assert_eq!(json, "influxql");
    }

    // -- serde shape --

    #[test]
    fn template_serializes_with_camel_case_fields() {
        let t = template_with(vec![value("a", true, true)]);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["tempVar"], ":host:");
        assert_eq!(json["type"], "tagValues");
        assert_eq!(json["values"][0]["type"], "tagValue");
        assert_eq!(json["query"], serde_json::json!({}));
    }

    #[test]
    fn template_deserializes_without_optional_fields() {
        let json = serde_json::json!({
            "id": "2b7d1a4e-8f8e-4b6a-9d55-5e2f7c0f9d10",
            "tempVar": ":db:",
            "type": "databases",
        });
        let t: Template = serde_json::from_value(json).unwrap();
        assert!(t.values.is_empty());
        assert!(t.label.is_empty());
        assert_eq!(t.query, TemplateQuery::default());
    }

    // -- active_value --

    #[test]
    fn active_value_prefers_selected() {
        let t = template_with(vec![value("a", false, true), value("b", true, false)]);
        assert_eq!(t.active_value(), Some("b"));
    }

    #[test]
    fn active_value_falls_back_to_picked() {
        let t = template_with(vec![value("a", false, false), value("b", false, true)]);
        assert_eq!(t.active_value(), Some("b"));
    }

    #[test]
    fn active_value_none_without_selection() {
        let t = template_with(vec![value("a", false, false)]);
        assert_eq!(t.active_value(), None);
    }

    // -- remove_unselected_template_values --

    #[test]
    fn pruning_keeps_only_selected_values() {
        let templates = vec![template_with(vec![
            value("a", true, false),
            value("b", false, false),
        ])];
        let pruned = remove_unselected_template_values(&templates);
        assert_eq!(pruned[0].values.len(), 1);
        assert_eq!(pruned[0].values[0].value, "a");
    }

    #[test]
    fn pruning_is_idempotent() {
        let templates = vec![
            template_with(vec![value("a", true, false), value("b", false, true)]),
            template_with(vec![value("c", false, false)]),
        ];
        let once = remove_unselected_template_values(&templates);
        let twice = remove_unselected_template_values(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn pruning_does_not_mutate_input() {
        let templates = vec![template_with(vec![
            value("a", true, false),
            value("b", false, false),
        ])];
        let _ = remove_unselected_template_values(&templates);
        assert_eq!(templates[0].values.len(), 2);
    }

    #[test]
    fn pruning_preserves_order_and_other_fields() {
        let first = template_with(vec![value("a", true, false)]);
        let second = template_with(vec![]);
        let pruned = remove_unselected_template_values(&[first.clone(), second.clone()]);
        assert_eq!(pruned[0].id, first.id);
        assert_eq!(pruned[1].id, second.id);
        assert_eq!(pruned[0].label, "Host");
    }
}
