//! Template registry: labels, value kinds, default queries and factories.
//!
//! Every per-type table is an exhaustive `match` on [`TemplateType`], so
//! adding a variant fails to compile until each mapping handles it.

use serde::Serialize;
use uuid::Uuid;

use crate::template::{Template, TemplateQuery, TemplateType, TemplateValue, TemplateValueType};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Database seeded into a fresh `Databases` template.
pub const DEFAULT_DATABASE: &str = "_internal";

/// Token pre-filled into a fresh meta-query template.
pub const DEFAULT_META_QUERY_TEMP_VAR: &str = ":my-meta-query:";

/// Dashboard time token, resolved by the dashboard rendering stage.
pub const TEMP_VAR_DASHBOARD_TIME: &str = ":dashboardTime:";

/// Dashboard-level tokens that are never ordinary template variables.
pub const RESERVED_TEMPLATE_NAMES: [&str; 7] = [
    TEMP_VAR_DASHBOARD_TIME,
    ":upperDashboardTime:",
    ":interval:",
    ":lower:",
    ":upper:",
    ":zoomedLower:",
    ":zoomedUpper:",
];

/// Whether `token` is one of the [`RESERVED_TEMPLATE_NAMES`].
pub fn is_reserved_name(token: &str) -> bool {
    RESERVED_TEMPLATE_NAMES.contains(&token)
}

/// Time range used when fetching candidate values for templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub lower: &'static str,
    pub upper: Option<&'static str>,
}

pub const TEMPLATE_RANGE: TimeRange = TimeRange {
    lower: TEMP_VAR_DASHBOARD_TIME,
    upper: None,
};

// ---------------------------------------------------------------------------
// Per-type tables
// ---------------------------------------------------------------------------

/// An entry of the template type picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateTypesListItem {
    pub text: &'static str,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
}

/// Picker entries in display order.
pub const TEMPLATE_TYPES_LIST: [TemplateTypesListItem; 7] = [
    TemplateTypesListItem {
        text: "Databases",
        template_type: TemplateType::Databases,
    },
    TemplateTypesListItem {
        text: "Measurements",
        template_type: TemplateType::Measurements,
    },
    TemplateTypesListItem {
        text: "Field Keys",
        template_type: TemplateType::FieldKeys,
    },
    TemplateTypesListItem {
        text: "Tag Keys",
        template_type: TemplateType::TagKeys,
    },
    TemplateTypesListItem {
        text: "Tag Values",
        template_type: TemplateType::TagValues,
    },
    TemplateTypesListItem {
        text: "CSV",
        template_type: TemplateType::Csv,
    },
    TemplateTypesListItem {
        text: "Custom Meta Query",
        template_type: TemplateType::MetaQuery,
    },
];

impl TemplateType {
    /// Label shown in the type picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::Databases => "Databases",
            Self::Measurements => "Measurements",
            Self::FieldKeys => "Field Keys",
            Self::TagKeys => "Tag Keys",
            Self::TagValues => "Tag Values",
            Self::Csv => "CSV",
            Self::MetaQuery => "Custom Meta Query",
        }
    }

    /// Kind tag stamped onto values of this template type.
    pub fn value_type(self) -> TemplateValueType {
        match self {
            Self::Databases => TemplateValueType::Database,
            Self::Measurements => TemplateValueType::Measurement,
            Self::FieldKeys => TemplateValueType::FieldKey,
            Self::TagKeys => TemplateValueType::TagKey,
            Self::TagValues => TemplateValueType::TagValue,
            Self::Csv => TemplateValueType::Csv,
            Self::MetaQuery => TemplateValueType::MetaQuery,
        }
    }

    /// Query that lists candidate values, if the type has a canned one.
    ///
    /// `:database:`, `:measurement:` and `:tagKey:` are filled in later by
    /// the caller from the template's `query` fields.
    pub fn default_query(self) -> Option<&'static str> {
        match self {
            Self::Databases => Some("SHOW DATABASES"),
            Self::Measurements => Some("SHOW MEASUREMENTS ON :database:"),
            Self::FieldKeys => Some("SHOW FIELD KEYS ON :database: FROM :measurement:"),
            Self::TagKeys => Some("SHOW TAG KEYS ON :database: FROM :measurement:"),
            Self::TagValues => {
                Some("SHOW TAG VALUES ON :database: FROM :measurement: WITH KEY=:tagKey:")
            }
            Self::Csv | Self::MetaQuery => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Build a fresh template of the given type with a new id.
pub fn default_template(template_type: TemplateType) -> Template {
    let canned = template_type.default_query().map(str::to_string);

    let (temp_var, values, query) = match template_type {
        TemplateType::Databases => (
            String::new(),
            vec![TemplateValue {
                value: DEFAULT_DATABASE.to_string(),
                value_type: template_type.value_type(),
                selected: true,
                picked: true,
            }],
            TemplateQuery {
                influxql: canned,
                ..Default::default()
            },
        ),
        TemplateType::Measurements => (
            String::new(),
            Vec::new(),
            TemplateQuery {
                influxql: canned,
                db: Some(String::new()),
                ..Default::default()
            },
        ),
        TemplateType::FieldKeys | TemplateType::TagKeys | TemplateType::TagValues => (
            String::new(),
            Vec::new(),
            TemplateQuery {
                influxql: canned,
                ..Default::default()
            },
        ),
        TemplateType::Csv => (String::new(), Vec::new(), TemplateQuery::default()),
        TemplateType::MetaQuery => (
            DEFAULT_META_QUERY_TEMP_VAR.to_string(),
            Vec::new(),
            TemplateQuery {
                influxql: Some(String::new()),
                ..Default::default()
            },
        ),
    };

    Template {
        id: Uuid::new_v4(),
        temp_var,
        template_type,
        label: String::new(),
        values,
        query,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
