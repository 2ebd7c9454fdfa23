//! Typed parse of a question's opaque `options` payload.
//!
//! Options are stored as a raw JSON string. They are parsed exactly once per
//! question (see [`crate::schema::FormSchema`]) and every other component
//! works with the resulting [`ParsedOptions`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON key that marks a checkbox payload.
const CHECKBOXES_KEY: &str = "checkboxes";

/// JSON key that marks a repeatable payload.
const FIELDS_KEY: &str = "fields";

/// One selectable choice of a checkbox question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckboxOption {
    pub label: String,
    /// Selecting this choice unlocks a free-text sub-input.
    #[serde(default)]
    pub has_input: bool,
}

/// `{ checkboxes: [...], multiple?: bool }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckboxOptions {
    pub checkboxes: Vec<CheckboxOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,
}

impl CheckboxOptions {
    /// Multi-select unless `multiple` is explicitly `false`.
    pub fn is_multiple(&self) -> bool {
        self.multiple != Some(false)
    }

    pub fn option(&self, label: &str) -> Option<&CheckboxOption> {
        self.checkboxes.iter().find(|o| o.label == label)
    }
}

/// Input kind of one column of a repeatable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatableFieldType {
    Text,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatableField {
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: RepeatableFieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// `{ fields: [...] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatableOptions {
    pub fields: Vec<RepeatableField>,
}

/// Result of parsing an options payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsedOptions {
    Checkbox(CheckboxOptions),
    Repeatable(RepeatableOptions),
    /// Unusable payload, or one whose shape belongs to the other question
    /// type (see [`crate::schema::FormSchema`]). A configuration error,
    /// never fatal: the form falls back to free-text entry.
    Invalid,
}

impl ParsedOptions {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    pub fn as_checkbox(&self) -> Option<&CheckboxOptions> {
        match self {
            Self::Checkbox(opts) => Some(opts),
            _ => None,
        }
    }

    pub fn as_repeatable(&self) -> Option<&RepeatableOptions> {
        match self {
            Self::Repeatable(opts) => Some(opts),
            _ => None,
        }
    }
}

/// Parse a raw options string.
///
/// A `checkboxes` array is looked for before a `fields` array, regardless of
/// the question type the payload is attached to.
pub fn parse_options(raw: Option<&str>) -> ParsedOptions {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return ParsedOptions::Invalid;
    };
    let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(raw) else {
        return ParsedOptions::Invalid;
    };

    if obj.get(CHECKBOXES_KEY).is_some_and(Value::is_array) {
        return serde_json::from_value(Value::Object(obj))
            .map(ParsedOptions::Checkbox)
            .unwrap_or(ParsedOptions::Invalid);
    }
    if obj.get(FIELDS_KEY).is_some_and(Value::is_array) {
        return serde_json::from_value(Value::Object(obj))
            .map(ParsedOptions::Repeatable)
            .unwrap_or(ParsedOptions::Invalid);
    }
    ParsedOptions::Invalid
}
