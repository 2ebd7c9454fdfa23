//! Typed views over stored answer shapes.
//!
//! Answers are kept as `serde_json::Value` in [`crate::form_state::FormState`]
//! so a persisted submission round-trips byte for byte. These types are the
//! mutation helpers a client uses to produce well-formed values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::options::CheckboxOption;

// ---------------------------------------------------------------------------
// Checkbox
// ---------------------------------------------------------------------------

/// Multi-select checkbox answer: `{ checked: [...], inputs: {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiSelection {
    #[serde(default)]
    pub checked: Vec<String>,
    #[serde(default)]
    pub inputs: BTreeMap<String, String>,
}

impl MultiSelection {
    pub fn from_value(value: Option<&Value>) -> Self {
        value
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// Check or uncheck `label`. Checked labels keep their selection order.
    pub fn toggle(&mut self, label: &str, on: bool) {
        if on {
            if !self.checked.iter().any(|c| c == label) {
                self.checked.push(label.to_string());
            }
        } else {
            self.checked.retain(|c| c != label);
        }
    }

    pub fn is_checked(&self, label: &str) -> bool {
        self.checked.iter().any(|c| c == label)
    }

    pub fn set_input(&mut self, label: &str, text: &str) {
        self.inputs.insert(label.to_string(), text.to_string());
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Single-select checkbox answer: `{ selected: "...", inputs: {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleSelection {
    #[serde(default)]
    pub selected: String,
    #[serde(default)]
    pub inputs: BTreeMap<String, String>,
}

impl SingleSelection {
    pub fn from_value(value: Option<&Value>) -> Self {
        value
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// Select `option`, replacing the previous selection.
    ///
    /// Inputs keyed by any other label are dropped; the new label keeps its
    /// own earlier input if there was one.
    pub fn select(&self, option: &CheckboxOption) -> Self {
        let inputs = self
            .inputs
            .get(&option.label)
            .map(|text| BTreeMap::from([(option.label.clone(), text.clone())]))
            .unwrap_or_default();
        Self {
            selected: option.label.clone(),
            inputs,
        }
    }

    pub fn set_input(&mut self, label: &str, text: &str) {
        self.inputs.insert(label.to_string(), text.to_string());
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Repeatable
// ---------------------------------------------------------------------------

/// One row of a repeatable answer, keyed by field label.
pub type RepeatableRow = Map<String, Value>;

/// Rows of a repeatable answer. A missing or non-array value starts as a
/// single empty row, the way the input group is first shown.
pub fn rows_from_value(value: Option<&Value>) -> Vec<RepeatableRow> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_object().cloned().unwrap_or_default())
            .collect(),
        _ => vec![RepeatableRow::new()],
    }
}

pub fn rows_to_value(rows: &[RepeatableRow]) -> Value {
    Value::Array(rows.iter().cloned().map(Value::Object).collect())
}

pub fn add_row(rows: &mut Vec<RepeatableRow>) {
    rows.push(RepeatableRow::new());
}

/// Remove row `index`; the last remaining row is never removed.
pub fn remove_row(rows: &mut Vec<RepeatableRow>, index: usize) -> bool {
    if rows.len() <= 1 || index >= rows.len() {
        return false;
    }
    rows.remove(index);
    true
}

/// Set one cell. Returns `false` when `index` is out of range.
pub fn set_cell(rows: &mut [RepeatableRow], index: usize, label: &str, value: Value) -> bool {
    match rows.get_mut(index) {
        Some(row) => {
            row.insert(label.to_string(), value);
            true
        }
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Agreement
// ---------------------------------------------------------------------------

/// Agreement answer: `{ agreed: bool }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agreement {
    #[serde(default)]
    pub agreed: bool,
}

impl Agreement {
    pub fn to_value(self) -> Value {
        serde_json::json!({ "agreed": self.agreed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn option(label: &str, has_input: bool) -> CheckboxOption {
        CheckboxOption {
            label: label.to_string(),
            has_input,
        }
    }

    #[test]
    fn toggle_adds_and_removes_labels() {
        let mut sel = MultiSelection::default();
        sel.toggle("A", true);
        sel.toggle("B", true);
        sel.toggle("A", true);
        assert_eq!(sel.checked, vec!["A", "B"]);
        sel.toggle("A", false);
        assert_eq!(sel.checked, vec!["B"]);
        assert!(sel.is_checked("B"));
    }

    #[test]
    fn multi_selection_reads_stored_value() {
        let value = json!({"checked": ["인스타그램"], "inputs": {"인스타그램": "@stay"}});
        let sel = MultiSelection::from_value(Some(&value));
        assert_eq!(sel.checked, vec!["인스타그램"]);
        assert_eq!(sel.to_value(), value);
    }

    #[test]
    fn selecting_b_after_a_replaces_selection_and_inputs() {
        let mut sel = SingleSelection::default().select(&option("A", true));
        sel.set_input("A", "a-text");
        let sel = sel.select(&option("B", true));
        assert_eq!(sel.selected, "B");
        assert!(sel.inputs.is_empty());
    }

    #[test]
    fn reselecting_keeps_own_prior_input() {
        let stored = json!({"selected": "A", "inputs": {"A": "a-text", "B": "b-text"}});
        let sel = SingleSelection::from_value(Some(&stored)).select(&option("B", true));
        assert_eq!(sel.selected, "B");
        assert_eq!(sel.inputs.len(), 1);
        assert_eq!(sel.inputs["B"], "b-text");
    }

    #[test]
    fn rows_start_with_one_empty_row() {
        assert_eq!(rows_from_value(None).len(), 1);
        assert_eq!(rows_from_value(Some(&json!("text"))).len(), 1);
        assert!(rows_from_value(Some(&json!([]))).is_empty());
    }

    #[test]
    fn row_editing() {
        let mut rows = rows_from_value(None);
        assert!(set_cell(&mut rows, 0, "대표자명", json!("홍길동")));
        add_row(&mut rows);
        assert!(set_cell(&mut rows, 1, "대표자명", json!("김철수")));
        assert!(!set_cell(&mut rows, 5, "대표자명", json!("x")));
        assert!(remove_row(&mut rows, 0));
        assert!(!remove_row(&mut rows, 0), "last row stays");
        assert_eq!(rows_to_value(&rows), json!([{"대표자명": "김철수"}]));
    }

    #[test]
    fn agreement_value() {
        assert_eq!(Agreement { agreed: true }.to_value(), json!({"agreed": true}));
    }
}
