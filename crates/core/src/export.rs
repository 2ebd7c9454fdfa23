//! Projection of completed submissions into a flat table.
//!
//! Columns are `순번`, `상호명`, one column per non-file question in
//! `(step, order)` order, then one column group per collection entry. Group
//! counts are sized by the largest collection among the exported rows, so a
//! submission with fewer entries gets blank cells.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::collection::{is_collection_key, CollectionSchema};
use crate::error::CoreError;
use crate::options::ParsedOptions;
use crate::schema::{FormSchema, Question, QuestionType};
use crate::submission::Submission;

pub const SEQUENCE_HEADER: &str = "순번";
pub const COMPANY_HEADER: &str = "상호명";
pub const AGREED_TEXT: &str = "동의함";
pub const NOT_AGREED_TEXT: &str = "동의하지 않음";

/// UTF-8 byte order mark, so spreadsheet tools detect the encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as UTF-8 CSV with a leading byte order mark and CRLF records.
    pub fn to_csv(&self) -> Result<Vec<u8>, CoreError> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(UTF8_BOM.to_vec());
        writer
            .write_record(&self.headers)
            .map_err(|e| CoreError::Internal(format!("CSV write failed: {e}")))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|e| CoreError::Internal(format!("CSV write failed: {e}")))?;
        }
        writer
            .into_inner()
            .map_err(|e| CoreError::Internal(format!("CSV flush failed: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// A collection column group and how many entries it spans.
struct CollectionColumns {
    schema: CollectionSchema,
    count: usize,
}

/// Project `submissions` (already in export order) into a table.
///
/// Drafts and submissions with a blank company name are skipped.
pub fn project(schema: &FormSchema, submissions: &[Submission]) -> ExportTable {
    let exported: Vec<&Submission> = submissions.iter().filter(|s| s.is_exportable()).collect();
    let questions: Vec<&Question> = schema
        .questions()
        .iter()
        .filter(|q| q.question_type != QuestionType::File)
        .collect();
    let groups = collection_columns(schema, &exported);

    let mut headers = vec![SEQUENCE_HEADER.to_string(), COMPANY_HEADER.to_string()];
    headers.extend(questions.iter().map(|q| q.title.clone()));
    for group in &groups {
        for n in 1..=group.count {
            for field in &group.schema.fields {
                headers.push(format!("{}{} {}", group.schema.label, n, field.label));
            }
        }
    }

    let rows = exported
        .iter()
        .enumerate()
        .map(|(idx, submission)| {
            let mut row = vec![(idx + 1).to_string(), submission.company_name.clone()];
            row.extend(questions.iter().map(|q| {
                format_cell(
                    q.question_type,
                    schema.options(q.id),
                    submission.responses.get(q.id.to_string()),
                )
            }));
            for group in &groups {
                let entries = submission
                    .responses
                    .get(&group.schema.key)
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                for n in 0..group.count {
                    let entry = entries.get(n);
                    for field in &group.schema.fields {
                        row.push(
                            entry
                                .and_then(|e| e.get(&field.key))
                                .map(plain_text)
                                .unwrap_or_default(),
                        );
                    }
                }
            }
            row
        })
        .collect();

    ExportTable { headers, rows }
}

/// Declared collections first, then undeclared arrays found in the rows,
/// in key order. Groups with no entries in any row produce no columns.
fn collection_columns(schema: &FormSchema, submissions: &[&Submission]) -> Vec<CollectionColumns> {
    let mut undeclared: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    let declared: BTreeSet<&str> = schema.collections().iter().map(|c| c.key.as_str()).collect();
    for submission in submissions {
        let Some(obj) = submission.responses.as_object() else {
            continue;
        };
        for (key, value) in obj {
            if let Value::Array(items) = value {
                if is_collection_key(key) && !declared.contains(key.as_str()) {
                    undeclared
                        .entry(key.clone())
                        .or_default()
                        .extend(items.iter().cloned());
                }
            }
        }
    }

    let schemas = schema
        .collections()
        .iter()
        .cloned()
        .chain(
            undeclared
                .iter()
                .map(|(key, entries)| CollectionSchema::infer(key, entries)),
        );

    schemas
        .map(|schema| {
            let count = submissions
                .iter()
                .filter_map(|s| s.responses.get(&schema.key).and_then(Value::as_array))
                .map(Vec::len)
                .max()
                .unwrap_or(0);
            CollectionColumns { schema, count }
        })
        .filter(|group| group.count > 0 && !group.schema.fields.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Cell formatting
// ---------------------------------------------------------------------------

/// Format one answer for the export.
pub fn format_cell(
    question_type: QuestionType,
    options: Option<&ParsedOptions>,
    value: Option<&Value>,
) -> String {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return String::new();
    };

    if question_type == QuestionType::Agreement {
        if let Some(agreed) = value.get("agreed").and_then(Value::as_bool) {
            return if agreed { AGREED_TEXT } else { NOT_AGREED_TEXT }.to_string();
        }
    }

    match value {
        Value::Array(items) if question_type == QuestionType::Checkbox => items
            .iter()
            .map(plain_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(row) => format_row(row, options),
                other => plain_text(other),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(obj)
            if obj.contains_key("checked")
                || obj.contains_key("selected")
                || obj.contains_key("inputs") =>
        {
            format_selection(value, options)
        }
        other => plain_text(other),
    }
}

/// One repeatable row: declared fields in order, then any other keys.
fn format_row(row: &Map<String, Value>, options: Option<&ParsedOptions>) -> String {
    let declared: Vec<&str> = options
        .and_then(ParsedOptions::as_repeatable)
        .map(|o| o.fields.iter().map(|f| f.label.as_str()).collect())
        .unwrap_or_default();
    let extra = row
        .iter()
        .filter(|(key, _)| !declared.contains(&key.as_str()))
        .map(|(_, value)| value);
    declared
        .iter()
        .filter_map(|label| row.get(*label))
        .chain(extra)
        .map(plain_text)
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_selection(value: &Value, options: Option<&ParsedOptions>) -> String {
    let single = options
        .and_then(ParsedOptions::as_checkbox)
        .is_some_and(|o| !o.is_multiple());

    let choice = match (value.get("checked"), value.get("selected")) {
        (Some(Value::Array(checked)), _) if !single => checked
            .iter()
            .map(plain_text)
            .collect::<Vec<_>>()
            .join(", "),
        (_, Some(selected)) => plain_text(selected),
        (Some(Value::Array(checked)), None) => checked
            .iter()
            .map(plain_text)
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    };
    let inputs = value
        .get("inputs")
        .and_then(Value::as_object)
        .map(|inputs| {
            inputs
                .iter()
                .map(|(label, text)| format!("{label}: {}", plain_text(text)))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    [choice, inputs]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Strings as is, scalars via display, anything else as compact JSON.
fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
