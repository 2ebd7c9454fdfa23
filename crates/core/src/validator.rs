//! Per-question and per-step validation. Pure logic, no I/O.
//!
//! Validation never mutates the state it reads and can be re-run on every
//! navigation attempt. A step is valid iff its [`ErrorMap`] is empty.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::form_state::FormState;
use crate::options::ParsedOptions;
use crate::schema::{FormSchema, Question, QuestionType};
use crate::types::QuestionId;

pub const REQUIRED_MESSAGE: &str = "이 항목은 필수입니다.";
pub const MIN_LENGTH_MESSAGE: &str = "최소 글자 수 이상 입력해주세요.";
pub const REPEATABLE_EMPTY_MESSAGE: &str = "최소 하나 이상 입력해주세요.";
pub const CHECKBOX_EMPTY_MESSAGE: &str = "하나 이상 선택해주세요.";
pub const AGREEMENT_MESSAGE: &str = "동의가 필요합니다.";

/// Errors of one validation run, keyed by question id.
pub type ErrorMap = BTreeMap<QuestionId, FieldError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Required,
    MinLength,
    RepeatableEmpty,
    CheckboxEmpty,
    AgreementRequired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldError {
    /// Error with the fixed message of `kind`. [`FieldError::min_length`]
    /// names the actual minimum.
    pub fn new(kind: ErrorKind) -> Self {
        let message = match kind {
            ErrorKind::Required => REQUIRED_MESSAGE,
            ErrorKind::MinLength => MIN_LENGTH_MESSAGE,
            ErrorKind::RepeatableEmpty => REPEATABLE_EMPTY_MESSAGE,
            ErrorKind::CheckboxEmpty => CHECKBOX_EMPTY_MESSAGE,
            ErrorKind::AgreementRequired => AGREEMENT_MESSAGE,
        };
        Self {
            kind,
            message: message.to_string(),
        }
    }

    pub fn min_length(min: i32) -> Self {
        Self {
            kind: ErrorKind::MinLength,
            message: format!("최소 {min}자 이상 입력해주세요."),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate one answer against its question.
///
/// `options` is the parsed payload for checkbox and repeatable questions;
/// `None` is treated like an invalid payload.
pub fn validate_question(
    question: &Question,
    options: Option<&ParsedOptions>,
    value: Option<&Value>,
) -> Option<FieldError> {
    match question.question_type {
        QuestionType::Notice => None,
        QuestionType::Text | QuestionType::Textarea => validate_text(question, value),
        QuestionType::File => {
            (question.is_required && is_blank(value)).then(|| FieldError::new(ErrorKind::Required))
        }
        QuestionType::Checkbox => validate_checkbox(question, options, value),
        QuestionType::Repeatable => validate_repeatable(question, options, value),
        QuestionType::Agreement => validate_agreement(question, value),
    }
}

/// Validate every question shown on `step`.
pub fn validate_step(schema: &FormSchema, step: i32, state: &FormState) -> ErrorMap {
    collect_errors(schema, schema.questions_in_step(step), state)
}

/// Validate every question of the schema, across all steps.
pub fn validate_all(schema: &FormSchema, state: &FormState) -> ErrorMap {
    collect_errors(schema, schema.questions().iter(), state)
}

fn collect_errors<'a>(
    schema: &FormSchema,
    questions: impl Iterator<Item = &'a Question>,
    state: &FormState,
) -> ErrorMap {
    questions
        .filter_map(|q| {
            validate_question(q, schema.options(q.id), state.answer(q.id)).map(|e| (q.id, e))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-type rules
// ---------------------------------------------------------------------------

fn validate_text(question: &Question, value: Option<&Value>) -> Option<FieldError> {
    let text = match value {
        None | Some(Value::Null) => "",
        Some(Value::String(s)) => s.trim(),
        // Non-string answers carry content; length rules do not apply.
        Some(_) => return None,
    };
    if text.is_empty() {
        return question
            .is_required
            .then(|| FieldError::new(ErrorKind::Required));
    }
    if question.require_min_length && question.min_length > 0 {
        let count = text.chars().count();
        if count < question.min_length as usize {
            return Some(FieldError::min_length(question.min_length));
        }
    }
    None
}

fn validate_checkbox(
    question: &Question,
    options: Option<&ParsedOptions>,
    value: Option<&Value>,
) -> Option<FieldError> {
    if !question.is_required {
        return None;
    }
    let Some(opts) = options.and_then(ParsedOptions::as_checkbox) else {
        return is_blank(value).then(|| FieldError::new(ErrorKind::Required));
    };
    let empty = if opts.is_multiple() {
        value
            .and_then(|v| v.get("checked"))
            .and_then(Value::as_array)
            .is_none_or(|checked| checked.is_empty())
    } else {
        value
            .and_then(|v| v.get("selected"))
            .and_then(Value::as_str)
            .is_none_or(str::is_empty)
    };
    empty.then(|| FieldError::new(ErrorKind::CheckboxEmpty))
}

fn validate_repeatable(
    question: &Question,
    options: Option<&ParsedOptions>,
    value: Option<&Value>,
) -> Option<FieldError> {
    if !question.is_required {
        return None;
    }
    if options.and_then(ParsedOptions::as_repeatable).is_none() {
        return is_blank(value).then(|| FieldError::new(ErrorKind::Required));
    }
    let empty = value
        .and_then(Value::as_array)
        .is_none_or(|rows| rows.is_empty());
    empty.then(|| FieldError::new(ErrorKind::RepeatableEmpty))
}

fn validate_agreement(question: &Question, value: Option<&Value>) -> Option<FieldError> {
    if !question.is_required {
        return None;
    }
    let agreed = value
        .and_then(|v| v.get("agreed"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    (!agreed).then(|| FieldError::new(ErrorKind::AgreementRequired))
}

/// Missing, null, or a string that is empty after trimming.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}
