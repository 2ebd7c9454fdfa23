//! Portfolio and question schema.
//!
//! [`FormSchema`] is the loaded, read-only view of one portfolio: questions
//! sorted by `(step, order)` and their options parsed once per question id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::collection::{CollectionSchema, ROOMS_KEY};
use crate::options::{parse_options, ParsedOptions};
use crate::types::{DbId, QuestionId};

// ---------------------------------------------------------------------------
// Question type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Display-only step content; never stores an answer.
    Notice,
    Text,
    Textarea,
    /// Answer is the public URL returned by the upload collaborator.
    File,
    Checkbox,
    Repeatable,
    Agreement,
}

impl QuestionType {
    /// Resolve a stored type name.
    ///
    /// Absent and unrecognized names both resolve to `textarea`, which is
    /// how older rows without a type have always been rendered.
    pub fn from_db(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("notice") => Self::Notice,
            Some("text") => Self::Text,
            Some("textarea") => Self::Textarea,
            Some("file") => Self::File,
            Some("checkbox") => Self::Checkbox,
            Some("repeatable") => Self::Repeatable,
            Some("agreement") => Self::Agreement,
            _ => Self::Textarea,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::File => "file",
            Self::Checkbox => "checkbox",
            Self::Repeatable => "repeatable",
            Self::Agreement => "agreement",
        }
    }

    /// Whether the type interprets the `options` payload.
    pub fn uses_options(self) -> bool {
        matches!(self, Self::Checkbox | Self::Repeatable)
    }

    /// Whether answers of this type appear in `responses`.
    pub fn collects_answer(self) -> bool {
        self != Self::Notice
    }
}

// ---------------------------------------------------------------------------
// Portfolio / Question
// ---------------------------------------------------------------------------

/// An administrator-defined form template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub slug: String,
    pub is_active: bool,
    pub order: i32,
    /// Submission-scoped collections this portfolio collects.
    #[serde(default)]
    pub collections: Vec<CollectionSchema>,
}

/// One schema-defined input unit within a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub portfolio_id: DbId,
    pub step: i32,
    pub order: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub question_type: QuestionType,
    pub options: Option<String>,
    pub is_required: bool,
    pub min_length: i32,
    /// Input-level cap only; never produces a validation error.
    pub max_length: Option<i32>,
    pub require_min_length: bool,
}

impl Question {
    /// A non-required question with no options and no length rules.
    pub fn new(id: QuestionId, step: i32, order: i32, title: &str, question_type: QuestionType) -> Self {
        Self {
            id,
            portfolio_id: 0,
            step,
            order,
            title: title.to_string(),
            description: None,
            thumbnail: None,
            question_type,
            options: None,
            is_required: false,
            min_length: 0,
            max_length: None,
            require_min_length: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn with_options(mut self, options: &str) -> Self {
        self.options = Some(options.to_string());
        self
    }

    pub fn with_min_length(mut self, min_length: i32) -> Self {
        self.min_length = min_length;
        self.require_min_length = true;
        self
    }
}

// ---------------------------------------------------------------------------
// Configuration issues
// ---------------------------------------------------------------------------

/// A question whose options could not be parsed, or parsed to the shape of
/// another question type. Rendering falls back to free-text entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationIssue {
    pub question_id: QuestionId,
    pub question_type: QuestionType,
    pub is_required: bool,
    pub message: String,
}

/// Message shown in place of a checkbox group with a broken payload.
pub const CHECKBOX_CONFIG_ERROR: &str = "체크박스 설정 오류: 관리자에게 문의하세요.";

/// Message shown in place of a repeatable group with a broken payload.
pub const REPEATABLE_CONFIG_ERROR: &str = "반복 필드 설정 오류: 관리자에게 문의하세요.";

// ---------------------------------------------------------------------------
// FormSchema
// ---------------------------------------------------------------------------

/// Parse a question's payload; a shape belonging to the other option type
/// counts as invalid.
fn parse_question_options(question: &Question) -> ParsedOptions {
    match (question.question_type, parse_options(question.options.as_deref())) {
        (QuestionType::Checkbox, parsed @ ParsedOptions::Checkbox(_))
        | (QuestionType::Repeatable, parsed @ ParsedOptions::Repeatable(_)) => parsed,
        _ => ParsedOptions::Invalid,
    }
}

/// Loaded schema of one portfolio.
#[derive(Debug, Clone)]
pub struct FormSchema {
    portfolio: Portfolio,
    questions: Vec<Question>,
    options: BTreeMap<QuestionId, ParsedOptions>,
}

impl FormSchema {
    /// Sort questions by `(step, order, id)` and parse every options payload
    /// of a checkbox or repeatable question.
    pub fn new(portfolio: Portfolio, mut questions: Vec<Question>) -> Self {
        questions.sort_by_key(|q| (q.step, q.order, q.id));
        let options = questions
            .iter()
            .filter(|q| q.question_type.uses_options())
            .map(|q| (q.id, parse_question_options(q)))
            .collect();
        Self {
            portfolio,
            questions,
            options,
        }
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// All questions, ordered by `(step, order)`.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Parsed options of a checkbox or repeatable question.
    pub fn options(&self, id: QuestionId) -> Option<&ParsedOptions> {
        self.options.get(&id)
    }

    /// Smallest and largest step present, `None` without questions.
    pub fn step_range(&self) -> Option<(i32, i32)> {
        let min = self.questions.iter().map(|q| q.step).min()?;
        let max = self.questions.iter().map(|q| q.step).max()?;
        Some((min, max))
    }

    /// Questions shown on `step`, in display order.
    pub fn questions_in_step(&self, step: i32) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.step == step)
    }

    /// Distinct steps present, ascending.
    pub fn steps(&self) -> Vec<i32> {
        let mut steps: Vec<i32> = self.questions.iter().map(|q| q.step).collect();
        steps.dedup();
        steps
    }

    pub fn configuration_issues(&self) -> Vec<ConfigurationIssue> {
        self.questions
            .iter()
            .filter(|q| self.options(q.id).is_some_and(ParsedOptions::is_invalid))
            .map(|q| ConfigurationIssue {
                question_id: q.id,
                question_type: q.question_type,
                is_required: q.is_required,
                message: match q.question_type {
                    QuestionType::Checkbox => CHECKBOX_CONFIG_ERROR,
                    _ => REPEATABLE_CONFIG_ERROR,
                }
                .to_string(),
            })
            .collect()
    }

    /// Declared collections of the portfolio.
    pub fn collections(&self) -> &[CollectionSchema] {
        &self.portfolio.collections
    }

    /// Schema of collection `key`: the declaration, or the built-in rooms
    /// schema for an undeclared `rooms`.
    pub fn collection(&self, key: &str) -> Option<CollectionSchema> {
        self.portfolio
            .collections
            .iter()
            .find(|c| c.key == key)
            .cloned()
            .or_else(|| (key == ROOMS_KEY).then(CollectionSchema::rooms))
    }
}
