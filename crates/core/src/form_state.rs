//! Mutable answer state of one form session.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::collection::{CollectionEntry, CollectionSchema, ROOMS_KEY};
use crate::types::QuestionId;
use crate::validator::{ErrorMap, FieldError};

/// Answers keyed by question id, submission-scoped collections keyed by
/// collection key, and the transient error map of the last validation.
///
/// Single-owner value: the session that holds it is the only writer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub answers: BTreeMap<QuestionId, Value>,
    pub collections: BTreeMap<String, Vec<CollectionEntry>>,
    pub errors: ErrorMap,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Answers
    // -----------------------------------------------------------------------

    pub fn answer(&self, id: QuestionId) -> Option<&Value> {
        self.answers.get(&id)
    }

    /// Store an answer and clear any error reported for that question.
    pub fn set_answer(&mut self, id: QuestionId, value: Value) {
        self.answers.insert(id, value);
        self.errors.remove(&id);
    }

    pub fn error(&self, id: QuestionId) -> Option<&FieldError> {
        self.errors.get(&id)
    }

    pub fn set_errors(&mut self, errors: ErrorMap) {
        self.errors = errors;
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    // -----------------------------------------------------------------------
    // Collections
    // -----------------------------------------------------------------------

    pub fn entries(&self, key: &str) -> &[CollectionEntry] {
        self.collections.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append a blank entry to `schema`'s collection; returns its index.
    pub fn add_entry(&mut self, schema: &CollectionSchema) -> usize {
        let entries = self.collections.entry(schema.key.clone()).or_default();
        entries.push(schema.blank_entry());
        entries.len() - 1
    }

    /// Set one field of entry `index`. Returns `false` when there is no
    /// such entry.
    pub fn set_entry_field(&mut self, key: &str, index: usize, field: &str, value: Value) -> bool {
        match self.collections.get_mut(key).and_then(|e| e.get_mut(index)) {
            Some(entry) => {
                entry.insert(field.to_string(), value);
                true
            }
            None => false,
        }
    }

    pub fn remove_entry(&mut self, key: &str, index: usize) -> Option<CollectionEntry> {
        let entries = self.collections.get_mut(key)?;
        (index < entries.len()).then(|| entries.remove(index))
    }

    pub fn rooms(&self) -> &[CollectionEntry] {
        self.entries(ROOMS_KEY)
    }

    pub fn add_room(&mut self) -> usize {
        self.add_entry(&CollectionSchema::rooms())
    }

    pub fn set_room_field(&mut self, index: usize, field: &str, value: &str) -> bool {
        self.set_entry_field(ROOMS_KEY, index, field, Value::String(value.to_string()))
    }
}
