//! Submission-scoped collections.
//!
//! A collection is a user-extensible list of structured entries that lives
//! beside the question answers in a submission's `responses` object, under
//! its own key (for example `rooms`). Portfolios declare the collections they
//! use; arrays found in stored responses without a declaration are inferred.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// One entry of a collection, keyed by field key.
pub type CollectionEntry = Map<String, Value>;

/// Key of the built-in rooms collection.
pub const ROOMS_KEY: &str = "rooms";

/// One column of a collection entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionField {
    pub key: String,
    pub label: String,
}

impl CollectionField {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// Declaration of a submission-scoped collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSchema {
    /// Key under which entries are stored in `responses`.
    pub key: String,
    /// Prefix for export column headers (`{label}{n} {field label}`).
    pub label: String,
    pub fields: Vec<CollectionField>,
}

impl CollectionSchema {
    /// The built-in rooms collection: name, description, type, and price.
    pub fn rooms() -> Self {
        Self {
            key: ROOMS_KEY.to_string(),
            label: "객실".to_string(),
            fields: vec![
                CollectionField::new("name", "이름"),
                CollectionField::new("desc", "설명"),
                CollectionField::new("type", "형태"),
                CollectionField::new("price", "요금"),
            ],
        }
    }

    /// Infer a schema for an undeclared collection from its stored entries.
    ///
    /// `rooms` always maps to [`CollectionSchema::rooms`]. Otherwise the
    /// fields are the union of entry keys, in first-seen order.
    pub fn infer(key: &str, entries: &[Value]) -> Self {
        if key == ROOMS_KEY {
            return Self::rooms();
        }
        let mut fields: Vec<CollectionField> = Vec::new();
        for entry in entries.iter().filter_map(Value::as_object) {
            for field_key in entry.keys() {
                if !fields.iter().any(|f| &f.key == field_key) {
                    fields.push(CollectionField::new(field_key, field_key));
                }
            }
        }
        Self {
            key: key.to_string(),
            label: key.to_string(),
            fields,
        }
    }

    /// A fresh entry with every declared field set to an empty string.
    pub fn blank_entry(&self) -> CollectionEntry {
        self.fields
            .iter()
            .map(|f| (f.key.clone(), Value::String(String::new())))
            .collect()
    }
}

/// Whether `key` can name a collection (question ids are numeric).
pub fn is_collection_key(key: &str) -> bool {
    !key.is_empty() && key.parse::<i64>().is_err()
}

/// Validate a portfolio's collection declarations.
pub fn validate_collections(collections: &[CollectionSchema]) -> Result<(), CoreError> {
    for (idx, schema) in collections.iter().enumerate() {
        if !is_collection_key(&schema.key) {
            return Err(CoreError::Validation(format!(
                "Collection key '{}' must be non-empty and non-numeric",
                schema.key
            )));
        }
        if collections[..idx].iter().any(|c| c.key == schema.key) {
            return Err(CoreError::Validation(format!(
                "Collection key '{}' is declared more than once",
                schema.key
            )));
        }
        if schema.fields.is_empty() {
            return Err(CoreError::Validation(format!(
                "Collection '{}' must declare at least one field",
                schema.key
            )));
        }
    }
    Ok(())
}
