//! Persisted submission record and the payloads that create or update it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{DbId, Timestamp};

/// One user's set of answers for one portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: DbId,
    pub portfolio_id: DbId,
    pub company_name: String,
    /// Argon2id PHC string of the 4-digit PIN.
    #[serde(skip_serializing, default)]
    pub pin_hash: String,
    /// Question-id keys plus collection keys.
    pub responses: Value,
    pub is_draft: bool,
    pub completed_at: Option<Timestamp>,
    #[serde(skip_serializing)]
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Submission {
    /// Whether the export includes this submission.
    pub fn is_exportable(&self) -> bool {
        !self.is_draft && !self.company_name.trim().is_empty()
    }
}

/// Insert DTO.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub portfolio_id: DbId,
    pub company_name: String,
    pub pin_hash: String,
    pub responses: Value,
    pub is_draft: bool,
    pub completed_at: Option<Timestamp>,
    pub ip_address: Option<String>,
}

/// In-place update DTO. Identity columns never change.
#[derive(Debug, Clone)]
pub struct SubmissionUpdate {
    pub responses: Value,
    pub is_draft: bool,
    pub completed_at: Option<Timestamp>,
    pub ip_address: Option<String>,
}

/// What the navigator hands to persistence: serialized responses plus the
/// draft flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub responses: Map<String, Value>,
    pub is_draft: bool,
}
