use folio_core::submission::Submission;
use folio_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `submissions` table.
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionRow {
    pub id: DbId,
    pub portfolio_id: DbId,
    pub company_name: String,
    pub pin_hash: String,
    pub responses: serde_json::Value,
    pub is_draft: bool,
    pub completed_at: Option<Timestamp>,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<SubmissionRow> for Submission {
    fn from(row: SubmissionRow) -> Self {
        Submission {
            id: row.id,
            portfolio_id: row.portfolio_id,
            company_name: row.company_name,
            pin_hash: row.pin_hash,
            responses: row.responses,
            is_draft: row.is_draft,
            completed_at: row.completed_at,
            ip_address: row.ip_address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
