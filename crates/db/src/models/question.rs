use folio_core::schema::{Question, QuestionType};
use folio_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `questions` table. `question_type` is stored as free text
/// and may be absent.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: DbId,
    pub portfolio_id: DbId,
    pub step: i32,
    pub sort_order: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub question_type: Option<String>,
    pub options: Option<String>,
    pub is_required: bool,
    pub min_length: i32,
    pub max_length: Option<i32>,
    pub require_min_length: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Question {
            id: row.id,
            portfolio_id: row.portfolio_id,
            step: row.step,
            order: row.sort_order,
            title: row.title,
            description: row.description,
            thumbnail: row.thumbnail,
            question_type: QuestionType::from_db(row.question_type.as_deref()),
            options: row.options,
            is_required: row.is_required,
            min_length: row.min_length,
            max_length: row.max_length,
            require_min_length: row.require_min_length,
        }
    }
}
