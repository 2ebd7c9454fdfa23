//! Repository for the `questions` table.

use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::question::QuestionRow;

const COLUMNS: &str = "id, portfolio_id, step, sort_order, title, description, thumbnail, \
     question_type, options, is_required, min_length, max_length, require_min_length, \
     created_at, updated_at";

pub struct QuestionRepo;

impl QuestionRepo {
    /// All questions of a portfolio ordered by step, then order.
    pub async fn list_by_portfolio(
        pool: &PgPool,
        portfolio_id: DbId,
    ) -> Result<Vec<QuestionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questions \
             WHERE portfolio_id = $1 \
             ORDER BY step ASC, sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, QuestionRow>(&query)
            .bind(portfolio_id)
            .fetch_all(pool)
            .await
    }
}
