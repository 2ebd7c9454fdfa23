//! [`FormStore`] over Postgres.

use async_trait::async_trait;
use folio_core::error::CoreError;
use folio_core::schema::{Portfolio, Question};
use folio_core::store::FormStore;
use folio_core::submission::{NewSubmission, Submission, SubmissionUpdate};
use folio_core::types::DbId;

use crate::repositories::{PortfolioRepo, QuestionRepo, SubmissionRepo};
use crate::DbPool;

/// PostgreSQL unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgFormStore {
    pool: DbPool,
}

impl PgFormStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Map a sqlx failure into the core error space. Unique violations become
/// [`CoreError::Conflict`] so the intake flow can re-read the winning row.
fn map_db_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            return CoreError::Conflict(format!(
                "Duplicate value violates unique constraint: {constraint}"
            ));
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Internal(format!("Database error: {err}"))
}

#[async_trait]
impl FormStore for PgFormStore {
    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(map_db_error)
    }

    async fn find_portfolio_by_slug(&self, slug: &str) -> Result<Option<Portfolio>, CoreError> {
        let row = PortfolioRepo::find_by_slug(&self.pool, slug)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_active_portfolios(&self) -> Result<Vec<Portfolio>, CoreError> {
        let rows = PortfolioRepo::list_active(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_questions(&self, portfolio_id: DbId) -> Result<Vec<Question>, CoreError> {
        let rows = QuestionRepo::list_by_portfolio(&self.pool, portfolio_id)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_submission(
        &self,
        portfolio_id: DbId,
        company_name: &str,
    ) -> Result<Option<Submission>, CoreError> {
        let row = SubmissionRepo::find_by_company(&self.pool, portfolio_id, company_name)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_submissions_by_company(
        &self,
        company_name: &str,
    ) -> Result<Vec<Submission>, CoreError> {
        let rows = SubmissionRepo::list_by_company(&self.pool, company_name)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_completed_submissions(
        &self,
        portfolio_id: DbId,
    ) -> Result<Vec<Submission>, CoreError> {
        let rows = SubmissionRepo::list_completed(&self.pool, portfolio_id)
            .await
            .map_err(map_db_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_submission(&self, input: NewSubmission) -> Result<Submission, CoreError> {
        let row = SubmissionRepo::create(&self.pool, &input)
            .await
            .map_err(map_db_error)?;
        tracing::info!(
            submission_id = row.id,
            portfolio_id = row.portfolio_id,
            is_draft = row.is_draft,
            "Submission created",
        );
        Ok(row.into())
    }

    async fn update_submission(
        &self,
        id: DbId,
        input: SubmissionUpdate,
    ) -> Result<Submission, CoreError> {
        let row = SubmissionRepo::update(&self.pool, id, &input)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| CoreError::not_found("submission", id))?;
        tracing::info!(
            submission_id = row.id,
            portfolio_id = row.portfolio_id,
            is_draft = row.is_draft,
            "Submission updated",
        );
        Ok(row.into())
    }
}
