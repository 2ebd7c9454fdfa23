//! Repository for the `submissions` table.

use folio_core::submission::{NewSubmission, SubmissionUpdate};
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::submission::SubmissionRow;

const COLUMNS: &str = "id, portfolio_id, company_name, pin_hash, responses, is_draft, \
     completed_at, ip_address, created_at, updated_at";

pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Insert a new submission. A duplicate company for the portfolio fails
    /// on `uq_submissions_portfolio_company`.
    pub async fn create(pool: &PgPool, input: &NewSubmission) -> Result<SubmissionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO submissions \
                (portfolio_id, company_name, pin_hash, responses, is_draft, completed_at, ip_address) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(input.portfolio_id)
            .bind(&input.company_name)
            .bind(&input.pin_hash)
            .bind(&input.responses)
            .bind(input.is_draft)
            .bind(input.completed_at)
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_company(
        pool: &PgPool,
        portfolio_id: DbId,
        company_name: &str,
    ) -> Result<Option<SubmissionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM submissions \
             WHERE portfolio_id = $1 AND company_name = $2"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(portfolio_id)
            .bind(company_name)
            .fetch_optional(pool)
            .await
    }

    /// Every submission of a company across portfolios, most recent first.
    pub async fn list_by_company(
        pool: &PgPool,
        company_name: &str,
    ) -> Result<Vec<SubmissionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM submissions \
             WHERE company_name = $1 \
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(company_name)
            .fetch_all(pool)
            .await
    }

    /// Final submissions with a non-blank company, newest completion first.
    pub async fn list_completed(
        pool: &PgPool,
        portfolio_id: DbId,
    ) -> Result<Vec<SubmissionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM submissions \
             WHERE portfolio_id = $1 AND is_draft = FALSE AND btrim(company_name) <> '' \
             ORDER BY completed_at DESC NULLS LAST, id DESC"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(portfolio_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the payload of a submission. Returns `None` if no row matched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &SubmissionUpdate,
    ) -> Result<Option<SubmissionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE submissions SET \
                responses = $2, \
                is_draft = $3, \
                completed_at = $4, \
                ip_address = $5 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(id)
            .bind(&input.responses)
            .bind(input.is_draft)
            .bind(input.completed_at)
            .bind(&input.ip_address)
            .fetch_optional(pool)
            .await
    }
}
