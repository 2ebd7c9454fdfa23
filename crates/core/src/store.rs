//! Persistence contract of the form engine.
//!
//! [`FormStore`] is implemented by `folio_db::PgFormStore` for Postgres and
//! by [`MemoryFormStore`] for tests and local development.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::CoreError;
use crate::schema::{Portfolio, Question};
use crate::submission::{NewSubmission, Submission, SubmissionUpdate};
use crate::types::DbId;

#[async_trait]
pub trait FormStore: Send + Sync {
    /// Reachability probe for health checks.
    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }

    async fn find_portfolio_by_slug(&self, slug: &str) -> Result<Option<Portfolio>, CoreError>;

    /// Active portfolios in display order.
    async fn list_active_portfolios(&self) -> Result<Vec<Portfolio>, CoreError>;

    /// Questions of a portfolio ordered by `(step, order)`.
    async fn list_questions(&self, portfolio_id: DbId) -> Result<Vec<Question>, CoreError>;

    async fn find_submission(
        &self,
        portfolio_id: DbId,
        company_name: &str,
    ) -> Result<Option<Submission>, CoreError>;

    /// Every submission of a company across portfolios, most recent first.
    async fn list_submissions_by_company(
        &self,
        company_name: &str,
    ) -> Result<Vec<Submission>, CoreError>;

    /// Final submissions with a company name, newest `completed_at` first.
    async fn list_completed_submissions(
        &self,
        portfolio_id: DbId,
    ) -> Result<Vec<Submission>, CoreError>;

    /// Insert a submission. A second row for the same portfolio and company
    /// fails with [`CoreError::Conflict`].
    async fn create_submission(&self, input: NewSubmission) -> Result<Submission, CoreError>;

    async fn update_submission(
        &self,
        id: DbId,
        input: SubmissionUpdate,
    ) -> Result<Submission, CoreError>;
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryTables {
    portfolios: Vec<Portfolio>,
    questions: Vec<Question>,
    submissions: Vec<Submission>,
    next_submission_id: DbId,
}

/// In-process [`FormStore`] with the same uniqueness rule as the database.
#[derive(Debug, Default)]
pub struct MemoryFormStore {
    tables: RwLock<MemoryTables>,
}

impl MemoryFormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a portfolio and its questions. Question `portfolio_id`s are
    /// overwritten with the portfolio's id.
    pub fn insert_portfolio(
        &self,
        portfolio: Portfolio,
        questions: Vec<Question>,
    ) -> Result<(), CoreError> {
        let mut tables = self.write()?;
        if tables.portfolios.iter().any(|p| p.slug == portfolio.slug) {
            return Err(CoreError::Conflict(format!(
                "Portfolio slug '{}' already exists",
                portfolio.slug
            )));
        }
        tables
            .questions
            .extend(questions.into_iter().map(|mut q| {
                q.portfolio_id = portfolio.id;
                q
            }));
        tables.portfolios.push(portfolio);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryTables>, CoreError> {
        self.tables
            .read()
            .map_err(|_| CoreError::Internal("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryTables>, CoreError> {
        self.tables
            .write()
            .map_err(|_| CoreError::Internal("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl FormStore for MemoryFormStore {
    async fn find_portfolio_by_slug(&self, slug: &str) -> Result<Option<Portfolio>, CoreError> {
        Ok(self.read()?.portfolios.iter().find(|p| p.slug == slug).cloned())
    }

    async fn list_active_portfolios(&self) -> Result<Vec<Portfolio>, CoreError> {
        let mut active: Vec<Portfolio> = self
            .read()?
            .portfolios
            .iter()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        active.sort_by_key(|p| (p.order, p.id));
        Ok(active)
    }

    async fn list_questions(&self, portfolio_id: DbId) -> Result<Vec<Question>, CoreError> {
        let mut questions: Vec<Question> = self
            .read()?
            .questions
            .iter()
            .filter(|q| q.portfolio_id == portfolio_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| (q.step, q.order, q.id));
        Ok(questions)
    }

    async fn find_submission(
        &self,
        portfolio_id: DbId,
        company_name: &str,
    ) -> Result<Option<Submission>, CoreError> {
        Ok(self
            .read()?
            .submissions
            .iter()
            .find(|s| s.portfolio_id == portfolio_id && s.company_name == company_name)
            .cloned())
    }

    async fn list_submissions_by_company(
        &self,
        company_name: &str,
    ) -> Result<Vec<Submission>, CoreError> {
        let mut found: Vec<Submission> = self
            .read()?
            .submissions
            .iter()
            .filter(|s| s.company_name == company_name)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(found)
    }

    async fn list_completed_submissions(
        &self,
        portfolio_id: DbId,
    ) -> Result<Vec<Submission>, CoreError> {
        let mut found: Vec<Submission> = self
            .read()?
            .submissions
            .iter()
            .filter(|s| s.portfolio_id == portfolio_id && s.is_exportable())
            .cloned()
            .collect();
        found.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(found)
    }

    async fn create_submission(&self, input: NewSubmission) -> Result<Submission, CoreError> {
        let mut tables = self.write()?;
        if tables
            .submissions
            .iter()
            .any(|s| s.portfolio_id == input.portfolio_id && s.company_name == input.company_name)
        {
            return Err(CoreError::Conflict(format!(
                "Submission for '{}' already exists",
                input.company_name
            )));
        }
        tables.next_submission_id += 1;
        let now = Utc::now();
        let submission = Submission {
            id: tables.next_submission_id,
            portfolio_id: input.portfolio_id,
            company_name: input.company_name,
            pin_hash: input.pin_hash,
            responses: input.responses,
            is_draft: input.is_draft,
            completed_at: input.completed_at,
            ip_address: input.ip_address,
            created_at: now,
            updated_at: now,
        };
        tables.submissions.push(submission.clone());
        Ok(submission)
    }

    async fn update_submission(
        &self,
        id: DbId,
        input: SubmissionUpdate,
    ) -> Result<Submission, CoreError> {
        let mut tables = self.write()?;
        let row = tables
            .submissions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::not_found("submission", id))?;
        row.responses = input.responses;
        row.is_draft = input.is_draft;
        row.completed_at = input.completed_at;
        row.ip_address = input.ip_address;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}
