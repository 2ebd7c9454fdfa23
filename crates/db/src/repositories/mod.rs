//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod portfolio_repo;
pub mod question_repo;
pub mod submission_repo;

pub use portfolio_repo::PortfolioRepo;
pub use question_repo::QuestionRepo;
pub use submission_repo::SubmissionRepo;
