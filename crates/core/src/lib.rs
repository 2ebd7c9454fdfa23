//! Dynamic form engine: portfolio schema, option parsing, form state, step
//! navigation, validation, submission assembly, and export projection.
//!
//! Everything here is pure logic or an async collaborator trait; Postgres
//! lives in `folio-db` and HTTP in `folio-api`.

pub mod answer;
pub mod assembler;
pub mod cache;
pub mod collection;
pub mod error;
pub mod export;
pub mod form_state;
pub mod identity;
pub mod intake;
pub mod navigator;
pub mod options;
pub mod schema;
pub mod store;
pub mod submission;
pub mod types;
pub mod upload;
pub mod validator;
