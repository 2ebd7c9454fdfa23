//! Row models.
//!
//! Each submodule contains a `FromRow` struct matching the table columns and
//! a conversion into the corresponding `folio_core` domain type.

pub mod portfolio;
pub mod question;
pub mod submission;
