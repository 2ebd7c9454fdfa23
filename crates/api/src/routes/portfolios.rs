//! Route definitions for portfolios and their per-portfolio submissions.
//!
//! Mounted at `/portfolios`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{portfolios, submissions};
use crate::state::AppState;

/// ```text
/// GET  /                              -> list_portfolios
/// GET  /{slug}                        -> get_form_definition
/// POST /{slug}/steps/validate         -> validate_step
/// POST /{slug}/submissions            -> save_submission
/// POST /{slug}/submissions/check      -> check_submission
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(portfolios::list_portfolios))
        .route("/{slug}", get(portfolios::get_form_definition))
        .route("/{slug}/steps/validate", post(portfolios::validate_step))
        .route("/{slug}/submissions", post(submissions::save_submission))
        .route(
            "/{slug}/submissions/check",
            post(submissions::check_submission),
        )
}
