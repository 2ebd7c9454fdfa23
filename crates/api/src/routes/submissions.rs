//! Cross-portfolio submission routes, mounted at `/submissions`.

use axum::routing::post;
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

/// ```text
/// POST /lookup -> lookup_submissions
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/lookup", post(submissions::lookup_submissions))
}
