//! Admin export routes, mounted at `/admin/portfolios`.

use axum::routing::get;
use axum::Router;

use crate::handlers::export;
use crate::state::AppState;

/// ```text
/// GET /{slug}/export -> export_submissions
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{slug}/export", get(export::export_submissions))
}
