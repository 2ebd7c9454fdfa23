pub mod export;
pub mod health;
pub mod portfolios;
pub mod submissions;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /portfolios                                      list active (public)
/// /portfolios/{slug}                               form definition
/// /portfolios/{slug}/steps/validate                validate one step (POST)
/// /portfolios/{slug}/submissions                   save draft or final (POST)
/// /portfolios/{slug}/submissions/check             resume lookup (POST)
///
/// /submissions/lookup                              my submissions (POST)
///
/// /uploads                                         multipart file upload (POST)
///
/// /admin/portfolios/{slug}/export                  CSV export (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/portfolios", portfolios::router())
        .nest("/submissions", submissions::router())
        .nest("/uploads", uploads::router())
        .nest("/admin/portfolios", export::router())
}
