use axum::routing::post;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// Mounted at `/uploads`.
///
/// ```text
/// POST / -> upload_file
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(uploads::upload_file))
}
