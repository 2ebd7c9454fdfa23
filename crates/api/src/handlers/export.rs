//! Admin CSV export of final submissions.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use folio_core::error::CoreError;
use folio_core::export::project;
use folio_core::schema::FormSchema;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/v1/admin/portfolios/{slug}/export
///
/// One row per final submission, newest first, with question columns
/// followed by one column group per collection entry. Inactive portfolios
/// can still be exported. 404 when nothing has been submitted.
pub async fn export_submissions(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let portfolio = state
        .store
        .find_portfolio_by_slug(&slug)
        .await?
        .ok_or_else(|| CoreError::not_found("portfolio", &slug))?;
    let questions = state.store.list_questions(portfolio.id).await?;
    let submissions = state.store.list_completed_submissions(portfolio.id).await?;
    let schema = FormSchema::new(portfolio, questions);

    let table = project(&schema, &submissions);
    if table.is_empty() {
        return Err(CoreError::not_found("submissions", &slug).into());
    }
    let csv = table.to_csv()?;

    tracing::info!(
        admin_id = admin.user_id,
        portfolio = %slug,
        rows = table.rows.len(),
        columns = table.headers.len(),
        "Submissions exported",
    );

    let file_name = format!(
        "{slug}_submissions_{}.csv",
        chrono::Utc::now().format("%Y%m%d")
    );
    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        csv,
    ))
}
