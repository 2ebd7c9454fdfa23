//! Handlers for saving, resuming, and looking up submissions.
//!
//! Callers identify themselves with a company name and a 4-digit PIN; there
//! is no account. Drafts are stored as sent, final submits are validated
//! across every step first.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use folio_core::assembler::{hydrate, serialize};
use folio_core::identity::SubmissionIdentity;
use folio_core::intake;
use folio_core::navigator::StepNavigator;
use folio_core::submission::{Submission, SubmissionPayload};
use folio_core::validator::validate_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::portfolios::{load_active_portfolio, load_form_schema};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRequest {
    pub company_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSubmissionRequest {
    pub company_name: String,
    pub password: String,
    #[serde(default)]
    pub responses: Map<String, Value>,
    pub is_draft: bool,
}

/// First address in `x-forwarded-for`, else `x-real-ip`.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    forwarded.or_else(real_ip).map(str::to_string)
}

// ---------------------------------------------------------------------------
// Resume check
// ---------------------------------------------------------------------------

/// POST /api/v1/portfolios/{slug}/submissions/check
///
/// Returns the caller's saved submission, or `null` when the company has
/// none yet. A PIN mismatch is 401.
pub async fn check_submission(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<IdentityRequest>,
) -> AppResult<impl IntoResponse> {
    let portfolio = load_active_portfolio(&state, &slug).await?;
    let identity = SubmissionIdentity::new(&input.company_name, &input.password)?;

    let existing = intake::check_existing(state.store.as_ref(), portfolio.id, &identity).await?;

    Ok(Json(DataResponse { data: existing }))
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// POST /api/v1/portfolios/{slug}/submissions
///
/// Create or update the caller's submission. A final submit with missing
/// answers is rejected with 422 and the per-question errors.
pub async fn save_submission(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Json(input): Json<SaveSubmissionRequest>,
) -> AppResult<impl IntoResponse> {
    let schema = load_form_schema(&state, &slug).await?;
    let navigator = StepNavigator::new(&schema)?;
    let identity = SubmissionIdentity::new(&input.company_name, &input.password)?;

    let form = hydrate(&Value::Object(input.responses))?;
    let payload = if input.is_draft {
        navigator.save_draft(&form)
    } else {
        let errors = validate_all(&schema, &form);
        if !errors.is_empty() {
            tracing::debug!(
                portfolio = %slug,
                invalid_fields = errors.len(),
                "Final submit rejected",
            );
            return Err(AppError::InvalidForm(errors));
        }
        SubmissionPayload {
            responses: serialize(&form),
            is_draft: false,
        }
    };

    let submission = intake::create_or_update(
        state.store.as_ref(),
        &schema,
        &identity,
        payload,
        client_ip(&headers),
    )
    .await?;

    tracing::info!(
        submission_id = submission.id,
        portfolio = %slug,
        is_draft = submission.is_draft,
        "Submission saved",
    );

    Ok(Json(DataResponse { data: submission }))
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PortfolioRef {
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct LookupEntry {
    #[serde(flatten)]
    pub submission: Submission,
    /// `None` when the portfolio has since been deactivated.
    pub portfolio: Option<PortfolioRef>,
}

/// POST /api/v1/submissions/lookup
///
/// Every submission of the caller across portfolios. Rows whose PIN does
/// not match are left out rather than reported.
pub async fn lookup_submissions(
    State(state): State<AppState>,
    Json(input): Json<IdentityRequest>,
) -> AppResult<impl IntoResponse> {
    let identity = SubmissionIdentity::new(&input.company_name, &input.password)?;

    let submissions = intake::lookup_by_identity(state.store.as_ref(), &identity).await?;
    let portfolios = state.store.list_active_portfolios().await?;

    let entries: Vec<LookupEntry> = submissions
        .into_iter()
        .map(|submission| {
            let portfolio = portfolios
                .iter()
                .find(|p| p.id == submission.portfolio_id)
                .map(|p| PortfolioRef {
                    slug: p.slug.clone(),
                    title: p.title.clone(),
                });
            LookupEntry {
                submission,
                portfolio,
            }
        })
        .collect();

    tracing::info!(matches = entries.len(), "Submission lookup");

    Ok(Json(DataResponse { data: entries }))
}
