//! Handlers for the public form: portfolio listing, form definitions, and
//! server-side step validation.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use folio_core::assembler::hydrate;
use folio_core::error::CoreError;
use folio_core::navigator::{StepNavigator, StepPosition};
use folio_core::options::ParsedOptions;
use folio_core::schema::{ConfigurationIssue, FormSchema, Portfolio, Question};
use folio_core::validator::{validate_step as validate_step_answers, ErrorMap};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load an active portfolio and its questions.
pub(crate) async fn load_form_schema(state: &AppState, slug: &str) -> AppResult<FormSchema> {
    let portfolio = load_active_portfolio(state, slug).await?;
    let questions = state.store.list_questions(portfolio.id).await?;
    Ok(FormSchema::new(portfolio, questions))
}

/// Inactive portfolios are not found on the public surface.
pub(crate) async fn load_active_portfolio(state: &AppState, slug: &str) -> AppResult<Portfolio> {
    let portfolio = state
        .store
        .find_portfolio_by_slug(slug)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| CoreError::not_found("portfolio", slug))?;
    Ok(portfolio)
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// GET /api/v1/portfolios
pub async fn list_portfolios(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let portfolios = state.store.list_active_portfolios().await?;
    Ok(Json(DataResponse { data: portfolios }))
}

// ---------------------------------------------------------------------------
// Form definition
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct QuestionView<'a> {
    #[serde(flatten)]
    pub question: &'a Question,
    /// Present for checkbox and repeatable questions only.
    pub parsed_options: Option<&'a ParsedOptions>,
}

#[derive(Debug, Serialize)]
pub struct FormDefinition<'a> {
    pub portfolio: &'a Portfolio,
    pub questions: Vec<QuestionView<'a>>,
    pub steps: Vec<i32>,
    /// `false` when the portfolio has no questions and cannot be filled out.
    pub is_configured: bool,
    /// Starting position; absent when not configured.
    pub position: Option<StepPosition>,
    pub configuration_issues: Vec<ConfigurationIssue>,
}

/// GET /api/v1/portfolios/{slug}
///
/// Everything the client needs to render the stepped form.
pub async fn get_form_definition(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let schema = load_form_schema(&state, &slug).await?;

    let configuration_issues = schema.configuration_issues();
    if !configuration_issues.is_empty() {
        tracing::warn!(
            portfolio = %slug,
            issues = configuration_issues.len(),
            "Portfolio has questions with unusable options",
        );
    }

    let questions = schema
        .questions()
        .iter()
        .map(|question| QuestionView {
            question,
            parsed_options: question
                .question_type
                .uses_options()
                .then(|| schema.options(question.id))
                .flatten(),
        })
        .collect();

    let definition = FormDefinition {
        portfolio: schema.portfolio(),
        questions,
        steps: schema.steps(),
        is_configured: !schema.is_empty(),
        position: StepNavigator::new(&schema).ok().map(|n| n.position()),
        configuration_issues,
    };

    Ok(Json(DataResponse { data: definition }).into_response())
}

// ---------------------------------------------------------------------------
// Step validation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct StepValidationRequest {
    pub step: i32,
    #[serde(default)]
    pub responses: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct StepValidation {
    pub valid: bool,
    pub errors: ErrorMap,
    /// Position after the attempt: advanced on success, unchanged otherwise.
    pub position: StepPosition,
}

/// POST /api/v1/portfolios/{slug}/steps/validate
///
/// Validate the questions of `step` against `responses`. Before the last
/// step a valid result also advances the returned position; the last step
/// is validated in place.
pub async fn validate_step(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<StepValidationRequest>,
) -> AppResult<impl IntoResponse> {
    let schema = load_form_schema(&state, &slug).await?;
    let mut navigator = StepNavigator::new(&schema)?;
    navigator.jump_to(input.step);

    let mut form = hydrate(&Value::Object(input.responses))?;
    let errors = if navigator.is_last_step() {
        validate_step_answers(&schema, navigator.current_step(), &form)
    } else {
        navigator.next(&schema, &mut form).err().unwrap_or_default()
    };

    Ok(Json(DataResponse {
        data: StepValidation {
            valid: errors.is_empty(),
            errors,
            position: navigator.position(),
        },
    }))
}
