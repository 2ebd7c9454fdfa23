//! Create-or-resume flow for submissions, on top of a [`FormStore`].

use chrono::Utc;

use crate::assembler::{hydrate, unknown_question_ids};
use crate::error::CoreError;
use crate::identity::{hash_pin, SubmissionIdentity};
use crate::schema::FormSchema;
use crate::store::FormStore;
use crate::submission::{NewSubmission, Submission, SubmissionPayload, SubmissionUpdate};
use crate::types::DbId;

pub const PIN_MISMATCH_MESSAGE: &str = "비밀번호가 일치하지 않습니다.";

/// Find the caller's existing submission for a portfolio.
///
/// No row for the company is the normal "new submission" path and returns
/// `Ok(None)`. A row whose PIN does not match is `Unauthorized`.
pub async fn check_existing(
    store: &dyn FormStore,
    portfolio_id: DbId,
    identity: &SubmissionIdentity,
) -> Result<Option<Submission>, CoreError> {
    let Some(existing) = store
        .find_submission(portfolio_id, identity.company_name())
        .await?
    else {
        return Ok(None);
    };
    if !identity.matches(&existing.pin_hash)? {
        return Err(CoreError::Unauthorized(PIN_MISMATCH_MESSAGE.to_string()));
    }
    Ok(Some(existing))
}

/// Persist `payload` for `identity`, updating in place when a submission
/// already exists.
///
/// A concurrent first save for the same company loses the insert race on
/// the unique constraint; it then re-reads the winner and updates it if the
/// PIN matches. `completed_at` is stamped on every final submit and kept as
/// is on draft saves.
pub async fn create_or_update(
    store: &dyn FormStore,
    schema: &FormSchema,
    identity: &SubmissionIdentity,
    payload: SubmissionPayload,
    ip_address: Option<String>,
) -> Result<Submission, CoreError> {
    let responses = serde_json::Value::Object(payload.responses);
    let state = hydrate(&responses)?;
    let unknown = unknown_question_ids(&state, schema);
    if !unknown.is_empty() {
        return Err(CoreError::Validation(format!(
            "Unknown question ids in responses: {unknown:?}"
        )));
    }

    let portfolio_id = schema.portfolio().id;
    if let Some(existing) = check_existing(store, portfolio_id, identity).await? {
        let update = build_update(&existing, responses, payload.is_draft, ip_address);
        return store.update_submission(existing.id, update).await;
    }

    let input = NewSubmission {
        portfolio_id,
        company_name: identity.company_name().to_string(),
        pin_hash: hash_pin(identity.pin())?,
        responses: responses.clone(),
        is_draft: payload.is_draft,
        completed_at: (!payload.is_draft).then(Utc::now),
        ip_address: ip_address.clone(),
    };
    match store.create_submission(input).await {
        Err(CoreError::Conflict(_)) => {
            let winner = check_existing(store, portfolio_id, identity)
                .await?
                .ok_or_else(|| {
                    CoreError::Internal("submission vanished after insert conflict".to_string())
                })?;
            let update = build_update(&winner, responses, payload.is_draft, ip_address);
            store.update_submission(winner.id, update).await
        }
        other => other,
    }
}

fn build_update(
    existing: &Submission,
    responses: serde_json::Value,
    is_draft: bool,
    ip_address: Option<String>,
) -> SubmissionUpdate {
    SubmissionUpdate {
        responses,
        is_draft,
        completed_at: if is_draft {
            existing.completed_at
        } else {
            Some(Utc::now())
        },
        ip_address: ip_address.or_else(|| existing.ip_address.clone()),
    }
}

/// Every submission of `identity` across portfolios whose PIN matches.
pub async fn lookup_by_identity(
    store: &dyn FormStore,
    identity: &SubmissionIdentity,
) -> Result<Vec<Submission>, CoreError> {
    let candidates = store
        .list_submissions_by_company(identity.company_name())
        .await?;
    let mut matched = Vec::with_capacity(candidates.len());
    for submission in candidates {
        if identity.matches(&submission.pin_hash)? {
            matched.push(submission);
        }
    }
    Ok(matched)
}
