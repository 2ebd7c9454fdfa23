//! Step navigation over the steps present in a portfolio.
//!
//! The navigator owns only the current step. Answers and errors live in the
//! caller's [`FormState`]; forward moves validate the current step and write
//! the resulting error map into that state.

use serde::Serialize;

use crate::assembler::serialize;
use crate::error::CoreError;
use crate::form_state::FormState;
use crate::schema::{FormSchema, Question};
use crate::submission::SubmissionPayload;
use crate::validator::{validate_step, ErrorMap};

/// Why a final submit was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// Final submit is only offered on the last step.
    NotLastStep,
    /// The last step has validation errors; they are also in the state.
    Invalid(ErrorMap),
}

/// Snapshot of navigator position for clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepPosition {
    pub current_step: i32,
    pub min_step: i32,
    pub max_step: i32,
    pub is_first_step: bool,
    pub is_last_step: bool,
    pub progress_percent: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepNavigator {
    current: i32,
    min: i32,
    max: i32,
}

impl StepNavigator {
    /// Start at the smallest step of `schema`.
    ///
    /// A portfolio without questions cannot be navigated.
    pub fn new(schema: &FormSchema) -> Result<Self, CoreError> {
        let (min, max) = schema.step_range().ok_or_else(|| {
            CoreError::NotConfigured(format!(
                "Portfolio '{}' has no questions",
                schema.portfolio().slug
            ))
        })?;
        Ok(Self {
            current: min,
            min,
            max,
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn current_step(&self) -> i32 {
        self.current
    }

    pub fn min_step(&self) -> i32 {
        self.min
    }

    pub fn max_step(&self) -> i32 {
        self.max
    }

    pub fn is_first_step(&self) -> bool {
        self.current == self.min
    }

    pub fn is_last_step(&self) -> bool {
        self.current == self.max
    }

    /// `(current - min + 1) / (max - min + 1)` rounded to the nearest whole
    /// percentage, halves up.
    pub fn progress_percent(&self) -> u8 {
        if self.min == self.max {
            return 100;
        }
        let done = i64::from(self.current - self.min + 1);
        let total = i64::from(self.max - self.min + 1);
        ((done * 200 + total) / (total * 2)) as u8
    }

    /// Questions shown on the current step. Empty for a gap in the steps.
    pub fn visible_questions<'a>(&self, schema: &'a FormSchema) -> Vec<&'a Question> {
        schema.questions_in_step(self.current).collect()
    }

    pub fn position(&self) -> StepPosition {
        StepPosition {
            current_step: self.current,
            min_step: self.min,
            max_step: self.max,
            is_first_step: self.is_first_step(),
            is_last_step: self.is_last_step(),
            progress_percent: self.progress_percent(),
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Validate the current step and advance by one on success.
    ///
    /// The error map is written into `state` either way. On the last step
    /// this does nothing and returns the current step.
    pub fn next(&mut self, schema: &FormSchema, state: &mut FormState) -> Result<i32, ErrorMap> {
        if self.is_last_step() {
            return Ok(self.current);
        }
        let errors = validate_step(schema, self.current, state);
        state.set_errors(errors.clone());
        if !errors.is_empty() {
            return Err(errors);
        }
        self.current += 1;
        Ok(self.current)
    }

    /// Move back one step. Never validates.
    pub fn previous(&mut self) -> i32 {
        if !self.is_first_step() {
            self.current -= 1;
        }
        self.current
    }

    /// Resume at `step`, clamped into the step range.
    pub fn jump_to(&mut self, step: i32) -> i32 {
        self.current = step.clamp(self.min, self.max);
        self.current
    }

    /// Snapshot the answers as a draft. Legal on any step.
    pub fn save_draft(&self, state: &FormState) -> SubmissionPayload {
        SubmissionPayload {
            responses: serialize(state),
            is_draft: true,
        }
    }

    /// Validate the last step and produce the final payload.
    pub fn submit_final(
        &self,
        schema: &FormSchema,
        state: &mut FormState,
    ) -> Result<SubmissionPayload, SubmitError> {
        if !self.is_last_step() {
            return Err(SubmitError::NotLastStep);
        }
        let errors = validate_step(schema, self.current, state);
        state.set_errors(errors.clone());
        if !errors.is_empty() {
            return Err(SubmitError::Invalid(errors));
        }
        Ok(SubmissionPayload {
            responses: serialize(state),
            is_draft: false,
        })
    }
}
