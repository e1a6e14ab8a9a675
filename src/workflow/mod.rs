//! Feedback submission workflow.
//!
//! Owns one form's transient state (the draft and the [`SubmissionPhase`]),
//! validates before any network activity, sends exactly one request per
//! accepted `submit`, and always settles out of `Submitting`.
//!
//! The form state lives behind a mutex so clones of a workflow can be driven
//! from several tasks. The lock is never held across the network await; the
//! guard against double submission is the phase check in `submit` itself.

mod state;

pub use state::*;

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;

use crate::client::FeedbackBackend;
use crate::models::{FeedbackDraft, FeedbackRequest, ValidationError};

/// Reasons a workflow operation was refused before doing anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A submission is already in progress")]
    Busy,

    #[error("Feedback was already submitted; reset the form to submit again")]
    AlreadySubmitted,
}

#[derive(Debug, Default)]
struct FormState {
    draft: FeedbackDraft,
    phase: SubmissionPhase,
}

pub struct FeedbackWorkflow<B> {
    backend: Arc<B>,
    form: Arc<Mutex<FormState>>,
}

impl<B> Clone for FeedbackWorkflow<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            form: self.form.clone(),
        }
    }
}

impl<B: FeedbackBackend> FeedbackWorkflow<B> {
    pub fn new(backend: B) -> Self {
        Self::with_shared_backend(Arc::new(backend))
    }

    pub fn with_shared_backend(backend: Arc<B>) -> Self {
        Self {
            backend,
            form: Arc::new(Mutex::new(FormState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.form.lock().expect("form state lock poisoned")
    }

    pub fn draft(&self) -> FeedbackDraft {
        self.lock().draft.clone()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.lock().phase.clone()
    }

    pub fn ai_response_text(&self) -> String {
        self.lock().phase.ai_response_text().to_string()
    }

    pub fn set_rating(&self, rating: u8) -> Result<(), WorkflowError> {
        let mut form = self.lock();
        ensure_editable(&form.phase)?;
        form.draft.rating = rating;
        Ok(())
    }

    pub fn set_review(&self, review: impl Into<String>) -> Result<(), WorkflowError> {
        let mut form = self.lock();
        ensure_editable(&form.phase)?;
        form.draft.review_text = review.into();
        Ok(())
    }

    /// Submit the current draft.
    ///
    /// Refusals (`Busy`, `AlreadySubmitted`, validation) are returned before
    /// any request is made and leave the phase untouched. Once the request is
    /// issued every outcome, including transport and malformed-response
    /// failures, comes back as `Ok`.
    pub async fn submit(&self) -> Result<SubmissionResult, WorkflowError> {
        let request = self.begin()?;
        let in_flight = InFlight {
            form: &self.form,
            settled: false,
        };

        tracing::debug!(rating = request.rating, "Submitting feedback");

        let result = match self.backend.send(&request).await {
            Ok(response) if !response.ai_response.trim().is_empty() => {
                tracing::info!(rating = request.rating, "Feedback submitted");
                SubmissionResult::Succeeded {
                    ai_response: response.ai_response,
                }
            }
            Ok(_) => {
                tracing::warn!("Feedback endpoint returned an empty aiResponse");
                SubmissionResult::Failed {
                    reason: FailureReason::MalformedResponse("empty aiResponse".to_string()),
                }
            }
            Err(e) => {
                tracing::warn!("Submission error: {}", e);
                SubmissionResult::Failed { reason: e.into() }
            }
        };

        in_flight.settle(result.clone());
        Ok(result)
    }

    /// Validate and move to `Submitting` under a single lock.
    fn begin(&self) -> Result<FeedbackRequest, WorkflowError> {
        let mut form = self.lock();
        match form.phase {
            SubmissionPhase::Submitting => return Err(WorkflowError::Busy),
            SubmissionPhase::Succeeded { .. } => return Err(WorkflowError::AlreadySubmitted),
            SubmissionPhase::Idle | SubmissionPhase::Failed { .. } => {}
        }
        let request = form.draft.validate()?;
        form.phase = SubmissionPhase::Submitting;
        Ok(request)
    }

    /// Clear the draft and response and return to `Idle`.
    ///
    /// Refused while a submission is in flight.
    pub fn reset(&self) -> Result<(), WorkflowError> {
        let mut form = self.lock();
        if form.phase.is_submitting() {
            return Err(WorkflowError::Busy);
        }
        tracing::debug!(from = form.phase.as_str(), "Resetting feedback form");
        *form = FormState::default();
        Ok(())
    }
}

fn ensure_editable(phase: &SubmissionPhase) -> Result<(), WorkflowError> {
    match phase {
        SubmissionPhase::Submitting => Err(WorkflowError::Busy),
        SubmissionPhase::Succeeded { .. } => Err(WorkflowError::AlreadySubmitted),
        SubmissionPhase::Idle | SubmissionPhase::Failed { .. } => Ok(()),
    }
}

/// Leaves `Submitting` exactly once: through `settle`, or as `Cancelled`
/// when the submit future is dropped mid-flight.
struct InFlight<'a> {
    form: &'a Mutex<FormState>,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, result: SubmissionResult) {
        self.settled = true;
        let mut form = self.form.lock().unwrap_or_else(|p| p.into_inner());
        form.phase = result.into_phase();
        tracing::debug!(phase = form.phase.as_str(), "Submission settled");
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::warn!("Feedback submission dropped before it settled");
        let mut form = self.form.lock().unwrap_or_else(|p| p.into_inner());
        form.phase = SubmissionPhase::Failed {
            reason: FailureReason::Cancelled,
        };
    }
}
