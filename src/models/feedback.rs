use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest selectable star rating.
pub const MAX_RATING: u8 = 5;

/// The user's in-progress feedback: a star rating and a free-text review.
///
/// A rating of `0` means no star has been selected yet. The draft accepts any
/// value while it is being edited; [`FeedbackDraft::validate`] decides whether
/// it may be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackDraft {
    pub rating: u8,
    pub review_text: String,
}

impl FeedbackDraft {
    pub fn new(rating: u8, review_text: impl Into<String>) -> Self {
        Self {
            rating,
            review_text: review_text.into(),
        }
    }

    /// Check the draft is submittable and build the wire request from it.
    ///
    /// The review is sent as typed; trimming only decides emptiness.
    pub fn validate(&self) -> Result<FeedbackRequest, ValidationError> {
        validate_feedback(self.rating, &self.review_text)?;
        Ok(FeedbackRequest {
            rating: self.rating,
            review: self.review_text.clone(),
        })
    }

    /// True when the draft is back in its initial, empty state.
    pub fn is_empty(&self) -> bool {
        self.rating == 0 && self.review_text.is_empty()
    }
}

/// Why a draft cannot be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a rating between 1 and 5 stars")]
    RatingUnset,

    #[error("Rating {0} is out of range (1-5)")]
    RatingOutOfRange(u8),

    #[error("Please write a review before submitting")]
    EmptyReview,
}

/// Shared validation for the form and the endpoint.
pub fn validate_feedback(rating: u8, review: &str) -> Result<(), ValidationError> {
    match rating {
        0 => return Err(ValidationError::RatingUnset),
        r if r > MAX_RATING => return Err(ValidationError::RatingOutOfRange(r)),
        _ => {}
    }
    if review.trim().is_empty() {
        return Err(ValidationError::EmptyReview);
    }
    Ok(())
}

/// Body of `POST /api/feedback`. Field names are fixed by the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub rating: u8,
    pub review: String,
}

impl FeedbackRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_feedback(self.rating, &self.review)
    }
}

/// Successful response of `POST /api/feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    #[serde(rename = "aiResponse")]
    pub ai_response: String,
}
