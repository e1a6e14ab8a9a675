use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key prefix under which accepted submissions are stored.
pub const FEEDBACK_KEY_PREFIX: &str = "feedback:";

/// A submission the server accepted, together with the acknowledgement it sent back.
///
/// Records are write-only from the server's point of view: they are handed to
/// the persistence service as an opaque JSON value and never read back by the
/// request path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub rating: u8,
    pub review: String,
    pub ai_response: String,
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    pub fn new(rating: u8, review: impl Into<String>, ai_response: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            rating,
            review: review.into(),
            ai_response: ai_response.into(),
            created_at: Utc::now(),
        }
    }

    pub fn storage_key(&self) -> String {
        format!("{}{}", FEEDBACK_KEY_PREFIX, self.id)
    }
}
