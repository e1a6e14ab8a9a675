//! Domain models for feedback-desk.
//!
//! # Core Concepts
//!
//! - [`FeedbackDraft`]: The form contents while the user is editing (rating + review).
//! - [`FeedbackRequest`] / [`FeedbackResponse`]: The `POST /api/feedback` wire contract.
//! - [`FeedbackRecord`]: What the server durably stores for each accepted submission.

mod feedback;
mod record;

pub use feedback::*;
pub use record::*;
