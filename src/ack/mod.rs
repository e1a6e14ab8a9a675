//! Acknowledgement generation for accepted feedback.
//!
//! An [`Acknowledger`] turns a rating and review into the short message shown
//! to the user. It never fails: every implementation resolves to a non-empty
//! string, falling back to canned text when generation is unavailable.

mod gemini;

pub use gemini::{GeminiAcknowledger, GeminiConfig, GenerationError};

use async_trait::async_trait;

/// Used when the generation service answers without any usable text.
pub const DETAILED_FALLBACK: &str = "Thank you for your detailed feedback! \
    We appreciate you taking the time to share your experience with us.";

/// Used when the generation service cannot be reached or answers garbage.
pub const SHORT_FALLBACK: &str = "Thank you for your feedback. We appreciate your time.";

#[async_trait]
pub trait Acknowledger: Send + Sync {
    async fn acknowledge(&self, rating: u8, review: &str) -> String;
}

/// Canned, rating-aware acknowledgements for deployments without a generation key.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticAcknowledger;

#[async_trait]
impl Acknowledger for StaticAcknowledger {
    async fn acknowledge(&self, rating: u8, _review: &str) -> String {
        let stars = if rating == 1 { "star" } else { "stars" };
        let body = match rating {
            5 => {
                "We're thrilled you had such a great experience, \
                 and we'll share your kind words with the team."
            }
            4 => {
                "We're glad things went well, \
                 and we'll keep working to make the next visit even better."
            }
            3 => "We appreciate the honest feedback and will look at where we can do better.",
            _ => {
                "We're sorry we fell short, \
                 and we'll review your comments carefully to put things right."
            }
        };
        format!("Thank you for your {}-{} review! {}", rating, stars, body)
    }
}

/// Build the prompt sent to the generation service.
pub fn build_prompt(rating: u8, review: &str) -> String {
    format!(
        "You are a customer service AI. A user has submitted feedback with a {rating}-star \
         rating and the following review: \"{review}\".\n\
         \n\
         Generate a personalized, empathetic response that:\n\
         1. Thanks them for their feedback\n\
         2. Addresses their specific concerns or praise\n\
         3. Is warm and professional\n\
         4. Keeps the response concise (2-3 sentences)\n\
         \n\
         Respond directly without any preamble.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_mentions_rating_and_review() {
        let prompt = build_prompt(2, "Cold soup");
        assert!(prompt.contains("2-star rating"));
        assert!(prompt.contains("\"Cold soup\""));
        assert!(prompt.contains("2-3 sentences"));
    }

    #[test]
    fn detailed_fallback_reads_as_one_paragraph() {
        assert_eq!(
            DETAILED_FALLBACK,
            "Thank you for your detailed feedback! We appreciate you taking the time \
             to share your experience with us."
        );
        assert!(!DETAILED_FALLBACK.contains("  "));
    }

    #[tokio::test]
    async fn static_acknowledgement_is_never_empty() {
        let ack = StaticAcknowledger;
        for rating in 1..=5 {
            let text = ack.acknowledge(rating, "ok").await;
            assert!(!text.trim().is_empty());
            assert!(text.contains(&format!("{}-", rating)));
        }
    }

    #[tokio::test]
    async fn static_acknowledgement_uses_singular_for_one_star() {
        let text = StaticAcknowledger.acknowledge(1, "bad").await;
        assert!(text.starts_with("Thank you for your 1-star review!"));
    }
}
