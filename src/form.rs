//! Terminal rendering of the feedback form.
//!
//! Two screens: the input form (star rating + review) and the acknowledgement.
//! All state lives in the [`FeedbackWorkflow`]; this module only prompts,
//! forwards input, and prints whatever phase the workflow settled in.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::client::FeedbackBackend;
use crate::models::MAX_RATING;
use crate::workflow::{FeedbackWorkflow, SubmissionResult};

pub struct FeedbackForm<B, R, W> {
    workflow: FeedbackWorkflow<B>,
    input: R,
    output: W,
}

impl<B: FeedbackBackend, R: BufRead, W: Write> FeedbackForm<B, R, W> {
    pub fn new(workflow: FeedbackWorkflow<B>, input: R, output: W) -> Self {
        Self {
            workflow,
            input,
            output,
        }
    }

    /// Run until the user declines another review or input ends.
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Share Your Feedback")?;
        writeln!(
            self.output,
            "We value your opinion and want to hear about your experience"
        )?;

        loop {
            if !self.edit_draft()? {
                return Ok(());
            }

            match self.submit_until_settled().await? {
                Some(SubmissionResult::Succeeded { ai_response }) => {
                    writeln!(self.output)?;
                    writeln!(self.output, "Thank You for Your Feedback!")?;
                    writeln!(self.output, "{}", ai_response)?;
                    writeln!(self.output)?;

                    if !self.confirm("Submit another review? [y/N]: ", false)? {
                        writeln!(self.output, "Your feedback helps us improve our service")?;
                        return Ok(());
                    }
                    self.workflow.reset()?;
                }
                // Failed and not retried: back to editing with the draft intact.
                Some(SubmissionResult::Failed { .. }) => {}
                None => return Ok(()),
            }
        }
    }

    /// Prompt for rating and review. Blank answers keep the current draft values;
    /// a non-blank review is kept exactly as typed. Returns `false` when input ends.
    fn edit_draft(&mut self) -> Result<bool> {
        loop {
            let draft = self.workflow.draft();

            let rating = loop {
                let hint = if draft.rating > 0 {
                    format!(" [{}]", draft.rating)
                } else {
                    String::new()
                };
                let Some(line) = self.prompt(&format!(
                    "How would you rate your experience? (1-{}){}: ",
                    MAX_RATING, hint
                ))?
                else {
                    return Ok(false);
                };
                let line = line.trim();

                if line.is_empty() && draft.rating > 0 {
                    break draft.rating;
                }
                match line.parse::<u8>() {
                    Ok(r) if (1..=MAX_RATING).contains(&r) => break r,
                    _ => writeln!(self.output, "Please enter a number from 1 to {}", MAX_RATING)?,
                }
            };
            let stars = if rating == 1 { "star" } else { "stars" };
            writeln!(self.output, "You rated: {} {}", rating, stars)?;

            let hint = if draft.review_text.trim().is_empty() {
                String::new()
            } else {
                " [keep previous]".to_string()
            };
            let Some(line) = self.prompt(&format!(
                "Tell us more about your experience{}: ",
                hint
            ))?
            else {
                return Ok(false);
            };
            let review = if line.trim().is_empty() {
                draft.review_text
            } else {
                line
            };

            self.workflow.set_rating(rating)?;
            self.workflow.set_review(review)?;

            match self.workflow.draft().validate() {
                Ok(_) => return Ok(true),
                Err(e) => {
                    writeln!(self.output, "Please provide both a rating and review ({})", e)?;
                }
            }
        }
    }

    /// Submit, offering retries on failure. `None` when input ends.
    async fn submit_until_settled(&mut self) -> Result<Option<SubmissionResult>> {
        loop {
            writeln!(self.output, "Processing...")?;
            self.output.flush()?;

            let result = self.workflow.submit().await?;

            if result.is_success() {
                return Ok(Some(result));
            }
            if let SubmissionResult::Failed { reason } = &result {
                tracing::debug!("Submission failed: {}", reason);
            }

            writeln!(self.output, "Failed to submit feedback. Please try again.")?;
            match self.prompt("Retry with the same feedback? [Y/n]: ")? {
                None => return Ok(None),
                Some(answer) if is_no(&answer) => return Ok(Some(result)),
                Some(_) => {}
            }
        }
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        Ok(match self.prompt(question)? {
            None => false,
            Some(answer) if answer.trim().is_empty() => default,
            Some(answer) => is_yes(&answer),
        })
    }

    fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        Ok(Some(line.to_string()))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn is_no(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "n" | "no")
}
