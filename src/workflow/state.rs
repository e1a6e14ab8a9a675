use crate::client::BackendError;

/// Where a form instance is in its submission lifecycle.
///
/// ```text
/// Idle ──submit──▶ Submitting ──▶ Succeeded ──reset──▶ Idle
///                      │
///                      └────────▶ Failed ──submit──▶ Submitting
///                                   └─────reset──▶ Idle
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded { ai_response: String },
    Failed { reason: FailureReason },
}

impl SubmissionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// The acknowledgement text, empty unless the submission succeeded.
    pub fn ai_response_text(&self) -> &str {
        match self {
            Self::Succeeded { ai_response } => ai_response,
            Self::Idle | Self::Submitting | Self::Failed { .. } => "",
        }
    }
}

/// Why a submission ended in [`SubmissionPhase::Failed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Connection failure, timeout or non-success status.
    Transport(String),
    /// A response arrived without a usable `aiResponse`.
    MalformedResponse(String),
    /// The in-flight submission was dropped before it settled.
    Cancelled,
}

impl From<BackendError> for FailureReason {
    fn from(e: BackendError) -> Self {
        if e.is_malformed() {
            Self::MalformedResponse(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::MalformedResponse(msg) => write!(f, "malformed response: {}", msg),
            Self::Cancelled => write!(f, "submission cancelled"),
        }
    }
}

/// How a `submit` call settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Succeeded { ai_response: String },
    Failed { reason: FailureReason },
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    pub(crate) fn into_phase(self) -> SubmissionPhase {
        match self {
            Self::Succeeded { ai_response } => SubmissionPhase::Succeeded { ai_response },
            Self::Failed { reason } => SubmissionPhase::Failed { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn response_text_only_exists_on_success() {
        let phases = [
            SubmissionPhase::Idle,
            SubmissionPhase::Submitting,
            SubmissionPhase::Failed {
                reason: FailureReason::Cancelled,
            },
        ];
        for phase in phases {
            assert_eq!(phase.ai_response_text(), "");
        }

        let done = SubmissionPhase::Succeeded {
            ai_response: "Thanks".to_string(),
        };
        assert_eq!(done.ai_response_text(), "Thanks");
    }

    #[test]
    fn only_submitting_is_in_flight() {
        let failed = SubmissionPhase::Failed {
            reason: FailureReason::Cancelled,
        };
        assert!(SubmissionPhase::Submitting.is_submitting());
        assert!(!SubmissionPhase::Idle.is_submitting());
        assert!(!failed.is_submitting());

        assert_eq!(SubmissionPhase::Idle.as_str(), "idle");
        assert_eq!(SubmissionPhase::Submitting.as_str(), "submitting");
        assert_eq!(failed.as_str(), "failed");
        assert_eq!(
            SubmissionPhase::Succeeded {
                ai_response: "Thanks".to_string()
            }
            .as_str(),
            "succeeded"
        );
    }

    #[test]
    fn backend_errors_map_to_failure_kinds() {
        let malformed: FailureReason = BackendError::Malformed("missing field".into()).into();
        assert!(matches!(malformed, FailureReason::MalformedResponse(_)));

        let timeout: FailureReason = BackendError::Timeout(Duration::from_secs(1)).into();
        assert!(matches!(timeout, FailureReason::Transport(_)));
    }
}
