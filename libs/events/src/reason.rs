//! Evaluation reasons: why a flag evaluation produced the value it did.

use serde::{Deserialize, Serialize};

/// The way an error prevented normal flag evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The client was not ready to evaluate flags.
    ClientNotReady,
    /// The requested flag does not exist.
    FlagNotFound,
    /// The flag configuration could not be interpreted.
    MalformedFlag,
    /// No user was supplied for the evaluation.
    UserNotSpecified,
    /// The computed value did not have the type the caller asked for.
    WrongType,
    /// An unexpected error stopped the evaluation.
    Exception,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::ClientNotReady => "client_not_ready",
            ErrorKind::FlagNotFound => "flag_not_found",
            ErrorKind::MalformedFlag => "malformed_flag",
            ErrorKind::UserNotSpecified => "user_not_specified",
            ErrorKind::WrongType => "wrong_type",
            ErrorKind::Exception => "exception",
        };
        write!(f, "{}", s)
    }
}

/// An explanation of how a flag evaluation arrived at its value.
///
/// Carried on feature-request events when the caller asked for reasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluationReason {
    /// The flag was off, so its off variation was served.
    Off,
    /// No target or rule matched, so the fallthrough variation was served.
    Fallthrough,
    /// The user key was individually targeted.
    TargetMatch,
    /// A targeting rule matched the user.
    RuleMatch { rule_index: usize, rule_id: String },
    /// A prerequisite flag failed, so the off variation was served.
    PrerequisiteFailed { prerequisite_key: String },
    /// Evaluation failed and the caller's default value was served.
    Error { error_kind: ErrorKind },
}

impl EvaluationReason {
    /// Returns true if the value was served because evaluation failed.
    pub fn is_error(&self) -> bool {
        matches!(self, EvaluationReason::Error { .. })
    }
}

impl std::fmt::Display for EvaluationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EvaluationReason::Off => "off",
            EvaluationReason::Fallthrough => "fallthrough",
            EvaluationReason::TargetMatch => "target_match",
            EvaluationReason::RuleMatch { .. } => "rule_match",
            EvaluationReason::PrerequisiteFailed { .. } => "prerequisite_failed",
            EvaluationReason::Error { .. } => "error",
        };
        write!(f, "{}", s)
    }
}
