//! Schedule error types.

use thiserror::Error;

/// Errors raised while parsing or evaluating a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The string matches neither the interval grammar nor a cron expression.
    #[error("invalid schedule '{input}': {reason}")]
    Syntax { input: String, reason: String },

    /// Mutually exclusive clauses were combined.
    #[error("ambiguous schedule '{input}': {reason}")]
    Ambiguous { input: String, reason: String },

    /// No representable occurrence exists after the anchor.
    #[error("no occurrence in range: {reason}")]
    OutOfRange { reason: String },
}

impl ScheduleError {
    pub(crate) fn syntax(input: &str, reason: impl Into<String>) -> Self {
        Self::Syntax {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn ambiguous(input: &str, reason: impl Into<String>) -> Self {
        Self::Ambiguous {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            reason: reason.into(),
        }
    }

    /// Whether this is a grammar rejection (syntax or ambiguity).
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::Syntax { .. } | Self::Ambiguous { .. })
    }
}
