use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the assistant core.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("unknown specialty: {0}")]
    UnknownSpecialty(String),

    #[error("doctor '{0}' is not listed under the selected specialty")]
    UnknownDoctor(String),

    #[error("time slot '{0}' is not offered by the selected doctor")]
    UnknownTimeSlot(String),

    /// An out-of-order booking wizard transition.
    #[error("invalid booking transition: {action} requires {required}")]
    InvalidTransition {
        action: &'static str,
        required: &'static str,
    },

    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// PDF open/parse failure. The message keeps the historical
    /// "Error reading PDF: " prefix that clients render verbatim.
    #[error("Error reading PDF: {0}")]
    PdfRead(String),

    #[error("completion request failed: {0}")]
    Completion(String),

    #[error("completion request timed out after {0:?}")]
    CompletionTimeout(Duration),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AssistantError>;
