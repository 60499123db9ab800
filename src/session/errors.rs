use super::{
    credentials::{MissingFieldError, ValidationErrors},
    tokens::StorageError,
};
use thiserror::Error;

/// Outcome class of a failed submission, kept by `SubmissionState::Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    LoginFailed,
    ResponseParse,
    Validation,
    Storage,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// No response: connection refused, DNS failure, timeout.
    #[error("network error: {0}")]
    Network(String),
    /// A response arrived with a non-2xx status.
    #[error("login failed ({status}): {status_text}")]
    LoginFailed { status: u16, status_text: String },
    /// The success body was not JSON or lacked a usable `jwt`/`refresh`.
    #[error("unexpected login response: {0}")]
    ResponseParse(String),
    #[error("a login request is already in progress")]
    InProgress,
    #[error(transparent)]
    MissingField(#[from] MissingFieldError),
    #[error("invalid credentials: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("failed to store session: {0}")]
    Storage(#[from] StorageError),
}

impl SubmitError {
    /// `None` for `InProgress`, which leaves the pending submission's state alone.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Network(_) => Some(ErrorKind::Network),
            Self::LoginFailed { .. } => Some(ErrorKind::LoginFailed),
            Self::ResponseParse(_) => Some(ErrorKind::ResponseParse),
            Self::InProgress => None,
            Self::MissingField(_) | Self::Invalid(_) => Some(ErrorKind::Validation),
            Self::Storage(_) => Some(ErrorKind::Storage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_failed_carries_status_text() {
        let err = SubmitError::LoginFailed {
            status: 401,
            status_text: "Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "login failed (401): Unauthorized");
        assert_eq!(err.kind(), Some(ErrorKind::LoginFailed));
    }

    #[test]
    fn in_progress_has_no_failure_kind() {
        assert_eq!(SubmitError::InProgress.kind(), None);
    }

    #[test]
    fn missing_field_is_a_validation_failure() {
        let err = SubmitError::from(MissingFieldError("password"));
        assert_eq!(err.kind(), Some(ErrorKind::Validation));
        assert_eq!(err.to_string(), "snapshot has no `password` field");
    }
}
