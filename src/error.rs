//! Error types for the pose result pipeline.

use std::fmt;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PoseError>;

/// Fieldless error classification, for callers that branch on the kind of failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    MalformedResult,
    Busy,
    Config,
    Io,
}

/// Main error type for the pipeline.
#[derive(Debug)]
pub enum PoseError {
    /// Bad input rejected before dispatch (wrong extension, missing file name).
    Validation(String),
    /// Backend unreachable or answered with a non-success status.
    Transport(String),
    /// Backend answered, but the body does not match the expected shape.
    MalformedResult(String),
    /// A request is already in flight.
    Busy,
    /// Invalid configuration or archetype table.
    Config(String),
    /// Wrapped `std::io::Error`.
    Io(std::io::Error),
}

impl PoseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
            Self::MalformedResult(_) => ErrorKind::MalformedResult,
            Self::Busy => ErrorKind::Busy,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Transport and malformed-result failures are displayed the same way.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::MalformedResult(_))
    }
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::MalformedResult(msg) => write!(f, "malformed result: {msg}"),
            Self::Busy => write!(f, "a prediction is already in progress"),
            Self::Config(msg) => write!(f, "config error: {msg}"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for PoseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PoseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for PoseError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResult(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PoseError::Validation("expected a .csv file".to_string());
        assert_eq!(err.to_string(), "validation error: expected a .csv file");

        let err = PoseError::Transport("HTTP 500".to_string());
        assert_eq!(err.to_string(), "transport error: HTTP 500");
    }

    #[test]
    fn malformed_results_display_like_transport() {
        assert!(PoseError::Transport("down".into()).is_transport());
        assert!(PoseError::MalformedResult("bad".into()).is_transport());
        assert!(!PoseError::Validation("bad".into()).is_transport());
        assert!(!PoseError::Busy.is_transport());
    }

    #[test]
    fn json_errors_are_malformed_results() {
        let err: PoseError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::MalformedResult);
    }
}
