use thiserror::Error;

/// A location string that cannot be decomposed into scheme, host, path and query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid location {input:?}: {reason}")]
pub struct InvalidLocationError {
    pub input: String,
    pub reason: InvalidLocationReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidLocationReason {
    #[error("{0}")]
    Unparseable(#[from] url::ParseError),
    #[error("not a hierarchical address")]
    NotHierarchical,
    #[error("path segment {0:?} is not valid percent-encoded UTF-8")]
    UndecodableSegment(String),
}

impl InvalidLocationError {
    pub fn new(input: impl Into<String>, reason: impl Into<InvalidLocationReason>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Non-fatal diagnostics raised while a session is being set up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationWarning {
    #[error("no starting location available, falling back to {sentinel}")]
    NoStartingLocation { sentinel: String },
    #[error("starting location is invalid ({error}), falling back to {sentinel}")]
    InvalidStartingLocation {
        error: InvalidLocationError,
        sentinel: String,
    },
}
