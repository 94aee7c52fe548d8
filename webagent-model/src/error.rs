//! Errors raised while constructing model values through the builders.

use thiserror::Error;

/// Result alias used by the model builders.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while building manifest types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A tool or manifest name was empty or blank.
    #[error("invalid {kind} name `{name}`: {reason}")]
    InvalidName {
        /// What was being named (`tool`, `parameter`).
        kind: &'static str,
        /// The offending name.
        name: String,
        /// Human-readable reason for rejection.
        reason: String,
    },
}

impl ModelError {
    pub(crate) fn blank(kind: &'static str, name: &str) -> Self {
        Self::InvalidName {
            kind,
            name: name.to_owned(),
            reason: "name cannot be empty".into(),
        }
    }
}
