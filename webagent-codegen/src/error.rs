//! Errors raised when a manifest lacks fields the generator cannot guess.

use thiserror::Error;

/// Result alias for generation.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Structural problems that prevent generating declarations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// A tool has an empty or blank name.
    #[error("tool at index {index} has an empty name")]
    EmptyToolName {
        /// Position of the tool in the manifest.
        index: usize,
    },

    /// A parameter has an empty or blank name.
    #[error("parameter at index {index} of tool `{tool}` has an empty name")]
    EmptyParamName {
        /// Tool the parameter belongs to.
        tool: String,
        /// Position of the parameter in the tool.
        index: usize,
    },
}
