//! Errors surfaced while parsing manifest text.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Reasons a document cannot be mapped to a manifest.
///
/// Every variant produced from text carries the 1-based line number of the
/// offending construct.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A code fence was opened and never closed.
    #[error("line {line}: code fence is never closed")]
    UnterminatedFence {
        /// Line of the opening fence.
        line: usize,
    },

    /// Headings are nested or repeated in a way the grammar does not allow.
    #[error("line {line}: malformed heading structure: {reason}")]
    HeadingNesting {
        /// Line of the offending heading.
        line: usize,
        /// Human-readable reason.
        reason: String,
    },

    /// A tool section contains a subsection the grammar does not know.
    #[error("line {line}: unrecognized subsection `{title}` in tool `{tool}`")]
    UnknownSubsection {
        /// Line of the subsection heading.
        line: usize,
        /// Tool the subsection belongs to.
        tool: String,
        /// Subsection title as written.
        title: String,
    },

    /// A parameter entry could not be read.
    #[error("line {line}: malformed parameter in tool `{tool}`: {reason}")]
    MalformedParam {
        /// Line of the parameter entry.
        line: usize,
        /// Tool the parameter belongs to.
        tool: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A compact `tool:` signature is not a well-formed call.
    #[error("line {line}: malformed tool signature `{signature}`: {reason}")]
    MalformedSignature {
        /// Line of the `tool:` declaration.
        line: usize,
        /// Signature text as written.
        signature: String,
        /// Human-readable reason.
        reason: String,
    },

    /// An indented compact field has no recognizable key.
    #[error("line {line}: unrecognized field `{key}` in tool `{tool}`")]
    UnknownField {
        /// Line of the field.
        line: usize,
        /// Tool the field belongs to.
        tool: String,
        /// Key or text as written.
        key: String,
    },

    /// A compact field appears twice in one tool.
    #[error("line {line}: field `{key}` repeated in tool `{tool}`")]
    DuplicateField {
        /// Line of the repeated field.
        line: usize,
        /// Tool the field belongs to.
        tool: String,
        /// Repeated key.
        key: String,
    },

    /// A compact `params` entry names a parameter missing from the signature.
    #[error("line {line}: parameter `{name}` is not declared in the signature of `{tool}`")]
    UnknownParameter {
        /// Line of the `params` entry.
        line: usize,
        /// Tool being parsed.
        tool: String,
        /// Undeclared parameter name.
        name: String,
    },

    /// Text sits where neither grammar allows free prose.
    #[error("line {line}: unexpected text `{text}`")]
    UnexpectedText {
        /// Line of the text.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },

    /// The manifest file could not be read.
    #[error("failed to read manifest {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Returns the line the error points at, when it came from text.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::UnterminatedFence { line }
            | Self::HeadingNesting { line, .. }
            | Self::UnknownSubsection { line, .. }
            | Self::MalformedParam { line, .. }
            | Self::MalformedSignature { line, .. }
            | Self::UnknownField { line, .. }
            | Self::DuplicateField { line, .. }
            | Self::UnknownParameter { line, .. }
            | Self::UnexpectedText { line, .. } => Some(*line),
            Self::Io { .. } => None,
        }
    }

    pub(crate) fn nesting(line: usize, reason: impl Into<String>) -> Self {
        Self::HeadingNesting {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn param(line: usize, tool: &str, reason: impl Into<String>) -> Self {
        Self::MalformedParam {
            line,
            tool: tool.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn signature(line: usize, signature: &str, reason: impl Into<String>) -> Self {
        Self::MalformedSignature {
            line,
            signature: signature.to_owned(),
            reason: reason.into(),
        }
    }
}
