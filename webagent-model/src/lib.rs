//! Shared vocabulary for webagents.md manifests.
//!
//! A [`Manifest`] is what the parser produces and what the validator, the
//! code generator and the serializer consume. All types are plain data with
//! public fields; the builders exist for ergonomic construction, not to guard
//! invariants. Strictness lives in the validator.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod manifest;
mod param;
mod tool;

/// Error type and result alias for model construction.
pub use error::{ModelError, ModelResult};
/// Whole-document model and its builder.
pub use manifest::{ContentSection, Manifest, ManifestBuilder};
/// Single tool argument.
pub use param::Param;
/// Callable tool declaration and its builder.
pub use tool::{Tool, ToolBuilder};

/// Returns `true` when `name` can be used as a bare function-call name.
///
/// Accepts ASCII letters, digits, `_` and `$`, not starting with a digit.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::is_identifier;

    #[test]
    fn identifiers() {
        assert!(is_identifier("searchProducts"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("$el2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("search products"));
        assert!(!is_identifier("add-to-cart"));
    }
}
