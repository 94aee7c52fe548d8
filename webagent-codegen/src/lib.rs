//! Projections of a manifest into LLM-facing text.
//!
//! [`generate_typescript`] renders every tool as an async function inside a
//! single `declare const global: { ... }` block. The [`context`] module wraps
//! that declaration with the manifest's prose and exposes the generic
//! `execute_js` tool schema an agent loop hands to the model.

#![warn(missing_docs, clippy::pedantic)]

pub mod context;
mod error;
mod typescript;

/// Error type and result alias for generation.
pub use error::{GenerationError, GenerationResult};
/// TypeScript declaration generator.
pub use typescript::{generate_typescript, ts_type};
