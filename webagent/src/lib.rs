//! Toolkit for webagents.md manifests.
//!
//! A website publishes a markdown manifest describing callable JavaScript
//! functions; agents parse it and hand the model TypeScript declarations.
//! This crate bundles the component crates behind feature flags so users can
//! pull in only the pieces they need.

#![warn(missing_docs, clippy::pedantic)]

/// Manifest data model.
pub use webagent_model as model;

/// Markdown readers (enabled by `parser` feature).
#[cfg(feature = "parser")]
pub use webagent_parser as parser;

/// TypeScript and LLM context generation (enabled by `codegen` feature).
#[cfg(feature = "codegen")]
pub use webagent_codegen as codegen;

/// Validation, serialization and discovery tags (enabled by `site` feature).
#[cfg(feature = "site")]
pub use webagent_site as site;

/// Discovery configuration (enabled by `config` feature).
#[cfg(feature = "config")]
pub use webagent_config as config;

pub use webagent_model::{ContentSection, Manifest, Param, Tool};
