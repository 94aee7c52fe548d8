//! Tooling for website developers publishing a webagents.md manifest.
//!
//! - [`validate`] reports structural problems as [`Warning`]s and never fails.
//! - [`to_markdown`] renders the canonical heading grammar, which parses back
//!   to the same manifest.
//! - [`meta_tag`] renders the `<meta>` tag agents use to locate the file.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod serializer;
mod validator;

use webagent_config::DiscoveryConfig;

/// Error type and result alias for site tooling.
pub use error::{SiteError, SiteResult};
/// Canonical heading-grammar serializer.
pub use serializer::{to_markdown, write_file};
/// Structural validation.
pub use validator::{Warning, is_known_type, validate, validate_markdown};

/// Renders the discovery `<meta>` tag for the configured manifest location.
///
/// ```
/// use webagent_config::DiscoveryConfig;
///
/// assert_eq!(
///     webagent_site::meta_tag(&DiscoveryConfig::default()),
///     r#"<meta name="webagents-md" content="/webagents.md">"#
/// );
/// ```
#[must_use]
pub fn meta_tag(config: &DiscoveryConfig) -> String {
    format!(
        r#"<meta name="{}" content="{}">"#,
        config.meta_name,
        config.manifest_path()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_tag_follows_config() {
        let config = DiscoveryConfig::default().with_content_dir("/api/");
        assert_eq!(
            meta_tag(&config),
            r#"<meta name="webagents-md" content="/api/webagents.md">"#
        );
    }
}
