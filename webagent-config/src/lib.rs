//! Discovery configuration for webagents.md manifests.
//!
//! A site advertises its manifest through a `<meta>` tag pointing at a file
//! under a content directory. [`DiscoveryConfig`] holds that convention as an
//! explicit value handed to whichever component needs it.

#![warn(missing_docs, clippy::pedantic)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable overriding [`DiscoveryConfig::content_dir`].
pub const CONTENT_DIR_ENV: &str = "WEBAGENT_CONTENT_DIR";
/// Environment variable overriding [`DiscoveryConfig::filename`].
pub const MANIFEST_FILE_ENV: &str = "WEBAGENT_MANIFEST_FILE";
/// Environment variable overriding [`DiscoveryConfig::meta_name`].
pub const META_NAME_ENV: &str = "WEBAGENT_META_NAME";

const DEFAULT_CONTENT_DIR: &str = "/";
const DEFAULT_FILENAME: &str = "webagents.md";
const DEFAULT_META_NAME: &str = "webagents-md";

/// Where a site publishes its manifest and how it advertises it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// URL directory the manifest is served from.
    pub content_dir: String,
    /// Manifest file name inside [`Self::content_dir`].
    pub filename: String,
    /// `name` attribute of the discovery `<meta>` tag.
    pub meta_name: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            content_dir: DEFAULT_CONTENT_DIR.to_owned(),
            filename: DEFAULT_FILENAME.to_owned(),
            meta_name: DEFAULT_META_NAME.to_owned(),
        }
    }
}

impl DiscoveryConfig {
    /// Sets the content directory.
    #[must_use]
    pub fn with_content_dir(mut self, dir: impl Into<String>) -> Self {
        self.content_dir = dir.into();
        self
    }

    /// Sets the manifest file name.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Sets the discovery tag name.
    #[must_use]
    pub fn with_meta_name(mut self, meta_name: impl Into<String>) -> Self {
        self.meta_name = meta_name.into();
        self
    }

    /// URL path of the manifest, e.g. `/webagents.md`.
    #[must_use]
    pub fn manifest_path(&self) -> String {
        format!("{}/{}", self.content_dir.trim_end_matches('/'), self.filename)
    }

    /// Location of the manifest on disk for a site rooted at `root`.
    #[must_use]
    pub fn disk_path(&self, root: &Path) -> PathBuf {
        let dir = self.content_dir.trim_matches('/');
        if dir.is_empty() {
            root.join(&self.filename)
        } else {
            root.join(dir).join(&self.filename)
        }
    }

    /// Parses a JSON object; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Fails when `json` is not a valid configuration object.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid discovery configuration")
    }

    /// Reads overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`; absent or blank values keep defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(dir) = value(CONTENT_DIR_ENV) {
            config.content_dir = dir;
        }
        if let Some(filename) = value(MANIFEST_FILE_ENV) {
            config.filename = filename;
        }
        if let Some(meta_name) = value(META_NAME_ENV) {
            config.meta_name = meta_name;
        }
        debug!(path = %config.manifest_path(), "loaded discovery config");
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_manifest_path() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.manifest_path(), "/webagents.md");
        assert_eq!(config.meta_name, "webagents-md");
    }

    #[test]
    fn joins_directories() {
        let config = DiscoveryConfig::default()
            .with_content_dir("/agents/")
            .with_filename("tools.md");
        assert_eq!(config.manifest_path(), "/agents/tools.md");
        assert_eq!(
            config.disk_path(Path::new("public")),
            Path::new("public").join("agents").join("tools.md")
        );
        assert_eq!(
            DiscoveryConfig::default().disk_path(Path::new("public")),
            Path::new("public").join("webagents.md")
        );
    }

    #[test]
    fn json_fills_defaults() {
        let config = DiscoveryConfig::from_json(r#"{"content_dir": "/api"}"#).unwrap();
        assert_eq!(config.manifest_path(), "/api/webagents.md");
        assert_eq!(config.meta_name, "webagents-md");

        let err = DiscoveryConfig::from_json("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("invalid discovery configuration"));
    }

    #[test]
    fn lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            (MANIFEST_FILE_ENV, "agents.md"),
            (META_NAME_ENV, "  "),
        ]
        .into_iter()
        .collect();
        let config = DiscoveryConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_owned()));
        assert_eq!(config.manifest_path(), "/agents.md");
        assert_eq!(config.meta_name, "webagents-md");
    }
}
