//! Whole-document model for a webagents.md file.

use serde::{Deserialize, Serialize};

use crate::tool::Tool;

/// A free-text section that does not declare a tool.
///
/// `position` records how many tools precede the section in the source
/// document so that re-serialization keeps sections and tools interleaved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    /// Section heading text.
    pub title: String,
    /// Section body, verbatim.
    #[serde(default)]
    pub body: String,
    /// Number of tools declared before this section.
    #[serde(default)]
    pub position: usize,
}

impl ContentSection {
    /// Creates a section anchored after `position` tools.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>, position: usize) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            position,
        }
    }
}

/// Parsed representation of a site's tool-declaration document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Site or document title.
    pub name: String,
    /// Prose between the title and the first section.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Non-tool sections in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<ContentSection>,
    /// Tools in document order.
    #[serde(default)]
    pub tools: Vec<Tool>,
}

impl Manifest {
    /// Starts building a manifest with the supplied title.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ManifestBuilder {
        ManifestBuilder {
            manifest: Manifest {
                name: name.into(),
                ..Manifest::default()
            },
        }
    }

    /// Looks up the first tool with the given name.
    #[must_use]
    pub fn tool(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    /// Returns all tool names in declaration order.
    #[must_use]
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name.as_str()).collect()
    }

    /// Returns `true` when the manifest declares neither tools nor prose.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.description.is_empty()
            && self.content.is_empty()
            && self.tools.is_empty()
    }

    /// Concatenates the description and content sections for LLM context.
    ///
    /// Sections keep their original order and are rendered as `## title`
    /// followed by the body, separated by blank lines.
    #[must_use]
    pub fn context_text(&self) -> String {
        let mut blocks = Vec::with_capacity(self.content.len() + 1);
        if !self.description.is_empty() {
            blocks.push(self.description.clone());
        }
        for section in &self.content {
            if section.body.is_empty() {
                blocks.push(format!("## {}", section.title));
            } else {
                blocks.push(format!("## {}\n{}", section.title, section.body));
            }
        }
        blocks.join("\n\n")
    }
}

/// Builder for [`Manifest`].
#[derive(Debug)]
pub struct ManifestBuilder {
    manifest: Manifest,
}

impl ManifestBuilder {
    /// Sets the preamble description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.manifest.description = description.into();
        self
    }

    /// Appends a tool.
    #[must_use]
    pub fn tool(mut self, tool: Tool) -> Self {
        self.manifest.tools.push(tool);
        self
    }

    /// Appends a content section after the tools added so far.
    #[must_use]
    pub fn content_section(mut self, title: impl Into<String>, body: impl Into<String>) -> Self {
        let position = self.manifest.tools.len();
        self.manifest
            .content
            .push(ContentSection::new(title, body, position));
        self
    }

    /// Returns the assembled manifest.
    #[must_use]
    pub fn build(self) -> Manifest {
        self.manifest
    }
}
