//! Canonical heading-grammar output.

use std::fmt::Write as _;
use std::path::Path;

use tracing::debug;
use webagent_model::{ContentSection, Manifest, Param, Tool};

use crate::error::{SiteError, SiteResult};

/// Serializes `manifest` into the heading grammar.
///
/// Content sections are placed before the tool at their recorded position;
/// every tool gets a `### Params` subsection, even when empty, so it reads
/// back as a tool.
#[must_use]
pub fn to_markdown(manifest: &Manifest) -> String {
    let mut blocks = Vec::new();

    let mut header = String::new();
    if !manifest.name.is_empty() {
        let _ = writeln!(header, "# {}", manifest.name);
    }
    if !manifest.description.is_empty() {
        header.push_str(&manifest.description);
    }
    if !header.trim().is_empty() {
        blocks.push(header.trim_end().to_owned());
    }

    let mut sections = manifest.content.iter().peekable();
    for (index, tool) in manifest.tools.iter().enumerate() {
        while let Some(section) = sections.next_if(|section| section.position <= index) {
            blocks.push(section_block(section));
        }
        blocks.push(tool_block(tool));
    }
    blocks.extend(sections.map(section_block));

    debug!(
        tools = manifest.tools.len(),
        sections = manifest.content.len(),
        "serialized manifest"
    );
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// Serializes `manifest` and writes it to `path`.
///
/// # Errors
///
/// Returns [`SiteError::Io`] when the file cannot be written.
pub fn write_file(manifest: &Manifest, path: impl AsRef<Path>) -> SiteResult<()> {
    let path = path.as_ref();
    std::fs::write(path, to_markdown(manifest)).map_err(|source| SiteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn section_block(section: &ContentSection) -> String {
    if section.body.is_empty() {
        format!("## {}", section.title)
    } else {
        format!("## {}\n{}", section.title, section.body)
    }
}

fn tool_block(tool: &Tool) -> String {
    let mut out = format!("## {}\n", tool.name);
    if !tool.description.is_empty() {
        let _ = writeln!(out, "{}", tool.description);
    }

    out.push_str("\n### Params\n");
    for param in &tool.params {
        let _ = writeln!(out, "{}", param_line(param));
    }

    if let Some(output) = &tool.output {
        let _ = writeln!(out, "\n### Output\n```typescript\n{output}\n```");
    }
    if let Some(code) = &tool.sample_code {
        let _ = writeln!(out, "\n### Sample Code\n```javascript\n{code}\n```");
    }

    out.trim_end().to_owned()
}

/// Renders one parameter in the syntax the heading reader accepts.
fn param_line(param: &Param) -> String {
    let mut modifiers = Vec::with_capacity(3);
    if param.has_type() {
        modifiers.push(param.ty.trim());
    }
    modifiers.push(if param.required { "required" } else { "optional" });
    let default = param
        .default
        .as_ref()
        .map(|default| format!("default={default}"));
    if let Some(default) = &default {
        modifiers.push(default);
    }

    let mut line = format!("- `{}` ({})", param.name, modifiers.join(", "));
    if !param.description.is_empty() {
        let _ = write!(line, ": {}", param.description);
    }
    line
}
