//! Parser for webagents.md manifests.
//!
//! Two surface grammars map onto the same [`Manifest`]:
//!
//! - the **heading** grammar (`#` title, `##` tools or prose sections, `###`
//!   `Params` / `Output` / `Sample Code` subsections), and
//! - the **compact** grammar (`tool: name(a, b=1)` followed by indented
//!   `description`, `params`, `output` and `sample_code` fields).
//!
//! [`parse`] sniffs the grammar: any line outside a fenced block that starts
//! with `tool:` selects the compact reader. The parser is permissive about
//! semantics (duplicate names, unknown type tokens) and strict about
//! structure: malformed input fails with a [`ParseError`] naming the line.

#![warn(missing_docs, clippy::pedantic)]

mod compact;
mod error;
mod heading;
mod scan;

use std::fmt;
use std::path::Path;

use tracing::debug;
use webagent_model::Manifest;

/// Error type and result alias for parsing.
pub use error::{ParseError, ParseResult};
/// Bracket- and quote-aware splitting shared with type checks downstream.
pub use scan::split_top_level;

/// Surface syntax of a manifest document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// Nested-heading documentation style.
    Heading,
    /// `tool:` signatures with indented fields.
    Compact,
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heading => f.write_str("heading"),
            Self::Compact => f.write_str("compact"),
        }
    }
}

/// Detects which grammar `text` is written in.
#[must_use]
pub fn detect_grammar(text: &str) -> Grammar {
    let (lines, _) = scan::lines(text);
    if lines
        .iter()
        .any(|line| line.structural && line.text.starts_with(compact::TOOL_MARKER))
    {
        Grammar::Compact
    } else {
        Grammar::Heading
    }
}

/// Parses a manifest, auto-detecting the grammar.
///
/// Blank input yields an empty [`Manifest`].
///
/// # Errors
///
/// Returns a [`ParseError`] when the document is structurally malformed under
/// the detected grammar.
pub fn parse(text: &str) -> ParseResult<Manifest> {
    parse_as(text, detect_grammar(text))
}

/// Parses a manifest with an explicitly chosen grammar.
///
/// # Errors
///
/// Returns a [`ParseError`] when the document is structurally malformed.
pub fn parse_as(text: &str, grammar: Grammar) -> ParseResult<Manifest> {
    if text.trim().is_empty() {
        return Ok(Manifest::default());
    }

    debug!(%grammar, "parsing manifest");
    let manifest = match grammar {
        Grammar::Heading => heading::parse(text)?,
        Grammar::Compact => compact::parse(text)?,
    };
    debug!(
        %grammar,
        tools = manifest.tools.len(),
        sections = manifest.content.len(),
        "parsed manifest"
    );
    Ok(manifest)
}

/// Reads and parses a manifest file.
///
/// # Errors
///
/// Returns [`ParseError::Io`] when the file cannot be read, or any parse
/// error produced by [`parse`].
pub fn parse_file(path: impl AsRef<Path>) -> ParseResult<Manifest> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const HEADING: &str = "# My Store

## search
Search products.

### Params
- `query` (string, required): Search query.
- `limit` (number, optional, default=20): Max results.

### Output
```typescript
{ results: Array<{ id: string; name: string }>; total: number }
```

### Sample Code
```js
const r = await global.search(query, limit);
```

## getBasket
View basket contents.

### Params
";

    #[test]
    fn detects_grammar_outside_fences() {
        assert_eq!(detect_grammar(HEADING), Grammar::Heading);
        assert_eq!(detect_grammar("# S\n\ntool: a()\n"), Grammar::Compact);
        assert_eq!(
            detect_grammar("# S\n```\ntool: a()\n```\n"),
            Grammar::Heading
        );
        assert_eq!(detect_grammar("  tool: indented()\n"), Grammar::Heading);
    }

    #[test]
    fn parses_heading_document() {
        let m = parse(HEADING).unwrap();
        assert_eq!(m.name, "My Store");
        assert_eq!(m.tool_names(), ["search", "getBasket"]);

        let search = m.tool("search").unwrap();
        assert_eq!(search.description, "Search products.");
        assert!(search.params[0].required);
        assert_eq!(search.params[1].default.as_deref(), Some("20"));
        assert_eq!(
            search.output.as_deref(),
            Some("{ results: Array<{ id: string; name: string }>; total: number }")
        );
        assert!(search.sample_code.as_deref().unwrap().contains("global.search"));

        let basket = m.tool("getBasket").unwrap();
        assert!(basket.params.is_empty());
        assert!(basket.output.is_none());
    }

    #[test]
    fn blank_input_is_empty_manifest() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse(" \n\n\t").unwrap().is_empty());
    }

    #[test]
    fn content_keeps_position() {
        let m = parse(
            "# Store\nDescription.\n\n## Important\n- Rate limit: 10/min.\n\n## search\nSearch.\n\n### Params\n",
        )
        .unwrap();
        assert_eq!(m.description, "Description.");
        assert_eq!(m.content.len(), 1);
        assert_eq!(m.content[0].title, "Important");
        assert_eq!(m.content[0].body, "- Rate limit: 10/min.");
        assert_eq!(m.content[0].position, 0);
        assert_eq!(m.tools.len(), 1);
    }

    #[test]
    fn duplicate_tools_parse() {
        let m = parse("# S\n## search\n### Params\n## search\n### Params\n").unwrap();
        assert_eq!(m.tools.len(), 2);
    }

    #[test]
    fn unterminated_fence_is_an_error() {
        let err = parse("# S\n## t\n### Output\n```ts\nstring\n").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedFence { line: 4 }));
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn reads_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(HEADING.as_bytes()).unwrap();
        let m = parse_file(file.path()).unwrap();
        assert_eq!(m.tools.len(), 2);

        let err = parse_file(file.path().with_extension("missing")).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
        assert!(err.line().is_none());
    }
}
