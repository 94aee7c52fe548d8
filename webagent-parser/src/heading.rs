//! Reader for the heading grammar.
//!
//! ```text
//! # Site Name
//! Description.
//!
//! ## searchProducts
//! Search the catalog.
//!
//! ### Params
//! - `query` (string, required): Search text.
//! - `limit` (number, optional, default=20): Max results.
//!
//! ### Output
//! ```typescript
//! { products: Product[] }
//! ```
//! ```

use tracing::trace;
use webagent_model::{ContentSection, Manifest, Param, Tool};

use crate::error::{ParseError, ParseResult};
use crate::scan::{self, Line, extract_code, find_closing, heading, split_top_level, trim_block};

/// Recognized third-level subsections of a tool.
///
/// `Output` and `SampleCode` hold at most one fenced block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Subsection {
    Params,
    Output,
    SampleCode,
}

impl Subsection {
    pub(crate) fn from_title(title: &str) -> Option<Self> {
        match title.to_ascii_lowercase().as_str() {
            "params" | "parameters" => Some(Self::Params),
            "output" | "returns" => Some(Self::Output),
            "sample code" => Some(Self::SampleCode),
            _ => None,
        }
    }
}

/// A `##` section before classification.
struct Section<'a> {
    title: &'a str,
    line: usize,
    body: Vec<Line<'a>>,
}

/// Parses a heading-grammar document.
pub(crate) fn parse(text: &str) -> ParseResult<Manifest> {
    let lines = scan::scan(text)?;
    let mut manifest = Manifest::default();
    let mut title_seen = false;
    let mut preamble = Vec::new();
    let mut sections: Vec<Section<'_>> = Vec::new();

    for line in lines {
        if line.structural {
            if let Some(title) = heading(line.text, 1) {
                if title_seen || !sections.is_empty() {
                    return Err(ParseError::nesting(
                        line.number,
                        "only one top-level heading is allowed, before any section",
                    ));
                }
                title_seen = true;
                manifest.name = title.to_owned();
                continue;
            }
            if let Some(title) = heading(line.text, 2) {
                sections.push(Section {
                    title,
                    line: line.number,
                    body: Vec::new(),
                });
                continue;
            }
            if sections.is_empty() && heading(line.text, 3).is_some() {
                return Err(ParseError::nesting(
                    line.number,
                    "subsection appears before any `##` section",
                ));
            }
        }
        match sections.last_mut() {
            Some(section) => section.body.push(line),
            None => preamble.push(line.text),
        }
    }

    manifest.description = trim_block(preamble);
    for section in sections {
        match read_section(&section)? {
            Some(tool) => manifest.tools.push(tool),
            None => manifest.content.push(ContentSection::new(
                section.title,
                trim_block(section.body.iter().map(|line| line.text)),
                manifest.tools.len(),
            )),
        }
    }

    Ok(manifest)
}

/// Classifies a section; returns `None` for prose sections.
fn read_section(section: &Section<'_>) -> ParseResult<Option<Tool>> {
    let mut header = Vec::new();
    let mut subsections: Vec<(&str, usize, Vec<&str>)> = Vec::new();

    for line in &section.body {
        if line.structural {
            if let Some(title) = heading(line.text, 3) {
                subsections.push((title, line.number, Vec::new()));
                continue;
            }
        }
        match subsections.last_mut() {
            Some((_, _, body)) => body.push(line.text),
            None => header.push(line.text),
        }
    }

    let is_tool = subsections
        .iter()
        .any(|(title, _, _)| Subsection::from_title(title).is_some());
    if !is_tool {
        return Ok(None);
    }

    let mut tool = Tool {
        name: section.title.to_owned(),
        description: trim_block(header),
        ..Tool::default()
    };
    let mut seen = Vec::new();

    for (title, line, body) in subsections {
        let Some(kind) = Subsection::from_title(title) else {
            return Err(ParseError::UnknownSubsection {
                line,
                tool: tool.name.clone(),
                title: title.to_owned(),
            });
        };
        if seen.contains(&kind) {
            return Err(ParseError::nesting(
                line,
                format!("subsection `{title}` repeated in tool `{}`", tool.name),
            ));
        }
        seen.push(kind);

        let first = line + 1;
        match kind {
            Subsection::Params => {
                for (offset, text) in body.iter().enumerate() {
                    if !text.trim().is_empty() {
                        tool.params
                            .push(parse_param_line(text, first + offset, &tool.name)?);
                    }
                }
            }
            Subsection::Output => tool.output = extract_code(&body, first)?,
            Subsection::SampleCode => tool.sample_code = extract_code(&body, first)?,
        }
    }

    trace!(line = section.line, tool = %tool.name, params = tool.params.len(), "read tool section");
    Ok(Some(tool))
}

/// Parses `` - `name` (type, required|optional, default=value): description ``.
pub(crate) fn parse_param_line(text: &str, line: usize, tool: &str) -> ParseResult<Param> {
    let mut rest = text.trim();
    if let Some(stripped) = rest.strip_prefix(['-', '*']) {
        rest = stripped.trim_start();
    }

    let name = if let Some(quoted) = rest.strip_prefix('`') {
        let end = quoted
            .find('`')
            .ok_or_else(|| ParseError::param(line, tool, "unclosed backtick around name"))?;
        rest = &quoted[end + 1..];
        quoted[..end].trim()
    } else {
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(rest.len());
        let name = &rest[..end];
        rest = &rest[end..];
        name
    };
    if name.is_empty() {
        return Err(ParseError::param(line, tool, format!("missing name in `{}`", text.trim())));
    }

    rest = rest.trim_start();
    if !rest.starts_with('(') {
        return Err(ParseError::param(
            line,
            tool,
            format!("expected `(type, required|optional)` after `{name}`"),
        ));
    }
    let close = find_closing(rest, 0)
        .ok_or_else(|| ParseError::param(line, tool, format!("unclosed `(` after `{name}`")))?;
    let modifiers = &rest[1..close];
    let after = rest[close + 1..].trim_start();
    let description = if after.is_empty() {
        ""
    } else if let Some(description) = after.strip_prefix(':') {
        description.trim()
    } else {
        return Err(ParseError::param(
            line,
            tool,
            format!("expected `:` before the description of `{name}`"),
        ));
    };

    let mut param = Param::required(name, "").with_description(description);
    let mut explicit_required = None;
    for (idx, modifier) in split_top_level(modifiers, ',').into_iter().enumerate() {
        let modifier = modifier.trim();
        match modifier {
            "" if idx == 0 => {}
            "required" => explicit_required = Some(true),
            "optional" => explicit_required = Some(false),
            _ => {
                if let Some(value) = default_value(modifier) {
                    let value = value.trim();
                    if value.is_empty() {
                        return Err(ParseError::param(
                            line,
                            tool,
                            format!("empty default for `{name}`"),
                        ));
                    }
                    param.default = Some(value.to_owned());
                } else if idx == 0 {
                    modifier.clone_into(&mut param.ty);
                } else {
                    return Err(ParseError::param(
                        line,
                        tool,
                        format!("unrecognized modifier `{modifier}` for `{name}`"),
                    ));
                }
            }
        }
    }

    param.required = param.default.is_none() && explicit_required.unwrap_or(true);
    Ok(param)
}

/// Returns the literal of a `default=value` modifier.
fn default_value(modifier: &str) -> Option<&str> {
    modifier
        .strip_prefix("default")
        .and_then(|value| value.trim_start().strip_prefix('='))
}

/// Returns `true` when `token` would be read as a modifier rather than a type
/// in the first position of a parameter's parentheses.
pub(crate) fn is_modifier(token: &str) -> bool {
    let token = token.trim();
    matches!(token, "required" | "optional") || default_value(token).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(text: &str) -> Param {
        parse_param_line(text, 1, "t").unwrap()
    }

    #[test]
    fn reads_full_param_line() {
        let p = param("- `limit` (number, optional, default=20): Max results.");
        assert_eq!(p.name, "limit");
        assert_eq!(p.ty, "number");
        assert!(!p.required);
        assert_eq!(p.default.as_deref(), Some("20"));
        assert_eq!(p.description, "Max results.");
    }

    #[test]
    fn default_overrides_required_flag() {
        let p = param("- `mode` (string, required, default=\"full\")");
        assert!(!p.required);
        assert_eq!(p.default.as_deref(), Some("\"full\""));
        assert!(p.description.is_empty());
    }

    #[test]
    fn compound_types_survive_commas() {
        let p = param("- `filter` ({ min: number, max: number }, optional): Range.");
        assert_eq!(p.ty, "{ min: number, max: number }");
        assert!(!p.required);

        let p = param("- `mode` (\"light\" | \"full\", required): Mode.");
        assert_eq!(p.ty, "\"light\" | \"full\"");
    }

    #[test]
    fn missing_type_is_left_empty() {
        let p = param("- `query` (required): Search text.");
        assert!(p.ty.is_empty());
        assert!(p.required);
    }

    #[test]
    fn bare_names_are_accepted() {
        let p = param("query (string): Text.");
        assert_eq!(p.name, "query");
        assert!(p.required);
    }

    #[test]
    fn malformed_lines_fail() {
        for text in [
            "- just some prose",
            "- `query` string, required",
            "- `query` (string, required",
            "- `query` (string, mandatory)",
            "- `query` (string) Search text.",
            "- `limit` (number, default=)",
        ] {
            let err = parse_param_line(text, 7, "search").expect_err(text);
            assert!(
                matches!(&err, ParseError::MalformedParam { line: 7, tool, .. } if tool == "search"),
                "{text}: {err}"
            );
        }
    }

    #[test]
    fn sections_without_known_subsections_are_content() {
        let m = parse("# S\n\n## Important\nRate limits.\n\n### Notes\nBe nice.\n").unwrap();
        assert!(m.tools.is_empty());
        assert_eq!(m.content[0].title, "Important");
        assert_eq!(m.content[0].body, "Rate limits.\n\n### Notes\nBe nice.");
    }

    #[test]
    fn unknown_subsection_in_tool_fails() {
        let err = parse("# S\n## search\n### Params\n### Notes\n").unwrap_err();
        assert!(matches!(err, ParseError::UnknownSubsection { line: 4, .. }));
    }

    #[test]
    fn nesting_errors() {
        let err = parse("### Params\n").unwrap_err();
        assert!(matches!(err, ParseError::HeadingNesting { line: 1, .. }));

        let err = parse("# A\n## x\n### Params\n# B\n").unwrap_err();
        assert!(matches!(err, ParseError::HeadingNesting { line: 4, .. }));

        let err = parse("# A\n## x\n### Params\n### params\n").unwrap_err();
        assert!(matches!(err, ParseError::HeadingNesting { line: 4, .. }));
    }

    #[test]
    fn output_with_two_fences_fails() {
        let text = "# S\n## t\n### Output\n```ts\nA\n```\n```ts\nB\n```\n";
        let err = parse(text).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedText { line: 7, .. }));
    }

    #[test]
    fn subsections_in_any_order() {
        let m = parse(
            "# S\n## t\nDo it.\n### Sample Code\n```js\nawait global.t(1);\n```\n### Params\n- `a` (number, required): A.\n",
        )
        .unwrap();
        let tool = &m.tools[0];
        assert_eq!(tool.sample_code.as_deref(), Some("await global.t(1);"));
        assert_eq!(tool.params.len(), 1);
        assert!(tool.output.is_none());
    }
}
