//! Reader for the compact grammar.
//!
//! ```text
//! # Site Name
//!
//! tool: searchProducts(query, limit=20)
//!   description: Search the catalog.
//!   params:
//!     query: string // Search text.
//!     limit: number?
//!   output: { products: Product[] }
//!   sample_code:
//!     ```js
//!     const r = await global.searchProducts("lamp");
//!     ```
//! ```

use tracing::trace;
use webagent_model::{ContentSection, Manifest, Param, Tool, is_identifier};

use crate::error::{ParseError, ParseResult};
use crate::heading::{Subsection, is_modifier};
use crate::scan::{
    self, Line, dedent, extract_code, find_closing, find_unquoted, heading, is_balanced, is_fence,
    non_empty, split_top_level, trim_block,
};

/// Marker that opens a tool declaration.
pub(crate) const TOOL_MARKER: &str = "tool:";

/// Top-level block currently being collected.
enum Block<'a> {
    Preamble,
    Tool { header: Line<'a>, body: Vec<Line<'a>> },
    Content { title: &'a str, body: Vec<&'a str> },
}

/// Parses a compact-grammar document.
pub(crate) fn parse(text: &str) -> ParseResult<Manifest> {
    let lines = scan::scan(text)?;
    let mut manifest = Manifest::default();
    let mut title_seen = false;
    let mut preamble = Vec::new();
    let mut block = Block::Preamble;

    for line in lines {
        let top_level = line.structural && !line.is_blank() && line.indent() == 0;
        if !top_level {
            match &mut block {
                Block::Preamble => preamble.push(line.text),
                Block::Tool { body, .. } => body.push(line),
                Block::Content { body, .. } => body.push(line.text),
            }
            continue;
        }

        if line.text.starts_with(TOOL_MARKER) {
            let next = Block::Tool {
                header: line,
                body: Vec::new(),
            };
            finish(std::mem::replace(&mut block, next), &mut manifest)?;
        } else if let Some(title) = heading(line.text, 1) {
            if title_seen || !matches!(block, Block::Preamble) {
                return Err(ParseError::nesting(
                    line.number,
                    "only one top-level heading is allowed, before any tool",
                ));
            }
            title_seen = true;
            manifest.name = title.to_owned();
        } else if let Some(title) = heading(line.text, 2) {
            let next = Block::Content {
                title,
                body: Vec::new(),
            };
            finish(std::mem::replace(&mut block, next), &mut manifest)?;
        } else if let Some(title) =
            heading(line.text, 3).filter(|_| !matches!(block, Block::Tool { .. }))
        {
            let Block::Content { body, .. } = &mut block else {
                return Err(ParseError::nesting(
                    line.number,
                    "subsection appears before any `##` section",
                ));
            };
            if Subsection::from_title(title).is_some() {
                return Err(ParseError::nesting(
                    line.number,
                    format!("`### {title}` belongs under a `tool:` declaration"),
                ));
            }
            body.push(line.text);
        } else {
            match &mut block {
                Block::Preamble => preamble.push(line.text),
                Block::Content { body, .. } => body.push(line.text),
                Block::Tool { .. } => {
                    return Err(ParseError::UnexpectedText {
                        line: line.number,
                        text: line.text.trim().to_owned(),
                    });
                }
            }
        }
    }
    finish(block, &mut manifest)?;

    manifest.description = trim_block(preamble);
    Ok(manifest)
}

fn finish(block: Block<'_>, manifest: &mut Manifest) -> ParseResult<()> {
    match block {
        Block::Preamble => {}
        Block::Content { title, body } => manifest.content.push(ContentSection::new(
            title,
            trim_block(body),
            manifest.tools.len(),
        )),
        Block::Tool { header, body } => manifest.tools.push(read_tool(header, &body)?),
    }
    Ok(())
}

/// One parameter from a `tool:` signature.
#[derive(Debug)]
struct SignatureParam<'a> {
    name: &'a str,
    default: Option<&'a str>,
    optional: bool,
}

/// Parses `name(p1, p2=default, p3?)`.
fn parse_signature(text: &str, line: usize) -> ParseResult<(&str, Vec<SignatureParam<'_>>)> {
    let open = text
        .find('(')
        .ok_or_else(|| ParseError::signature(line, text, "missing `(`"))?;
    let name = text[..open].trim();
    if !is_identifier(name) {
        return Err(ParseError::signature(
            line,
            text,
            format!("`{name}` is not a valid function name"),
        ));
    }
    let close = find_closing(text, open)
        .ok_or_else(|| ParseError::signature(line, text, "unclosed `(`"))?;
    if !text[close + 1..].trim().is_empty() {
        return Err(ParseError::signature(
            line,
            text,
            "unexpected text after `)`",
        ));
    }

    let inner = &text[open + 1..close];
    if inner.trim().is_empty() {
        return Ok((name, Vec::new()));
    }

    let mut parts = split_top_level(inner, ',');
    if parts.len() > 1 && parts.last().is_some_and(|part| part.trim().is_empty()) {
        parts.pop();
    }

    let mut params: Vec<SignatureParam<'_>> = Vec::with_capacity(parts.len());
    for part in parts {
        let (raw_name, default) = match part.split_once('=') {
            Some((raw_name, default)) => {
                let default = non_empty(default).ok_or_else(|| {
                    ParseError::signature(line, text, format!("empty default in `{}`", part.trim()))
                })?;
                (raw_name.trim(), Some(default))
            }
            None => (part.trim(), None),
        };
        let (param_name, optional) = match raw_name.strip_suffix('?') {
            Some(stripped) => (stripped.trim_end(), true),
            None => (raw_name, false),
        };
        if !is_identifier(param_name) {
            return Err(ParseError::signature(
                line,
                text,
                format!("`{}` is not a valid parameter", part.trim()),
            ));
        }
        if params.iter().any(|p| p.name == param_name) {
            return Err(ParseError::signature(
                line,
                text,
                format!("parameter `{param_name}` declared twice"),
            ));
        }
        params.push(SignatureParam {
            name: param_name,
            default,
            optional,
        });
    }

    Ok((name, params))
}

/// Keys accepted under a `tool:` declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Description,
    Params,
    Output,
    SampleCode,
}

impl Field {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "description" => Some(Self::Description),
            "params" => Some(Self::Params),
            "output" | "returns" => Some(Self::Output),
            "sample_code" => Some(Self::SampleCode),
            _ => None,
        }
    }
}

/// A field with its inline value and indented continuation lines.
struct FieldValue<'a> {
    field: Field,
    line: usize,
    inline: &'a str,
    block: Vec<&'a str>,
}

impl<'a> FieldValue<'a> {
    /// Inline text followed by the dedented block.
    fn lines(&self) -> Vec<&'a str> {
        let mut lines = Vec::with_capacity(self.block.len() + 1);
        if !self.inline.is_empty() {
            lines.push(self.inline);
        }
        lines.extend(dedent(&self.block));
        lines
    }

    /// Source line of the first entry returned by [`FieldValue::lines`].
    fn first_line(&self) -> usize {
        if self.inline.is_empty() {
            self.line + 1
        } else {
            self.line
        }
    }
}

/// Splits the indented body of a tool into fields.
fn read_fields<'a>(tool: &str, body: &[Line<'a>]) -> ParseResult<Vec<FieldValue<'a>>> {
    let field_indent = body
        .iter()
        .find(|line| !line.is_blank())
        .map_or(0, Line::indent);
    let mut fields: Vec<FieldValue<'a>> = Vec::new();

    for line in body {
        if line.is_blank() {
            if let Some(current) = fields.last_mut() {
                current.block.push("");
            }
            continue;
        }
        if line.structural && line.indent() == 0 {
            return Err(ParseError::UnexpectedText {
                line: line.number,
                text: line.text.trim().to_owned(),
            });
        }
        if !line.structural || line.indent() > field_indent {
            let Some(current) = fields.last_mut() else {
                return Err(ParseError::UnknownField {
                    line: line.number,
                    tool: tool.to_owned(),
                    key: line.text.trim().to_owned(),
                });
            };
            current.block.push(line.text);
            continue;
        }

        let text = line.text.trim();
        let (key, inline) = text.split_once(':').unwrap_or((text, ""));
        let field = Field::from_key(key.trim()).ok_or_else(|| ParseError::UnknownField {
            line: line.number,
            tool: tool.to_owned(),
            key: key.trim().to_owned(),
        })?;
        if fields.iter().any(|value| value.field == field) {
            return Err(ParseError::DuplicateField {
                line: line.number,
                tool: tool.to_owned(),
                key: key.trim().to_owned(),
            });
        }
        let inline = match inline.trim() {
            "|" | ">" => "",
            inline => inline,
        };
        fields.push(FieldValue {
            field,
            line: line.number,
            inline,
            block: Vec::new(),
        });
    }

    Ok(fields)
}

/// A `params` entry: `name: type[?] [// description]`.
#[derive(Debug)]
struct ParamEntry<'a> {
    name: &'a str,
    ty: &'a str,
    optional: bool,
    description: &'a str,
    line: usize,
}

fn parse_param_entry<'a>(text: &'a str, line: usize, tool: &str) -> ParseResult<ParamEntry<'a>> {
    let (raw_name, rest) = text.split_once(':').ok_or_else(|| {
        ParseError::param(
            line,
            tool,
            format!("expected `name: type`, found `{}`", text.trim()),
        )
    })?;
    let raw_name = raw_name.trim();
    let (name, name_optional) = match raw_name.strip_suffix('?') {
        Some(stripped) => (stripped.trim_end(), true),
        None => (raw_name, false),
    };
    if !is_identifier(name) {
        return Err(ParseError::param(
            line,
            tool,
            format!("`{raw_name}` is not a valid parameter name"),
        ));
    }

    let (ty, description) = match find_unquoted(rest, "//") {
        Some(idx) => (rest[..idx].trim(), rest[idx + 2..].trim()),
        None => (rest.trim(), ""),
    };
    let (ty, type_optional) = match ty.strip_suffix('?') {
        Some(stripped) => (stripped.trim_end(), true),
        None => (ty, false),
    };
    check_type_token(ty, line, tool)?;

    Ok(ParamEntry {
        name,
        ty,
        optional: name_optional || type_optional,
        description,
        line,
    })
}

/// Rejects type tokens the heading grammar would read back differently.
fn check_type_token(ty: &str, line: usize, tool: &str) -> ParseResult<()> {
    let reason = if is_modifier(ty) {
        format!("`{ty}` is a parameter modifier, not a type")
    } else if !is_balanced(ty) {
        format!("unbalanced brackets or quotes in type `{ty}`")
    } else if split_top_level(ty, ',').len() > 1 {
        format!("type `{ty}` has a `,` outside brackets")
    } else {
        return Ok(());
    };
    Err(ParseError::param(line, tool, reason))
}

/// Collects `params` entries from block lines or an inline `{ a: t, b: u }` map.
fn param_entries<'a>(value: &FieldValue<'a>, tool: &str) -> ParseResult<Vec<ParamEntry<'a>>> {
    let mut entries: Vec<ParamEntry<'a>> = Vec::new();

    if !value.inline.is_empty() {
        let inner = value
            .inline
            .strip_prefix('{')
            .and_then(|inline| inline.strip_suffix('}'))
            .ok_or_else(|| {
                ParseError::param(
                    value.line,
                    tool,
                    "inline params must be written as `{ name: type, ... }`",
                )
            })?;
        for part in split_top_level(inner, ',') {
            if !part.trim().is_empty() {
                push_entry(&mut entries, parse_param_entry(part, value.line, tool)?, tool)?;
            }
        }
    }

    for (offset, text) in dedent(&value.block).into_iter().enumerate() {
        if !text.trim().is_empty() {
            push_entry(
                &mut entries,
                parse_param_entry(text, value.line + 1 + offset, tool)?,
                tool,
            )?;
        }
    }

    Ok(entries)
}

fn push_entry<'a>(
    entries: &mut Vec<ParamEntry<'a>>,
    entry: ParamEntry<'a>,
    tool: &str,
) -> ParseResult<()> {
    if entries.iter().any(|existing| existing.name == entry.name) {
        return Err(ParseError::param(
            entry.line,
            tool,
            format!("parameter `{}` listed twice", entry.name),
        ));
    }
    entries.push(entry);
    Ok(())
}

/// Rejects description lines that would read as structure once the text is
/// rendered in the heading grammar.
fn check_prose(lines: &[&str], first_line: usize) -> ParseResult<()> {
    let mut fenced = false;
    for (offset, line) in lines.iter().enumerate() {
        if is_fence(line) {
            fenced = !fenced;
            continue;
        }
        let structural = (1..=3).any(|level| heading(line, level).is_some())
            || line.starts_with(TOOL_MARKER);
        if !fenced && structural {
            return Err(ParseError::nesting(
                first_line + offset,
                format!(
                    "description line `{}` reads as a heading or tool marker",
                    line.trim()
                ),
            ));
        }
    }
    Ok(())
}

fn read_tool(header: Line<'_>, body: &[Line<'_>]) -> ParseResult<Tool> {
    let signature = header.text[TOOL_MARKER.len()..].trim();
    let (name, signature_params) = parse_signature(signature, header.number)?;
    let fields = read_fields(name, body)?;

    let mut tool = Tool {
        name: name.to_owned(),
        ..Tool::default()
    };
    let mut entries = Vec::new();

    for value in &fields {
        match value.field {
            Field::Description => {
                let lines = value.lines();
                check_prose(&lines, value.first_line())?;
                tool.description = trim_block(lines);
            }
            Field::Params => entries = param_entries(value, name)?,
            Field::Output => tool.output = extract_code(&value.lines(), value.first_line())?,
            Field::SampleCode => {
                tool.sample_code = extract_code(&value.lines(), value.first_line())?;
            }
        }
    }

    if let Some(entry) = entries
        .iter()
        .find(|entry| !signature_params.iter().any(|p| p.name == entry.name))
    {
        return Err(ParseError::UnknownParameter {
            line: entry.line,
            tool: tool.name,
            name: entry.name.to_owned(),
        });
    }

    tool.params = signature_params
        .iter()
        .map(|declared| {
            let entry = entries.iter().find(|entry| entry.name == declared.name);
            let optional = declared.optional
                || declared.default.is_some()
                || entry.is_some_and(|entry| entry.optional);
            Param {
                name: declared.name.to_owned(),
                ty: entry.map_or_else(String::new, |entry| entry.ty.to_owned()),
                description: entry.map_or_else(String::new, |entry| entry.description.to_owned()),
                required: !optional,
                default: declared.default.map(str::to_owned),
            }
        })
        .collect();

    trace!(line = header.number, tool = %tool.name, params = tool.params.len(), "read compact tool");
    Ok(tool)
}
