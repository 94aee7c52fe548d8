//! Structural checks over a manifest.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;
use webagent_model::{Manifest, Tool, is_identifier};
use webagent_parser::{ParseResult, parse, split_top_level};

/// Type tokens accepted without further structure.
const PRIMITIVE_TYPES: &[&str] = &[
    "string",
    "number",
    "boolean",
    "object",
    "array",
    "any",
    "unknown",
    "null",
    "undefined",
    "void",
    "true",
    "false",
];

/// A structural problem found in a manifest.
///
/// Warnings never block use of the manifest; [`fmt::Display`] renders the
/// message shown to site authors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    /// The manifest has no title.
    MissingManifestName,
    /// The manifest declares no tools.
    NoTools,
    /// A tool has an empty name.
    MissingToolName {
        /// Position of the tool.
        index: usize,
    },
    /// A tool name is not a bare function-call name.
    InvalidToolName {
        /// Offending name.
        name: String,
    },
    /// Two or more tools share a name.
    DuplicateTool {
        /// Repeated name.
        name: String,
    },
    /// A tool has no description.
    MissingDescription {
        /// Tool name.
        tool: String,
    },
    /// A tool has neither parameters nor sample code.
    NoParamsOrSample {
        /// Tool name.
        tool: String,
    },
    /// A tool declares no parameters but its sample code passes arguments.
    SampleUsesUndeclaredArguments {
        /// Tool name.
        tool: String,
    },
    /// Two parameters of one tool share a name.
    DuplicateParam {
        /// Tool name.
        tool: String,
        /// Repeated parameter name.
        param: String,
    },
    /// A parameter has no description.
    MissingParamDescription {
        /// Tool name.
        tool: String,
        /// Parameter name.
        param: String,
    },
    /// A parameter is required yet carries a default.
    RequiredWithDefault {
        /// Tool name.
        tool: String,
        /// Parameter name.
        param: String,
    },
    /// A parameter type token is outside the accepted vocabulary.
    UnknownType {
        /// Tool name.
        tool: String,
        /// Parameter name.
        param: String,
        /// Type token as declared.
        ty: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingManifestName => f.write_str("Manifest has no name."),
            Self::NoTools => f.write_str("Manifest has no tools."),
            Self::MissingToolName { index } => write!(f, "Tool at index {index} has no name."),
            Self::InvalidToolName { name } => {
                write!(f, "Tool name '{name}' is not a valid function name.")
            }
            Self::DuplicateTool { name } => write!(f, "Duplicate tool name: '{name}'."),
            Self::MissingDescription { tool } => write!(f, "Tool '{tool}' has no description."),
            Self::NoParamsOrSample { tool } => {
                write!(f, "Tool '{tool}' has no params and no sample code.")
            }
            Self::SampleUsesUndeclaredArguments { tool } => write!(
                f,
                "Tool '{tool}' declares no params but its sample code passes arguments."
            ),
            Self::DuplicateParam { tool, param } => {
                write!(f, "Tool '{tool}' declares param '{param}' more than once.")
            }
            Self::MissingParamDescription { tool, param } => {
                write!(f, "Param '{param}' of tool '{tool}' has no description.")
            }
            Self::RequiredWithDefault { tool, param } => write!(
                f,
                "Param '{param}' of tool '{tool}' is required but has a default value."
            ),
            Self::UnknownType { tool, param, ty } => write!(
                f,
                "Param '{param}' of tool '{tool}' has unrecognized type '{ty}'."
            ),
        }
    }
}

/// Checks `manifest` for structural problems.
///
/// Every check runs independently, so one manifest can yield many warnings.
/// An empty result means the manifest is well-formed, not that the declared
/// tools exist on the live site.
#[must_use]
pub fn validate(manifest: &Manifest) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if manifest.name.trim().is_empty() {
        warnings.push(Warning::MissingManifestName);
    }
    if manifest.tools.is_empty() {
        warnings.push(Warning::NoTools);
    }

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for (index, tool) in manifest.tools.iter().enumerate() {
        if tool.name.trim().is_empty() {
            warnings.push(Warning::MissingToolName { index });
        } else if !is_identifier(&tool.name) {
            warnings.push(Warning::InvalidToolName {
                name: tool.name.clone(),
            });
        }
        if !tool.name.is_empty()
            && !seen.insert(tool.name.as_str())
            && reported.insert(tool.name.as_str())
        {
            warnings.push(Warning::DuplicateTool {
                name: tool.name.clone(),
            });
        }
        check_tool(tool, &mut warnings);
    }

    debug!(warnings = warnings.len(), "validated manifest");
    warnings
}

fn check_tool(tool: &Tool, warnings: &mut Vec<Warning>) {
    let name = || tool.name.clone();

    if tool.description.trim().is_empty() {
        warnings.push(Warning::MissingDescription { tool: name() });
    }
    if tool.params.is_empty() {
        match tool.sample_code.as_deref() {
            None => warnings.push(Warning::NoParamsOrSample { tool: name() }),
            Some(code) if passes_arguments(code, &tool.name) => {
                warnings.push(Warning::SampleUsesUndeclaredArguments { tool: name() });
            }
            Some(_) => {}
        }
    }

    let mut seen = HashSet::new();
    for param in &tool.params {
        if !seen.insert(param.name.as_str()) {
            warnings.push(Warning::DuplicateParam {
                tool: name(),
                param: param.name.clone(),
            });
        }
        if param.description.trim().is_empty() {
            warnings.push(Warning::MissingParamDescription {
                tool: name(),
                param: param.name.clone(),
            });
        }
        if param.required && param.default.is_some() {
            warnings.push(Warning::RequiredWithDefault {
                tool: name(),
                param: param.name.clone(),
            });
        }
        if !is_known_type(&param.ty) {
            warnings.push(Warning::UnknownType {
                tool: name(),
                param: param.name.clone(),
                ty: param.ty.clone(),
            });
        }
    }
}

/// Heuristic: does `code` call `tool(...)` with a non-empty argument list?
fn passes_arguments(code: &str, tool: &str) -> bool {
    if tool.is_empty() {
        return false;
    }
    let needle = format!("{tool}(");
    code.match_indices(&needle).any(|(start, _)| {
        let standalone = code[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_' || c == '$'));
        let args = &code[start + needle.len()..];
        let mut depth = 1usize;
        let end = args.char_indices().find_map(|(idx, c)| {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            (depth == 0).then_some(idx)
        });
        standalone && end.is_some_and(|end| !args[..end].trim().is_empty())
    })
}

/// Returns `true` when `ty` is in the accepted type vocabulary.
///
/// Accepts primitives, string/number literals, `T[]`, `Array<T>`,
/// `Record<K, V>`, inline `{ ... }` shapes, parenthesised types and `|`
/// unions of those. An empty token (undeclared type) is accepted.
#[must_use]
pub fn is_known_type(ty: &str) -> bool {
    let ty = ty.trim();
    ty.is_empty() || split_top_level(ty, '|').into_iter().all(is_known_member)
}

fn is_known_member(member: &str) -> bool {
    let member = member.trim();
    if member.is_empty() {
        return false;
    }
    if let Some(element) = member.strip_suffix("[]") {
        return is_known_member(element);
    }
    if let Some(inner) = member.strip_prefix('(').and_then(|m| m.strip_suffix(')')) {
        return !inner.trim().is_empty() && is_known_type(inner);
    }
    if member.starts_with('{') && member.ends_with('}') {
        return true;
    }
    if let Some(inner) = generic_args(member, "Array") {
        return is_known_type(inner);
    }
    if let Some(inner) = generic_args(member, "Record") {
        let parts = split_top_level(inner, ',');
        return parts.len() == 2
            && parts
                .into_iter()
                .all(|part| !part.trim().is_empty() && is_known_type(part));
    }
    let quoted = member.len() >= 2
        && ['"', '\'', '`']
            .iter()
            .any(|q| member.starts_with(*q) && member.ends_with(*q));
    let numeric = member.starts_with(|c: char| c.is_ascii_digit() || c == '-')
        && member.parse::<f64>().is_ok();
    quoted || numeric || PRIMITIVE_TYPES.contains(&member)
}

fn generic_args<'a>(member: &'a str, name: &str) -> Option<&'a str> {
    member
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('<')?
        .strip_suffix('>')
}

/// Parses `text` and validates the result.
///
/// # Errors
///
/// Returns the [`webagent_parser::ParseError`] when the text does not parse.
pub fn validate_markdown(text: &str) -> ParseResult<Vec<Warning>> {
    Ok(validate(&parse(text)?))
}
