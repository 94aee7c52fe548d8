//! TypeScript declaration output.

use std::fmt::Write as _;

use tracing::debug;
use webagent_model::{Manifest, Param, Tool};

use crate::error::{GenerationError, GenerationResult};

const EMPTY_DECLARATION: &str = "declare const global: {};\n";
const UNKNOWN_TYPE: &str = "any";

/// Generates the `declare const global` block for every tool in `manifest`.
///
/// Tools and parameters keep manifest order. Optional parameters carry a `?`
/// marker wherever they appear. Tools without an output resolve to
/// `Promise<any>`.
///
/// ```
/// use webagent_codegen::generate_typescript;
/// use webagent_model::{Manifest, Param, Tool};
///
/// let tool = Tool::builder("search")
///     .description("Search products.")
///     .param(Param::required("query", "string"))
///     .param(Param::optional("limit", "number").with_default("20"))
///     .build()
///     .unwrap();
/// let manifest = Manifest::builder("Store").tool(tool).build();
///
/// let ts = generate_typescript(&manifest).unwrap();
/// assert!(ts.contains("search(query: string, limit?: number): Promise<any>;"));
/// ```
///
/// # Errors
///
/// Returns [`GenerationError`] when a tool or parameter name is blank.
pub fn generate_typescript(manifest: &Manifest) -> GenerationResult<String> {
    check_names(manifest)?;

    if manifest.tools.is_empty() {
        return Ok(EMPTY_DECLARATION.to_owned());
    }

    let declarations: Vec<String> = manifest.tools.iter().map(tool_declaration).collect();
    debug!(tools = declarations.len(), "generated typescript declarations");
    Ok(format!(
        "declare const global: {{\n{}\n}};\n",
        declarations.join("\n\n")
    ))
}

fn check_names(manifest: &Manifest) -> GenerationResult<()> {
    for (index, tool) in manifest.tools.iter().enumerate() {
        if tool.name.trim().is_empty() {
            return Err(GenerationError::EmptyToolName { index });
        }
        if let Some(index) = tool.params.iter().position(|p| p.name.trim().is_empty()) {
            return Err(GenerationError::EmptyParamName {
                tool: tool.name.clone(),
                index,
            });
        }
    }
    Ok(())
}

/// Keeps prose from closing the surrounding comment.
fn comment_safe(text: &str) -> String {
    text.replace("*/", "*\\/")
}

fn tool_declaration(tool: &Tool) -> String {
    let mut doc = Vec::new();
    for line in tool.description.lines() {
        doc.push(comment_safe(line.trim_end()));
    }
    if tool.params.iter().any(|p| !p.description.is_empty() || p.default.is_some()) {
        if !doc.is_empty() {
            doc.push(String::new());
        }
        for param in &tool.params {
            let mut line = format!("@param {} -", param.name);
            if !param.description.is_empty() {
                let _ = write!(line, " {}", comment_safe(&param.description));
            }
            if let Some(default) = &param.default {
                let _ = write!(line, " (default: {})", comment_safe(default));
            }
            doc.push(line);
        }
    }

    let mut out = String::new();
    if !doc.is_empty() {
        out.push_str("  /**\n");
        for line in doc {
            if line.is_empty() {
                out.push_str("   *\n");
            } else {
                let _ = writeln!(out, "   * {line}");
            }
        }
        out.push_str("   */\n");
    }

    let params: Vec<String> = tool.params.iter().map(param_declaration).collect();
    let output = tool
        .output
        .as_deref()
        .map(str::trim)
        .filter(|output| !output.is_empty())
        .unwrap_or(UNKNOWN_TYPE);
    let _ = write!(
        out,
        "  {}({}): Promise<{}>;",
        tool.name,
        params.join(", "),
        output.lines().collect::<Vec<_>>().join("\n  ")
    );
    out
}

fn param_declaration(param: &Param) -> String {
    let marker = if param.required { "" } else { "?" };
    format!("{}{marker}: {}", param.name, ts_type(param))
}

/// Maps a parameter's type token to the TypeScript type emitted for it.
///
/// Tokens pass through verbatim except `object` and `array`, which widen to
/// `Record<string, unknown>` and `unknown[]`. An undeclared type is derived
/// from the default literal when one is present, else `any`.
#[must_use]
pub fn ts_type(param: &Param) -> String {
    match param.ty.trim() {
        "" => param
            .default
            .as_deref()
            .and_then(type_of_literal)
            .unwrap_or(UNKNOWN_TYPE)
            .to_owned(),
        "object" => "Record<string, unknown>".to_owned(),
        "array" => "unknown[]".to_owned(),
        other => other.to_owned(),
    }
}

fn type_of_literal(literal: &str) -> Option<&'static str> {
    let literal = literal.trim();
    let first = literal.chars().next()?;
    match first {
        '"' | '\'' | '`' => Some("string"),
        '[' => Some("unknown[]"),
        '{' => Some("Record<string, unknown>"),
        _ if literal == "true" || literal == "false" => Some("boolean"),
        _ if literal.parse::<f64>().is_ok() => Some("number"),
        _ => None,
    }
}
