//! LLM-facing context assembled from a manifest.
//!
//! An agent presents a site to a model as one TypeScript declaration plus the
//! author's prose, and offers a single [`EXECUTE_JS_TOOL`] the model calls
//! with code written against that declaration.

use serde_json::{Value, json};
use webagent_model::Manifest;

use crate::error::GenerationResult;
use crate::typescript::generate_typescript;

/// Name of the generic code-execution tool offered to the model.
pub const EXECUTE_JS_TOOL: &str = "execute_js";

/// Returns the declarations followed by the manifest prose in a comment.
///
/// # Errors
///
/// Propagates [`crate::GenerationError`] from [`generate_typescript`].
pub fn context_for_llm(manifest: &Manifest) -> GenerationResult<String> {
    let declarations = generate_typescript(manifest)?;
    let prose = manifest.context_text();
    if prose.is_empty() {
        return Ok(declarations);
    }
    Ok(format!(
        "{declarations}\n/*\n{}\n*/\n",
        prose.replace("*/", "*\\/")
    ))
}

/// Builds a complete system prompt describing the site and how to call it.
///
/// # Errors
///
/// Propagates [`crate::GenerationError`] from [`generate_typescript`].
pub fn system_prompt(manifest: &Manifest, task: Option<&str>) -> GenerationResult<String> {
    let site = if manifest.name.is_empty() {
        "this website"
    } else {
        manifest.name.as_str()
    };
    let context = context_for_llm(manifest)?;

    let mut prompt = format!(
        "You are interacting with a website called '{site}'. \
         You have access to the following TypeScript API that runs in the browser:\n\n\
         {context}\n\
         Use the {EXECUTE_JS_TOOL} tool to write JavaScript code that calls these functions. \
         Use `await` for async calls and `return` the final result. \
         Chain multiple calls in a single code block when needed. \
         If you need information to complete a request, look it up with the available tools \
         instead of asking the user. When you're done, briefly summarize what you did."
    );
    if let Some(task) = task.map(str::trim).filter(|task| !task.is_empty()) {
        prompt.push_str("\n\nTask: ");
        prompt.push_str(task);
    }
    Ok(prompt)
}

/// Function-calling schema for [`EXECUTE_JS_TOOL`], in the OpenAI format
/// most providers accept.
#[must_use]
pub fn execute_js_schema() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": EXECUTE_JS_TOOL,
            "description": "Execute JavaScript code in the browser. \
                Use the global.* functions from the TypeScript API. \
                Use `await` for async calls and `return` the final result. \
                You can chain multiple calls in one code block.",
            "parameters": {
                "type": "object",
                "properties": {
                    "code": {
                        "type": "string",
                        "description": "JavaScript code to execute in the browser."
                    }
                },
                "required": ["code"]
            }
        }
    })
}
