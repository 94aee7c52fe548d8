//! Tool parameter declarations.

use serde::{Deserialize, Serialize};

/// One declared argument of a tool.
///
/// `ty` is an opaque type token (`string`, `number`, `"a" | "b"`,
/// `{ id: string }`, ...); an empty token means the manifest did not declare
/// a type. `default` holds the literal exactly as written, quotes included.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name, unique within its tool.
    pub name: String,
    /// Type token, empty when undeclared.
    #[serde(rename = "type", default)]
    pub ty: String,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Whether callers must supply the argument.
    pub required: bool,
    /// Default literal for optional parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Param {
    /// Creates a required parameter with the given type token.
    #[must_use]
    pub fn required(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            description: String::new(),
            required: true,
            default: None,
        }
    }

    /// Creates an optional parameter without a default.
    #[must_use]
    pub fn optional(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name, ty)
        }
    }

    /// Attaches a default literal. A defaulted parameter is never required.
    #[must_use]
    pub fn with_default(mut self, literal: impl Into<String>) -> Self {
        self.default = Some(literal.into());
        self.required = false;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns `true` when the parameter declares a type token.
    #[must_use]
    pub fn has_type(&self) -> bool {
        !self.ty.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_clears_required() {
        let param = Param::required("limit", "number").with_default("20");
        assert!(!param.required);
        assert_eq!(param.default.as_deref(), Some("20"));
    }

    #[test]
    fn optional_without_default() {
        let param = Param::optional("cursor", "string").with_description("Page cursor.");
        assert!(!param.required);
        assert!(param.default.is_none());
        assert_eq!(param.description, "Page cursor.");
    }

    #[test]
    fn serializes_type_field_name() {
        let json = serde_json::to_value(Param::required("query", "string")).unwrap();
        assert_eq!(json["type"], "string");
        assert!(json.get("default").is_none());
    }
}
