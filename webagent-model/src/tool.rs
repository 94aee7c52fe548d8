//! Tool declarations and their builders.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::param::Param;

/// One callable function a site exposes to agents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    /// Bare function-call name, unique within a manifest.
    pub name: String,
    /// Summary shown as a documentation comment in generated output.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Parameters in call-site order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
    /// Type of the resolved result; `None` means unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Invocation example, carried through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_code: Option<String>,
}

impl Tool {
    /// Starts building a [`Tool`] with full control over every parameter.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ToolBuilder {
        ToolBuilder {
            name: name.into(),
            description: String::new(),
            params: Vec::new(),
            output: None,
            sample_code: None,
        }
    }

    /// Convenience constructor where every parameter is required.
    ///
    /// Each parameter is a `(name, type, description)` triple. Optional or
    /// defaulted parameters need [`Tool::builder`] and [`Param::optional`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] when the tool name is blank.
    pub fn with_required_params<'a, I>(
        name: impl Into<String>,
        description: impl Into<String>,
        params: I,
    ) -> ModelResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        params
            .into_iter()
            .fold(
                Tool::builder(name).description(description),
                |builder, (name, ty, description)| {
                    builder.param(Param::required(name, ty).with_description(description))
                },
            )
            .build()
    }

    /// Returns the parameter with the supplied name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|param| param.name == name)
    }

    /// Iterates over required parameters in declaration order.
    pub fn required_params(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|param| param.required)
    }
}

/// Builder for [`Tool`].
#[derive(Debug)]
pub struct ToolBuilder {
    name: String,
    description: String,
    params: Vec<Param>,
    output: Option<String>,
    sample_code: Option<String>,
}

impl ToolBuilder {
    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Sets the output type.
    #[must_use]
    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Sets the sample code snippet.
    #[must_use]
    pub fn sample_code(mut self, code: impl Into<String>) -> Self {
        self.sample_code = Some(code.into());
        self
    }

    /// Consumes the builder and returns the tool.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if the tool name or any parameter
    /// name is blank.
    pub fn build(self) -> ModelResult<Tool> {
        if self.name.trim().is_empty() {
            return Err(ModelError::blank("tool", &self.name));
        }
        if let Some(param) = self.params.iter().find(|p| p.name.trim().is_empty()) {
            return Err(ModelError::blank("parameter", &param.name));
        }

        Ok(Tool {
            name: self.name,
            description: self.description,
            params: self.params,
            output: self.output,
            sample_code: self.sample_code,
        })
    }
}
