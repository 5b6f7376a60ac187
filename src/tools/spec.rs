//! Declarative tool schemas.

use serde::{Deserialize, Serialize};

/// Primitive kind of a tool parameter.
///
/// `Any` is the permissive fallback: it constrains nothing on the wire and
/// skips argument coercion, so registering a tool never fails over a
/// parameter the schema cannot describe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Integer,
    Number,
    Boolean,
    Any,
}

impl ParamKind {
    fn json_type(self) -> Option<&'static str> {
        match self {
            Self::String => Some("string"),
            Self::Integer => Some("integer"),
            Self::Number => Some("number"),
            Self::Boolean => Some("boolean"),
            Self::Any => None,
        }
    }
}

/// A single declared parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
    pub required: bool,
}

/// Description of a callable the model may request by name.
///
/// Validated once at registration and reused for every request; immutable
/// after build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
}

impl ToolSpec {
    pub fn builder(name: impl Into<String>) -> ToolSpecBuilder {
        ToolSpecBuilder {
            name: name.into(),
            description: String::new(),
            params: Vec::new(),
        }
    }

    /// The declared parameter named `name`, if any.
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// JSON-Schema object for the wire:
    /// `{type, properties: {name: {type, description}}, required: [..]}`.
    pub fn schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for param in &self.params {
            let mut prop = serde_json::Map::new();
            if let Some(ty) = param.kind.json_type() {
                prop.insert("type".into(), ty.into());
            }
            if !param.description.is_empty() {
                prop.insert("description".into(), param.description.clone().into());
            }
            properties.insert(param.name.clone(), prop.into());
            if param.required {
                required.push(param.name.clone());
            }
        }
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Builder for [`ToolSpec`]. Building never fails.
#[derive(Debug, Clone)]
pub struct ToolSpecBuilder {
    name: String,
    description: String,
    params: Vec<ParamSpec>,
}

impl ToolSpecBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare a parameter of an explicit kind.
    pub fn param(
        mut self,
        name: impl Into<String>,
        kind: ParamKind,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            kind,
            description: description.into(),
            required,
        });
        self
    }

    /// Declare a string parameter.
    pub fn string(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.param(name, ParamKind::String, description, required)
    }

    /// Declare an integer parameter.
    pub fn integer(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.param(name, ParamKind::Integer, description, required)
    }

    /// Declare a number parameter.
    pub fn number(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.param(name, ParamKind::Number, description, required)
    }

    /// Declare a boolean parameter.
    pub fn boolean(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.param(name, ParamKind::Boolean, description, required)
    }

    /// Declare a parameter with no type constraint.
    pub fn any(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.param(name, ParamKind::Any, description, required)
    }

    pub fn build(self) -> ToolSpec {
        ToolSpec {
            name: self.name,
            description: self.description,
            params: self.params,
        }
    }
}
