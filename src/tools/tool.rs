//! Tool trait, closure-based wrapper, and argument coercion.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::spec::{ParamKind, ToolSpec};
use crate::error::JoaoError;

/// Arguments a tool call was made with, as supplied by the model.
#[derive(Debug, Clone, Default)]
pub struct ToolArguments {
    value: Value,
}

impl ToolArguments {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Coerce each argument toward its declared kind, best effort.
    /// Undeclared parameters and values that do not convert pass through
    /// untouched.
    pub fn coerced(self, spec: &ToolSpec) -> Self {
        let Value::Object(map) = self.value else {
            return self;
        };
        let coerced = map
            .into_iter()
            .map(|(name, value)| {
                let kind = spec.param(&name).map(|p| p.kind).unwrap_or(ParamKind::Any);
                (name, coerce(value, kind))
            })
            .collect();
        Self {
            value: Value::Object(coerced),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.value.get(name)
    }

    pub fn get_str(&self, name: &str) -> Result<&str, JoaoError> {
        self.get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| JoaoError::InvalidArgument(format!("missing string argument '{name}'")))
    }

    pub fn get_i64(&self, name: &str) -> Result<i64, JoaoError> {
        self.get(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| JoaoError::InvalidArgument(format!("missing integer argument '{name}'")))
    }

    pub fn get_f64(&self, name: &str) -> Result<f64, JoaoError> {
        self.get(name)
            .and_then(Value::as_f64)
            .ok_or_else(|| JoaoError::InvalidArgument(format!("missing number argument '{name}'")))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, JoaoError> {
        self.get(name)
            .and_then(Value::as_bool)
            .ok_or_else(|| JoaoError::InvalidArgument(format!("missing boolean argument '{name}'")))
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

fn coerce(value: Value, kind: ParamKind) -> Value {
    match (kind, value) {
        (ParamKind::Integer, Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(s),
        },
        (ParamKind::Integer, Value::Number(n)) => {
            match n.as_f64() {
                Some(f) if n.as_i64().is_none() && f.fract() == 0.0 => Value::from(f as i64),
                _ => Value::Number(n),
            }
        }
        (ParamKind::Number, Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::String(s)),
            Err(_) => Value::String(s),
        },
        (ParamKind::Boolean, Value::String(s)) => match s.trim() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(s),
        },
        (ParamKind::String, Value::Number(n)) => Value::String(n.to_string()),
        (ParamKind::String, Value::Bool(b)) => Value::String(b.to_string()),
        (_, value) => value,
    }
}

/// A locally registered callable the model may request by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The declarative schema this tool was registered with.
    fn spec(&self) -> &ToolSpec;

    /// Tool name (must match what the model calls).
    fn name(&self) -> &str {
        &self.spec().name
    }

    /// Execute with coerced arguments.
    async fn execute(&self, args: &ToolArguments) -> Result<Value, JoaoError>;
}

type ToolHandler = dyn Fn(ToolArguments) -> Pin<Box<dyn Future<Output = Result<Value, JoaoError>> + Send>>
    + Send
    + Sync;

/// Closure-based tool for quick registration.
pub struct FnTool {
    spec: ToolSpec,
    handler: Arc<ToolHandler>,
}

impl FnTool {
    /// Create a tool from a spec and an async closure.
    pub fn new<F, Fut>(spec: ToolSpec, handler: F) -> Self
    where
        F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, JoaoError>> + Send + 'static,
    {
        Self {
            spec,
            handler: Arc::new(move |args| Box::pin(handler(args))),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, args: &ToolArguments) -> Result<Value, JoaoError> {
        (self.handler)(args.clone()).await
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool").field("spec", &self.spec).finish()
    }
}
