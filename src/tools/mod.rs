//! Tool registration and invocation support.

pub mod spec;
pub mod tool;

pub use spec::{ParamKind, ParamSpec, ToolSpec, ToolSpecBuilder};
pub use tool::{FnTool, Tool, ToolArguments};
