//! Convenience re-exports for common use.

pub use crate::agent::{Agent, BlockingAgent};
pub use crate::chat::{Reply, TokenStream};
pub use crate::config::AgentConfig;
pub use crate::error::{JoaoError, Result};
pub use crate::history::History;
pub use crate::tools::{FnTool, ParamKind, Tool, ToolArguments, ToolSpec};
pub use crate::transport::{ChatReply, ChatRequest, ChatTransport};
pub use crate::types::{FinishReason, Message, Role, StreamDelta, StreamEvent, ToolCall};
