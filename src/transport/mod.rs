//! Chat transport trait and request/reply shapes.

pub mod http;
pub mod openai;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;
use crate::tools::ToolSpec;
use crate::types::{FinishReason, Message, StreamDelta, ToolCall};

/// A transport-ready chat completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f64,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolSpec>,
}

/// A normalized, non-streaming reply from the endpoint: plain text, a
/// tool-call directive, or both (text alongside tool calls).
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: Option<FinishReason>,
}

impl ChatReply {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Core trait implemented by chat transports.
///
/// Failures are surfaced per-request and never retried at this layer;
/// timeouts and connection pooling belong to the underlying HTTP client.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Transport name for logging (e.g. "openai").
    fn name(&self) -> &str;

    /// Send a request and wait for the complete reply.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// Send a request and decode the reply as a lazy, finite,
    /// non-restartable sequence of deltas. Consuming the stream exhausts
    /// the underlying connection.
    async fn stream(&self, request: &ChatRequest)
        -> Result<BoxStream<'static, Result<StreamDelta>>>;
}
