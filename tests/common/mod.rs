//! Shared test helpers and mock transport.
#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream::BoxStream;

use joao::config::AgentConfig;
use joao::error::{JoaoError, Result};
use joao::transport::{ChatReply, ChatRequest, ChatTransport};
use joao::types::{FinishReason, StreamDelta, StreamEvent, ToolCall};

/// Canned-reply transport that records every request it receives.
pub struct MockTransport {
    replies: std::sync::Mutex<Vec<ChatReply>>,
    requests: std::sync::Mutex<Vec<ChatRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: std::sync::Mutex::new(Vec::new()),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Queue a plain text reply.
    pub fn queue_text(&self, text: &str) {
        self.replies.lock().unwrap().push(ChatReply {
            text: Some(text.to_string()),
            tool_calls: Vec::new(),
            finish_reason: Some(FinishReason::Stop),
        });
    }

    /// Queue an arbitrary composed reply.
    pub fn queue_reply(&self, reply: ChatReply) {
        self.replies.lock().unwrap().push(reply);
    }

    /// Queue a tool-call reply.
    pub fn queue_tool_call(&self, id: &str, name: &str, arguments: serde_json::Value) {
        self.replies.lock().unwrap().push(ChatReply {
            text: None,
            tool_calls: vec![ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments,
            }],
            finish_reason: Some(FinishReason::ToolCalls),
        });
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.requests.lock().unwrap().push(request.clone());
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(JoaoError::Protocol("mock transport exhausted".into()));
        }
        Ok(replies.remove(0))
    }

    async fn stream(
        &self,
        request: &ChatRequest,
    ) -> Result<BoxStream<'static, Result<StreamDelta>>> {
        self.requests.lock().unwrap().push(request.clone());
        let text = {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(JoaoError::Protocol("mock transport exhausted".into()));
            }
            replies.remove(0).text.unwrap_or_default()
        };

        // Chop the canned text into small fragments, then the Done marker.
        let stream = async_stream::stream! {
            for chunk in text.chars().collect::<Vec<_>>().chunks(5) {
                yield Ok(StreamDelta {
                    text: chunk.iter().collect(),
                    event: StreamEvent::TextDelta,
                    tool_call: None,
                    finish_reason: None,
                });
            }
            yield Ok(StreamDelta {
                text: String::new(),
                event: StreamEvent::Done,
                tool_call: None,
                finish_reason: Some(FinishReason::Stop),
            });
        };
        Ok(Box::pin(stream))
    }
}

/// A config with explicit values everywhere, immune to the environment.
pub fn test_config() -> AgentConfig {
    AgentConfig::builder()
        .api_key("test-key")
        .base_url("https://chat.test.invalid/v1")
        .model("test-model")
        .build()
        .expect("test config builds")
}

/// Same, with a system prompt.
pub fn test_config_with_system(system: &str) -> AgentConfig {
    AgentConfig::builder()
        .api_key("test-key")
        .base_url("https://chat.test.invalid/v1")
        .model("test-model")
        .system_prompt(system)
        .build()
        .expect("test config builds")
}
