//! OpenAI-compatible Chat Completions transport.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Deserialize;
use tracing::debug;

use crate::config::AgentConfig;
use crate::error::{JoaoError, Result};
use crate::types::{FinishReason, Message, Role, StreamDelta, StreamEvent, ToolCall};

use super::http::{bearer_headers, parse_sse_data, shared_client, status_to_error};
use super::{ChatReply, ChatRequest, ChatTransport};

/// Transport speaking the `POST {base_url}/chat/completions` wire format.
pub struct OpenAiTransport {
    api_key: String,
    base_url: String,
}

impl OpenAiTransport {
    pub fn new(config: &AgentConfig) -> Self {
        Self::with_endpoint(config.api_key.clone(), config.base_url.clone())
    }

    pub fn with_endpoint(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            api_key: api_key.into(),
            base_url,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_body(&self, request: &ChatRequest, stream: bool) -> serde_json::Value {
        let messages: Vec<serde_json::Value> =
            request.messages.iter().map(wire_message).collect();

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": messages,
            "n": 1,
            "temperature": request.temperature,
            "stream": stream,
        });

        if !request.tools.is_empty() {
            let tools: Vec<serde_json::Value> = request
                .tools
                .iter()
                .map(|spec| {
                    serde_json::json!({
                        "type": "function",
                        "function": {
                            "name": spec.name,
                            "description": spec.description,
                            "parameters": spec.schema(),
                        }
                    })
                })
                .collect();
            body.as_object_mut()
                .expect("body is an object")
                .insert("tools".into(), tools.into());
        }

        body
    }
}

#[async_trait]
impl ChatTransport for OpenAiTransport {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply> {
        debug!(model = %request.model, messages = request.messages.len(), "chat completion");

        let resp = shared_client()
            .post(self.completions_url())
            .headers(bearer_headers(&self.api_key))
            .json(&self.build_body(request, false))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }

        let data: WireResponse = resp.json().await?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| JoaoError::Protocol("no choices in response".into()))?;

        let tool_calls: Vec<ToolCall> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(ToolCall::from)
            .collect();

        if choice.message.content.is_none() && tool_calls.is_empty() {
            return Err(JoaoError::Protocol(
                "response carried neither text nor tool calls".into(),
            ));
        }

        Ok(ChatReply {
            text: choice.message.content,
            tool_calls,
            finish_reason: choice.finish_reason.as_deref().and_then(parse_finish_reason),
        })
    }

    async fn stream(
        &self,
        request: &ChatRequest,
    ) -> Result<BoxStream<'static, Result<StreamDelta>>> {
        debug!(model = %request.model, messages = request.messages.len(), "chat completion (stream)");

        let resp = shared_client()
            .post(self.completions_url())
            .headers(bearer_headers(&self.api_key))
            .json(&self.build_body(request, true))
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }

        let byte_stream = resp.bytes_stream();

        let stream = async_stream::stream! {
            let mut buffer = String::new();
            futures::pin_mut!(byte_stream);

            while let Some(chunk) = byte_stream.next().await {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(JoaoError::Network(e));
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(line_end) = buffer.find('\n') {
                    let line: String = buffer.drain(..=line_end).collect();
                    let line = line.trim();
                    if line.is_empty() || line.starts_with(':') {
                        continue;
                    }
                    let Some(data) = parse_sse_data(line) else {
                        continue;
                    };
                    let chunk: WireStreamChunk = match serde_json::from_str(data) {
                        Ok(c) => c,
                        Err(e) => {
                            yield Err(JoaoError::Protocol(format!(
                                "undecodable stream chunk: {e}"
                            )));
                            return;
                        }
                    };
                    let Some(choice) = chunk.choices.into_iter().next() else {
                        continue;
                    };
                    for delta in decode_stream_choice(choice) {
                        yield Ok(delta);
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Expand one streamed choice into deltas: tool-call fragments first, then
/// text, then the terminal marker when a finish reason arrives.
fn decode_stream_choice(choice: WireStreamChoice) -> Vec<StreamDelta> {
    let mut deltas = Vec::new();
    for tc in choice.delta.tool_calls.unwrap_or_default() {
        deltas.push(StreamDelta {
            text: String::new(),
            event: StreamEvent::ToolCallDelta,
            tool_call: Some(ToolCall::from(tc)),
            finish_reason: None,
        });
    }
    if let Some(text) = choice.delta.content {
        if !text.is_empty() {
            deltas.push(StreamDelta {
                text,
                event: StreamEvent::TextDelta,
                tool_call: None,
                finish_reason: None,
            });
        }
    }
    if let Some(reason) = choice.finish_reason.as_deref() {
        deltas.push(StreamDelta {
            text: String::new(),
            event: StreamEvent::Done,
            tool_call: None,
            finish_reason: parse_finish_reason(reason),
        });
    }
    deltas
}

fn parse_finish_reason(s: &str) -> Option<FinishReason> {
    match s {
        "stop" => Some(FinishReason::Stop),
        "length" => Some(FinishReason::Length),
        "tool_calls" => Some(FinishReason::ToolCalls),
        "content_filter" => Some(FinishReason::ContentFilter),
        _ => None,
    }
}

fn wire_message(msg: &Message) -> serde_json::Value {
    let role = match msg.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    };

    if msg.role == Role::Tool {
        return serde_json::json!({
            "role": "tool",
            "content": msg.text(),
            "tool_call_id": msg.tool_call_id,
            "name": msg.name,
        });
    }

    if msg.has_tool_calls() {
        let tool_calls: Vec<serde_json::Value> = msg
            .tool_calls
            .iter()
            .map(|tc| {
                serde_json::json!({
                    "id": tc.id,
                    "type": "function",
                    "function": {
                        "name": tc.name,
                        "arguments": tc.arguments.to_string(),
                    }
                })
            })
            .collect();
        return serde_json::json!({
            "role": role,
            "content": msg.content,
            "tool_calls": tool_calls,
        });
    }

    serde_json::json!({ "role": role, "content": msg.text() })
}

// Wire response types (internal).

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: String,
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    #[serde(default)]
    name: String,
    #[serde(default)]
    arguments: String,
}

impl From<WireToolCall> for ToolCall {
    fn from(tc: WireToolCall) -> Self {
        // Arguments arrive as a JSON-encoded string; keep the raw string
        // when it does not decode.
        let arguments = serde_json::from_str(&tc.function.arguments)
            .unwrap_or(serde_json::Value::String(tc.function.arguments));
        Self {
            id: tc.id,
            name: tc.function.name,
            arguments,
        }
    }
}

#[derive(Deserialize)]
struct WireStreamChunk {
    #[serde(default)]
    choices: Vec<WireStreamChoice>,
}

#[derive(Deserialize)]
struct WireStreamChoice {
    #[serde(default)]
    delta: WireStreamDelta,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct WireStreamDelta {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}
