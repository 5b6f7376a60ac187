//! Tool invocation loop.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{JoaoError, Result};
use crate::history::History;
use crate::tools::{Tool, ToolArguments, ToolSpec};
use crate::transport::{ChatRequest, ChatTransport};
use crate::types::{Message, ToolCall};

/// Outcome of a completed request.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// The model produced a final text answer.
    Text(String),
    /// The model requested tool calls that were not auto-executed; the raw
    /// directive is surfaced to the caller.
    ToolCalls(Vec<ToolCall>),
}

impl Reply {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::ToolCalls(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::ToolCalls(_) => None,
        }
    }

    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Text(_) => &[],
            Self::ToolCalls(calls) => calls,
        }
    }
}

/// Drive round-trips against `transport` until the model answers in text,
/// a tool call must be surfaced, or the round-trip bound is hit.
///
/// The user prompt must already be in `history`; executed tool calls and
/// their results are appended as the loop runs. A transport failure in any
/// round-trip propagates unchanged.
pub(crate) async fn run_loop(
    transport: &dyn ChatTransport,
    history: &mut History,
    model: &str,
    temperature: f64,
    tools: &[Arc<dyn Tool>],
    auto_use_tools: bool,
    max_round_trips: usize,
) -> Result<Reply> {
    let specs: Vec<ToolSpec> = tools.iter().map(|t| t.spec().clone()).collect();

    for round in 0..max_round_trips {
        let request = ChatRequest {
            model: model.to_string(),
            temperature,
            messages: history.snapshot(),
            tools: specs.clone(),
        };
        debug!(round, transport = transport.name(), "awaiting model");
        let reply = transport.complete(&request).await?;

        if !reply.has_tool_calls() {
            let text = reply.text.unwrap_or_default();
            history.push(Message::assistant(text.clone()));
            return Ok(Reply::Text(text));
        }

        history.push(Message::assistant_with_tool_calls(
            reply.text.clone(),
            reply.tool_calls.clone(),
        ));

        let any_registered = reply
            .tool_calls
            .iter()
            .any(|call| tools.iter().any(|t| t.name() == call.name));
        if !auto_use_tools || !any_registered {
            return Ok(Reply::ToolCalls(reply.tool_calls));
        }

        for call in &reply.tool_calls {
            let result = execute_call(tools, call).await;
            history.push_tool_result(&call.id, &call.name, result);
        }
    }

    Err(JoaoError::RoundTripLimit {
        limit: max_round_trips,
    })
}

/// Execute one call, folding any failure into a textual result the model
/// can adapt to.
async fn execute_call(tools: &[Arc<dyn Tool>], call: &ToolCall) -> String {
    let Some(tool) = tools.iter().find(|t| t.name() == call.name) else {
        warn!(tool = %call.name, "tool not registered");
        return format!("Error: tool '{}' is not registered", call.name);
    };

    let args = ToolArguments::new(call.arguments.clone()).coerced(tool.spec());
    match tool.execute(&args).await {
        Ok(serde_json::Value::String(text)) => text,
        Ok(value) => value.to_string(),
        Err(e) => {
            warn!(tool = %call.name, error = %e, "tool execution failed");
            format!("Error executing {}: {e}", call.name)
        }
    }
}
