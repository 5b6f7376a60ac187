//! Async agent facade: configuration, conversation state, request entry
//! points.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::chat::complete::run_loop;
use crate::chat::stream::CompletedTurn;
use crate::chat::{Reply, TokenStream};
use crate::config::AgentConfig;
use crate::error::Result;
use crate::history::History;
use crate::tools::Tool;
use crate::transport::{openai::OpenAiTransport, ChatRequest, ChatTransport};
use crate::types::{Message, ToolCall};

/// The facade object holding configuration and conversation history.
///
/// One logical request at a time: every history-touching entry point takes
/// `&mut self`, so concurrent misuse is a compile error rather than
/// undefined behavior.
pub struct Agent {
    config: AgentConfig,
    transport: Arc<dyn ChatTransport>,
    history: History,
    last_tool_calls: Vec<ToolCall>,
    committed_tx: mpsc::UnboundedSender<CompletedTurn>,
    committed_rx: mpsc::UnboundedReceiver<CompletedTurn>,
}

impl Agent {
    /// Create an agent speaking to the configured OpenAI-compatible
    /// endpoint.
    pub fn new(config: AgentConfig) -> Self {
        let transport = Arc::new(OpenAiTransport::new(&config));
        Self::with_transport(config, transport)
    }

    /// Create an agent over a custom transport.
    pub fn with_transport(config: AgentConfig, transport: Arc<dyn ChatTransport>) -> Self {
        let (committed_tx, committed_rx) = mpsc::unbounded_channel();
        let history = History::new(config.system_prompt.as_deref());
        Self {
            config,
            transport,
            history,
            last_tool_calls: Vec::new(),
            committed_tx,
            committed_rx,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Current history, with any finished streamed turns absorbed.
    pub fn history(&mut self) -> &History {
        self.absorb_streamed();
        &self.history
    }

    /// Send a prompt and return the model's reply.
    pub async fn request(&mut self, prompt: impl Into<String>) -> Result<Reply> {
        self.request_with_tools(prompt, &[], true).await
    }

    /// Send a prompt with tools available to the model.
    ///
    /// With `auto_use_tools`, matching tool calls are executed locally and
    /// their results fed back until the model answers in text (bounded by
    /// `max_round_trips`). Otherwise, or when no registered tool matches,
    /// the raw directive is surfaced unexecuted.
    pub async fn request_with_tools(
        &mut self,
        prompt: impl Into<String>,
        tools: &[Arc<dyn Tool>],
        auto_use_tools: bool,
    ) -> Result<Reply> {
        self.absorb_streamed();
        self.history.push(Message::user(prompt));

        if self.config.debug {
            debug!(
                model = %self.config.model,
                history = self.history.len(),
                tools = tools.len(),
                auto_use_tools,
                "sending request"
            );
        }

        let reply = run_loop(
            self.transport.as_ref(),
            &mut self.history,
            &self.config.model,
            self.config.temperature,
            tools,
            auto_use_tools,
            self.config.max_round_trips,
        )
        .await?;

        self.last_tool_calls = reply.tool_calls().to_vec();
        Ok(reply)
    }

    /// Stream a reply as text fragments.
    ///
    /// The user prompt and the assistant text are committed to history only
    /// once the stream is fully consumed; an abandoned or failed stream
    /// leaves history untouched for the turn.
    pub async fn stream(&mut self, prompt: impl Into<String>) -> Result<TokenStream> {
        self.absorb_streamed();
        let prompt = prompt.into();

        let mut messages = self.history.snapshot();
        messages.push(Message::user(prompt.clone()));
        let request = ChatRequest {
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            messages,
            tools: Vec::new(),
        };

        if self.config.debug {
            debug!(model = %self.config.model, history = self.history.len(), "streaming request");
        }

        let inner = self.transport.stream(&request).await?;
        Ok(TokenStream::new(inner, prompt, self.committed_tx.clone()))
    }

    /// Clear the conversation, optionally replacing the system prompt.
    pub fn reset(&mut self, new_system: Option<&str>) {
        self.absorb_streamed();
        self.history.reset(new_system);
        self.last_tool_calls.clear();
    }

    /// Tool calls surfaced by the most recent request, if any.
    pub fn last_tool_calls(&self) -> &[ToolCall] {
        &self.last_tool_calls
    }

    fn absorb_streamed(&mut self) {
        while let Ok(turn) = self.committed_rx.try_recv() {
            self.history.push(turn.user);
            self.history.push(turn.assistant);
        }
    }
}
