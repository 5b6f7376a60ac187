//! Blocking agent facade for synchronous callers.

use std::sync::Arc;

use futures::StreamExt;

use crate::chat::{Reply, TokenStream};
use crate::config::AgentConfig;
use crate::error::{JoaoError, Result};
use crate::history::History;
use crate::tools::Tool;
use crate::types::ToolCall;

use super::Agent;

/// Blocking twin of [`Agent`]: identical semantics, with suspend points
/// replaced by blocking on an owned single-threaded runtime.
pub struct BlockingAgent {
    inner: Agent,
    runtime: Arc<tokio::runtime::Runtime>,
}

impl BlockingAgent {
    pub fn new(config: AgentConfig) -> Result<Self> {
        let transport = Arc::new(crate::transport::openai::OpenAiTransport::new(&config));
        Self::with_transport(config, transport)
    }

    /// Create a blocking agent over a custom transport.
    pub fn with_transport(
        config: AgentConfig,
        transport: Arc<dyn crate::transport::ChatTransport>,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| JoaoError::Configuration(format!("failed to start runtime: {e}")))?;
        Ok(Self {
            inner: Agent::with_transport(config, transport),
            runtime: Arc::new(runtime),
        })
    }

    pub fn config(&self) -> &AgentConfig {
        self.inner.config()
    }

    pub fn history(&mut self) -> &History {
        self.inner.history()
    }

    /// Send a prompt and block until the model replies.
    pub fn request(&mut self, prompt: impl Into<String>) -> Result<Reply> {
        self.runtime.block_on(self.inner.request(prompt))
    }

    /// Send a prompt with tools available to the model.
    pub fn request_with_tools(
        &mut self,
        prompt: impl Into<String>,
        tools: &[Arc<dyn Tool>],
        auto_use_tools: bool,
    ) -> Result<Reply> {
        self.runtime
            .block_on(self.inner.request_with_tools(prompt, tools, auto_use_tools))
    }

    /// Stream a reply as a blocking iterator of text fragments.
    pub fn stream(&mut self, prompt: impl Into<String>) -> Result<BlockingTokenStream> {
        let stream = self.runtime.block_on(self.inner.stream(prompt))?;
        Ok(BlockingTokenStream {
            stream,
            runtime: Arc::clone(&self.runtime),
        })
    }

    /// Clear the conversation, optionally replacing the system prompt.
    pub fn reset(&mut self, new_system: Option<&str>) {
        self.inner.reset(new_system);
    }

    pub fn last_tool_calls(&self) -> &[ToolCall] {
        self.inner.last_tool_calls()
    }
}

/// Blocking iterator over streamed text fragments.
///
/// Carries the same commit-on-completion contract as [`TokenStream`]:
/// dropping it before exhaustion leaves history unmodified for the turn.
pub struct BlockingTokenStream {
    stream: TokenStream,
    runtime: Arc<tokio::runtime::Runtime>,
}

impl BlockingTokenStream {
    /// Drain the iterator and return the concatenated text.
    pub fn collect_text(self) -> Result<String> {
        let Self { stream, runtime } = self;
        runtime.block_on(stream.collect_text())
    }
}

impl Iterator for BlockingTokenStream {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let Self { stream, runtime } = self;
        runtime.block_on(stream.next())
    }
}
