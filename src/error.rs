//! Error types for joao.

use thiserror::Error;

/// Primary error type for all joao operations.
#[derive(Error, Debug)]
pub enum JoaoError {
    /// Missing or invalid configuration (API key, endpoint). Fatal at
    /// construction; never raised per-request.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The endpoint answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    /// The response shape was unrecognized (no choices, a turn with neither
    /// text nor tool calls, an undecodable stream chunk).
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Stream error: {0}")]
    Stream(String),

    /// A local tool rejected its arguments or failed. Fed back to the model
    /// as an error-flagged tool result rather than surfaced to the caller.
    #[error("Tool execution error in '{tool_name}': {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The tool loop hit its configured bound without reaching a text
    /// answer.
    #[error("Tool loop exceeded {limit} round-trips")]
    RoundTripLimit { limit: usize },
}

impl JoaoError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn tool_execution(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, JoaoError>;
