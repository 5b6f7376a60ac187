//! joao: minimal client for OpenAI-style chat completion APIs.
//!
//! A thin orchestration layer: build a request payload from conversation
//! history and optional tool schemas, send it to a remote endpoint, parse
//! the response, optionally execute a locally registered tool and feed its
//! result back, and hand the final text (or a lazy token stream) to the
//! caller.
//!
//! # Quick Start
//!
//! ```no_run
//! use joao::prelude::*;
//!
//! # async fn example() -> joao::error::Result<()> {
//! let config = AgentConfig::builder()
//!     .system_prompt("You are helpful")
//!     .api_key("sk-...")
//!     .build()?;
//! let mut agent = Agent::new(config);
//! let reply = agent.request("2+2?").await?;
//! println!("{}", reply.text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod chat;
pub mod config;
pub mod error;
pub mod history;
pub mod prelude;
pub mod tools;
pub mod transport;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
