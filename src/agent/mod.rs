//! Agent facades (async and blocking) over the chat loop.

pub mod agent;
pub mod blocking;

pub use agent::Agent;
pub use blocking::{BlockingAgent, BlockingTokenStream};
