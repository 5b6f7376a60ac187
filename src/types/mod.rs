//! Core types for joao.

pub mod message;
pub mod stream;

pub use message::*;
pub use stream::*;
