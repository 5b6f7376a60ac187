//! Round-trip orchestration: the tool invocation loop and stream plumbing.

pub mod complete;
pub mod stream;

pub use complete::Reply;
pub use stream::TokenStream;
