//! Lazy token streaming with commit-on-completion semantics.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::types::{Message, StreamDelta, StreamEvent};

/// A finished streamed turn handed back to the owning agent.
#[derive(Debug)]
pub(crate) struct CompletedTurn {
    pub user: Message,
    pub assistant: Message,
}

/// Lazy, finite, non-restartable sequence of text fragments.
///
/// Fully consuming the stream commits the turn (the user prompt plus the
/// accumulated assistant text) to the owning agent's history. Dropping the
/// stream early, or hitting a transport error mid-stream, commits nothing:
/// history is left unmodified for that turn.
pub struct TokenStream {
    inner: BoxStream<'static, Result<StreamDelta>>,
    prompt: String,
    collected: String,
    failed: bool,
    finished: bool,
    committer: Option<mpsc::UnboundedSender<CompletedTurn>>,
}

impl TokenStream {
    pub(crate) fn new(
        inner: BoxStream<'static, Result<StreamDelta>>,
        prompt: String,
        committer: mpsc::UnboundedSender<CompletedTurn>,
    ) -> Self {
        Self {
            inner,
            prompt,
            collected: String::new(),
            failed: false,
            finished: false,
            committer: Some(committer),
        }
    }

    fn commit(&mut self) {
        if self.failed {
            return;
        }
        if let Some(tx) = self.committer.take() {
            let _ = tx.send(CompletedTurn {
                user: Message::user(std::mem::take(&mut self.prompt)),
                assistant: Message::assistant(std::mem::take(&mut self.collected)),
            });
        }
    }

    /// Drain the stream and return the concatenated text.
    pub async fn collect_text(mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(fragment) = self.next().await {
            text.push_str(&fragment?);
        }
        Ok(text)
    }
}

impl Stream for TokenStream {
    type Item = Result<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }
        loop {
            match this.inner.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(delta))) => match delta.event {
                    StreamEvent::TextDelta if !delta.text.is_empty() => {
                        this.collected.push_str(&delta.text);
                        return Poll::Ready(Some(Ok(delta.text)));
                    }
                    StreamEvent::Done => {
                        this.finished = true;
                        this.commit();
                        return Poll::Ready(None);
                    }
                    // Tool-call deltas and empty fragments are not part of
                    // the token sequence.
                    _ => continue,
                },
                Poll::Ready(Some(Err(e))) => {
                    this.failed = true;
                    this.finished = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => {
                    this.finished = true;
                    this.commit();
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
