// Single-resolution result handoff
//
// The engine resolves or rejects each request exactly once, from whatever
// task the store completion runs on. The consuming side is an ordinary
// future the caller can await or drop; dropping abandons the request
// without cancelling anything at the store.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::debug;

use crate::error::{Error, Result};

/// Producer half: resolves or rejects the paired [`ResponseFuture`].
#[derive(Debug)]
pub struct Deferred<T> {
    sender: Option<oneshot::Sender<Result<T>>>,
}

/// Consumer half: a future yielding the engine result.
#[derive(Debug)]
pub struct ResponseFuture<T> {
    receiver: oneshot::Receiver<Result<T>>,
}

impl<T> Deferred<T> {
    /// Create a linked producer/consumer pair.
    pub fn new() -> (Deferred<T>, ResponseFuture<T>) {
        let (sender, receiver) = oneshot::channel();
        (
            Deferred {
                sender: Some(sender),
            },
            ResponseFuture { receiver },
        )
    }

    /// Resolve with a value. A second resolution is ignored.
    pub fn resolve(&mut self, value: T) {
        self.complete(Ok(value));
    }

    /// Reject with an error. A second resolution is ignored.
    pub fn reject(&mut self, error: Error) {
        self.complete(Err(error));
    }

    fn complete(&mut self, outcome: Result<T>) {
        match self.sender.take() {
            // An Err here means the consumer dropped the future; the
            // outcome has nowhere to go, which is the abandon contract.
            Some(sender) => {
                let _ = sender.send(outcome);
            }
            None => debug!("deferred already completed; ignoring resolution"),
        }
    }
}

impl<T> Future for ResponseFuture<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|received| match received {
            Ok(outcome) => outcome,
            Err(_) => Err(Error::Abandoned),
        })
    }
}
