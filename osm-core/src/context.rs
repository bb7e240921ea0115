//! Cancellation and deadlines for in-flight requests.
//!
//! A [`Context`] is passed to every operation. When it is cancelled through its
//! [`CancelHandle`], or its deadline passes, the pending call returns
//! [`Error::Cancelled`] or [`Error::DeadlineExceeded`] without waiting for the
//! remote side. Contexts form a tree: a child is done as soon as any ancestor is.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use tokio::{sync::watch, time::Instant};

use crate::Error;

#[derive(Debug, Clone, Default)]
pub struct Context {
    parent: Option<Arc<Context>>,
    cancel: Option<Arc<watch::Sender<bool>>>,
    deadline: Option<Instant>,
}

/// Cancels the context it was created with, and all contexts derived from it.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<watch::Sender<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

impl Context {
    /// Root context: never cancelled, no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a child that can be cancelled independently of `self`.
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let (tx, _) = watch::channel(false);
        let tx = Arc::new(tx);

        let child = Self {
            parent: Some(Arc::new(self.clone())),
            cancel: Some(Arc::clone(&tx)),
            deadline: self.deadline,
        };

        (child, CancelHandle(tx))
    }

    /// Derive a child that expires `timeout` from now.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a child that expires at `deadline`, or earlier if `self` does.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        };

        Self {
            parent: Some(Arc::new(self.clone())),
            cancel: None,
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        let own = self.cancel.as_ref().is_some_and(|tx| *tx.borrow());
        own || self.parent.as_ref().is_some_and(|p| p.is_cancelled())
    }

    /// Why this context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<Error> {
        if self.is_cancelled() {
            return Some(Error::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Error::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub async fn done(&self) -> Error {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.cancelled() => Error::Cancelled,
                _ = tokio::time::sleep_until(deadline) => Error::DeadlineExceeded,
            },
            None => {
                self.cancelled().await;
                Error::Cancelled
            }
        }
    }

    fn cancelled(&self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            match (&self.cancel, &self.parent) {
                (Some(tx), Some(parent)) => tokio::select! {
                    _ = wait_for_cancel(tx) => {},
                    _ = parent.cancelled() => {},
                },
                (Some(tx), None) => wait_for_cancel(tx).await,
                (None, Some(parent)) => parent.cancelled().await,
                (None, None) => std::future::pending::<()>().await,
            }
        })
    }
}

async fn wait_for_cancel(tx: &watch::Sender<bool>) {
    let mut rx = tx.subscribe();
    // The sender is borrowed from a live context, so the channel cannot close.
    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}
