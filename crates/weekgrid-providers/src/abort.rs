//! Render-time abort signal.
//!
//! The rendering side can give up on a frame while a fetch is still in
//! flight. It holds an [`AbortHandle`]; the fetch holds the matching
//! [`AbortSignal`] and races its request against it. An aborted fetch
//! resolves to [`ProviderErrorCode::Cancelled`](crate::ProviderErrorCode),
//! which callers must treat as "no result", never as "zero events".

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

/// The owning side of an abort signal.
#[derive(Debug, Clone)]
pub struct AbortHandle {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Default for AbortHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortHandle {
    /// Creates a handle in the not-aborted state.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    /// Raises the abort. Idempotent.
    pub fn abort(&self) {
        let _ = self.tx.send(true);
    }

    /// Returns true once [`abort`](Self::abort) has been called.
    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Returns a signal observing this handle.
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            rx: Some(self.rx.clone()),
        }
    }
}

/// The observing side of an abort signal.
///
/// [`AbortSignal::never`] builds a signal that can't fire, for callers
/// without a render loop.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl AbortSignal {
    /// A signal that is never raised.
    pub fn never() -> Self {
        Self { rx: None }
    }

    /// Returns true if the abort has been raised.
    pub fn is_aborted(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Completes when the abort is raised. Pends forever for
    /// [`never`](Self::never) signals or when the handle is dropped unraised.
    pub async fn aborted(&self) {
        let Some(mut rx) = self.rx.clone() else {
            return std::future::pending().await;
        };
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return std::future::pending().await;
            }
        }
    }

    /// Runs `fut` unless the abort fires first.
    ///
    /// Returns a cancellation error without polling `fut` if the signal is
    /// already raised.
    pub async fn guard<F, T>(&self, operation: &str, fut: F) -> ProviderResult<T>
    where
        F: Future<Output = ProviderResult<T>>,
    {
        if self.is_aborted() {
            debug!(operation, "Skipping fetch, abort already raised");
            return Err(ProviderError::cancelled(format!("{} aborted", operation)));
        }

        tokio::select! {
            biased;
            _ = self.aborted() => {
                debug!(operation, "Fetch aborted in flight");
                Err(ProviderError::cancelled(format!("{} aborted", operation)))
            }
            result = fut => result,
        }
    }
}
