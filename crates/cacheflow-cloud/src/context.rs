//! Caller-supplied cancellation, deadline and per-call timeout for remote calls
//!
//! A [`CallContext`] is bound into the external client for one
//! reconciliation tick. Every remote call races against the context so a
//! cancelled tick or an expired deadline aborts the in-flight request.

use crate::error::ApiError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct CallContext {
    cancelled: watch::Receiver<bool>,
    deadline: Option<Deadline>,
    call_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    budget: Duration,
}

/// Cancels every [`CallContext`] derived from it
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::background()
    }
}

impl CallContext {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self {
            cancelled: rx,
            deadline: None,
            call_timeout: None,
        }
    }

    /// A context plus the handle that cancels it
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            cancelled: rx,
            deadline: None,
            call_timeout: None,
        };
        (ctx, CancelHandle { tx: Arc::new(tx) })
    }

    /// Set a deadline `timeout` from now, replacing any earlier one
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Deadline {
            at: Instant::now() + timeout,
            budget: timeout,
        });
        self
    }

    /// Bound each remote call to `timeout`, measured from the start of that call.
    ///
    /// A caller deadline still applies; whichever expires first wins. `None`
    /// keeps the current per-call timeout.
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout.or(self.call_timeout);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline.map(|d| d.at)
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout
    }

    fn effective_deadline(&self) -> Option<Deadline> {
        let per_call = self.call_timeout.map(|budget| Deadline {
            at: Instant::now() + budget,
            budget,
        });
        match (self.deadline, per_call) {
            (Some(caller), Some(call)) if call.at < caller.at => Some(call),
            (Some(caller), _) => Some(caller),
            (None, call) => call,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Drive a remote call, aborting it on cancellation or deadline.
    pub async fn run<T, F>(&self, call: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if self.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let mut cancelled = self.cancelled.clone();
        let cancellation = async move {
            let signalled = cancelled.wait_for(|c| *c).await.map(|_| ()).is_ok();
            if !signalled {
                // handle dropped without cancelling
                std::future::pending::<()>().await;
            }
        };

        let deadline = self.effective_deadline();
        let bounded = async move {
            match deadline {
                Some(d) => match tokio::time::timeout_at(d.at, call).await {
                    Ok(result) => result,
                    Err(_) => Err(ApiError::DeadlineExceeded(d.budget)),
                },
                None => call.await,
            }
        };

        tokio::select! {
            biased;
            _ = cancellation => Err(ApiError::Cancelled),
            result = bounded => result,
        }
    }
}
