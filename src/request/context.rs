//! Per-call deadline and cancellation.
//!
//! A [`CallContext`] travels with every client operation and is applied to
//! each outbound exchange of that operation: the crumb fetch, the call
//! itself and every redirect hop. Dropping the operation's future cancels
//! it as well; the context covers callers that cannot simply drop.
//!
//! # Examples
//!
//! ```ignore
//! use jenkins_client::CallContext;
//! use std::time::Duration;
//!
//! let ctx = CallContext::with_timeout(Duration::from_secs(5));
//! let root = client.root_info(&ctx).await?;
//!
//! let (ctx, cancel) = CallContext::background().cancellable();
//! tokio::spawn(async move { cancel.cancel() });
//! let result = client.job_get(&ctx, "demo", 0).await;
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::{JenkinsError, Result};

/// Deadline and cancellation signal shared by the exchanges of one call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Cancels every call using the paired [`CallContext`].
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancel in-flight and future calls made with the paired context.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

impl CallContext {
    /// No deadline, no cancellation.
    pub fn background() -> Self {
        Self::default()
    }

    /// Fail calls that are still running after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Fail calls that are still running at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        CallContext {
            deadline: Some(deadline),
            cancel: None,
        }
    }

    /// Attach a cancellation signal, keeping any deadline.
    pub fn cancellable(mut self) -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        self.cancel = Some(receiver);
        (self, CancelHandle { sender })
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` without a deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// True once the paired [`CancelHandle`] has fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|receiver| *receiver.borrow())
            .unwrap_or(false)
    }

    /// Run `exchange` unless the context expires or is cancelled first.
    pub(crate) async fn run<T, F>(&self, exchange: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_cancelled() {
            return Err(JenkinsError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(JenkinsError::Timeout);
            }
        }

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        let cancelled = async {
            match self.cancel.clone() {
                Some(mut receiver) => loop {
                    if *receiver.borrow_and_update() {
                        break;
                    }
                    if receiver.changed().await.is_err() {
                        // Handle dropped without cancelling.
                        std::future::pending::<()>().await;
                    }
                },
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = exchange => result,
            _ = expired => Err(JenkinsError::Timeout),
            _ = cancelled => Err(JenkinsError::Cancelled),
        }
    }
}
