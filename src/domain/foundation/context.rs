//! Deadline-bound cancellation context.
//!
//! A `DispatchContext` is created by the inbound boundary for every event and
//! threaded through the dispatch engine, every handler, and any session gate a
//! handler uses. It ends either when its deadline passes or when it (or its
//! parent token) is cancelled, whichever happens first.
//!
//! # Example
//!
//! ```ignore
//! let ctx = DispatchContext::with_timeout(Duration::from_secs(120));
//! let body = ctx.run(http.get(url).send()).await??;
//! ```

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a context stopped accepting work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interruption {
    /// The context deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The context was cancelled explicitly (or through its parent).
    #[error("context cancelled")]
    Cancelled,
}

/// Cancellation context carrying an absolute deadline.
///
/// Cloning is cheap; clones share the same token and deadline.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    deadline: Instant,
    token: CancellationToken,
}

impl DispatchContext {
    /// Creates a context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Creates a context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline,
            token: CancellationToken::new(),
        }
    }

    /// Creates a context that expires `timeout` from now and is also cancelled
    /// whenever `parent` is cancelled (e.g. on process shutdown).
    pub fn child_of(parent: &CancellationToken, timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
            token: parent.child_token(),
        }
    }

    /// Creates a context with a fresh deadline `timeout` from now that is
    /// still cancelled together with this one.
    ///
    /// Used for follow-up work that must outlive this context's deadline but
    /// not its cancellation.
    pub fn renewed(&self, timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
            token: self.token.child_token(),
        }
    }

    /// The absolute deadline.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left until the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Cancels this context and every clone of it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns the interruption if the context is already done.
    pub fn err(&self) -> Option<Interruption> {
        if self.token.is_cancelled() {
            Some(Interruption::Cancelled)
        } else if Instant::now() >= self.deadline {
            Some(Interruption::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Resolves once the context is done, reporting why.
    pub async fn done(&self) -> Interruption {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Interruption::Cancelled,
            _ = tokio::time::sleep_until(self.deadline) => Interruption::DeadlineExceeded,
        }
    }

    /// Races `fut` against the context.
    ///
    /// The future is dropped (and thereby aborted) if the context ends first.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Interruption>
    where
        F: Future,
    {
        if let Some(reason) = self.err() {
            return Err(reason);
        }
        tokio::select! {
            biased;
            output = fut => Ok(output),
            reason = self.done() => Err(reason),
        }
    }
}
