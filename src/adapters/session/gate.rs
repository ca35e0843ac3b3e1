//! SessionGate - Cancellable mutual exclusion for login+request cycles.
//!
//! The gate owns a single ticket (a one-permit semaphore). A caller races
//! ticket acquisition against its `DispatchContext`; the winner logs in,
//! performs its request, and drops the permit on every exit path, including
//! errors, cancellation mid-cycle, and the caller's future being dropped.
//!
//! ```text
//! do_with_session ─► acquire ticket ──(ctx done)──► Interrupted
//!                        │
//!                        ▼
//!                      login ──(err)──► Login      ┐
//!                        │                         │ ticket released
//!                        ▼                         │
//!                      send  ──(err)──► Request    │
//!                        │                         │
//!                        ▼                         │
//!                     response ────────────────────┘
//! ```

use thiserror::Error;
use tokio::sync::Semaphore;

use crate::domain::foundation::{DispatchContext, Interruption};
use crate::ports::SessionBackend;

/// Failures of one gated login+request cycle.
#[derive(Debug, Error)]
pub enum SessionError<E>
where
    E: std::error::Error + 'static,
{
    /// The context ended while waiting for the ticket or during the cycle.
    #[error("session cycle interrupted: {0}")]
    Interrupted(Interruption),

    /// Login failed; the request was not attempted.
    #[error("login failed: {0}")]
    Login(#[source] E),

    /// Login succeeded but the request failed.
    #[error("request failed: {0}")]
    Request(#[source] E),

    /// The ticket semaphore was closed.
    #[error("session gate closed")]
    Closed,
}

/// Serializes login+request cycles against one `SessionBackend`.
pub struct SessionGate<B> {
    backend: B,
    ticket: Semaphore,
}

impl<B: SessionBackend> SessionGate<B> {
    /// Creates a gate holding its single ticket.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            ticket: Semaphore::new(1),
        }
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// True when no cycle currently owns the ticket.
    pub fn is_available(&self) -> bool {
        self.ticket.available_permits() == 1
    }

    /// Logs in and performs `request`, holding the ticket for the whole cycle.
    ///
    /// Fails fast with `SessionError::Interrupted` when `ctx` ends before the
    /// ticket becomes available; in that case the backend is never touched.
    pub async fn do_with_session(
        &self,
        ctx: &DispatchContext,
        request: B::Request,
    ) -> Result<B::Response, SessionError<B::Error>> {
        let _ticket = tokio::select! {
            biased;
            reason = ctx.done() => return Err(SessionError::Interrupted(reason)),
            permit = self.ticket.acquire() => permit.map_err(|_| SessionError::Closed)?,
        };

        match ctx.run(self.backend.login()).await {
            Err(reason) => return Err(SessionError::Interrupted(reason)),
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "Session login failed");
                return Err(SessionError::Login(e));
            }
            Ok(Ok(())) => {}
        }

        match ctx.run(self.backend.send(request)).await {
            Err(reason) => Err(SessionError::Interrupted(reason)),
            Ok(result) => result.map_err(SessionError::Request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Debug, Error)]
    #[error("backend error: {0}")]
    struct BackendError(&'static str);

    /// Backend that records overlapping cycles.
    #[derive(Default)]
    struct InstrumentedBackend {
        in_cycle: AtomicUsize,
        max_in_cycle: AtomicUsize,
        logins: AtomicUsize,
        requests: AtomicUsize,
        fail_login: AtomicBool,
        fail_request: AtomicBool,
        request_delay_ms: AtomicUsize,
    }

    impl InstrumentedBackend {
        fn with_request_delay(delay: Duration) -> Self {
            let backend = Self::default();
            backend
                .request_delay_ms
                .store(delay.as_millis() as usize, Ordering::SeqCst);
            backend
        }
    }

    #[async_trait]
    impl SessionBackend for InstrumentedBackend {
        type Request = u32;
        type Response = u32;
        type Error = BackendError;

        async fn login(&self) -> Result<(), BackendError> {
            let now = self.in_cycle.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_cycle.fetch_max(now, Ordering::SeqCst);
            self.logins.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            if self.fail_login.load(Ordering::SeqCst) {
                self.in_cycle.fetch_sub(1, Ordering::SeqCst);
                return Err(BackendError("bad credentials"));
            }
            Ok(())
        }

        async fn send(&self, request: u32) -> Result<u32, BackendError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            let delay = self.request_delay_ms.load(Ordering::SeqCst) as u64;
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.in_cycle.fetch_sub(1, Ordering::SeqCst);
            if self.fail_request.load(Ordering::SeqCst) {
                return Err(BackendError("server error"));
            }
            Ok(request * 2)
        }
    }

    fn ctx(timeout: Duration) -> DispatchContext {
        DispatchContext::with_timeout(timeout)
    }

    #[tokio::test(start_paused = true)]
    async fn cycle_returns_response() {
        let gate = SessionGate::new(InstrumentedBackend::default());

        let response = gate.do_with_session(&ctx(Duration::from_secs(1)), 21).await;

        assert_eq!(response.unwrap(), 42);
        assert_eq!(gate.backend().logins.load(Ordering::SeqCst), 1);
        assert!(gate.is_available());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_cycles_never_overlap() {
        let gate = Arc::new(SessionGate::new(InstrumentedBackend::with_request_delay(
            Duration::from_millis(20),
        )));

        let calls = (0..8u32).map(|i| {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                gate.do_with_session(&ctx(Duration::from_secs(10)), i).await
            })
        });
        let results = futures::future::join_all(calls).await;

        for (i, result) in results.into_iter().enumerate() {
            assert_eq!(result.unwrap().unwrap(), i as u32 * 2);
        }
        let backend = gate.backend();
        assert_eq!(backend.max_in_cycle.load(Ordering::SeqCst), 1);
        assert_eq!(backend.logins.load(Ordering::SeqCst), 8);
        assert!(gate.is_available());
    }

    #[tokio::test(start_paused = true)]
    async fn waiter_cancelled_while_queued_fails_fast_and_leaves_ticket() {
        let gate = Arc::new(SessionGate::new(InstrumentedBackend::with_request_delay(
            Duration::from_secs(5),
        )));

        let holder = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                gate.do_with_session(&ctx(Duration::from_secs(60)), 1).await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!gate.is_available());

        let started = Instant::now();
        let waiter = gate
            .do_with_session(&ctx(Duration::from_millis(100)), 2)
            .await;

        assert!(matches!(
            waiter,
            Err(SessionError::Interrupted(Interruption::DeadlineExceeded))
        ));
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(gate.backend().logins.load(Ordering::SeqCst), 1);

        assert_eq!(holder.await.unwrap().unwrap(), 2);
        assert!(gate.is_available());
        let next = gate.do_with_session(&ctx(Duration::from_secs(60)), 3).await;
        assert_eq!(next.unwrap(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_cancellation_while_queued_is_reported() {
        let gate = Arc::new(SessionGate::new(InstrumentedBackend::with_request_delay(
            Duration::from_secs(5),
        )));
        let holder = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                gate.do_with_session(&ctx(Duration::from_secs(60)), 1).await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let waiter_ctx = ctx(Duration::from_secs(60));
        let canceller = waiter_ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });
        let waiter = gate.do_with_session(&waiter_ctx, 2).await;

        assert!(matches!(
            waiter,
            Err(SessionError::Interrupted(Interruption::Cancelled))
        ));
        holder.await.unwrap().unwrap();
        assert!(gate.is_available());
    }

    #[tokio::test(start_paused = true)]
    async fn already_done_context_never_touches_backend() {
        let gate = SessionGate::new(InstrumentedBackend::default());
        let done = ctx(Duration::from_secs(1));
        done.cancel();

        let result = gate.do_with_session(&done, 1).await;

        assert!(matches!(result, Err(SessionError::Interrupted(_))));
        assert_eq!(gate.backend().logins.load(Ordering::SeqCst), 0);
        assert!(gate.is_available());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_login_skips_request_and_releases_ticket() {
        let backend = InstrumentedBackend::default();
        backend.fail_login.store(true, Ordering::SeqCst);
        let gate = SessionGate::new(backend);

        let result = gate.do_with_session(&ctx(Duration::from_secs(1)), 1).await;

        match result {
            Err(SessionError::Login(e)) => assert_eq!(e.0, "bad credentials"),
            other => panic!("expected login error, got {other:?}"),
        }
        assert_eq!(gate.backend().requests.load(Ordering::SeqCst), 0);
        assert!(gate.is_available());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_request_is_distinct_and_releases_ticket() {
        let backend = InstrumentedBackend::default();
        backend.fail_request.store(true, Ordering::SeqCst);
        let gate = SessionGate::new(backend);

        let result = gate.do_with_session(&ctx(Duration::from_secs(1)), 1).await;

        assert!(matches!(result, Err(SessionError::Request(_))));
        assert!(gate.is_available());

        gate.backend().fail_request.store(false, Ordering::SeqCst);
        let retry = gate.do_with_session(&ctx(Duration::from_secs(1)), 4).await;
        assert_eq!(retry.unwrap(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_during_request_releases_ticket() {
        let gate = SessionGate::new(InstrumentedBackend::with_request_delay(
            Duration::from_secs(30),
        ));

        let result = gate
            .do_with_session(&ctx(Duration::from_millis(200)), 1)
            .await;

        assert!(matches!(
            result,
            Err(SessionError::Interrupted(Interruption::DeadlineExceeded))
        ));
        assert!(gate.is_available());
    }
}
