//! Request context with deadline and cancellation
//!
//! Every async trait method takes a `Context` as its first argument so that
//! long-running API calls can observe timeouts and cancellation.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time;

#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    deadline: Option<Instant>,
    done: watch::Receiver<bool>,
    done_tx: watch::Sender<bool>,
}

impl Context {
    pub fn new() -> Self {
        let (done_tx, done) = watch::channel(false);

        Self {
            inner: Arc::new(ContextInner {
                deadline: None,
                done,
                done_tx,
            }),
        }
    }

    /// Derives a context that is cancelled once `timeout` elapses.
    /// Must be called from within a tokio runtime.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        let (done_tx, done) = watch::channel(*self.inner.done.borrow());

        let timer_tx = done_tx.clone();
        let mut parent = self.inner.done.clone();
        tokio::spawn(async move {
            let parent_cancelled = async move {
                let cancelled = parent.wait_for(|cancelled| *cancelled).await.is_ok();
                // A dropped parent never cancels
                if !cancelled {
                    std::future::pending::<()>().await;
                }
            };
            tokio::select! {
                _ = time::sleep_until(deadline.into()) => {}
                _ = parent_cancelled => {}
            }
            let _ = timer_tx.send(true);
        });

        Self {
            inner: Arc::new(ContextInner {
                deadline: Some(deadline),
                done,
                done_tx,
            }),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.done.borrow()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Receiver that flips to `true` when the work should stop
    pub fn done(&self) -> watch::Receiver<bool> {
        self.inner.done.clone()
    }

    pub fn cancel(&self) {
        let _ = self.inner.done_tx.send(true);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
