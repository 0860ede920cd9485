//! Per-screen lifetime scope.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Owns the cancellation token for one screen instance.
///
/// Work launched here is aborted when the scope closes. Completions that
/// outlive an await must still check [`ScreenScope::is_open`] (or the
/// token) before touching screen state.
pub struct ScreenScope {
    name: &'static str,
    token: CancellationToken,
    closed: AtomicBool,
}

impl ScreenScope {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            token: CancellationToken::new(),
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_open(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// A handle for tasks that need to check liveness after they resume.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Spawn `fut` on the runtime, bound to this scope.
    ///
    /// Does nothing once the scope is closed.
    pub fn launch<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if !self.is_open() {
            debug!(screen = self.name, "Launch after close ignored");
            return;
        }
        let token = self.token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = fut => {}
            }
        });
    }

    /// Resolves once the scope is closed.
    pub async fn closed(&self) {
        self.token.cancelled().await
    }

    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.token.cancel();
        debug!(screen = self.name, "Screen scope closed");
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        self.close();
    }
}
