//! One-shot delayed work owned by whoever scheduled it.

use std::{future::Future, time::Duration};

use tokio::{runtime::Handle, task::JoinHandle};

/// A fire-once task running after a fixed delay.
///
/// Dropping the handle aborts the task if it has not fired yet, so a torn-down
/// session never runs a stale callback.
#[derive(Debug)]
pub struct DeferredTask {
    handle: JoinHandle<()>,
}

impl DeferredTask {
    /// Schedules `work` on `runtime` after `delay`.
    pub fn after<F>(runtime: &Handle, delay: Duration, work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            work.await;
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the task to fire. Used by front ends that want to block on
    /// the side effect instead of polling.
    pub async fn wait(mut self) {
        let _ = (&mut self.handle).await;
    }
}

impl Drop for DeferredTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
