//! Detached bookkeeping tasks.
//!
//! Work that must outlive the request that triggered it (failure counting,
//! counter clearing, email dispatch) is spawned here. Each task runs under
//! its own timeout and logs its failure; nothing is returned to a caller.

use std::future::Future;
use std::time::Duration;

use tokio_util::task::TaskTracker;
use tracing::{debug, error, warn};

use warden_core::result::AppResult;

/// Runner for detached tasks, trackable so they can be drained on shutdown.
#[derive(Debug, Clone)]
pub struct BackgroundTasks {
    tracker: TaskTracker,
    task_timeout: Duration,
}

impl BackgroundTasks {
    /// Create a runner whose tasks are each bounded by `task_timeout`.
    pub fn new(task_timeout: Duration) -> Self {
        Self {
            tracker: TaskTracker::new(),
            task_timeout,
        }
    }

    /// Spawn `task` detached from the caller.
    pub fn spawn<F>(&self, name: &'static str, task: F)
    where
        F: Future<Output = AppResult<()>> + Send + 'static,
    {
        let timeout = self.task_timeout;
        self.tracker.spawn(async move {
            match tokio::time::timeout(timeout, task).await {
                Ok(Ok(())) => debug!(task = name, "Background task completed"),
                Ok(Err(e)) => error!(task = name, error = %e, "Background task failed"),
                Err(_) => warn!(
                    task = name,
                    timeout_seconds = timeout.as_secs(),
                    "Background task timed out"
                ),
            }
        });
    }

    /// Number of tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Wait for every task spawned so far. Returns `false` if `limit` elapsed
    /// first. New tasks may still be spawned afterwards.
    pub async fn drain(&self, limit: Duration) -> bool {
        self.tracker.close();
        let finished = tokio::time::timeout(limit, self.tracker.wait())
            .await
            .is_ok();
        self.tracker.reopen();
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use warden_core::AppError;

    #[tokio::test]
    async fn test_drain_waits_for_spawned_tasks() {
        let tasks = BackgroundTasks::new(Duration::from_secs(5));
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let done = done.clone();
            tasks.spawn("count", async move {
                tokio::task::yield_now().await;
                done.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        assert!(tasks.drain(Duration::from_secs(5)).await);
        assert_eq!(done.load(Ordering::SeqCst), 3);
        assert_eq!(tasks.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_task_is_cut_off_by_its_timeout() {
        let tasks = BackgroundTasks::new(Duration::from_secs(2));
        tasks.spawn("stuck", std::future::pending());
        tasks.spawn("failing", async { Err(AppError::cache("unreachable")) });

        assert!(tasks.drain(Duration::from_secs(10)).await);
        assert_eq!(tasks.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_runner_accepts_work_after_drain() {
        let tasks = BackgroundTasks::new(Duration::from_secs(5));
        assert!(tasks.drain(Duration::from_secs(1)).await);

        let done = Arc::new(AtomicUsize::new(0));
        let counter = done.clone();
        tasks.spawn("after", async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        assert!(tasks.drain(Duration::from_secs(1)).await);
        assert_eq!(done.load(Ordering::SeqCst), 1);
    }
}
