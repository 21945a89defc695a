//! Detached background work configuration.

use serde::{Deserialize, Serialize};

/// Limits for fire-and-forget bookkeeping tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundConfig {
    /// Deadline for a single background task, in seconds.
    #[serde(default = "default_task_timeout")]
    pub task_timeout_seconds: u64,
    /// How long shutdown waits for in-flight tasks, in seconds.
    #[serde(default = "default_drain_timeout")]
    pub drain_timeout_seconds: u64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            task_timeout_seconds: default_task_timeout(),
            drain_timeout_seconds: default_drain_timeout(),
        }
    }
}

fn default_task_timeout() -> u64 {
    10
}

fn default_drain_timeout() -> u64 {
    15
}
