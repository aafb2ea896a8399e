use serde::{Deserialize, Serialize};

/// How a capture session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOutcome {
    /// The configured end instant was reached.
    Completed,
    /// A graceful stop was requested (advance signal).
    Stopped,
    /// The operator aborted (keypress, SIGINT, SIGUSR2, SIGPIPE).
    Aborted,
}

/// Result returned when a capture session ends without a fatal error.
///
/// Serializable for JSON export alongside the recorded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub frames_captured: u64,
    /// Cycles whose completion overran the interval, forcing the schedule
    /// to re-anchor to the actual completion time.
    pub frames_delayed: u64,
    pub outcome: SessionOutcome,
}
