use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::models::capture::CompletedCapture;
use crate::models::error::LapseError;
use crate::traits::output_sink::OutputSink;

/// Tracks capture buffers currently owned by the encoder.
///
/// Buffers are held in a FIFO: the encoder's input-done notifications are
/// assumed to arrive strictly in submission order, so each notification
/// releases the oldest outstanding entry. Out-of-order completion is a
/// documented limitation of this design, not handled.
///
/// Submission happens on the scheduling thread, consumption on the
/// encoder's worker context, so the queue is mutex-protected throughout.
pub struct BufferLifecycleTracker {
    queue: Mutex<VecDeque<Arc<CompletedCapture>>>,
    emptied: Condvar,
    sink: Option<Arc<dyn OutputSink>>,
    metadata_enabled: bool,
}

impl BufferLifecycleTracker {
    pub fn new(sink: Option<Arc<dyn OutputSink>>, metadata_enabled: bool) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            emptied: Condvar::new(),
            sink,
            metadata_enabled,
        }
    }

    /// Register a capture as outstanding. Extends the buffer's ownership
    /// until the matching input-done notification arrives.
    pub fn submit(&self, capture: Arc<CompletedCapture>) {
        self.queue.lock().push_back(capture);
    }

    /// Release the oldest outstanding buffer in response to the encoder's
    /// input-done notification.
    ///
    /// A notification with nothing outstanding means the encoder signalled
    /// completion for a buffer that was never submitted — an unrecoverable
    /// protocol violation, never a silent no-op.
    pub fn on_input_consumed(&self) -> Result<Arc<CompletedCapture>, LapseError> {
        let released = {
            let mut queue = self.queue.lock();
            let capture = queue.pop_front().ok_or_else(|| {
                LapseError::ProtocolViolation(
                    "input-done signalled with no outstanding buffer".into(),
                )
            })?;
            if queue.is_empty() {
                self.emptied.notify_all();
            }
            capture
        };

        if self.metadata_enabled && !released.metadata.is_empty() {
            if let Some(sink) = &self.sink {
                sink.metadata_ready(&released.metadata);
            }
        }
        Ok(released)
    }

    pub fn outstanding(&self) -> usize {
        self.queue.lock().len()
    }

    /// Wait up to `grace` for in-flight completions to land, then forcibly
    /// release whatever is left.
    ///
    /// Returns the number of buffers that were never acknowledged; any
    /// non-zero count is logged as an error rather than silently dropped.
    pub fn drain(&self, grace: Duration) -> usize {
        let deadline = Instant::now() + grace;
        let mut queue = self.queue.lock();
        while !queue.is_empty() {
            if self.emptied.wait_until(&mut queue, deadline).timed_out() {
                break;
            }
        }
        let leaked = queue.len();
        if leaked > 0 {
            log::error!(
                "releasing {} buffer(s) never acknowledged by the encoder",
                leaked
            );
            queue.clear();
        }
        leaked
    }
}
