use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::capture::CompletedCapture;
use crate::models::config::LapseConfiguration;
use crate::models::error::LapseError;
use crate::pipeline::buffer_tracker::BufferLifecycleTracker;
use crate::traits::frame_encoder::FrameEncoder;
use crate::traits::output_sink::OutputSink;

/// How long `stop` waits for in-flight encoder completions before forcibly
/// releasing whatever is still outstanding.
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Feeds completed captures to the encoder and tracks buffer ownership
/// until the encoder acknowledges each input as consumed.
///
/// Output timestamps are synthesized from a logical frame counter and the
/// configured frame rate, so the resulting stream plays back at that rate
/// regardless of the capture interval.
pub struct EncodePipeline<E: FrameEncoder> {
    encoder: E,
    sink: Arc<dyn OutputSink>,
    tracker: Arc<BufferLifecycleTracker>,
    // Fatal errors raised on the encoder's worker context, picked up by the
    // scheduling thread at its next poll point.
    fatal: Arc<Mutex<Option<LapseError>>>,
    frame_count: u64,
    framerate: f64,
    started: bool,
}

impl<E: FrameEncoder> EncodePipeline<E> {
    pub fn new(encoder: E, sink: Arc<dyn OutputSink>, config: &LapseConfiguration) -> Self {
        let tracker = Arc::new(BufferLifecycleTracker::new(
            Some(Arc::clone(&sink)),
            config.metadata,
        ));
        Self {
            encoder,
            sink,
            tracker,
            fatal: Arc::new(Mutex::new(None)),
            frame_count: 0,
            framerate: config.effective_framerate(),
            started: false,
        }
    }

    /// Wire the encoder callbacks and start it. Resets the frame counter.
    pub fn start(&mut self) -> Result<(), LapseError> {
        if self.started {
            return Ok(());
        }

        let tracker = Arc::clone(&self.tracker);
        let fatal = Arc::clone(&self.fatal);
        self.encoder.set_input_done_callback(Arc::new(move || {
            if let Err(err) = tracker.on_input_consumed() {
                log::error!("encoder completion: {}", err);
                fatal.lock().get_or_insert(err);
            }
        }));

        let sink = Arc::clone(&self.sink);
        self.encoder
            .set_output_ready_callback(Arc::new(move |data, timestamp_us, keyframe| {
                sink.output_ready(data, timestamp_us, keyframe);
            }));

        self.encoder.start()?;
        self.frame_count = 0;
        self.started = true;
        Ok(())
    }

    /// Hand one completed capture to the encoder.
    ///
    /// The capture stays registered as outstanding until the encoder's
    /// input-done notification releases it.
    pub fn submit(&mut self, capture: Arc<CompletedCapture>) -> Result<(), LapseError> {
        if !self.started {
            return Err(LapseError::EncoderNotStarted);
        }
        if capture.memory.is_empty() {
            return Err(LapseError::EmptyCaptureBuffer);
        }

        let timestamp_us = (self.frame_count as f64 * 1_000_000.0 / self.framerate) as i64;
        self.frame_count += 1;

        self.tracker.submit(Arc::clone(&capture));
        self.encoder.encode_buffer(
            capture.descriptor,
            &capture.memory,
            &capture.stream,
            timestamp_us,
        )
    }

    /// A fatal error recorded by an asynchronous completion, if any.
    pub fn take_fatal(&self) -> Option<LapseError> {
        self.fatal.lock().take()
    }

    /// Drain outstanding buffers (bounded by a grace period) and stop the
    /// encoder. Idempotent; safe to call even if `start` never ran.
    pub fn stop(&mut self) {
        if !self.started {
            return;
        }
        self.started = false;
        self.tracker.drain(DRAIN_GRACE);
        if let Err(err) = self.encoder.stop() {
            log::error!("failed to stop encoder: {}", err);
        }
    }

    #[cfg(test)]
    pub(crate) fn outstanding(&self) -> usize {
        self.tracker.outstanding()
    }
}
