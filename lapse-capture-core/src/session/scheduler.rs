use std::sync::Arc;
use std::time::Instant;

use crate::models::cancel::{CancelEvent, CancelToken, WaitOutcome};
use crate::models::capture::{CaptureMode, DeviceEvent};
use crate::models::config::LapseConfiguration;
use crate::models::error::LapseError;
use crate::models::summary::{SessionOutcome, SessionSummary};
use crate::pipeline::encode::EncodePipeline;
use crate::session::autofocus::{af_lock_controls, run_autofocus_prelude, AutofocusOutcome};
use crate::traits::capture_device::CaptureDevice;
use crate::traits::frame_encoder::FrameEncoder;
use crate::traits::output_sink::OutputSink;

enum CycleOutcome {
    Captured,
    /// Device timed out; the schedule is retried without advancing.
    TimedOut,
}

/// Interval-driven still capture session.
///
/// One thread runs the whole schedule: wait for the next capture instant
/// (interruptible by the cancel token), trigger one capture, hand the
/// completed buffer to the encode pipeline, advance. Encoder completions
/// arrive asynchronously and are absorbed by the pipeline's tracker.
///
/// Drift policy: when a capture-and-encode cycle overruns the interval the
/// schedule re-anchors to the actual completion time and counts the frame
/// as delayed. Lost cadence is never recovered with back-to-back captures.
pub struct LapseSession<D: CaptureDevice, E: FrameEncoder> {
    device: D,
    pipeline: EncodePipeline<E>,
    cancel: Arc<CancelToken>,
    config: LapseConfiguration,
    frames_captured: u64,
    frames_delayed: u64,
    device_running: bool,
    torn_down: bool,
}

impl<D: CaptureDevice, E: FrameEncoder> LapseSession<D, E> {
    pub fn new(
        device: D,
        encoder: E,
        sink: Arc<dyn OutputSink>,
        config: LapseConfiguration,
        cancel: Arc<CancelToken>,
    ) -> Self {
        let pipeline = EncodePipeline::new(encoder, sink, &config);
        Self {
            device,
            pipeline,
            cancel,
            config,
            frames_captured: 0,
            frames_delayed: 0,
            device_running: false,
            torn_down: false,
        }
    }

    /// Run the session to completion, cancellation, or fatal error.
    ///
    /// Device and encoder teardown always runs before this returns, on the
    /// error path included.
    pub fn run(&mut self) -> Result<SessionSummary, LapseError> {
        if self.torn_down {
            return Err(LapseError::ConfigurationFailed(
                "session already consumed".into(),
            ));
        }
        self.config
            .validate()
            .map_err(LapseError::ConfigurationFailed)?;
        self.config.log_settings();

        let result = self.run_inner();
        self.teardown();

        log::info!("captured frames = {}", self.frames_captured);
        log::info!("delayed frames = {}", self.frames_delayed);

        match result {
            Ok(outcome) => Ok(SessionSummary {
                frames_captured: self.frames_captured,
                frames_delayed: self.frames_delayed,
                outcome,
            }),
            Err(err) => {
                log::error!("capture session failed: {}", err);
                Err(err)
            }
        }
    }

    fn run_inner(&mut self) -> Result<SessionOutcome, LapseError> {
        self.device.open()?;

        if self.config.autofocus_on_capture {
            self.device.configure(CaptureMode::Viewfinder)?;
            self.start_device()?;
            let af = run_autofocus_prelude(&mut self.device, &self.cancel)?;
            if af == AutofocusOutcome::Cancelled {
                return Ok(SessionOutcome::Aborted);
            }
            self.stop_device();
            self.device.teardown();
        }

        self.device.configure(CaptureMode::Still)?;
        if self.config.autofocus_on_capture {
            // Pin the lens where the scan left it for the whole schedule.
            self.device.set_controls(af_lock_controls())?;
        }

        self.pipeline.start()?;
        self.run_schedule()
    }

    fn run_schedule(&mut self) -> Result<SessionOutcome, LapseError> {
        let mut next_capture = Instant::now();
        let end_capture = next_capture + self.config.duration;

        let wall_start = chrono::Local::now();
        let wall_end = wall_start
            + chrono::Duration::from_std(self.config.duration).unwrap_or(chrono::Duration::zero());
        log::info!("start time: {}", wall_start.format("%Y-%m-%d %H:%M:%S"));
        log::info!("end time: {}", wall_end.format("%Y-%m-%d %H:%M:%S"));

        while next_capture <= end_capture {
            if let Some(fatal) = self.pipeline.take_fatal() {
                return Err(fatal);
            }
            match self.cancel.take() {
                CancelEvent::AbortRequested => return Ok(SessionOutcome::Aborted),
                CancelEvent::StopRequested => return Ok(SessionOutcome::Stopped),
                CancelEvent::None => {}
            }

            match self.cancel.wait_deadline(next_capture) {
                WaitOutcome::Cancelled(CancelEvent::AbortRequested) => {
                    return Ok(SessionOutcome::Aborted)
                }
                WaitOutcome::Cancelled(_) => return Ok(SessionOutcome::Stopped),
                WaitOutcome::DeadlineReached => {}
            }

            match self.capture_one()? {
                // Retry at the next iteration without advancing the
                // schedule; repeated timeouts are bounded only by the
                // operator cancelling.
                CycleOutcome::TimedOut => continue,
                CycleOutcome::Captured => {
                    self.frames_captured += 1;
                    next_capture += self.config.interval;
                    let now = Instant::now();
                    if now > next_capture {
                        let overrun = now - next_capture;
                        log::warn!(
                            "next frame capture delayed by {}ms",
                            overrun.as_millis()
                        );
                        next_capture = now;
                        self.frames_delayed += 1;
                    }
                }
            }
        }
        // A fatal raised during the last cycle has no further iteration to
        // surface it, so poll the slot once more before declaring success.
        if let Some(fatal) = self.pipeline.take_fatal() {
            return Err(fatal);
        }
        Ok(SessionOutcome::Completed)
    }

    /// One capture-and-encode cycle. The capture is awaited; the encode
    /// submission is asynchronous.
    fn capture_one(&mut self) -> Result<CycleOutcome, LapseError> {
        self.start_device()?;
        match self.device.wait()? {
            DeviceEvent::Timeout => {
                log::error!("device timeout detected, attempting a restart");
                self.stop_device();
                self.start_device()?;
                Ok(CycleOutcome::TimedOut)
            }
            DeviceEvent::CaptureComplete(capture) => {
                self.stop_device();
                self.pipeline.submit(capture)?;
                Ok(CycleOutcome::Captured)
            }
            DeviceEvent::Quit => Err(LapseError::UnexpectedEvent(
                "device quit while a capture was pending".into(),
            )),
        }
    }

    fn start_device(&mut self) -> Result<(), LapseError> {
        if !self.device_running {
            self.device.start()?;
            self.device_running = true;
        }
        Ok(())
    }

    fn stop_device(&mut self) {
        if self.device_running {
            self.device_running = false;
            if let Err(err) = self.device.stop() {
                log::error!("failed to stop device: {}", err);
            }
        }
    }

    /// Stop the device and the encode pipeline. Runs at most once; both
    /// stops are required to be idempotent so a restart-interrupted state
    /// cannot double-free anything.
    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.device_running = false;
        if let Err(err) = self.device.stop() {
            log::error!("failed to stop device: {}", err);
        }
        self.pipeline.stop();
    }
}
