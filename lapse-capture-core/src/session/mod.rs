pub mod autofocus;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testutil {
    use std::collections::VecDeque;
    use std::sync::atomic::Ordering::SeqCst;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use parking_lot::Mutex;

    use crate::models::capture::{
        AfStatus, CaptureMetadata, CaptureMode, CompletedCapture, ControlList, DeviceEvent,
        StreamInfo,
    };
    use crate::models::error::LapseError;
    use crate::traits::capture_device::CaptureDevice;
    use crate::traits::frame_encoder::{
        FrameEncoder, InputDoneCallback, OutputReadyCallback,
    };
    use crate::traits::output_sink::OutputSink;

    #[derive(Default)]
    pub(crate) struct DeviceLog {
        pub opens: AtomicUsize,
        pub starts: AtomicUsize,
        pub stops: AtomicUsize,
        pub teardowns: AtomicUsize,
        pub waits: AtomicUsize,
        pub configures: Mutex<Vec<CaptureMode>>,
        pub controls: Mutex<Vec<ControlList>>,
    }

    pub(crate) enum ScriptedEvent {
        Timeout,
        Quit,
        Complete {
            delay: Duration,
            metadata: CaptureMetadata,
        },
    }

    impl ScriptedEvent {
        pub(crate) fn complete() -> Self {
            Self::Complete {
                delay: Duration::ZERO,
                metadata: CaptureMetadata::default(),
            }
        }

        pub(crate) fn complete_after(delay: Duration) -> Self {
            Self::Complete {
                delay,
                metadata: CaptureMetadata::default(),
            }
        }

        pub(crate) fn complete_with_af(status: AfStatus, lens_position: f64) -> Self {
            Self::Complete {
                delay: Duration::ZERO,
                metadata: CaptureMetadata {
                    af_status: Some(status),
                    lens_position: Some(lens_position),
                    ..Default::default()
                },
            }
        }
    }

    /// Scripted capture device: `wait` replays the script, then produces
    /// instant captures forever.
    pub(crate) struct MockDevice {
        log: Arc<DeviceLog>,
        script: Mutex<VecDeque<ScriptedEvent>>,
        sequence: u64,
    }

    impl MockDevice {
        pub(crate) fn new(script: Vec<ScriptedEvent>) -> (Self, Arc<DeviceLog>) {
            let log = Arc::new(DeviceLog::default());
            (
                Self {
                    log: Arc::clone(&log),
                    script: Mutex::new(script.into()),
                    sequence: 0,
                },
                log,
            )
        }
    }

    impl CaptureDevice for MockDevice {
        fn open(&mut self) -> Result<(), LapseError> {
            self.log.opens.fetch_add(1, SeqCst);
            Ok(())
        }

        fn configure(&mut self, mode: CaptureMode) -> Result<(), LapseError> {
            self.log.configures.lock().push(mode);
            Ok(())
        }

        fn start(&mut self) -> Result<(), LapseError> {
            self.log.starts.fetch_add(1, SeqCst);
            Ok(())
        }

        fn stop(&mut self) -> Result<(), LapseError> {
            self.log.stops.fetch_add(1, SeqCst);
            Ok(())
        }

        fn wait(&mut self) -> Result<DeviceEvent, LapseError> {
            self.log.waits.fetch_add(1, SeqCst);
            let event = self
                .script
                .lock()
                .pop_front()
                .unwrap_or_else(ScriptedEvent::complete);
            match event {
                ScriptedEvent::Timeout => Ok(DeviceEvent::Timeout),
                ScriptedEvent::Quit => Ok(DeviceEvent::Quit),
                ScriptedEvent::Complete { delay, metadata } => {
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    self.sequence += 1;
                    Ok(DeviceEvent::CaptureComplete(Arc::new(CompletedCapture {
                        descriptor: self.sequence as i64,
                        memory: vec![0u8; 16],
                        stream: StreamInfo {
                            width: 32,
                            height: 24,
                            stride: 32,
                        },
                        metadata,
                        sequence: self.sequence,
                    })))
                }
            }
        }

        fn set_controls(&mut self, controls: ControlList) -> Result<(), LapseError> {
            self.log.controls.lock().push(controls);
            Ok(())
        }

        fn teardown(&mut self) {
            self.log.teardowns.fetch_add(1, SeqCst);
        }
    }

    #[derive(Default)]
    pub(crate) struct EncoderLog {
        pub starts: AtomicUsize,
        pub stops: AtomicUsize,
        pub timestamps: Mutex<Vec<i64>>,
        pub input_done: Mutex<Option<InputDoneCallback>>,
        pub output_ready: Mutex<Option<OutputReadyCallback>>,
    }

    /// Encoder that completes each input from within `encode_buffer`, the
    /// way the real encoder does from its worker context.
    ///
    /// `completions_per_encode` > 1 simulates an encoder that signals more
    /// completions than it was given buffers.
    pub(crate) struct MockEncoder {
        log: Arc<EncoderLog>,
        completions_per_encode: usize,
    }

    impl MockEncoder {
        pub(crate) fn new(completions_per_encode: usize) -> (Self, Arc<EncoderLog>) {
            let log = Arc::new(EncoderLog::default());
            (
                Self {
                    log: Arc::clone(&log),
                    completions_per_encode,
                },
                log,
            )
        }
    }

    impl FrameEncoder for MockEncoder {
        fn start(&mut self) -> Result<(), LapseError> {
            self.log.starts.fetch_add(1, SeqCst);
            Ok(())
        }

        fn stop(&mut self) -> Result<(), LapseError> {
            self.log.stops.fetch_add(1, SeqCst);
            Ok(())
        }

        fn set_input_done_callback(&mut self, callback: InputDoneCallback) {
            *self.log.input_done.lock() = Some(callback);
        }

        fn set_output_ready_callback(&mut self, callback: OutputReadyCallback) {
            *self.log.output_ready.lock() = Some(callback);
        }

        fn encode_buffer(
            &mut self,
            _descriptor: i64,
            memory: &[u8],
            _info: &StreamInfo,
            timestamp_us: i64,
        ) -> Result<(), LapseError> {
            assert!(!memory.is_empty());
            self.log.timestamps.lock().push(timestamp_us);
            let input_done = self.log.input_done.lock().clone();
            if let Some(done) = input_done {
                for _ in 0..self.completions_per_encode {
                    done();
                }
            }
            let output_ready = self.log.output_ready.lock().clone();
            if let Some(ready) = output_ready {
                ready(&[0u8; 8], timestamp_us, true);
            }
            Ok(())
        }
    }

    #[derive(Default)]
    pub(crate) struct CountingSink {
        pub outputs: AtomicUsize,
        pub metadata: Mutex<Vec<CaptureMetadata>>,
    }

    impl OutputSink for CountingSink {
        fn output_ready(&self, _data: &[u8], _timestamp_us: i64, _keyframe: bool) {
            self.outputs.fetch_add(1, SeqCst);
        }

        fn metadata_ready(&self, metadata: &CaptureMetadata) {
            self.metadata.lock().push(metadata.clone());
        }
    }
}
