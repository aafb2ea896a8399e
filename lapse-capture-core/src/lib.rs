//! # lapse-capture-core
//!
//! Platform-agnostic timelapse capture core library.
//!
//! Schedules periodic still captures at a fixed interval, feeds each
//! completed frame through a hardware-backed encoder, and tracks buffer
//! ownership across the asynchronous encoder completions. Platform layers
//! supply the camera stack, the encoder, and the cancellation triggers by
//! implementing the collaborator traits.
//!
//! ## Architecture
//!
//! ```text
//! lapse-capture-core (this crate)
//! ├── traits/    ← CaptureDevice, FrameEncoder, OutputSink
//! ├── models/    ← LapseError, LapseConfiguration, CancelToken, SessionSummary
//! ├── pipeline/  ← EncodePipeline, BufferLifecycleTracker
//! └── session/   ← LapseSession (scheduler), autofocus prelude
//! ```
//!
//! The scheduling loop runs on one thread; encoder completions arrive on
//! the encoder's own worker context. The outstanding-buffer FIFO is the
//! only structure shared between the two and is mutex-protected; encoder
//! completions are assumed to arrive strictly in submission order.

pub mod models;
pub mod pipeline;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::cancel::{CancelEvent, CancelToken, WaitOutcome};
pub use models::capture::{
    AfMode, AfStatus, AfTrigger, CaptureMetadata, CaptureMode, CompletedCapture, Control,
    ControlList, DeviceEvent, StreamInfo,
};
pub use models::config::{parse_interval, LapseConfiguration, DEFAULT_FRAMERATE};
pub use models::error::LapseError;
pub use models::summary::{SessionOutcome, SessionSummary};
pub use pipeline::buffer_tracker::BufferLifecycleTracker;
pub use pipeline::encode::EncodePipeline;
pub use session::autofocus::AutofocusOutcome;
pub use session::scheduler::LapseSession;
pub use traits::capture_device::CaptureDevice;
pub use traits::frame_encoder::{FrameEncoder, InputDoneCallback, OutputReadyCallback};
pub use traits::output_sink::OutputSink;
