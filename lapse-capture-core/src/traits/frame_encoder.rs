use std::sync::Arc;

use crate::models::capture::StreamInfo;
use crate::models::error::LapseError;

/// Callback invoked when the encoder has consumed an input buffer and it
/// may be recycled.
///
/// Fires on the encoder's worker context, not the scheduling thread — keep
/// processing minimal.
pub type InputDoneCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Callback invoked when encoded output is available.
///
/// Parameters: encoded bytes, presentation timestamp in microseconds, and
/// whether the frame is a keyframe.
pub type OutputReadyCallback = Arc<dyn Fn(&[u8], i64, bool) + Send + Sync + 'static>;

/// Interface to the hardware (or software) video encoder.
///
/// The encoder runs its own worker context: `encode_buffer` returns
/// immediately and completion is reported through the two callbacks,
/// strictly in submission order.
pub trait FrameEncoder: Send {
    fn start(&mut self) -> Result<(), LapseError>;

    /// Stop the encoder. Must be safe to call when already stopped.
    fn stop(&mut self) -> Result<(), LapseError>;

    fn set_input_done_callback(&mut self, callback: InputDoneCallback);

    fn set_output_ready_callback(&mut self, callback: OutputReadyCallback);

    /// Queue one raw buffer for encoding.
    ///
    /// `descriptor` identifies the underlying buffer (e.g. a dmabuf fd) for
    /// encoders that import memory directly; `memory` is the mapped plane.
    fn encode_buffer(
        &mut self,
        descriptor: i64,
        memory: &[u8],
        info: &StreamInfo,
        timestamp_us: i64,
    ) -> Result<(), LapseError>;
}
