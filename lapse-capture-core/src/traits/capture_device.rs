use crate::models::capture::{CaptureMode, ControlList, DeviceEvent};
use crate::models::error::LapseError;

/// Interface to the camera device driver.
///
/// The driver owns buffer and memory management; the core only sees opaque
/// completed captures. Implementations back this with a real camera stack
/// or, in tests, a scripted mock.
pub trait CaptureDevice: Send {
    /// Open the device. Called once before any other operation.
    fn open(&mut self) -> Result<(), LapseError>;

    /// Select a stream configuration. May be called again after `teardown`
    /// to switch modes (viewfinder for autofocus, still for captures).
    fn configure(&mut self, mode: CaptureMode) -> Result<(), LapseError>;

    fn start(&mut self) -> Result<(), LapseError>;

    /// Stop the device. Must be safe to call when already stopped.
    fn stop(&mut self) -> Result<(), LapseError>;

    /// Block for the next device event, bounded by the driver's internal
    /// timeout. A stalled device yields `DeviceEvent::Timeout` rather than
    /// blocking forever.
    fn wait(&mut self) -> Result<DeviceEvent, LapseError>;

    fn set_controls(&mut self, controls: ControlList) -> Result<(), LapseError>;

    /// Release per-configuration resources so `configure` can be called
    /// again with a different mode.
    fn teardown(&mut self) {}
}
