use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Stream geometry handed to the encoder alongside each buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    /// Row stride in bytes.
    pub stride: u32,
}

impl StreamInfo {
    pub fn is_configured(&self) -> bool {
        self.width != 0 && self.height != 0 && self.stride != 0
    }
}

/// Autofocus scan status reported by the device in capture metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AfStatus {
    Idle,
    Scanning,
    Focused,
    Failed,
}

/// Per-capture metadata reported by the device.
///
/// The autofocus prelude reads `af_status` and `lens_position`; everything
/// else rides along in `entries` and is forwarded verbatim on the output
/// sink's metadata-ready notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    pub af_status: Option<AfStatus>,
    pub lens_position: Option<f64>,
    #[serde(default)]
    pub entries: HashMap<String, serde_json::Value>,
}

impl CaptureMetadata {
    pub fn is_empty(&self) -> bool {
        self.af_status.is_none() && self.lens_position.is_none() && self.entries.is_empty()
    }
}

/// One completed still capture handed back by the device.
///
/// The pipeline holds a shared reference from encode submission until the
/// encoder acknowledges the input buffer as consumed; dropping the last
/// `Arc` returns the buffer to the device layer.
#[derive(Debug)]
pub struct CompletedCapture {
    /// Opaque buffer descriptor forwarded to the encoder (e.g. a dmabuf fd).
    pub descriptor: i64,
    /// Backing memory of the first plane. Empty means the capture has no
    /// valid backing memory and must not be encoded.
    pub memory: Vec<u8>,
    pub stream: StreamInfo,
    pub metadata: CaptureMetadata,
    /// Device-assigned frame sequence number.
    pub sequence: u64,
}

/// Events produced by `CaptureDevice::wait`.
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    /// The device failed to produce a request within its internal timeout.
    Timeout,
    /// The device is shutting down and no further requests will arrive.
    Quit,
    CaptureComplete(Arc<CompletedCapture>),
}

/// Stream configuration selected before starting the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Low-resolution preview stream, used while the autofocus prelude runs.
    Viewfinder,
    /// Full-resolution still stream used for the timelapse captures.
    Still,
}

/// Autofocus mode control values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfMode {
    Manual,
    Auto,
    Continuous,
}

/// Autofocus trigger control values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfTrigger {
    Start,
    Cancel,
}

/// A single device control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    AfMode(AfMode),
    AfTrigger(AfTrigger),
}

/// An ordered list of controls applied to the device in one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlList(Vec<Control>);

impl ControlList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, control: Control) {
        self.0.push(control);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.0.iter()
    }

    pub fn contains(&self, control: Control) -> bool {
        self.0.contains(&control)
    }
}
