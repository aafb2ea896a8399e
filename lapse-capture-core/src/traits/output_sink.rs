use crate::models::capture::CaptureMetadata;

/// Destination for encoded output and per-frame metadata.
///
/// Both notifications arrive on the encoder's worker context, not the
/// scheduling thread. Implementations should marshal to their own thread
/// if they do slow I/O.
pub trait OutputSink: Send + Sync {
    /// Encoded bytes are ready to be stored.
    fn output_ready(&self, data: &[u8], timestamp_us: i64, keyframe: bool);

    /// Metadata for the oldest in-flight capture, delivered just before its
    /// buffer is released back to the device.
    fn metadata_ready(&self, metadata: &CaptureMetadata);
}
