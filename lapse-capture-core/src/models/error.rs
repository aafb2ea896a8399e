use thiserror::Error;

/// Errors that can occur while scheduling captures or pipelining encodes.
///
/// `DeviceTimeout` is transient and recovered locally (device stop+start);
/// everything else is fatal and terminates the run after teardown.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LapseError {
    #[error("device timeout")]
    DeviceTimeout,

    #[error("device error: {0}")]
    DeviceError(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("encoder not started")]
    EncoderNotStarted,

    #[error("no buffer to encode")]
    EmptyCaptureBuffer,

    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("unexpected device event: {0}")]
    UnexpectedEvent(String),

    #[error("encoding failed: {0}")]
    EncodingFailed(String),
}
