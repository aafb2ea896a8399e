//! # lapse-capture-unix
//!
//! Unix cancellation backend for lapse-capture.
//!
//! Provides:
//! - `SignalWatcher` — translates SIGINT / SIGUSR1 / SIGUSR2 / SIGPIPE into
//!   cancel events on a shared `CancelToken`
//! - `KeypressListener` — reads stdin lines and aborts on a leading `x`/`X`
//! - `CancelSources` — installs the two per the configuration's `signals`
//!   and `keypress` flags
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use lapse_capture_core::{CancelToken, LapseConfiguration};
//! use lapse_capture_unix::CancelSources;
//!
//! let config = LapseConfiguration { signals: true, ..Default::default() };
//! let cancel = Arc::new(CancelToken::new());
//! let _sources = CancelSources::install(&config, &cancel)?;
//! // hand `cancel` to LapseSession::new(...)
//! ```

pub mod keypress;
#[cfg(unix)]
pub mod signals;
#[cfg(unix)]
pub mod sources;

pub use keypress::KeypressListener;
#[cfg(unix)]
pub use signals::SignalWatcher;
#[cfg(unix)]
pub use sources::CancelSources;
