use std::io;
use std::sync::Arc;

use lapse_capture_core::{CancelToken, LapseConfiguration};

use crate::keypress::KeypressListener;
use crate::signals::SignalWatcher;

/// Cancellation inputs selected by the configuration.
///
/// Holds the handles for the lifetime of the session: dropping this joins
/// the signal watcher and detaches the keypress listener.
pub struct CancelSources {
    signals: Option<SignalWatcher>,
    keypress: Option<KeypressListener>,
}

impl CancelSources {
    /// Install the cancellation sources the configuration asks for.
    ///
    /// With both flags off this installs nothing and the session can only
    /// end by reaching its configured duration.
    pub fn install(config: &LapseConfiguration, token: &Arc<CancelToken>) -> io::Result<Self> {
        let signals = if config.signals {
            Some(SignalWatcher::install(Arc::clone(token))?)
        } else {
            None
        };
        let keypress = config
            .keypress
            .then(|| KeypressListener::spawn(Arc::clone(token)));
        Ok(Self { signals, keypress })
    }

    pub fn signals_active(&self) -> bool {
        self.signals.is_some()
    }

    pub fn keypress_active(&self) -> bool {
        self.keypress.is_some()
    }
}
