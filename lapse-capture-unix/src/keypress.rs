use std::io::{self, BufRead, BufReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use lapse_capture_core::{CancelEvent, CancelToken};

/// Cancel event for one line of interactive input: a leading `x` or `X`
/// aborts, anything else is ignored.
fn event_for_line(line: &str) -> CancelEvent {
    match line.chars().next() {
        Some('x') | Some('X') => CancelEvent::AbortRequested,
        _ => CancelEvent::None,
    }
}

/// Reads lines of interactive input and signals the shared token.
///
/// The reader thread blocks on the input stream, so dropping the listener
/// only detaches it; it exits on EOF or on the next line after the flag is
/// cleared. Acceptable for a process-lifetime stdin listener.
pub struct KeypressListener {
    running: Arc<AtomicBool>,
}

impl KeypressListener {
    /// Listen on stdin.
    pub fn spawn(token: Arc<CancelToken>) -> Self {
        // StdinLock is !Send, so wrap the handle instead of locking here.
        Self::spawn_from_reader(BufReader::new(io::stdin()), token)
    }

    /// Listen on an arbitrary line source (used by tests).
    pub fn spawn_from_reader<R>(reader: R, token: Arc<CancelToken>) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let listener_running = Arc::clone(&running);
        // The handle is deliberately not kept: joining would block on a
        // pending read.
        let _ = thread::Builder::new()
            .name("keypress-listener".into())
            .spawn(move || {
                for line in reader.lines() {
                    if !listener_running.load(Ordering::SeqCst) {
                        break;
                    }
                    let Ok(line) = line else { break };
                    let event = event_for_line(&line);
                    if !event.is_none() {
                        token.signal(event);
                    }
                }
            });

        Self { running }
    }
}

impl Drop for KeypressListener {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
