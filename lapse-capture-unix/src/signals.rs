use std::io;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lapse_capture_core::{CancelEvent, CancelToken};

/// How often the watcher thread samples the signal slot.
const POLL_PERIOD: Duration = Duration::from_millis(50);

// Last signal delivered, written by the async-signal handler and drained
// by the watcher thread. Only ever touched with atomic ops.
static SIGNAL_RECEIVED: AtomicI32 = AtomicI32::new(0);

extern "C" fn record_signal(signum: libc::c_int) {
    SIGNAL_RECEIVED.store(signum, Ordering::SeqCst);
}

fn event_for_signal(signum: i32) -> CancelEvent {
    match signum {
        libc::SIGINT | libc::SIGUSR2 | libc::SIGPIPE => CancelEvent::AbortRequested,
        libc::SIGUSR1 => CancelEvent::StopRequested,
        _ => CancelEvent::None,
    }
}

/// Translates process signals into cancel events.
///
/// Installs handlers for SIGINT, SIGUSR1, SIGUSR2 and SIGPIPE, then runs a
/// watcher thread that drains the signal slot (edge-triggered: each
/// delivery is forwarded once) and signals the shared token. Duplicate
/// deliveries coalesce inside the token, abort winning over stop.
pub struct SignalWatcher {
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl SignalWatcher {
    pub fn install(token: Arc<CancelToken>) -> io::Result<Self> {
        let handler = record_signal as extern "C" fn(libc::c_int);
        for signum in [libc::SIGINT, libc::SIGUSR1, libc::SIGUSR2, libc::SIGPIPE] {
            // SAFETY: record_signal only performs one atomic store, which
            // is async-signal-safe.
            let previous = unsafe { libc::signal(signum, handler as libc::sighandler_t) };
            if previous == libc::SIG_ERR {
                return Err(io::Error::last_os_error());
            }
        }

        let running = Arc::new(AtomicBool::new(true));
        let watcher_running = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name("signal-watcher".into())
            .spawn(move || {
                while watcher_running.load(Ordering::SeqCst) {
                    let signum = SIGNAL_RECEIVED.swap(0, Ordering::SeqCst);
                    if signum != 0 {
                        log::info!("received signal {}", signum);
                        token.signal(event_for_signal(signum));
                    }
                    thread::sleep(POLL_PERIOD);
                }
            })?;

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }
}

impl Drop for SignalWatcher {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[test]
    fn signal_mapping_matches_contract() {
        assert_eq!(event_for_signal(libc::SIGINT), CancelEvent::AbortRequested);
        assert_eq!(event_for_signal(libc::SIGUSR1), CancelEvent::StopRequested);
        assert_eq!(event_for_signal(libc::SIGUSR2), CancelEvent::AbortRequested);
        assert_eq!(event_for_signal(libc::SIGPIPE), CancelEvent::AbortRequested);
        assert_eq!(event_for_signal(libc::SIGHUP), CancelEvent::None);
    }

    #[test]
    fn raised_sigusr1_reaches_the_token() {
        let token = Arc::new(CancelToken::new());
        let _watcher = SignalWatcher::install(Arc::clone(&token)).unwrap();

        // SAFETY: SIGUSR1 has a handler installed above.
        unsafe {
            libc::raise(libc::SIGUSR1);
        }

        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match token.take() {
                CancelEvent::StopRequested => break,
                CancelEvent::None if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(10))
                }
                other => panic!("unexpected cancel event: {:?}", other),
            }
        }
    }
}
