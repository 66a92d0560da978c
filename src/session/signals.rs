use std::io;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use portable_pty::ChildKiller;
use signal_hook::consts::signal::{SIGHUP, SIGQUIT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};

/// Signals that end the session instead of the process.
pub const TERMINATION_SIGNALS: [i32; 3] = [SIGTERM, SIGHUP, SIGQUIT];

#[derive(Default)]
struct Shared {
    /// Last termination signal seen; 0 until one arrives.
    received: AtomicI32,
    killer: Mutex<Option<Box<dyn ChildKiller + Send + Sync>>>,
}

impl Shared {
    fn stop_shell(&self) {
        if let Some(killer) = self.killer.lock().as_mut() {
            if let Err(err) = killer.kill() {
                tracing::debug!("failed to signal shell: {err}");
            }
        }
    }
}

/// Turns SIGTERM, SIGHUP and SIGQUIT into "stop the shell".
///
/// Once installed, those signals no longer kill this process outright. The
/// shell is stopped instead, the supervisor's wait returns, and the normal
/// teardown runs. Dropping the watcher stops the listener thread.
pub struct TerminationWatcher {
    shared: Arc<Shared>,
    handle: Handle,
    thread: Option<thread::JoinHandle<()>>,
}

impl TerminationWatcher {
    pub fn install() -> io::Result<Self> {
        let mut signals = Signals::new(TERMINATION_SIGNALS)?;
        let handle = signals.handle();
        let shared = Arc::new(Shared::default());

        let listener = Arc::clone(&shared);
        let thread = thread::Builder::new()
            .name("termination-signals".to_string())
            .spawn(move || {
                for signal in signals.forever() {
                    tracing::warn!(signal = signal_label(signal), "termination requested");
                    listener.received.store(signal, Ordering::SeqCst);
                    listener.stop_shell();
                }
            })?;

        Ok(Self {
            shared,
            handle,
            thread: Some(thread),
        })
    }

    /// Hand over the means to stop the shell. Stops it right away if a
    /// signal already arrived.
    pub fn arm(&self, killer: Box<dyn ChildKiller + Send + Sync>) {
        *self.shared.killer.lock() = Some(killer);
        if self.received().is_some() {
            self.shared.stop_shell();
        }
    }

    pub fn received(&self) -> Option<i32> {
        match self.shared.received.load(Ordering::SeqCst) {
            0 => None,
            signal => Some(signal),
        }
    }
}

impl Drop for TerminationWatcher {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

pub fn signal_label(signal: i32) -> &'static str {
    match signal {
        SIGTERM => "SIGTERM",
        SIGHUP => "SIGHUP",
        SIGQUIT => "SIGQUIT",
        _ => "signal",
    }
}
