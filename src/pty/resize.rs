use std::io;
use std::thread;

use signal_hook::consts::signal::SIGWINCH;
use signal_hook::iterator::{Handle, Signals};

use crate::pty::error::GeometryError;
use crate::pty::handle::{Geometry, PtyHandle};

/// Keeps the PTY size in step with the real terminal.
///
/// Pushes once on start, then again on every `SIGWINCH`. Stopped explicitly
/// at the beginning of teardown so it never touches a released PTY.
pub struct ResizeWatcher {
    handle: Handle,
    thread: thread::JoinHandle<()>,
}

impl ResizeWatcher {
    pub fn start(pty: PtyHandle) -> io::Result<Self> {
        Self::start_with(pty, Geometry::from_terminal)
    }

    /// Like [`ResizeWatcher::start`] with a custom size source.
    pub fn start_with<F>(pty: PtyHandle, source: F) -> io::Result<Self>
    where
        F: Fn() -> io::Result<Geometry> + Send + 'static,
    {
        let mut signals = Signals::new([SIGWINCH])?;
        let handle = signals.handle();

        // Before the thread exists, so the shell is sized before its first prompt.
        sync(&pty, &source);

        let thread = thread::Builder::new()
            .name("geometry-sync".to_string())
            .spawn(move || {
                for _ in signals.forever() {
                    sync(&pty, &source);
                }
                tracing::trace!("geometry watcher stopped");
            })?;

        Ok(Self { handle, thread })
    }

    pub fn stop(self) {
        self.handle.close();
        let _ = self.thread.join();
    }
}

/// Push the current size once. Failures are logged and dropped.
fn sync<F>(pty: &PtyHandle, source: &F)
where
    F: Fn() -> io::Result<Geometry>,
{
    let result = source()
        .map_err(GeometryError::Unavailable)
        .and_then(|geometry| pty.resize(geometry).map(|()| geometry));
    match result {
        Ok(geometry) => tracing::trace!(rows = geometry.rows, cols = geometry.cols, "pty resized"),
        Err(err) => tracing::debug!("geometry sync skipped: {err}"),
    }
}
