use parking_lot::Mutex;
use portable_pty::{MasterPty, PtySize};
use std::io::{self, Write};
use std::sync::Arc;

use crate::pty::error::GeometryError;

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub rows: u16,
    pub cols: u16,
}

impl Geometry {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    /// Size of the real terminal.
    pub fn from_terminal() -> io::Result<Self> {
        let (cols, rows) = crossterm::terminal::size()?;
        Ok(Self { rows, cols })
    }

    fn to_pty_size(self) -> PtySize {
        PtySize {
            rows: self.rows,
            cols: self.cols,
            pixel_width: 0,
            pixel_height: 0,
        }
    }
}

/// Shared access to the controlling side of the PTY.
///
/// Input and resize go through separate locks, so the input relay and the
/// geometry watcher never wait on each other. Reading happens on the reader
/// handed out by the launcher, outside this type.
#[derive(Clone)]
pub struct PtyHandle {
    writer: Arc<Mutex<Option<Box<dyn Write + Send>>>>,
    master: Arc<Mutex<Option<Box<dyn MasterPty + Send>>>>,
}

impl PtyHandle {
    pub fn new(writer: Box<dyn Write + Send>, master: Box<dyn MasterPty + Send>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Some(writer))),
            master: Arc::new(Mutex::new(Some(master))),
        }
    }

    /// Write bytes to the child. Fails with `BrokenPipe` once closed.
    pub fn send_input(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = self.writer.lock();
        let Some(writer) = writer.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pty closed"));
        };
        writer.write_all(bytes)?;
        writer.flush()?;
        Ok(())
    }

    pub fn resize(&self, geometry: Geometry) -> Result<(), GeometryError> {
        let master = self.master.lock();
        let Some(master) = master.as_ref() else {
            return Err(GeometryError::Closed);
        };
        master
            .resize(geometry.to_pty_size())
            .map_err(|e| GeometryError::Resize(e.into()))
    }

    /// Current PTY size as the kernel reports it.
    pub fn size(&self) -> Option<Geometry> {
        let master = self.master.lock();
        let size = master.as_ref()?.get_size().ok()?;
        Some(Geometry::new(size.rows, size.cols))
    }

    /// Path of the subordinate side, e.g. `/dev/pts/7`.
    #[cfg(unix)]
    pub fn tty_name(&self) -> Option<std::path::PathBuf> {
        self.master.lock().as_ref()?.tty_name()
    }

    pub fn is_closed(&self) -> bool {
        self.master.lock().is_none()
    }

    /// Release the writer and the master. Idempotent.
    pub fn close(&self) {
        self.writer.lock().take();
        self.master.lock().take();
    }
}
