use portable_pty::{native_pty_system, Child, PtySize};
use std::io::Read;

use crate::pty::error::LaunchError;
use crate::pty::handle::{Geometry, PtyHandle};
use crate::pty::spawn_config::ShellCommand;

/// A started child plus the controlling side of its PTY.
pub struct LaunchedPty {
    pub handle: PtyHandle,
    /// PTY output; handed to the output relay.
    pub reader: Box<dyn Read + Send>,
    pub child: Box<dyn Child + Send + Sync>,
}

/// Allocate a PTY and start `command` on its subordinate side.
///
/// Nothing is rolled back on failure; the caller's teardown owns cleanup.
/// The initial size is a best guess; the geometry watcher corrects it.
pub fn launch(command: &ShellCommand) -> Result<LaunchedPty, LaunchError> {
    let pty_system = native_pty_system();
    let initial = Geometry::from_terminal().unwrap_or(Geometry::new(24, 80));
    let pair = pty_system
        .openpty(PtySize {
            rows: initial.rows,
            cols: initial.cols,
            pixel_width: 0,
            pixel_height: 0,
        })
        .map_err(|e| LaunchError::OpenPty(e.into()))?;

    let child = pair
        .slave
        .spawn_command(command.to_command_builder())
        .map_err(|e| LaunchError::Spawn {
            program: command.program().display().to_string(),
            source: e.into(),
        })?;
    // Only the child may hold the subordinate side, otherwise the reader
    // never sees EOF after the shell exits.
    drop(pair.slave);

    let reader = pair
        .master
        .try_clone_reader()
        .map_err(|e| LaunchError::Reader(e.into()))?;
    let writer = pair
        .master
        .take_writer()
        .map_err(|e| LaunchError::Writer(e.into()))?;

    tracing::debug!(
        program = %command.program().display(),
        pid = ?child.process_id(),
        "shell started"
    );

    Ok(LaunchedPty {
        handle: PtyHandle::new(writer, pair.master),
        reader,
        child,
    })
}
