//! Byte pumps between the real terminal and the PTY.
//!
//! Both directions run on their own thread and stop quietly on EOF or the
//! first I/O error. Only the output side is awaited: it ends when the shell
//! exits and the subordinate side closes. The input side usually sits in a
//! blocking read of stdin and is left behind.

use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::pty::error::RelayError;
use crate::pty::handle::PtyHandle;

const INPUT_BUFFER: usize = 1024;
const OUTPUT_BUFFER: usize = 8192;

/// Completion signal of the PTY → terminal pump.
pub struct OutputRelay {
    done: Receiver<()>,
}

impl OutputRelay {
    /// Wait up to `timeout` for the pump to finish. Returns whether it did.
    pub fn wait(&self, timeout: Duration) -> bool {
        // The sender is never used; it disconnects when the thread exits.
        matches!(
            self.done.recv_timeout(timeout),
            Err(RecvTimeoutError::Disconnected)
        )
    }
}

/// stdin → PTY and PTY → stdout.
pub fn start(pty: PtyHandle, reader: Box<dyn Read + Send>) -> io::Result<OutputRelay> {
    spawn_input(io::stdin(), pty)?;
    spawn_output(reader, io::stdout())
}

/// Copy `source` into the PTY until either side gives out. Detached.
pub fn spawn_input<R>(source: R, pty: PtyHandle) -> io::Result<()>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name("relay-input".to_string())
        .spawn(move || {
            if let Err(err) = pump_input(source, &pty) {
                tracing::trace!("input relay ended: {err}");
            }
        })?;
    Ok(())
}

/// Copy PTY output into `sink` until EOF or error.
pub fn spawn_output<R, W>(reader: R, sink: W) -> io::Result<OutputRelay>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
{
    let (tx, done) = mpsc::channel::<()>();
    thread::Builder::new()
        .name("relay-output".to_string())
        .spawn(move || {
            let _tx = tx;
            if let Err(err) = pump_output(reader, sink) {
                tracing::trace!("output relay ended: {err}");
            }
        })?;
    Ok(OutputRelay { done })
}

fn pump_input<R: Read>(mut source: R, pty: &PtyHandle) -> Result<(), RelayError> {
    let mut buffer = [0u8; INPUT_BUFFER];
    loop {
        let count = match source.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(count) => count,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(RelayError::Read(err)),
        };
        pty.send_input(&buffer[..count])
            .map_err(RelayError::Write)?;
    }
}

fn pump_output<R: Read, W: Write>(mut reader: R, mut sink: W) -> Result<(), RelayError> {
    let mut buffer = [0u8; OUTPUT_BUFFER];
    loop {
        let count = match reader.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(count) => count,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            // Linux reports a closed subordinate side as EIO.
            Err(err) => return Err(RelayError::Read(err)),
        };
        // Flush per chunk: prompts rarely end in a newline.
        sink.write_all(&buffer[..count])
            .and_then(|()| sink.flush())
            .map_err(RelayError::Write)?;
    }
}
