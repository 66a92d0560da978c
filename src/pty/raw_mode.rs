//! Raw mode for the real terminal.
//!
//! [`RawModeGuard::enter`] snapshots the terminal's `termios`, switches it to
//! raw, and arranges for the snapshot to be written back exactly once:
//! through [`RawModeGuard::restore`], on drop, or from the panic hook,
//! whichever runs first.

use std::io;
use std::os::fd::{AsFd, AsRawFd, OwnedFd};
use std::sync::{Arc, Once};

use parking_lot::{const_mutex, Mutex};
use rustix::termios::{self, LocalModes, OptionalActions, SpecialCodeIndex, Termios};

use crate::pty::error::TerminalModeError;

/// Opaque snapshot of a terminal's mode before raw mode was entered.
///
/// Holds its own duplicate of the descriptor, so it can be restored after the
/// caller's handle is gone.
pub struct TerminalModeState {
    fd: OwnedFd,
    termios: Termios,
}

impl TerminalModeState {
    /// Read the current mode of `fd`.
    pub fn capture<Fd: AsFd>(fd: Fd) -> Result<Self, TerminalModeError> {
        if !termios::isatty(&fd) {
            return Err(TerminalModeError::NotATerminal);
        }
        let termios = termios::tcgetattr(&fd).map_err(|e| TerminalModeError::GetAttr(e.into()))?;
        let fd = rustix::io::dup(&fd).map_err(|e| TerminalModeError::GetAttr(e.into()))?;
        Ok(Self { fd, termios })
    }

    pub fn echo(&self) -> bool {
        self.termios.local_modes.contains(LocalModes::ECHO)
    }

    /// Line-buffered ("cooked") input.
    pub fn canonical(&self) -> bool {
        self.termios.local_modes.contains(LocalModes::ICANON)
    }

    fn apply_raw(&self) -> Result<(), TerminalModeError> {
        let mut raw = self.termios.clone();
        raw.make_raw();
        termios::tcsetattr(&self.fd, OptionalActions::Now, &raw)
            .map_err(|e| TerminalModeError::SetAttr(e.into()))
    }

    fn apply(&self) -> io::Result<()> {
        termios::tcsetattr(&self.fd, OptionalActions::Now, &self.termios)?;
        Ok(())
    }
}

impl PartialEq for TerminalModeState {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.termios, &other.termios);
        a.input_modes == b.input_modes
            && a.output_modes == b.output_modes
            && a.control_modes == b.control_modes
            && a.local_modes == b.local_modes
            && a.special_codes[SpecialCodeIndex::VMIN] == b.special_codes[SpecialCodeIndex::VMIN]
            && a.special_codes[SpecialCodeIndex::VTIME] == b.special_codes[SpecialCodeIndex::VTIME]
    }
}

impl std::fmt::Debug for TerminalModeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalModeState")
            .field("fd", &self.fd.as_raw_fd())
            .field("echo", &self.echo())
            .field("canonical", &self.canonical())
            .finish()
    }
}

type SavedState = Arc<Mutex<Option<TerminalModeState>>>;

/// Every guard ever entered registers its slot here; the panic hook drains
/// whatever has not been restored yet.
static PANIC_SLOTS: Mutex<Vec<SavedState>> = const_mutex(Vec::new());
static PANIC_HOOK: Once = Once::new();

pub struct RawModeGuard {
    saved: SavedState,
}

impl RawModeGuard {
    /// Raw mode on stdin.
    pub fn enter() -> Result<Self, TerminalModeError> {
        Self::enter_fd(rustix::stdio::stdin())
    }

    pub fn enter_fd<Fd: AsFd>(fd: Fd) -> Result<Self, TerminalModeError> {
        let state = TerminalModeState::capture(fd)?;
        state.apply_raw()?;
        tracing::debug!(fd = state.fd.as_raw_fd(), "raw mode entered");

        let saved = Arc::new(Mutex::new(Some(state)));
        install_panic_hook();
        PANIC_SLOTS.lock().push(Arc::clone(&saved));
        Ok(Self { saved })
    }

    /// Put the captured mode back. Later calls are no-ops.
    pub fn restore(&self) -> io::Result<()> {
        let Some(state) = self.saved.lock().take() else {
            return Ok(());
        };
        PANIC_SLOTS
            .lock()
            .retain(|slot| !Arc::ptr_eq(slot, &self.saved));
        state.apply()?;
        tracing::debug!(fd = state.fd.as_raw_fd(), "terminal mode restored");
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.saved.lock().is_some()
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            // try_lock: the panic may have happened while a slot was held.
            if let Some(mut slots) = PANIC_SLOTS.try_lock() {
                for slot in slots.drain(..) {
                    if let Some(mut saved) = slot.try_lock() {
                        if let Some(state) = saved.take() {
                            let _ = state.apply();
                        }
                    }
                }
            }
            default_hook(info);
        }));
    });
}
