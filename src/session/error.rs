use std::io;

use thiserror::Error;

use crate::home::HomeError;
use crate::identity::IdentityError;
use crate::pty::{LaunchError, TerminalModeError};

/// Something failed before the shell was up. Reported once, never retried.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to read current directory: {0}")]
    WorkingDir(#[source] io::Error),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Home(#[from] HomeError),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error("failed to start i/o relay: {0}")]
    Relay(#[source] io::Error),

    #[error("interrupted by {0} during setup")]
    Interrupted(&'static str),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    TerminalMode(#[from] TerminalModeError),
}
