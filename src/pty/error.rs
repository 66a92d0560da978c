use std::error::Error as StdError;
use std::io;

use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// PTY allocation or process start failed.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to open pty: {0}")]
    OpenPty(#[source] BoxError),

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to acquire pty reader: {0}")]
    Reader(#[source] BoxError),

    #[error("failed to acquire pty writer: {0}")]
    Writer(#[source] BoxError),
}

/// The real terminal could not be switched to (or queried for) raw mode.
#[derive(Debug, Error)]
pub enum TerminalModeError {
    #[error("stdin is not a terminal")]
    NotATerminal,

    #[error("failed to read terminal attributes: {0}")]
    GetAttr(#[source] io::Error),

    #[error("failed to set raw mode: {0}")]
    SetAttr(#[source] io::Error),
}

/// A geometry push did not reach the PTY. Never fatal.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("pty already closed")]
    Closed,

    #[error("terminal size unavailable: {0}")]
    Unavailable(#[source] io::Error),

    #[error("pty resize failed: {0}")]
    Resize(#[source] BoxError),
}

/// A relay loop stopped. Expected at session end.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay read failed: {0}")]
    Read(#[source] io::Error),

    #[error("relay write failed: {0}")]
    Write(#[source] io::Error),
}
