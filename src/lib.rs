//! Disposable fake-identity shell sessions for demos and recordings.
//!
//! The shell runs on a PTY with a generated user and host name, a temporary
//! HOME, and `id` / `whoami` / `hostname` wrappers first on `PATH`. This is
//! cosmetic only: permissions and the real filesystem are unchanged.

#[cfg(not(unix))]
compile_error!("incogniterm requires a Unix-like platform with pseudo-terminals");

pub mod cli;
pub mod config;
pub mod environment;
pub mod home;
pub mod identity;
pub mod logging;
pub mod pty;
pub mod session;
pub mod shell;
