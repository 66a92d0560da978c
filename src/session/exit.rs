use std::io;

use portable_pty::ExitStatus;

/// Exit code for config, setup and terminal-mode failures.
pub const EXIT_SETUP_FAILURE: i32 = 1;
/// Exit code when the shell's own status can't be determined: it died from a
/// signal, waiting on it failed, or this process was told to terminate.
///
/// Statuses are 8 bits wide, so a shell that runs `exit 255` produces the same
/// code. Callers that must tell the two apart have to read stderr, where the
/// indeterminate case is always reported.
pub const EXIT_INDETERMINATE: i32 = 255;

/// How the shell ended, as far as the supervisor can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionExit {
    /// Normal exit with this status.
    Code(i32),
    /// Killed by a signal, or waiting on it failed.
    Indeterminate(String),
}

impl SessionExit {
    pub fn from_wait(result: io::Result<ExitStatus>) -> Self {
        match result {
            Ok(status) => Self::from_status(&status),
            Err(err) => Self::Indeterminate(format!("waiting for shell failed: {err}")),
        }
    }

    pub fn from_status(status: &ExitStatus) -> Self {
        if let Some(signal) = status.signal() {
            return Self::Indeterminate(format!("shell terminated by signal: {signal}"));
        }
        match i32::try_from(status.exit_code()) {
            Ok(code) => Self::Code(code),
            Err(_) => Self::Indeterminate(format!(
                "shell exit status {} out of range",
                status.exit_code()
            )),
        }
    }

    /// Code this process should exit with.
    pub fn code(&self) -> i32 {
        match self {
            Self::Code(code) => *code,
            Self::Indeterminate(_) => EXIT_INDETERMINATE,
        }
    }
}
