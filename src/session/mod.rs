//! Session supervisor.
//!
//! Builds the identity, home and environment, starts the shell on a PTY,
//! relays I/O while the terminal is raw, and tears everything down in a fixed
//! order once the shell exits or setup fails part way.

mod error;
mod exit;
mod signals;
mod state;
mod teardown;

pub use error::{SessionError, SetupError};
pub use exit::{SessionExit, EXIT_INDETERMINATE, EXIT_SETUP_FAILURE};
pub use signals::{TerminationWatcher, TERMINATION_SIGNALS};
pub use state::{InvalidTransition, Lifecycle, SessionState};
pub use teardown::{Teardown, TeardownError};

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use scopeguard::ScopeGuard;

use crate::config::Config;
use crate::environment::EnvBuilder;
use crate::home::EphemeralHome;
use crate::identity::{resolve_identity, FakeIdentity};
use crate::pty::{self, relay, LaunchedPty, RawModeGuard, ResizeWatcher, ShellCommand};
use crate::shell::{resolve_shell, ResolvedShell};

/// How long to keep forwarding output after the shell exits. Bounded so a
/// background job holding the PTY open can't stall teardown.
const OUTPUT_DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

/// The unit of work: lifecycle plus everything teardown must release.
pub struct Session {
    lifecycle: Lifecycle,
    resources: Teardown,
}

impl Session {
    pub fn new(original_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            resources: Teardown::new(original_dir),
        }
    }

    pub fn state(&self) -> SessionState {
        self.lifecycle.state()
    }

    pub fn resources(&mut self) -> &mut Teardown {
        &mut self.resources
    }

    pub fn advance(&mut self, next: SessionState) {
        if let Err(err) = self.lifecycle.advance(next) {
            tracing::warn!("{err}");
        }
    }

    /// Enter `Terminating` and stop resize propagation. Idempotent.
    pub fn begin_terminating(&mut self) {
        if self.state() != SessionState::Terminating {
            self.advance(SessionState::Terminating);
        }
        self.resources.stop_watcher();
    }

    /// Run the four teardown steps and close the session.
    pub fn close(mut self) -> Vec<TeardownError> {
        self.begin_terminating();
        let Session {
            mut lifecycle,
            resources,
        } = self;
        let errors = resources.run();
        if let Err(err) = lifecycle.advance(SessionState::Closed) {
            tracing::warn!("{err}");
        }
        errors
    }
}

/// Assemble the child-process specification for `shell` inside `home`.
pub fn build_command(
    shell: &ResolvedShell,
    identity: &FakeIdentity,
    home: &EphemeralHome,
    overrides: &BTreeMap<String, String>,
) -> ShellCommand {
    let env = EnvBuilder::inherit()
        .with_overrides(overrides)
        .with_identity(identity)
        .with_home(home.path())
        .with_path_prefix(home.bin_dir())
        .with_default_term()
        .build(home.path());
    ShellCommand::new(&shell.path, shell.profile.launch_args(home.rc_file()), env)
}

/// Run one interactive session to completion.
///
/// Teardown is armed as soon as the original directory is known, so every
/// early return (and a panic unwinding through here) still releases what
/// was acquired so far. SIGTERM, SIGHUP and SIGQUIT stop the shell and go
/// through the same teardown.
pub fn run(config: &Config, shell_override: Option<&str>) -> Result<SessionExit, SessionError> {
    let original_dir = std::env::current_dir().map_err(SetupError::WorkingDir)?;
    // Declared before the guard so it outlives teardown.
    let termination = match TerminationWatcher::install() {
        Ok(watcher) => Some(watcher),
        Err(err) => {
            tracing::warn!("termination signals not handled: {err}");
            None
        }
    };
    let mut session = scopeguard::guard(Session::new(original_dir), |session| {
        session.close();
    });

    let identity = resolve_identity(&config.identity).map_err(SetupError::from)?;
    let shell = resolve_shell(shell_override.or(config.shell.path.as_deref()));
    tracing::debug!(
        user = identity.user(),
        host = identity.host(),
        shell = %shell.path.display(),
        profile = shell.profile.name,
        "preparing session"
    );

    let home = EphemeralHome::create(&identity, shell.profile, config.home.temp_root.as_deref())
        .map_err(SetupError::from)?;
    let command = build_command(&shell, &identity, &home, &config.env);
    enter_home(home.path());
    session.resources().set_home(home);

    if let Some(signal) = termination.as_ref().and_then(TerminationWatcher::received) {
        return Err(SetupError::Interrupted(signals::signal_label(signal)).into());
    }
    let LaunchedPty {
        handle,
        reader,
        child,
    } = pty::launch(&command).map_err(SetupError::from)?;
    session.resources().set_pty(handle.clone(), child);
    session.advance(SessionState::Launched);
    if let (Some(watcher), Some(killer)) = (&termination, session.resources().shell_killer()) {
        watcher.arm(killer);
    }

    match ResizeWatcher::start(handle.clone()) {
        Ok(watcher) => session.resources().set_watcher(watcher),
        Err(err) => tracing::warn!("terminal resize tracking unavailable: {err}"),
    }

    let raw_mode = RawModeGuard::enter()?;
    session.resources().set_raw_mode(raw_mode);
    session.advance(SessionState::Running);

    let output = relay::start(handle, reader).map_err(SetupError::Relay)?;

    let mut exit = SessionExit::from_wait(session.resources().wait_child());
    if let Some(signal) = termination.as_ref().and_then(TerminationWatcher::received) {
        exit = SessionExit::Indeterminate(format!(
            "session ended by {}",
            signals::signal_label(signal)
        ));
    }
    session.begin_terminating();
    if !output.wait(OUTPUT_DRAIN_TIMEOUT) {
        tracing::debug!("pty output still open after shell exit; abandoning relay");
    }

    let errors = ScopeGuard::into_inner(session).close();
    if !errors.is_empty() {
        tracing::debug!(count = errors.len(), "teardown finished with errors");
    }
    if let SessionExit::Indeterminate(reason) = &exit {
        tracing::warn!("{reason}");
    }
    Ok(exit)
}

/// Follow the shell into its home. Teardown changes back.
fn enter_home(home: &Path) {
    if let Err(err) = std::env::set_current_dir(home) {
        tracing::warn!("failed to chdir to temp home: {err}");
    }
}
