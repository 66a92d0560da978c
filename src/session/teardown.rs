use std::io;
use std::path::{Path, PathBuf};

use portable_pty::{Child, ChildKiller, ExitStatus};
use thiserror::Error;

use crate::home::EphemeralHome;
use crate::pty::{PtyHandle, RawModeGuard, ResizeWatcher};

#[derive(Debug, Error)]
pub enum TeardownError {
    #[error("failed to restore terminal mode: {0}")]
    RestoreTerminal(#[source] io::Error),

    #[error("failed to restore working directory '{path}': {source}")]
    RestoreDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to stop shell: {0}")]
    ReleasePty(#[source] io::Error),

    #[error("failed to remove ephemeral home '{path}': {source}")]
    RemoveHome {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Everything a session has to give back, released in a fixed order.
///
/// Fields start empty and are filled as setup progresses, so running it
/// after a partial setup only undoes what actually happened.
pub struct Teardown {
    original_dir: PathBuf,
    watcher: Option<ResizeWatcher>,
    raw_mode: Option<RawModeGuard>,
    pty: Option<PtyHandle>,
    child: Option<Box<dyn Child + Send + Sync>>,
    home: Option<EphemeralHome>,
}

impl Teardown {
    pub fn new(original_dir: impl Into<PathBuf>) -> Self {
        Self {
            original_dir: original_dir.into(),
            watcher: None,
            raw_mode: None,
            pty: None,
            child: None,
            home: None,
        }
    }

    pub fn original_dir(&self) -> &Path {
        &self.original_dir
    }

    pub fn set_home(&mut self, home: EphemeralHome) {
        self.home = Some(home);
    }

    pub fn home(&self) -> Option<&EphemeralHome> {
        self.home.as_ref()
    }

    pub fn set_pty(&mut self, pty: PtyHandle, child: Box<dyn Child + Send + Sync>) {
        self.pty = Some(pty);
        self.child = Some(child);
    }

    pub fn set_watcher(&mut self, watcher: ResizeWatcher) {
        self.watcher = Some(watcher);
    }

    pub fn set_raw_mode(&mut self, guard: RawModeGuard) {
        self.raw_mode = Some(guard);
    }

    /// A second handle able to stop the shell while `wait_child` blocks.
    pub fn shell_killer(&self) -> Option<Box<dyn ChildKiller + Send + Sync>> {
        self.child.as_ref().map(|child| child.clone_killer())
    }

    /// Block until the shell exits.
    pub fn wait_child(&mut self) -> io::Result<ExitStatus> {
        match self.child.as_mut() {
            Some(child) => child.wait(),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "no shell running")),
        }
    }

    /// Stop resize propagation. Called as soon as termination starts; `run`
    /// does it too if nobody did.
    pub fn stop_watcher(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.stop();
        }
    }

    /// Restore the terminal mode, restore the working directory, release the
    /// PTY, remove the ephemeral home. Every step runs regardless of earlier
    /// failures; failures are logged and returned.
    pub fn run(mut self) -> Vec<TeardownError> {
        self.stop_watcher();

        let mut errors = Vec::new();
        let steps = [
            self.restore_terminal(),
            self.restore_directory(),
            self.release_pty(),
            self.remove_home(),
        ];
        for result in steps {
            if let Err(err) = result {
                tracing::warn!("teardown: {err}");
                errors.push(err);
            }
        }
        errors
    }

    fn restore_terminal(&mut self) -> Result<(), TeardownError> {
        match self.raw_mode.take() {
            Some(guard) => guard.restore().map_err(TeardownError::RestoreTerminal),
            None => Ok(()),
        }
    }

    fn restore_directory(&mut self) -> Result<(), TeardownError> {
        std::env::set_current_dir(&self.original_dir).map_err(|source| {
            TeardownError::RestoreDirectory {
                path: self.original_dir.clone(),
                source,
            }
        })
    }

    /// Kills the shell if it is still running (aborted setup), then closes
    /// the controlling side.
    fn release_pty(&mut self) -> Result<(), TeardownError> {
        let mut result = Ok(());
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                tracing::debug!("killing shell that outlived the session");
                result = child
                    .kill()
                    .and_then(|()| child.wait().map(drop))
                    .map_err(TeardownError::ReleasePty);
            }
        }
        if let Some(pty) = self.pty.take() {
            pty.close();
        }
        result
    }

    fn remove_home(&mut self) -> Result<(), TeardownError> {
        let Some(home) = self.home.take() else {
            return Ok(());
        };
        let path = home.path().to_path_buf();
        home.remove()
            .map_err(|source| TeardownError::RemoveHome { path, source })
    }
}
