//! Ephemeral HOME for a session.
//!
//! Layout:
//!
//! ```text
//! incogniterm-home-XXXXXX/
//! ├── bin/          id, whoami, hostname (prepended to PATH)
//! └── .bashrc       or whatever the shell profile names
//! ```
//!
//! The whole tree is removed by [`EphemeralHome::remove`], or on drop.

mod wrappers;

pub use wrappers::WRAPPERS;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::identity::FakeIdentity;
use crate::shell::ShellProfile;

const DIR_PREFIX: &str = "incogniterm-home-";

#[derive(Debug, Error)]
pub enum HomeError {
    #[error("failed to create temporary home: {0}")]
    CreateDir(#[source] io::Error),

    #[error("failed to create bin directory '{path}': {source}")]
    CreateBin {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {name} wrapper: {source}")]
    WriteWrapper {
        name: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to write shell rc '{path}': {source}")]
    WriteRc {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Owns the temp directory used as HOME for the session.
pub struct EphemeralHome {
    dir: tempfile::TempDir,
    bin: PathBuf,
    rc_file: PathBuf,
}

impl EphemeralHome {
    /// Create the home, its `bin/` wrappers and the shell rc file.
    ///
    /// `temp_root` defaults to the system temp directory.
    pub fn create(
        identity: &FakeIdentity,
        profile: &ShellProfile,
        temp_root: Option<&Path>,
    ) -> Result<Self, HomeError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(DIR_PREFIX);
        let dir = match temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(HomeError::CreateDir)?;

        let bin = dir.path().join("bin");
        create_bin(&bin)?;
        wrappers::install(&bin, identity)?;

        let rc_file = dir.path().join(profile.rc_file);
        write_private(&rc_file, &profile.rc_contents(identity, dir.path())).map_err(|source| {
            HomeError::WriteRc {
                path: rc_file.clone(),
                source,
            }
        })?;

        tracing::debug!(home = %dir.path().display(), "ephemeral home created");
        Ok(Self { dir, bin, rc_file })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin
    }

    pub fn rc_file(&self) -> &Path {
        &self.rc_file
    }

    /// Delete the tree now, reporting failure instead of swallowing it.
    pub fn remove(self) -> io::Result<()> {
        self.dir.close()
    }
}

fn create_bin(bin: &Path) -> Result<(), HomeError> {
    let map_err = |source| HomeError::CreateBin {
        path: bin.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(bin).map_err(map_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(bin, std::fs::Permissions::from_mode(0o755)).map_err(map_err)?;
    }

    Ok(())
}

fn write_private(path: &Path, content: &str) -> io::Result<()> {
    std::fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}
