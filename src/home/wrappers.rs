//! `id`, `whoami` and `hostname` replacements.
//!
//! Plain `/bin/sh` scripts that echo the fake identity. Anything else that
//! reveals the real identity (`ps`, `/etc/passwd`, ...) is untouched.

use std::path::Path;

use super::HomeError;
use crate::identity::FakeIdentity;

pub const WRAPPERS: &[&str] = &["id", "whoami", "hostname"];

pub fn install(bin: &Path, identity: &FakeIdentity) -> Result<(), HomeError> {
    write_executable(bin, "id", &id_script(identity))?;
    write_executable(bin, "whoami", &echo_script(identity.user()))?;
    write_executable(bin, "hostname", &echo_script(identity.host()))?;
    Ok(())
}

fn id_script(identity: &FakeIdentity) -> String {
    let user = identity.user();
    format!("#!/bin/sh\necho \"uid=1000({user}) gid=1000({user}) groups=1000({user})\"\n")
}

fn echo_script(value: &str) -> String {
    format!("#!/bin/sh\necho \"{value}\"\n")
}

/// Write a script file and make it executable.
fn write_executable(dir: &Path, name: &'static str, content: &str) -> Result<(), HomeError> {
    let path = dir.join(name);
    std::fs::write(&path, content)
        .map_err(|source| HomeError::WriteWrapper { name, source })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .map_err(|source| HomeError::WriteWrapper { name, source })?;
    }

    Ok(())
}
