//! Environment builder: everything the child shell sees, in one place.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::identity::FakeIdentity;

const PATH_SEPARATOR: char = ':';
const DEFAULT_TERM: &str = "xterm-256color";

/// Builder for the child's environment, starting from an inherited set.
#[derive(Debug, Clone)]
pub struct EnvBuilder {
    vars: BTreeMap<String, String>,
}

impl EnvBuilder {
    /// Start from the current process environment. Entries that are not
    /// valid UTF-8 are skipped.
    pub fn inherit() -> Self {
        Self::from_vars(std::env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }))
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Extra variables from the config file.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        self.vars
            .extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// `USER`, `LOGNAME` and `HOSTNAME`.
    pub fn with_identity(mut self, identity: &FakeIdentity) -> Self {
        self.set("USER", identity.user());
        self.set("LOGNAME", identity.user());
        self.set("HOSTNAME", identity.host());
        self
    }

    pub fn with_home(mut self, home: &Path) -> Self {
        self.set("HOME", &home.display().to_string());
        self
    }

    /// Put `dir` first on `PATH`, creating `PATH` if it was unset.
    pub fn with_path_prefix(mut self, dir: &Path) -> Self {
        let dir = dir.display().to_string();
        let path = match self.vars.get("PATH") {
            Some(current) if !current.is_empty() => format!("{dir}{PATH_SEPARATOR}{current}"),
            _ => dir,
        };
        self.set("PATH", &path);
        self
    }

    /// Full-screen programs misbehave without `TERM`; only fill it in when missing.
    pub fn with_default_term(mut self) -> Self {
        self.vars
            .entry("TERM".to_string())
            .or_insert_with(|| DEFAULT_TERM.to_string());
        self
    }

    pub fn build(self, cwd: impl Into<PathBuf>) -> EnvBundle {
        EnvBundle {
            vars: self.vars,
            cwd: cwd.into(),
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::inherit()
    }
}

/// Final variables plus working directory for the child process.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvBundle {
    vars: BTreeMap<String, String>,
    cwd: PathBuf,
}

impl EnvBundle {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}
