use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Variables the session controls itself; `[env]` may not set them.
pub const RESERVED_ENV_KEYS: &[&str] = &["USER", "LOGNAME", "HOME", "HOSTNAME", "PATH"];

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub home: HomeConfig,
    /// Extra variables exported to the child shell.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Fixed or reproducible fake identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Fixed fake user (e.g., "ana_popescu").
    #[serde(default)]
    pub user: Option<String>,
    /// Fixed fake host (e.g., "bucharest-node-4821").
    #[serde(default)]
    pub host: Option<String>,
    /// Seed for generated names; unset means fresh entropy per run.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    /// Shell executable; falls back to `$SHELL`, then `/bin/bash`.
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HomeConfig {
    /// Parent directory for the ephemeral home (default: system temp dir).
    #[serde(default)]
    pub temp_root: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `INCOGNITERM_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Append logs here instead of stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}
