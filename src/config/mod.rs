mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, HomeConfig, IdentityConfig, LoggingConfig, ShellConfig, RESERVED_ENV_KEYS};
