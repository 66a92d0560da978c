use incogniterm::config::{Config, ConfigError};
use std::io::Write;
use std::path::PathBuf;

/// Test that Config::default() produces the expected values.
#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert!(config.identity.user.is_none());
    assert!(config.identity.host.is_none());
    assert!(config.identity.seed.is_none());
    assert!(config.shell.path.is_none());
    assert!(config.home.temp_root.is_none());
    assert!(config.env.is_empty());
    assert_eq!(config.logging.level, "warn");
    assert!(config.logging.file.is_none());
}

/// Test that Config::config_path() returns a path ending with the expected filename.
#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("incogniterm/config.toml"));
}

#[test]
fn test_empty_file_is_default() {
    let config = Config::parse("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_parse_full_config() {
    let config = Config::parse(
        r#"
[identity]
user = "ana_popescu"
host = "bucharest-node-4821"
seed = 42

[shell]
path = "/bin/zsh"

[home]
temp_root = "/var/tmp"

[env]
EDITOR = "vi"

[logging]
level = "debug"
file = "/tmp/incogniterm.log"
"#,
    )
    .unwrap();

    assert_eq!(config.identity.user.as_deref(), Some("ana_popescu"));
    assert_eq!(config.identity.host.as_deref(), Some("bucharest-node-4821"));
    assert_eq!(config.identity.seed, Some(42));
    assert_eq!(config.shell.path.as_deref(), Some("/bin/zsh"));
    assert_eq!(config.home.temp_root, Some(PathBuf::from("/var/tmp")));
    assert_eq!(config.env.get("EDITOR").map(String::as_str), Some("vi"));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/incogniterm.log")));
}

#[test]
fn test_unknown_field_is_parse_error() {
    let result = Config::parse("[identity]\nname = \"x\"\n");
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn test_validation_rejects_bad_fake_user() {
    let result = Config::parse("[identity]\nuser = \"ana popescu\"\n");
    match result {
        Err(ConfigError::ValidationError { message }) => assert!(message.contains("user")),
        other => panic!("expected ValidationError, got {other:?}"),
    }
}

#[test]
fn test_validation_rejects_reserved_env_keys() {
    for key in ["USER", "LOGNAME", "HOME", "HOSTNAME", "PATH"] {
        let result = Config::parse(&format!("[env]\n{key} = \"x\"\n"));
        assert!(
            matches!(result, Err(ConfigError::ValidationError { .. })),
            "{key} should be rejected"
        );
    }
}

#[test]
fn test_validation_rejects_malformed_env_key() {
    let result = Config::parse("[env]\n\"A=B\" = \"x\"\n");
    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

#[test]
fn test_validation_rejects_blank_shell() {
    let result = Config::parse("[shell]\npath = \"  \"\n");
    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

#[test]
fn test_load_from_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load_from(&dir.path().join("nope.toml"));
    assert!(matches!(result, Err(ConfigError::ReadError { .. })));
}

#[test]
fn test_load_from_reports_path_on_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"[identity\n").unwrap();

    match Config::load_from(&path) {
        Err(ConfigError::ParseError { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected ParseError, got {other:?}"),
    }
}
