//! Teardown ordering and best-effort behaviour.
//!
//! These tests change the process working directory, so they serialize on
//! a file-local lock.

#![cfg(unix)]

use std::path::PathBuf;
use std::sync::Mutex;

use incogniterm::environment::EnvBuilder;
use incogniterm::home::EphemeralHome;
use incogniterm::identity::FakeIdentity;
use incogniterm::pty::{launch, ShellCommand};
use incogniterm::session::{Session, SessionState, Teardown, TeardownError};
use incogniterm::shell::lookup;

static CWD_LOCK: Mutex<()> = Mutex::new(());

fn home() -> EphemeralHome {
    let identity = FakeIdentity::new("ana_popescu", "bucharest-node-4821").unwrap();
    EphemeralHome::create(&identity, lookup("bash"), None).unwrap()
}

fn sleeper() -> ShellCommand {
    let env = EnvBuilder::from_vars([("PATH", "/usr/bin:/bin")]).build("/");
    ShellCommand::new("/bin/sh", vec!["-c".to_string(), "sleep 30".to_string()], env)
}

fn process_alive(pid: u32) -> bool {
    unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
}

struct RestoreCwd(PathBuf);

impl Drop for RestoreCwd {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.0);
    }
}

#[test]
fn restores_working_directory_and_removes_home() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let original = std::env::current_dir().unwrap();
    let _restore = RestoreCwd(original.clone());

    let home = home();
    let home_path = home.path().to_path_buf();
    std::env::set_current_dir(&home_path).unwrap();

    let mut teardown = Teardown::new(&original);
    teardown.set_home(home);
    let errors = teardown.run();

    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(std::env::current_dir().unwrap(), original);
    assert!(!home_path.exists());
}

#[test]
fn failed_directory_restore_does_not_stop_later_steps() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _restore = RestoreCwd(std::env::current_dir().unwrap());

    let scratch = tempfile::tempdir().unwrap();
    let vanished = scratch.path().join("vanished");
    std::fs::create_dir(&vanished).unwrap();
    let mut teardown = Teardown::new(&vanished);
    std::fs::remove_dir(&vanished).unwrap();

    let home = home();
    let home_path = home.path().to_path_buf();
    teardown.set_home(home);

    let launched = launch(&sleeper()).unwrap();
    let pid = launched.child.process_id().unwrap();
    let handle = launched.handle.clone();
    teardown.set_pty(launched.handle, launched.child);

    let errors = teardown.run();

    assert_eq!(errors.len(), 1, "errors: {errors:?}");
    assert!(matches!(errors[0], TeardownError::RestoreDirectory { .. }));
    assert!(handle.is_closed(), "pty should be released");
    assert!(!process_alive(pid), "shell should be stopped");
    assert!(!home_path.exists(), "home should be removed");
}

#[test]
fn partial_setup_only_undoes_what_happened() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let original = std::env::current_dir().unwrap();
    let _restore = RestoreCwd(original.clone());

    let errors = Teardown::new(&original).run();
    assert!(errors.is_empty());
    assert_eq!(std::env::current_dir().unwrap(), original);
}

#[test]
fn session_close_releases_partial_setup() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let original = std::env::current_dir().unwrap();
    let _restore = RestoreCwd(original.clone());

    let mut session = Session::new(&original);
    let home = home();
    let home_path = home.path().to_path_buf();
    session.resources().set_home(home);
    assert_eq!(session.state(), SessionState::Created);

    let errors = session.close();
    assert!(errors.is_empty());
    assert!(!home_path.exists());
}

#[test]
fn session_states_follow_lifecycle() {
    let _lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let original = std::env::current_dir().unwrap();
    let _restore = RestoreCwd(original.clone());

    let mut session = Session::new(&original);
    session.advance(SessionState::Launched);
    session.advance(SessionState::Running);
    assert_eq!(session.state(), SessionState::Running);
    session.begin_terminating();
    assert_eq!(session.state(), SessionState::Terminating);
    session.begin_terminating();
    assert_eq!(session.state(), SessionState::Terminating);
    assert!(session.close().is_empty());
}
