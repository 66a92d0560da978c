//! Launch, relay and exit-status behaviour on real PTYs.

#[cfg(unix)]
mod pty_session {
    use incogniterm::environment::EnvBuilder;
    use incogniterm::home::EphemeralHome;
    use incogniterm::identity::FakeIdentity;
    use incogniterm::pty::{launch, relay, Geometry, LaunchError, ShellCommand};
    use incogniterm::session::{build_command, SessionExit, EXIT_INDETERMINATE};
    use incogniterm::shell::{lookup, resolve_shell_from};
    use std::io::{self, Read, Write};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }

        fn wait_for(&self, needle: &str, timeout: Duration) -> bool {
            let deadline = Instant::now() + timeout;
            while Instant::now() < deadline {
                if self.text().contains(needle) {
                    return true;
                }
                std::thread::sleep(Duration::from_millis(20));
            }
            false
        }
    }

    fn sh(script: &str) -> ShellCommand {
        let env = EnvBuilder::from_vars([("PATH", "/usr/bin:/bin"), ("TERM", "xterm-256color")])
            .build(std::env::temp_dir());
        ShellCommand::new("/bin/sh", vec!["-c".to_string(), script.to_string()], env)
    }

    fn read_all(mut reader: Box<dyn Read + Send>) -> String {
        let mut output = Vec::new();
        // EIO once the subordinate side closes; what was read so far is kept.
        let _ = reader.read_to_end(&mut output);
        String::from_utf8_lossy(&output).into_owned()
    }

    // ── Exit status ─────────────────────────────────────────────────

    #[test]
    fn exit_code_is_propagated() {
        let mut launched = launch(&sh("exit 3")).unwrap();
        let exit = SessionExit::from_wait(launched.child.wait());
        assert_eq!(exit, SessionExit::Code(3));
        assert_eq!(exit.code(), 3);
    }

    #[test]
    fn clean_exit_is_zero() {
        let mut launched = launch(&sh("true")).unwrap();
        assert_eq!(SessionExit::from_wait(launched.child.wait()).code(), 0);
    }

    #[test]
    fn signal_death_is_indeterminate() {
        let mut launched = launch(&sh("kill -9 $$")).unwrap();
        let exit = SessionExit::from_wait(launched.child.wait());
        assert!(matches!(exit, SessionExit::Indeterminate(_)), "got {exit:?}");
        assert_eq!(exit.code(), EXIT_INDETERMINATE);
    }

    #[test]
    fn missing_program_is_launch_error() {
        let env = EnvBuilder::from_vars([("PATH", "/usr/bin:/bin")]).build("/");
        let command = ShellCommand::new("/nonexistent/incogniterm-shell", Vec::new(), env);
        assert!(matches!(launch(&command), Err(LaunchError::Spawn { .. })));
    }

    // ── Environment reaches the child ───────────────────────────────

    #[test]
    fn child_sees_exactly_the_bundle() {
        let env = EnvBuilder::from_vars([("PATH", "/usr/bin:/bin"), ("MARKER", "bundle-only")])
            .build(std::env::temp_dir());
        let command = ShellCommand::new(
            "/bin/sh",
            vec![
                "-c".to_string(),
                "echo marker=$MARKER; echo cargo=${CARGO_PKG_NAME:-unset}; pwd".to_string(),
            ],
            env,
        );
        let mut launched = launch(&command).unwrap();
        let reader = launched.reader;
        let _ = launched.child.wait();
        let text = read_all(reader);

        assert!(text.contains("marker=bundle-only"), "output: {text:?}");
        assert!(text.contains("cargo=unset"), "inherited env leaked: {text:?}");
        let tmp = std::env::temp_dir().canonicalize().unwrap();
        assert!(text.contains(tmp.to_str().unwrap()), "output: {text:?}");
    }

    #[test]
    fn whoami_inside_session_prints_fake_user() {
        let identity = FakeIdentity::new("ana_popescu", "bucharest-node-4821").unwrap();
        let home = EphemeralHome::create(&identity, lookup("sh"), None).unwrap();
        let shell = resolve_shell_from(Some("/bin/sh"), None);
        let interactive = build_command(&shell, &identity, &home, &Default::default());
        let command = ShellCommand::new(
            "/bin/sh",
            vec!["-c".to_string(), "whoami; hostname".to_string()],
            interactive.env().clone(),
        );

        let mut launched = launch(&command).unwrap();
        let reader = launched.reader;
        let _ = launched.child.wait();
        let text = read_all(reader);
        assert!(text.contains("ana_popescu\r\n"), "output: {text:?}");
        assert!(text.contains("bucharest-node-4821\r\n"), "output: {text:?}");
    }

    // ── Relay ───────────────────────────────────────────────────────

    #[test]
    fn relay_round_trips_through_the_shell() {
        let launched = launch(&sh("read line; echo got:$line")).unwrap();
        let mut child = launched.child;
        let capture = Capture::default();
        let output = relay::spawn_output(launched.reader, capture.clone()).unwrap();
        relay::spawn_input(io::Cursor::new(b"ping\n".to_vec()), launched.handle.clone()).unwrap();

        assert!(capture.wait_for("got:ping", Duration::from_secs(5)), "output: {:?}", capture.text());
        assert_eq!(SessionExit::from_wait(child.wait()).code(), 0);
        assert!(output.wait(Duration::from_secs(5)), "output relay should end with the shell");
    }

    #[test]
    fn input_after_close_is_broken_pipe() {
        let mut launched = launch(&sh("sleep 5")).unwrap();
        launched.handle.close();
        let err = launched.handle.send_input(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        let _ = launched.child.kill();
        let _ = launched.child.wait();
    }

    // ── Geometry ────────────────────────────────────────────────────

    #[test]
    fn resize_is_visible_to_the_child() {
        let launched = launch(&sh("sleep 0.3; stty size")).unwrap();
        let mut child = launched.child;
        launched.handle.resize(Geometry::new(40, 132)).unwrap();
        assert_eq!(launched.handle.size(), Some(Geometry::new(40, 132)));

        let capture = Capture::default();
        let output = relay::spawn_output(launched.reader, capture.clone()).unwrap();
        let _ = child.wait();
        assert!(output.wait(Duration::from_secs(5)));
        assert!(capture.text().contains("40 132"), "output: {:?}", capture.text());
    }

    #[test]
    fn resize_after_close_is_an_error_not_a_crash() {
        let mut launched = launch(&sh("true")).unwrap();
        let _ = launched.child.wait();
        launched.handle.close();
        assert!(launched.handle.resize(Geometry::new(10, 10)).is_err());
        assert!(launched.handle.size().is_none());
    }
}
