use std::path::{Path, PathBuf};

use portable_pty::CommandBuilder;

use crate::environment::EnvBundle;

/// Everything needed to start the child shell: executable, argv tail,
/// environment and working directory.
#[derive(Debug, Clone)]
pub struct ShellCommand {
    program: PathBuf,
    args: Vec<String>,
    env: EnvBundle,
}

impl ShellCommand {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, env: EnvBundle) -> Self {
        Self {
            program: program.into(),
            args,
            env,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn env(&self) -> &EnvBundle {
        &self.env
    }

    /// The child sees exactly the bundle: the inherited environment that
    /// `CommandBuilder::new` copies in is cleared first.
    pub fn to_command_builder(&self) -> CommandBuilder {
        let mut cmd = CommandBuilder::new(&self.program);
        cmd.args(&self.args);
        cmd.env_clear();
        for (key, value) in self.env.iter() {
            cmd.env(key, value);
        }
        cmd.cwd(self.env.cwd());
        cmd
    }
}
