//! Shell descriptors.
//!
//! Each supported shell is a row in [`PROFILES`]; anything not listed falls
//! back to [`DEFAULT_PROFILE`]. Supporting another shell means adding a row.

use std::path::{Path, PathBuf};

use crate::identity::FakeIdentity;

const FALLBACK_SHELL: &str = "/bin/bash";

/// How the rc file sets the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// `PS1='[user@host \w]\$ '`
    Ps1,
    /// `PROMPT='%F{cyan}[user@host %~]%f$ '`
    ZshPrompt,
}

/// How the shell is told to read our rc file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStyle {
    /// `--rcfile <rc> -i`
    RcFileFlag,
    /// `-i`; the shell finds the rc file under `$HOME` itself.
    Interactive,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ShellProfile {
    pub name: &'static str,
    pub rc_file: &'static str,
    pub history_file: &'static str,
    pub prompt: PromptStyle,
    pub launch: LaunchStyle,
}

pub const PROFILES: &[ShellProfile] = &[
    ShellProfile {
        name: "bash",
        rc_file: ".bashrc",
        history_file: ".bash_history",
        prompt: PromptStyle::Ps1,
        launch: LaunchStyle::RcFileFlag,
    },
    ShellProfile {
        name: "zsh",
        rc_file: ".zshrc",
        history_file: ".zsh_history",
        prompt: PromptStyle::ZshPrompt,
        launch: LaunchStyle::Interactive,
    },
];

pub const DEFAULT_PROFILE: ShellProfile = ShellProfile {
    name: "default",
    rc_file: ".bashrc",
    history_file: ".bash_history",
    prompt: PromptStyle::Ps1,
    launch: LaunchStyle::Interactive,
};

/// Looks up a profile by executable base name (`"bash"`, `"zsh"`, ...).
pub fn lookup(base_name: &str) -> &'static ShellProfile {
    PROFILES
        .iter()
        .find(|profile| profile.name == base_name)
        .unwrap_or(&DEFAULT_PROFILE)
}

impl ShellProfile {
    pub fn prompt_line(&self, identity: &FakeIdentity) -> String {
        match self.prompt {
            PromptStyle::Ps1 => format!(
                "export PS1='[{}@{} \\w]\\$ '",
                identity.user(),
                identity.host()
            ),
            PromptStyle::ZshPrompt => format!(
                "PROMPT='%F{{cyan}}[{}@{} %~]%f$ '",
                identity.user(),
                identity.host()
            ),
        }
    }

    /// Startup file contents for a session rooted at `home`.
    pub fn rc_contents(&self, identity: &FakeIdentity, home: &Path) -> String {
        format!(
            "\nexport USER={user}\nexport LOGNAME={user}\nexport HOSTNAME={host}\n{prompt}\nexport HISTFILE=\"{history}\"\n",
            user = identity.user(),
            host = identity.host(),
            prompt = self.prompt_line(identity),
            history = home.join(self.history_file).display(),
        )
    }

    pub fn launch_args(&self, rc_path: &Path) -> Vec<String> {
        match self.launch {
            LaunchStyle::RcFileFlag => vec![
                "--rcfile".to_string(),
                rc_path.display().to_string(),
                "-i".to_string(),
            ],
            LaunchStyle::Interactive => vec!["-i".to_string()],
        }
    }
}

/// Shell executable together with its descriptor.
#[derive(Debug, Clone)]
pub struct ResolvedShell {
    pub path: PathBuf,
    pub profile: &'static ShellProfile,
}

/// Picks the shell from an explicit override, then `$SHELL`, then `/bin/bash`.
pub fn resolve_shell(override_path: Option<&str>) -> ResolvedShell {
    let env_shell = std::env::var("SHELL").ok();
    resolve_shell_from(override_path, env_shell.as_deref())
}

pub fn resolve_shell_from(override_path: Option<&str>, env_shell: Option<&str>) -> ResolvedShell {
    let path = override_path
        .filter(|p| !p.is_empty())
        .or(env_shell.filter(|p| !p.is_empty()))
        .unwrap_or(FALLBACK_SHELL);
    let path = PathBuf::from(path);
    let base = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    ResolvedShell {
        profile: lookup(&base),
        path,
    }
}
