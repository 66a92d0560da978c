use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "incogniterm",
    version,
    about = "Start a shell with a fake user, host and a throwaway HOME"
)]
pub struct Cli {
    /// Config file (default: ~/.config/incogniterm/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Shell to run instead of $SHELL
    #[arg(long, value_name = "PATH")]
    pub shell: Option<String>,
}
