use clap::Parser;

use incogniterm::cli::Cli;
use incogniterm::config::{Config, ConfigError};
use incogniterm::logging::init_tracing;
use incogniterm::session::{self, SessionExit, EXIT_SETUP_FAILURE};

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => fail(&err),
    };
    if let Err(err) = init_tracing(&config.logging) {
        eprintln!("incogniterm: failed to open log file: {err}");
    }

    match session::run(&config, cli.shell.as_deref()) {
        Ok(exit) => {
            if let SessionExit::Indeterminate(reason) = &exit {
                eprintln!("incogniterm: {reason}");
            }
            std::process::exit(exit.code());
        }
        Err(err) => fail(&err),
    }
}

fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn fail(err: &dyn std::fmt::Display) -> ! {
    eprintln!("incogniterm: {err}");
    std::process::exit(EXIT_SETUP_FAILURE);
}
