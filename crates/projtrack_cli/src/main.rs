//! `projtrack` console entry point.
//!
//! # Responsibility
//! - Open the project database and drive core services from the shell.
//! - Map import outcomes to process exit codes for scripting.

mod args;
mod commands;

use args::Cli;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = projtrack_core::init_logging(&cli.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match commands::run(&cli) {
        Ok(code) => code,
        Err(err) => {
            log::error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::from(commands::EXIT_FAILURE)
        }
    }
}
