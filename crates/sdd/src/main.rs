//! sdd - Cross-platform helper for spec-driven development
//!
//! Small filesystem and git queries used by agents that drive the
//! steering/spec workflow. Each command prints one text result.

mod cli;
mod registry;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout carries command output only
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match cli::parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    cli::run(cli)
}
