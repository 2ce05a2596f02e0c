//! CLI definition, help text and top-level dispatch

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use sdd_core::Workspace;

use crate::registry::{self, DispatchError, COMMANDS};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// sdd - Cross-platform helper for spec-driven development
///
/// Flags are only recognised in the command position; everything after
/// the command is passed to it untouched. Use [`parse_from`] rather than
/// the clap entry points so that no argument is interpreted by clap.
#[derive(Parser)]
#[command(name = "sdd")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Command to run (or --help / --version)
    #[arg(allow_hyphen_values = true)]
    pub command: Option<String>,

    /// Arguments for the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Parse a full argv (program name first).
///
/// Arguments are converted lossily to UTF-8 and placed behind a `--`
/// separator, so a user-supplied `--` or `-v` reaches the dispatcher
/// as-is.
pub fn parse_from<I, T>(argv: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut argv = argv.into_iter().map(|arg| arg.into().to_string_lossy().into_owned());
    let program = argv.next().unwrap_or_else(|| "sdd".to_string());
    let escaped = std::iter::once(program)
        .chain(std::iter::once("--".to_string()))
        .chain(argv);
    Cli::try_parse_from(escaped)
}

/// Full help text rendered from the registry
pub fn usage() -> String {
    let mut text = String::new();
    text.push_str(&format!("sdd v{}\n", VERSION));
    text.push_str("Cross-platform helper for spec-driven development\n\n");
    text.push_str("USAGE:\n");
    text.push_str("  sdd <command> [arguments]\n\n");
    text.push_str("COMMANDS:\n");
    for command in COMMANDS {
        text.push_str(&format!("  {:<30} {}\n", command.usage(), command.about));
    }
    text.push('\n');
    text.push_str("OPTIONS:\n");
    text.push_str(&format!("  {:<30} {}\n", "--version, -v", "Show version"));
    text.push_str(&format!("  {:<30} {}\n", "--help, -h", "Show this help"));
    text
}

/// Run the CLI and map the outcome to a process exit code
pub fn run(cli: Cli) -> ExitCode {
    let verb = match cli.command.as_deref() {
        None | Some("--help") | Some("-h") => {
            print!("{}", usage());
            return ExitCode::SUCCESS;
        }
        Some("--version") | Some("-v") => {
            println!("{}", VERSION);
            return ExitCode::SUCCESS;
        }
        Some(verb) => verb,
    };

    match dispatch(verb, &cli.args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            if let DispatchError::Unknown(_) = err {
                eprintln!("Run \"sdd --help\" for available commands");
            }
            ExitCode::FAILURE
        }
    }
}

fn dispatch(verb: &str, args: &[String]) -> Result<(), DispatchError> {
    let command = registry::lookup(verb)?;
    let ws = Workspace::current().map_err(|reason| DispatchError::Failed {
        command: command.name,
        reason,
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    command.invoke(&ws, args, &mut out)?;
    out.flush().map_err(|err| DispatchError::Failed {
        command: command.name,
        reason: err.into(),
    })
}
