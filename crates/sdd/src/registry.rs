//! Command registry and dispatch

use std::io::Write;

use anyhow::Result;
use thiserror::Error;
use tracing::debug;

use sdd_core::{finders, git, listing, probes, Workspace};

type Nullary = fn(&Workspace, &mut dyn Write) -> Result<()>;
type Unary = fn(&Workspace, &str, &mut dyn Write) -> Result<()>;
type MaybeUnary = fn(&Workspace, Option<&str>, &mut dyn Write) -> Result<()>;

/// A handler together with the positional argument it takes
pub enum Action {
    NoArgs(Nullary),
    Required { arg: &'static str, run: Unary },
    /// Documented as required, but the handler copes with its absence
    Lenient { arg: &'static str, run: MaybeUnary },
    Optional { arg: &'static str, default: &'static str, run: Unary },
}

pub struct Command {
    pub name: &'static str,
    pub about: &'static str,
    pub action: Action,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Error executing {command}: missing required argument <{arg}>")]
    MissingArgument {
        command: &'static str,
        arg: &'static str,
    },

    #[error("Error executing {command}: {reason:#}")]
    Failed {
        command: &'static str,
        reason: anyhow::Error,
    },
}

pub const COMMANDS: &[Command] = &[
    Command {
        name: "check-file",
        about: "Check if file exists",
        action: Action::Lenient { arg: "path", run: probes::check_file },
    },
    Command {
        name: "count-custom-steering",
        about: "Count custom steering files",
        action: Action::NoArgs(probes::count_custom_steering),
    },
    Command {
        name: "count-custom-steering-number",
        about: "Count custom steering files (number only)",
        action: Action::NoArgs(probes::count_custom_steering_number),
    },
    Command {
        name: "find-project-files",
        about: "Find source code files",
        action: Action::NoArgs(finders::find_project_files),
    },
    Command {
        name: "find-config-files",
        about: "Find configuration files",
        action: Action::NoArgs(finders::find_config_files),
    },
    Command {
        name: "find-docs",
        about: "Find documentation files",
        action: Action::NoArgs(finders::find_docs),
    },
    Command {
        name: "find-special-dirs",
        about: "Find specialized directories",
        action: Action::NoArgs(finders::find_special_dirs),
    },
    Command {
        name: "find-config-patterns",
        about: "Find config pattern files",
        action: Action::NoArgs(finders::find_config_patterns),
    },
    Command {
        name: "list-spec-dir",
        about: "List spec directory contents",
        action: Action::Required { arg: "name", run: listing::list_spec_dir },
    },
    Command {
        name: "list-all-specs",
        about: "List all spec directories",
        action: Action::NoArgs(listing::list_all_specs),
    },
    Command {
        name: "list-steering-files",
        about: "List steering files",
        action: Action::NoArgs(listing::list_steering_files),
    },
    Command {
        name: "find-active-specs",
        about: "Find specs ready for implementation",
        action: Action::NoArgs(listing::find_active_specs),
    },
    Command {
        name: "get-last-steering-commit",
        about: "Show the last commit touching steering files",
        action: Action::NoArgs(git::get_last_steering_commit),
    },
    Command {
        name: "get-commits-since-steering",
        about: "List commits since the last steering update",
        action: Action::NoArgs(git::get_commits_since_steering),
    },
    Command {
        name: "get-git-status",
        about: "Show working tree status",
        action: Action::NoArgs(git::get_git_status),
    },
    Command {
        name: "ls-dir",
        about: "List directory contents (ls -la style)",
        action: Action::Optional { arg: "dir", default: ".", run: listing::ls_dir },
    },
];

/// Find a command by verb
pub fn lookup(verb: &str) -> Result<&'static Command, DispatchError> {
    COMMANDS
        .iter()
        .find(|command| command.name == verb)
        .ok_or_else(|| DispatchError::Unknown(verb.to_string()))
}

impl Command {
    /// Usage form shown in help, e.g. `check-file <path>`
    pub fn usage(&self) -> String {
        match self.action {
            Action::NoArgs(_) => self.name.to_string(),
            Action::Required { arg, .. } | Action::Lenient { arg, .. } => {
                format!("{} <{}>", self.name, arg)
            }
            Action::Optional { arg, .. } => format!("{} [{}]", self.name, arg),
        }
    }

    /// Run the handler; arguments past the declared one are ignored
    pub fn invoke(
        &self,
        ws: &Workspace,
        args: &[String],
        out: &mut dyn Write,
    ) -> Result<(), DispatchError> {
        debug!(command = self.name, ?args, root = %ws.root.display(), "dispatching");

        let first = args.first().map(String::as_str);
        let result = match self.action {
            Action::NoArgs(run) => run(ws, out),
            Action::Required { arg, run } => {
                let value = first.ok_or(DispatchError::MissingArgument {
                    command: self.name,
                    arg,
                })?;
                run(ws, value, out)
            }
            Action::Lenient { run, .. } => run(ws, first, out),
            Action::Optional { default, run, .. } => run(ws, first.unwrap_or(default), out),
        };

        result.map_err(|reason| DispatchError::Failed {
            command: self.name,
            reason,
        })
    }
}
