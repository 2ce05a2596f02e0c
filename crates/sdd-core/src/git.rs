//! Git history queries about the steering documents
//!
//! Every query shells out to `git` and folds failures into a fixed
//! message. Nothing here returns an error to the caller.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::Result;
use thiserror::Error;
use tracing::debug;

use crate::layout::Workspace;

/// Most steering-era commits reported at once
const MAX_COMMITS: usize = 20;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] io::Error),

    #[error("git exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },
}

/// Run git in `dir` and return its stdout
pub fn run_git(dir: &Path, args: &[&str]) -> Result<String, GitError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .stdin(Stdio::null())
        .output()?;

    if !output.status.success() {
        return Err(GitError::Failed {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

fn steering_pathspec(ws: &Workspace) -> String {
    format!("{}/", ws.layout.steering_dir)
}

/// One-line summary of the latest commit touching the steering directory
pub fn last_steering_commit(ws: &Workspace) -> String {
    let pathspec = steering_pathspec(ws);
    match run_git(&ws.root, &["log", "-1", "--oneline", "--", &pathspec]) {
        Ok(out) => out.trim().to_string(),
        Err(err) => {
            debug!(error = %err, "last steering commit lookup failed");
            "No previous steering commits".to_string()
        }
    }
}

/// Commits made since the steering directory last changed
pub fn commits_since_steering(ws: &Workspace) -> String {
    let pathspec = steering_pathspec(ws);
    let last = match run_git(&ws.root, &["log", "-1", "--format=%H", "--", &pathspec]) {
        Ok(out) => out.trim().to_string(),
        Err(err) => {
            debug!(error = %err, "steering commit hash lookup failed");
            String::new()
        }
    };
    if last.is_empty() {
        return "No previous steering update found".to_string();
    }

    let range = format!("{}..HEAD", last);
    let max_count = format!("--max-count={}", MAX_COMMITS);
    match run_git(&ws.root, &["log", "--oneline", &range, &max_count]) {
        Ok(out) if out.trim().is_empty() => "No commits since last steering update".to_string(),
        Ok(out) => out.trim().to_string(),
        Err(err) => {
            debug!(error = %err, "commit range lookup failed");
            "Not a git repository".to_string()
        }
    }
}

/// Terse working tree status
pub fn git_status(ws: &Workspace) -> String {
    match run_git(&ws.root, &["status", "--porcelain"]) {
        // Only the end is trimmed: a leading space is the index column of
        // the first entry (" M file"), and trimming it would shift the row
        Ok(out) if out.trim().is_empty() => "Working tree clean".to_string(),
        Ok(out) => out.trim_end().to_string(),
        Err(err) => {
            debug!(error = %err, "git status failed");
            "Not a git repository".to_string()
        }
    }
}

fn print_line(out: &mut dyn Write, text: &str) -> Result<()> {
    writeln!(out, "{}", text)?;
    out.flush()?;
    Ok(())
}

pub fn get_last_steering_commit(ws: &Workspace, out: &mut dyn Write) -> Result<()> {
    print_line(out, &last_steering_commit(ws))
}

pub fn get_commits_since_steering(ws: &Workspace, out: &mut dyn Write) -> Result<()> {
    print_line(out, &commits_since_steering(ws))
}

pub fn get_git_status(ws: &Workspace, out: &mut dyn Write) -> Result<()> {
    print_line(out, &git_status(ws))
}
