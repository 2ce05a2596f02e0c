//! Existence and counting probes

use std::fs;
use std::io::Write;

use anyhow::{Context, Result};

use crate::layout::Workspace;

pub const FILE_EXISTS: &str = "✅ EXISTS - Will be updated preserving custom content";
pub const FILE_MISSING: &str = "📝 Not found - Will be created";

/// Report whether a file exists relative to the workspace root.
///
/// No path at all is reported as missing.
pub fn check_file(ws: &Workspace, path: Option<&str>, out: &mut dyn Write) -> Result<()> {
    let line = if path.is_some_and(|p| ws.resolve(p).exists()) {
        FILE_EXISTS
    } else {
        FILE_MISSING
    };
    writeln!(out, "{}", line)?;
    Ok(())
}

/// Steering documents other than the workflow defaults.
///
/// Returns `None` when the steering directory does not exist.
pub fn custom_steering_files(ws: &Workspace) -> Result<Option<Vec<String>>> {
    let dir = ws.steering_dir();
    if !dir.exists() {
        return Ok(None);
    }

    let entries = fs::read_dir(&dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?;

    let mut files: Vec<String> = entries
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| ws.layout.is_document(name) && !ws.layout.is_default_steering(name))
        .collect();
    files.sort();

    Ok(Some(files))
}

pub fn count_custom_steering(ws: &Workspace, out: &mut dyn Write) -> Result<()> {
    match custom_steering_files(ws)? {
        None => writeln!(out, "📋 No steering directory yet")?,
        Some(files) if files.is_empty() => writeln!(out, "📋 No custom files")?,
        Some(files) => writeln!(
            out,
            "🔧 {} custom file(s) found - Will be preserved",
            files.len()
        )?,
    }
    Ok(())
}

/// Bare count; a missing steering directory counts as zero
pub fn count_custom_steering_number(ws: &Workspace, out: &mut dyn Write) -> Result<()> {
    let count = custom_steering_files(ws)?.map_or(0, |files| files.len());
    writeln!(out, "{}", count)?;
    Ok(())
}
