//! Directory listings in a synthetic `ls -l` format

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use tracing::debug;

use crate::finders::print_paths;
use crate::layout::{slash_path, Workspace};
use crate::walk::Walk;

/// Size reported for directories by `ls-dir`
const DIR_BLOCK_SIZE: u64 = 4096;

/// Manifest markers of a spec that is ready to implement
const READY_MARKERS: &[&str] = &[
    "\"implementation_ready\": true",
    "\"implementation_ready\":true",
];

/// Summary of one directory entry
#[derive(Debug, Clone)]
pub struct EntrySummary {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

impl EntrySummary {
    /// Stat `path`, following symlinks, and record it under `name`
    pub fn read(name: &str, path: &Path) -> io::Result<Self> {
        let meta = fs::metadata(path)?;
        Ok(Self {
            name: name.to_string(),
            is_dir: meta.is_dir(),
            size: meta.len(),
            modified: meta.modified()?.into(),
        })
    }

    fn type_flag(&self) -> char {
        if self.is_dir {
            'd'
        } else {
            '-'
        }
    }

    fn date(&self) -> String {
        self.modified.format("%Y-%m-%d").to_string()
    }

    /// Line used for spec directories
    pub fn spec_line(&self) -> String {
        let size = if self.is_dir {
            "-".to_string()
        } else {
            self.size.to_string()
        };
        format!(
            "{}rw-rw-rw- 1 user user {} {} {}",
            self.type_flag(),
            size,
            self.date(),
            self.name
        )
    }

    /// Line used for steering documents
    pub fn steering_line(&self) -> String {
        format!("-rw-rw-rw- 1 user user {} {} {}", self.size, self.date(), self.name)
    }

    /// Line used by `ls-dir`; the time of day is shown in local time
    pub fn ls_line(&self) -> String {
        let size = if self.is_dir { DIR_BLOCK_SIZE } else { self.size };
        let time = self.modified.with_timezone(&Local).format("%H:%M");
        format!(
            "{}rwxrwxrwx 1 user user {} {} {} {}",
            self.type_flag(),
            size,
            self.date(),
            time,
            self.name
        )
    }
}

/// Immediate entries of a directory, ordered by name
fn read_sorted(dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut entries: Vec<(String, PathBuf)> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| (entry.file_name().to_string_lossy().to_string(), entry.path()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

/// Print every readable entry of `dir`; entries that cannot be stat'ed are skipped
fn print_entries(
    dir: &Path,
    out: &mut dyn Write,
    keep: impl Fn(&str) -> bool,
    render: fn(&EntrySummary) -> String,
) -> Result<()> {
    let entries = read_sorted(dir).with_context(|| format!("Failed to read {}", dir.display()))?;

    for (name, path) in entries.iter().filter(|(name, _)| keep(name)) {
        match EntrySummary::read(name, path) {
            Ok(summary) => writeln!(out, "{}", render(&summary))?,
            Err(err) => debug!(path = %path.display(), error = %err, "skipping entry"),
        }
    }
    Ok(())
}

/// List one spec directory; `name` is joined lexically, so `..` may leave
/// the specs directory.
pub fn list_spec_dir(ws: &Workspace, name: &str, out: &mut dyn Write) -> Result<()> {
    let shown = slash_path(&Path::new(ws.layout.specs_dir).join(name));
    let dir = ws.resolve(&shown);
    if !dir.exists() {
        writeln!(out, "Directory not found: {}", shown)?;
        return Ok(());
    }
    print_entries(&dir, out, |_| true, EntrySummary::spec_line)
}

pub fn list_all_specs(ws: &Workspace, out: &mut dyn Write) -> Result<()> {
    let dir = ws.specs_dir();
    if !dir.exists() {
        writeln!(out, "No specs directory found")?;
        return Ok(());
    }
    print_entries(&dir, out, |_| true, EntrySummary::spec_line)
}

pub fn list_steering_files(ws: &Workspace, out: &mut dyn Write) -> Result<()> {
    let dir = ws.steering_dir();
    if !dir.exists() {
        writeln!(out, "No steering directory found")?;
        return Ok(());
    }
    print_entries(
        &dir,
        out,
        |name| ws.layout.is_document(name),
        EntrySummary::steering_line,
    )
}

/// Manifests under the specs root marked ready for implementation
pub fn active_specs(ws: &Workspace) -> Vec<String> {
    let dir = ws.specs_dir();
    if !dir.exists() {
        return Vec::new();
    }

    Walk::new(&dir)
        .label(ws.layout.specs_dir)
        .entries()
        .into_iter()
        .filter(|found| !found.is_dir && found.name == ws.layout.manifest)
        .filter(|found| match fs::read(&found.location) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                READY_MARKERS.iter().any(|marker| text.contains(marker))
            }
            Err(err) => {
                debug!(path = %found.path, error = %err, "skipping unreadable manifest");
                false
            }
        })
        .map(|found| found.path)
        .collect()
}

/// Prints nothing at all when no spec is ready
pub fn find_active_specs(ws: &Workspace, out: &mut dyn Write) -> Result<()> {
    print_paths(out, &active_specs(ws), None)
}

/// `ls -la` style listing with `.` and `..` pseudo-entries
pub fn ls_dir(ws: &Workspace, dir: &str, out: &mut dyn Write) -> Result<()> {
    let path = ws.resolve(dir);
    if !path.exists() {
        writeln!(out, "Directory not found: {}", dir)?;
        return Ok(());
    }

    let entries = match read_sorted(&path) {
        Ok(entries) => entries,
        Err(err) => {
            writeln!(out, "Error reading directory: {}", err)?;
            return Ok(());
        }
    };

    let pseudo = [(".".to_string(), path.clone()), ("..".to_string(), path.join(".."))];
    for (name, entry_path) in pseudo.into_iter().chain(entries) {
        match EntrySummary::read(&name, &entry_path) {
            Ok(summary) => writeln!(out, "{}", summary.ls_line())?,
            Err(err) => {
                debug!(path = %entry_path.display(), error = %err, "stat failed");
                writeln!(out, "-????????? ? ? ? ? ? {}", name)?;
            }
        }
    }
    Ok(())
}
