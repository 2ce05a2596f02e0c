//! Directory tree walking
//!
//! A walk visits entries depth-first, in file-name order within each
//! directory. Excluded names are pruned before descent, so nothing below
//! an excluded directory is ever read. Unreadable subtrees are reported
//! as [`Step::Skipped`] and contribute nothing.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::layout::slash_path;

/// Which entries an exclusion list applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcludeScope {
    /// Only directories with an excluded name are pruned
    Directories,
    /// Any entry with an excluded name is pruned
    AllEntries,
}

/// An entry reached by a walk
#[derive(Debug, Clone)]
pub struct Found {
    /// Path relative to the walk root, `/`-separated, prefixed with the label
    pub path: String,
    pub name: String,
    pub is_dir: bool,
    pub is_file: bool,
    /// Location on disk
    pub location: PathBuf,
}

/// One step of a walk
#[derive(Debug)]
pub enum Step {
    Entry(Found),
    Skipped { path: Option<PathBuf>, reason: String },
}

#[derive(Debug, Clone)]
pub struct Walk {
    root: PathBuf,
    label: String,
    max_depth: Option<usize>,
    excluded: Vec<String>,
    scope: ExcludeScope,
}

impl Walk {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            label: String::new(),
            max_depth: None,
            excluded: Vec::new(),
            scope: ExcludeScope::Directories,
        }
    }

    /// Prefix rendered in front of every found path
    pub fn label(mut self, label: impl AsRef<Path>) -> Self {
        self.label = slash_path(label.as_ref());
        self
    }

    /// Read directories at most `levels` below the root
    pub fn max_depth(mut self, levels: usize) -> Self {
        self.max_depth = Some(levels);
        self
    }

    pub fn exclude(mut self, names: &[&str], scope: ExcludeScope) -> Self {
        self.excluded.extend(names.iter().map(|n| n.to_string()));
        self.scope = scope;
        self
    }

    /// Every step of the walk, skipped subtrees included
    pub fn steps(&self) -> impl Iterator<Item = Step> + '_ {
        let mut walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name();
        if let Some(levels) = self.max_depth {
            // Entries of a directory sit one level below it
            walker = walker.max_depth(levels + 1);
        }

        walker
            .into_iter()
            .filter_entry(move |entry| !self.is_excluded(entry))
            .map(move |step| match step {
                Ok(entry) => Step::Entry(self.found(&entry)),
                Err(err) => Step::Skipped {
                    path: err.path().map(Path::to_path_buf),
                    reason: err.to_string(),
                },
            })
    }

    /// Fold the walk into the entries it reached
    pub fn entries(&self) -> Vec<Found> {
        self.steps().fold(Vec::new(), |mut acc, step| {
            match step {
                Step::Entry(found) => acc.push(found),
                Step::Skipped { path, reason } => {
                    debug!(path = ?path, %reason, "skipping unreadable entry");
                }
            }
            acc
        })
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        if !self.excluded.iter().any(|x| *x == name) {
            return false;
        }
        match self.scope {
            ExcludeScope::Directories => entry.file_type().is_dir(),
            ExcludeScope::AllEntries => true,
        }
    }

    fn found(&self, entry: &DirEntry) -> Found {
        let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
        let relative = slash_path(relative);
        let path = if self.label.is_empty() {
            relative
        } else {
            format!("{}/{}", self.label, relative)
        };

        Found {
            path,
            name: entry.file_name().to_string_lossy().to_string(),
            is_dir: entry.file_type().is_dir(),
            is_file: entry.file_type().is_file(),
            location: entry.path().to_path_buf(),
        }
    }
}
