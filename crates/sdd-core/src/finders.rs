//! Recursive finders over the project tree

use std::io::Write;

use anyhow::Result;

use crate::layout::Workspace;
use crate::walk::{ExcludeScope, Found, Walk};

/// Extensions counted as project source
const SOURCE_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".ts", ".jsx", ".tsx", ".java", ".go", ".rs", ".c", ".cpp", ".h", ".html",
    ".css", ".md", ".cs",
];

/// Project manifest file names
const MANIFEST_FILES: &[&str] = &[
    "package.json",
    "requirements.txt",
    "pom.xml",
    "Cargo.toml",
    "go.mod",
    "pyproject.toml",
    "tsconfig.json",
];

/// Conventional documentation basenames
const DOC_PREFIXES: &[&str] = &["README", "CHANGELOG", "LICENSE"];

/// Substrings marking workflow-relevant directories
const SPECIAL_DIR_MARKERS: &[&str] = &["test", "spec", "api", "auth", "security"];

/// A filtered walk from the workspace root
pub struct Finder {
    /// Directory levels read below the root, `None` for unbounded
    pub max_depth: Option<usize>,
    pub excluded: &'static [&'static str],
    pub scope: ExcludeScope,
    /// Also prune the workflow data directory
    pub skip_workflow_data: bool,
    pub matches: fn(&Found) -> bool,
    /// Printed when nothing matches
    pub none_found: &'static str,
}

pub const PROJECT_FILES: Finder = Finder {
    max_depth: None,
    excluded: &["node_modules", ".git", "dist"],
    scope: ExcludeScope::Directories,
    skip_workflow_data: false,
    matches: is_source_file,
    none_found: "No source files found",
};

pub const CONFIG_FILES: Finder = Finder {
    max_depth: Some(3),
    excluded: &["node_modules", ".git"],
    scope: ExcludeScope::Directories,
    skip_workflow_data: false,
    matches: is_manifest_file,
    none_found: "No config files found",
};

pub const DOCS: Finder = Finder {
    max_depth: Some(3),
    excluded: &["node_modules", ".git"],
    scope: ExcludeScope::Directories,
    skip_workflow_data: true,
    matches: is_doc_file,
    none_found: "No documentation files found",
};

pub const SPECIAL_DIRS: Finder = Finder {
    max_depth: None,
    excluded: &["node_modules", ".git"],
    scope: ExcludeScope::AllEntries,
    skip_workflow_data: false,
    matches: is_special_dir,
    none_found: "No specialized directories found",
};

pub const CONFIG_PATTERNS: Finder = Finder {
    max_depth: None,
    excluded: &["node_modules"],
    scope: ExcludeScope::AllEntries,
    skip_workflow_data: false,
    matches: is_config_pattern,
    none_found: "No config files found",
};

impl Finder {
    /// Matching paths in traversal order
    pub fn find(&self, ws: &Workspace) -> Vec<String> {
        let mut walk = Walk::new(&ws.root).exclude(self.excluded, self.scope);
        if self.skip_workflow_data {
            walk = walk.exclude(&[ws.layout.data_dir], self.scope);
        }
        if let Some(levels) = self.max_depth {
            walk = walk.max_depth(levels);
        }

        walk.entries()
            .into_iter()
            .filter(|found| (self.matches)(found))
            .map(|found| found.path)
            .collect()
    }

    pub fn report(&self, ws: &Workspace, out: &mut dyn Write) -> Result<()> {
        let paths = self.find(ws);
        print_paths(out, &paths, Some(self.none_found))
    }
}

/// Print one path per line, or the sentinel when there are none
pub fn print_paths(out: &mut dyn Write, paths: &[String], none_found: Option<&str>) -> Result<()> {
    if paths.is_empty() {
        if let Some(sentinel) = none_found {
            writeln!(out, "{}", sentinel)?;
        }
        return Ok(());
    }
    for path in paths {
        writeln!(out, "{}", path)?;
    }
    Ok(())
}

fn is_source_file(found: &Found) -> bool {
    found.is_file && SOURCE_EXTENSIONS.iter().any(|ext| found.name.ends_with(ext))
}

fn is_manifest_file(found: &Found) -> bool {
    found.is_file && MANIFEST_FILES.contains(&found.name.as_str())
}

fn is_doc_file(found: &Found) -> bool {
    found.is_file
        && (found.name.ends_with(".md") || DOC_PREFIXES.iter().any(|p| found.name.starts_with(p)))
}

fn is_special_dir(found: &Found) -> bool {
    let name = found.name.to_lowercase();
    found.is_dir && SPECIAL_DIR_MARKERS.iter().any(|m| name.contains(m))
}

fn is_config_pattern(found: &Found) -> bool {
    let name = &found.name;
    found.is_file
        && (name.contains(".config.")
            || name.contains("rc.")
            || (name.starts_with('.') && name.ends_with("rc")))
}

pub fn find_project_files(ws: &Workspace, out: &mut dyn Write) -> Result<()> {
    PROJECT_FILES.report(ws, out)
}

pub fn find_config_files(ws: &Workspace, out: &mut dyn Write) -> Result<()> {
    CONFIG_FILES.report(ws, out)
}

pub fn find_docs(ws: &Workspace, out: &mut dyn Write) -> Result<()> {
    DOCS.report(ws, out)
}

pub fn find_special_dirs(ws: &Workspace, out: &mut dyn Write) -> Result<()> {
    SPECIAL_DIRS.report(ws, out)
}

pub fn find_config_patterns(ws: &Workspace, out: &mut dyn Write) -> Result<()> {
    CONFIG_PATTERNS.report(ws, out)
}
