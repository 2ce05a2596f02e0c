//! Fixed locations of the spec-driven workflow

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Workflow conventions consumed by the helper
#[derive(Debug, Clone)]
pub struct Layout {
    /// Workflow data directory (.kiro)
    pub data_dir: &'static str,
    /// Steering documents (.kiro/steering)
    pub steering_dir: &'static str,
    /// One subdirectory per spec (.kiro/specs)
    pub specs_dir: &'static str,
    /// Steering documents every project starts with
    pub default_steering: &'static [&'static str],
    /// Extension of steering documents
    pub doc_extension: &'static str,
    /// Per-spec manifest file name
    pub manifest: &'static str,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            data_dir: ".kiro",
            steering_dir: ".kiro/steering",
            specs_dir: ".kiro/specs",
            default_steering: &["product.md", "tech.md", "structure.md"],
            doc_extension: ".md",
            manifest: "spec.json",
        }
    }
}

impl Layout {
    /// Whether a steering entry is one of the workflow defaults
    pub fn is_default_steering(&self, name: &str) -> bool {
        self.default_steering.contains(&name)
    }

    pub fn is_document(&self, name: &str) -> bool {
        name.ends_with(self.doc_extension)
    }
}

/// A project root paired with its layout
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub layout: Layout,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            layout: Layout::default(),
        }
    }

    /// Workspace rooted at the process working directory
    pub fn current() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::new(cwd))
    }

    /// Resolve a path given relative to the workspace root
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    pub fn steering_dir(&self) -> PathBuf {
        self.resolve(self.layout.steering_dir)
    }

    pub fn specs_dir(&self) -> PathBuf {
        self.resolve(self.layout.specs_dir)
    }
}

/// Render a path with `/` separators regardless of the host convention.
///
/// `.` components are dropped and `..` cancels the preceding normal
/// component, without touching the filesystem.
pub fn slash_path(path: &Path) -> String {
    let mut kept: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match kept.last() {
                Some(Component::Normal(_)) => {
                    kept.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => kept.push(component),
            },
            other => kept.push(other),
        }
    }

    kept.iter()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
