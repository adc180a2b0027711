//! Content source registry - the named directories content is read from

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::{ConfigError, PluginRegistry};

/// A named filesystem directory contributing content
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRoot {
    pub name: String,
    pub path: PathBuf,
    ignore: Vec<glob::Pattern>,
}

/// A file found under a content root
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the root, `/`-separated
    pub relative: String,
}

impl ContentRoot {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ignore: Vec::new(),
        }
    }

    pub fn with_ignore(mut self, ignore: Vec<glob::Pattern>) -> Self {
        self.ignore = ignore;
        self
    }

    /// All files under the root in file-name order, minus ignored ones
    pub fn files(&self) -> impl Iterator<Item = SourceFile> + '_ {
        WalkDir::new(&self.path)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(move |entry| {
                let relative = entry
                    .path()
                    .strip_prefix(&self.path)
                    .ok()?
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");

                if self.is_ignored(&relative) {
                    tracing::debug!("Ignoring {}:{}", self.name, relative);
                    return None;
                }

                Some(SourceFile {
                    path: entry.into_path(),
                    relative,
                })
            })
    }

    fn is_ignored(&self, relative: &str) -> bool {
        self.ignore.iter().any(|pattern| pattern.matches(relative))
    }
}

/// Ordered set of content roots for one build
#[derive(Debug, Clone, Default)]
pub struct ContentSources {
    roots: Vec<ContentRoot>,
}

impl ContentSources {
    pub fn new(roots: Vec<ContentRoot>) -> Self {
        Self { roots }
    }

    /// Resolve every filesystem source against the site directory
    pub fn resolve(registry: &PluginRegistry, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut roots = Vec::new();

        for source in registry.sources() {
            let path = base_dir.join(&source.path);
            if !path.is_dir() {
                return Err(ConfigError::MissingPath {
                    name: source.name.clone(),
                    path,
                });
            }

            tracing::debug!("Registered content root {} at {:?}", source.name, path);
            roots.push(ContentRoot::new(source.name.clone(), path).with_ignore(source.ignore.clone()));
        }

        Ok(Self { roots })
    }

    pub fn roots(&self) -> &[ContentRoot] {
        &self.roots
    }

    pub fn get(&self, name: &str) -> Option<&ContentRoot> {
        self.roots.iter().find(|r| r.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
