//! Entity source providers.
//!
//! A provider hands the parser an ordered list of named text blocks, one per
//! entity. The name is a label used for error attribution only.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// File extensions picked up by [`DirectorySource`]
pub const SOURCE_EXTENSIONS: &[&str] = &["md", "txt"];

/// A named block of DSL text describing one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySource {
    pub name: String,
    pub text: String,
}

impl EntitySource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Error raised while enumerating entity sources
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Something that can enumerate entity sources (files in a directory,
/// embedded text, the output of a schema scan)
pub trait SourceProvider {
    /// Return every entity source of the batch, in a stable order
    fn entity_sources(&self) -> Result<Vec<EntitySource>, SourceError>;
}

/// Provider over sources already held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sources: Vec<EntitySource>,
}

impl MemorySource {
    pub fn new(sources: Vec<EntitySource>) -> Self {
        Self { sources }
    }

    /// Build from `(name, text)` pairs
    pub fn from_pairs<N, T>(pairs: impl IntoIterator<Item = (N, T)>) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        Self {
            sources: pairs
                .into_iter()
                .map(|(name, text)| EntitySource::new(name, text))
                .collect(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.sources.push(EntitySource::new(name, text));
    }
}

impl SourceProvider for MemorySource {
    fn entity_sources(&self) -> Result<Vec<EntitySource>, SourceError> {
        Ok(self.sources.clone())
    }
}

/// Provider reading one entity per `.md`/`.txt` file of a directory
///
/// Files are returned sorted by file name and labelled with their file stem.
/// A missing directory yields an empty batch; unreadable files are skipped.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn is_source_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                SOURCE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
            .unwrap_or(false)
}

impl SourceProvider for DirectorySource {
    fn entity_sources(&self) -> Result<Vec<EntitySource>, SourceError> {
        if !self.dir.exists() {
            tracing::warn!("Entity directory does not exist: {}", self.dir.display());
            return Ok(Vec::new());
        }

        if !self.dir.is_dir() {
            return Err(SourceError::NotADirectory(self.dir.clone()));
        }

        let read_dir = fs::read_dir(&self.dir).map_err(|e| SourceError::ReadDir {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut paths: Vec<PathBuf> = read_dir
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    tracing::warn!("Skipping unreadable directory entry: {}", e);
                    None
                }
            })
            .filter(|path| is_source_file(path))
            .collect();
        paths.sort();

        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();

            match fs::read_to_string(&path) {
                Ok(text) => sources.push(EntitySource::new(name, text)),
                Err(e) => {
                    tracing::warn!("Could not read file {}: {}", path.display(), e);
                }
            }
        }

        tracing::debug!(
            "Found {} entity sources in {}",
            sources.len(),
            self.dir.display()
        );

        Ok(sources)
    }
}
