//! Directory scanning.
//!
//! Enumerates the candidate files below a root in lexicographic order. The
//! scan never descends into a directory named like a destination folder, so a
//! second run over an already sorted tree finds nothing new to move.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Errors raised while scanning the root.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The root path does not exist.
    #[error("directory does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    /// The root path exists but is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// An entry below the root could not be read.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl ScanError {
    /// Path the error refers to, if known.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::RootNotFound(path) | Self::NotADirectory(path) => Some(path),
            Self::Walk(err) => err.path(),
        }
    }
}

/// Enumerates the files to organise below a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    root: PathBuf,
    recursive: bool,
    skip_dirs: BTreeSet<String>,
    skip_files: BTreeSet<PathBuf>,
}

impl DirectoryScanner {
    /// Creates a scanner for `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::RootNotFound`] or [`ScanError::NotADirectory`] if
    /// `root` cannot be scanned.
    pub fn new(root: &Path, recursive: bool) -> Result<Self, ScanError> {
        if !root.exists() {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        Ok(Self {
            root: root.to_path_buf(),
            recursive,
            skip_dirs: BTreeSet::new(),
            skip_files: BTreeSet::new(),
        })
    }

    /// Directory names that are never descended into.
    pub fn skip_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_dirs.extend(names.into_iter().map(Into::into));
        self
    }

    /// A file that must never be reported, such as the tool's own config.
    pub fn skip_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.skip_files.insert(path.into());
        self
    }

    /// Lazily yields candidate files in sorted order.
    ///
    /// Each call starts a fresh walk. Only regular files are yielded; symbolic
    /// links are left where they are. Entries that cannot be read are yielded
    /// as errors so the caller can report them without stopping the scan.
    pub fn files(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !self.is_skipped_dir(entry))
            .filter_map(move |entry| match entry {
                Ok(entry) => self.candidate(entry).map(Ok),
                Err(err) => Some(Err(ScanError::Walk(err))),
            })
    }

    fn is_skipped_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let skipped = entry
            .file_name()
            .to_str()
            .is_some_and(|name| self.skip_dirs.contains(name));
        if skipped {
            debug!(path = %entry.path().display(), "skipping destination folder");
        }
        skipped
    }

    fn candidate(&self, entry: DirEntry) -> Option<PathBuf> {
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            debug!(path = %entry.path().display(), "skipping symbolic link");
            return None;
        }
        if !file_type.is_file() {
            return None;
        }
        if self.skip_files.contains(entry.path()) {
            debug!(path = %entry.path().display(), "skipping configuration file");
            return None;
        }
        Some(entry.into_path())
    }
}
