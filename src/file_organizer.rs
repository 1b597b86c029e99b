/// Collision-safe file moves.
///
/// This module computes where each file ends up inside its destination folder
/// and, when applying, creates that folder and moves the file. A name that is
/// already taken, either on disk or by an earlier file in the same run, gets a
/// numeric disambiguator before its extension: `report.pdf` becomes
/// `report (1).pdf`, then `report (2).pdf`.
use crate::file_category::FileEntry;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

/// Highest disambiguator tried before giving up on a file.
pub const MAX_COLLISION_SUFFIX: u32 = 9999;

/// Whether moves are simulated or executed. Fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Compute and report moves without touching the filesystem.
    DryRun,
    /// Create destination folders and move files.
    Apply,
}

impl RunMode {
    pub fn is_dry_run(self) -> bool {
        matches!(self, Self::DryRun)
    }
}

/// A single planned or executed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Where the file was found.
    pub original_path: PathBuf,
    /// Where the file was (or would be) moved.
    pub new_path: PathBuf,
    /// The destination folder the file belongs to.
    pub folder: String,
}

/// Failures that affect a single file. None of them stop the run.
#[derive(Debug, Error)]
pub enum MoveError {
    /// Every disambiguated name up to [`MAX_COLLISION_SUFFIX`] is taken.
    #[error(
        "no free name for {} in {} after {attempts} attempts",
        .name.to_string_lossy(),
        .dir.display()
    )]
    CollisionExhausted {
        dir: PathBuf,
        name: OsString,
        attempts: u32,
    },

    /// The path has no file name component.
    #[error("{} has no file name", .0.display())]
    NoFileName(PathBuf),

    /// The destination folder could not be created.
    #[error("failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The move itself failed.
    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, MoveError>;

/// Moves files into their destination folders below a root.
///
/// The organizer remembers every destination it hands out during a run, so
/// two files with the same name receive increasing suffixes in the order they
/// are processed, whether or not the first one was actually moved.
#[derive(Debug)]
pub struct FileOrganizer {
    root: PathBuf,
    mode: RunMode,
    claimed: HashSet<PathBuf>,
}

impl FileOrganizer {
    pub fn new(root: &Path, mode: RunMode) -> Self {
        Self {
            root: root.to_path_buf(),
            mode,
            claimed: HashSet::new(),
        }
    }

    /// Computes a free destination for `entry` and records it as claimed.
    ///
    /// Never touches the filesystem beyond existence checks. Any entry at a
    /// candidate path counts as taken, including a dangling symlink.
    pub fn plan(&mut self, entry: &FileEntry) -> OrganizeResult<PathBuf> {
        let name = entry
            .path
            .file_name()
            .ok_or_else(|| MoveError::NoFileName(entry.path.clone()))?;
        let dir = entry.destination_dir(&self.root);

        let claimed = &self.claimed;
        let destination = unique_destination(&dir, name, |candidate| {
            claimed.contains(candidate) || fs::symlink_metadata(candidate).is_ok()
        })?;

        self.claimed.insert(destination.clone());
        Ok(destination)
    }

    /// Plans the move of `entry` and, in [`RunMode::Apply`], performs it.
    ///
    /// The destination folder is created if needed. In dry-run mode the
    /// returned [`Operation`] only describes the intended move.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use extsort::config::Mapping;
    /// use extsort::file_category::FileEntry;
    /// use extsort::file_organizer::{FileOrganizer, RunMode};
    /// use std::path::{Path, PathBuf};
    ///
    /// let root = Path::new("/path/to/base");
    /// let path = PathBuf::from("/path/to/base/x.pdf");
    /// let entry = FileEntry::resolve(root, path, &Mapping::default(), false);
    /// let mut organizer = FileOrganizer::new(root, RunMode::Apply);
    ///
    /// match organizer.organize(&entry) {
    ///     Ok(op) => println!("Moved {} to {}", op.original_path.display(), op.new_path.display()),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn organize(&mut self, entry: &FileEntry) -> OrganizeResult<Operation> {
        let destination = self.plan(entry)?;

        if self.mode == RunMode::Apply {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent).map_err(|source| {
                    MoveError::DirectoryCreationFailed {
                        path: parent.to_path_buf(),
                        source,
                    }
                })?;
            }
            move_file(&entry.path, &destination)?;
            debug!(
                from = %entry.path.display(),
                to = %destination.display(),
                "moved file"
            );
        }

        Ok(Operation {
            original_path: entry.path.clone(),
            new_path: destination,
            folder: entry.folder.clone(),
        })
    }
}

/// Returns `dir/name`, or the first `dir/stem (n).ext` for which `is_taken`
/// is false.
///
/// Examples:
/// - "report.pdf" -> "report (1).pdf", "report (2).pdf", ...
/// - "archive.tar.gz" -> "archive.tar (1).gz"
/// - "LICENSE" -> "LICENSE (1)"
pub fn unique_destination<F>(
    dir: &Path,
    name: &OsStr,
    mut is_taken: F,
) -> OrganizeResult<PathBuf>
where
    F: FnMut(&Path) -> bool,
{
    let candidate = dir.join(name);
    if !is_taken(&candidate) {
        return Ok(candidate);
    }

    let base = Path::new(name);
    let stem: OsString = base
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| name.to_os_string());
    let ext: Option<&OsStr> = base.extension();

    for n in 1..=MAX_COLLISION_SUFFIX {
        let candidate = dir.join(with_suffix(&stem, ext, n));
        trace!(candidate = %candidate.display(), "trying disambiguated name");
        if !is_taken(&candidate) {
            return Ok(candidate);
        }
    }

    Err(MoveError::CollisionExhausted {
        dir: dir.to_path_buf(),
        name: name.to_os_string(),
        attempts: MAX_COLLISION_SUFFIX,
    })
}

fn with_suffix(stem: &OsStr, ext: Option<&OsStr>, n: u32) -> OsString {
    let mut name = OsString::with_capacity(stem.len() + 16);
    name.push(stem);
    name.push(format!(" ({n})"));
    if let Some(ext) = ext {
        name.push(".");
        name.push(ext);
    }
    name
}

/// Renames `from` to `to`, falling back to copy and remove across devices.
fn move_file(from: &Path, to: &Path) -> OrganizeResult<()> {
    let failure = |source| MoveError::FileMoveFailure {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            debug!(from = %from.display(), "rename crosses devices, copying instead");
            fs::copy(from, to).map_err(failure)?;
            fs::remove_file(from).map_err(failure)
        }
        Err(err) => Err(failure(err)),
    }
}
