//! Command-line interface module for extsort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Pre-flight checks of the root and the configuration
//! - Organization orchestration
//! - Mapping run results to an exit status

use crate::config::{ConfigError, ConfigSource, Mapping};
use crate::file_category::FileEntry;
use crate::file_organizer::{FileOrganizer, RunMode};
use crate::output::OutputFormatter;
use crate::report::{EXIT_PREFLIGHT_FAILURE, RunReport};
use crate::scanner::{DirectoryScanner, ScanError};
use clap::{ArgAction, ArgGroup, Parser, ValueHint};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Sort the files of a directory into subfolders by extension.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
#[command(group(ArgGroup::new("mode").required(true).args(["dry", "apply"])))]
pub struct Args {
    /// Directory to organize.
    #[arg(short = 'p', long, value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub path: PathBuf,

    /// Show the moves that would happen without touching any file.
    #[arg(long)]
    pub dry: bool,

    /// Move the files.
    #[arg(long)]
    pub apply: bool,

    /// Also organize files in subdirectories.
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// With --recursive, put every file directly into its folder instead of
    /// keeping its relative subdirectory.
    #[arg(long)]
    pub flatten: bool,

    /// JSON mapping: {"EXT_MAP": {".ext": "Folder"}, "OTHER_FOLDER": "Misc"}.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn run_mode(&self) -> RunMode {
        if self.apply {
            RunMode::Apply
        } else {
            RunMode::DryRun
        }
    }

    pub fn to_options(&self) -> OrganizeOptions {
        OrganizeOptions {
            root: self.path.clone(),
            mode: self.run_mode(),
            recursive: self.recursive,
            flatten: self.flatten,
            config_path: self.config.clone(),
            show_progress: true,
        }
    }
}

/// Everything a run needs, independent of how it was requested.
#[derive(Debug, Clone)]
pub struct OrganizeOptions {
    pub root: PathBuf,
    pub mode: RunMode,
    pub recursive: bool,
    pub flatten: bool,
    pub config_path: Option<PathBuf>,
    pub show_progress: bool,
}

impl OrganizeOptions {
    pub fn new(root: impl Into<PathBuf>, mode: RunMode) -> Self {
        Self {
            root: root.into(),
            mode,
            recursive: false,
            flatten: false,
            config_path: None,
            show_progress: false,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }
}

/// Errors that stop a run before any file is moved.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot scan: {0}")]
    Scan(#[from] ScanError),
}

/// Runs the CLI with parsed arguments and returns the process exit status.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use extsort::cli::{Args, run_cli};
///
/// let args = Args::parse_from(["extsort", "--path", "/tmp/downloads", "--dry"]);
/// std::process::exit(run_cli(&args).into());
/// ```
pub fn run_cli(args: &Args) -> u8 {
    match run_organize(&args.to_options()) {
        Ok(report) => {
            OutputFormatter::report(&report);
            report.exit_status()
        }
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            OutputFormatter::error("No files were moved.");
            EXIT_PREFLIGHT_FAILURE
        }
    }
}

/// Organizes the files below `options.root`.
///
/// This function:
/// 1. Validates the root directory
/// 2. Loads and validates the mapping
/// 3. Scans the candidate files in sorted order
/// 4. Resolves each file's destination folder
/// 5. Plans (dry run) or performs (apply) each move, collecting per-file
///    failures instead of stopping
///
/// # Errors
///
/// Returns a [`RunError`] if the root cannot be scanned or the configuration
/// is invalid. In both cases nothing has been moved.
pub fn run_organize(options: &OrganizeOptions) -> Result<RunReport, RunError> {
    let root = expand_home(&options.root);
    let root = dunce::canonicalize(&root).unwrap_or(root);
    let scanner = DirectoryScanner::new(&root, options.recursive)?;

    let config_path = options.config_path.as_deref().map(expand_home);
    let (mapping, source) = Mapping::load(config_path.as_deref())?;

    let mut scanner = scanner.skip_dirs(mapping.folder_names());
    if let ConfigSource::File(path) = &source {
        let config_file = dunce::canonicalize(path).unwrap_or_else(|_| path.clone());
        scanner = scanner.skip_file(config_file);
    }

    info!(
        root = %root.display(),
        mode = ?options.mode,
        recursive = options.recursive,
        "starting run"
    );

    let mut report = RunReport::new(options.mode, &root, options.recursive);
    let preserve_structure = options.recursive && !options.flatten;

    let entries: Vec<Result<FileEntry, ScanError>> = scanner
        .files()
        .map(|file| {
            file.map(|path| FileEntry::resolve(&root, path, &mapping, preserve_structure))
        })
        .collect();

    let progress = (options.show_progress && options.mode == RunMode::Apply)
        .then(|| OutputFormatter::create_progress_bar(entries.len() as u64));

    let mut organizer = FileOrganizer::new(&root, options.mode);
    for entry in &entries {
        match entry {
            Ok(entry) => {
                if let Some(pb) = &progress {
                    pb.set_message(entry.folder.clone());
                }
                match organizer.organize(entry) {
                    Ok(operation) => report.record_move(operation),
                    Err(e) => {
                        warn!(path = %entry.path.display(), error = %e, "could not organize file");
                        report.record_failure(entry.path.clone(), e.to_string());
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                let path = e.path().unwrap_or(root.as_path()).to_path_buf();
                report.record_failure(path, e.to_string());
            }
        }
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    info!(
        succeeded = report.success_count(),
        failed = report.failure_count(),
        "run complete"
    );
    Ok(report)
}

/// Replaces a leading `~` with the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
