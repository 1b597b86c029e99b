//! extsort - sort the files of a directory into subfolders by extension
//!
//! This library resolves an extension-to-folder mapping, scans a directory
//! (optionally recursively), decides each file's destination folder, and moves
//! files with collision-safe renaming. Every run can be previewed as a dry run
//! that touches nothing.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod report;
pub mod scanner;

pub use config::{ConfigError, ConfigSource, Mapping};
pub use file_category::{FileEntry, extension_key, resolve_folder};
pub use file_organizer::{FileOrganizer, MoveError, Operation, RunMode};
pub use report::{FileOutcome, RunReport};
pub use scanner::{DirectoryScanner, ScanError};

pub use cli::{OrganizeOptions, RunError, run_cli, run_organize};
