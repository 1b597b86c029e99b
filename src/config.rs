//! Extension-to-folder mapping configuration.
//!
//! This module resolves the mapping used to decide which subfolder a file is
//! sorted into. The mapping is either loaded from a JSON document or taken
//! from the built-in default, and is validated once before any file is touched.
//!
//! # Configuration File Format
//!
//! ```json
//! {
//!     "EXT_MAP": {
//!         ".jpg": "Images",
//!         ".pdf": "Documents",
//!         "": "NoExtension"
//!     },
//!     "OTHER_FOLDER": "Misc"
//! }
//! ```
//!
//! Keys are case-insensitive and may omit the leading dot. The empty key is
//! reserved for files that have no extension at all.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Name of the catch-all folder when the configuration does not set one.
pub const DEFAULT_OTHER_FOLDER: &str = "Misc";

/// Reserved mapping key for files without an extension.
pub const NO_EXTENSION_KEY: &str = "";

const DEFAULT_EXT_MAP: &[(&str, &str)] = &[
    // images
    (".jpg", "Images"),
    (".jpeg", "Images"),
    (".png", "Images"),
    (".gif", "Images"),
    (".bmp", "Images"),
    // documents
    (".pdf", "Documents"),
    (".docx", "Documents"),
    (".doc", "Documents"),
    (".txt", "Documents"),
    (".pptx", "Documents"),
    (".ppt", "Documents"),
    (".xlsx", "Documents"),
    (".xls", "Documents"),
    // archives
    (".zip", "Archives"),
    (".rar", "Archives"),
    (".tar", "Archives"),
    (".gz", "Archives"),
    // video / audio
    (".mp4", "Videos"),
    (".mkv", "Videos"),
    (".mov", "Videos"),
    (".mp3", "Audio"),
    (".wav", "Audio"),
    // code
    (".py", "Code"),
    (".cpp", "Code"),
    (".c", "Code"),
    (".h", "Code"),
    (".java", "Code"),
    (".js", "Code"),
    // installers
    (".exe", "Installers"),
    (".msi", "Installers"),
];

/// Errors that can occur while loading or validating the mapping.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or lacks the `EXT_MAP` object.
    #[error("malformed configuration {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A mapping key cannot name an extension.
    #[error("invalid extension key '{key}': {reason}")]
    InvalidExtension { key: String, reason: &'static str },

    /// A destination folder name is not safe to create under the root.
    #[error("invalid folder name '{folder}' for '{key}': {reason}")]
    InvalidFolderName {
        key: String,
        folder: String,
        reason: &'static str,
    },

    /// Two keys normalise to the same extension but disagree on the folder.
    #[error("extension '{extension}' is mapped to both '{first}' and '{second}'")]
    ConflictingExtension {
        extension: String,
        first: String,
        second: String,
    },
}

/// Shape of the JSON document on disk.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(rename = "EXT_MAP")]
    ext_map: BTreeMap<String, String>,
    #[serde(rename = "OTHER_FOLDER", default)]
    other_folder: Option<String>,
}

/// Where the active mapping came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// The built-in default table.
    BuiltIn,
    /// A JSON file on disk.
    File(PathBuf),
}

/// Validated, immutable extension-to-folder mapping.
///
/// Keys are lower-cased extensions including the leading dot (or
/// [`NO_EXTENSION_KEY`]). Values are folder names that are guaranteed to be a
/// single path component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    extensions: BTreeMap<String, String>,
    other_folder: String,
}

impl Mapping {
    /// Builds a mapping from raw `(extension, folder)` pairs and a catch-all
    /// folder, normalising keys and validating every folder name.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a key or folder name is invalid or two keys
    /// collide after normalisation.
    pub fn new<I, K, V>(pairs: I, other_folder: &str) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let other_folder = validate_folder_name("OTHER_FOLDER", other_folder)?;

        let mut extensions: BTreeMap<String, String> = BTreeMap::new();
        for (key, folder) in pairs {
            let key = key.as_ref();
            let extension = normalize_extension(key)?;
            let folder = validate_folder_name(key, folder.as_ref())?;

            match extensions.get(&extension) {
                Some(existing) if *existing != folder => {
                    return Err(ConfigError::ConflictingExtension {
                        extension,
                        first: existing.clone(),
                        second: folder,
                    });
                }
                Some(_) => {}
                None => {
                    extensions.insert(extension, folder);
                }
            }
        }

        Ok(Self {
            extensions,
            other_folder,
        })
    }

    /// Loads the mapping for a run.
    ///
    /// Without a `config_path` the built-in default is used. A path that does
    /// not exist also falls back to the default, with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read,
    /// parsed or validated. No file has been moved at that point.
    pub fn load(config_path: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        let Some(path) = config_path else {
            debug!("no configuration file given, using built-in mapping");
            return Ok((Self::default(), ConfigSource::BuiltIn));
        };

        if !path.exists() {
            warn!(
                path = %path.display(),
                "configuration file not found, using built-in mapping"
            );
            return Ok((Self::default(), ConfigSource::BuiltIn));
        }
        Self::load_from_file(path)
    }

    /// Loads and validates a mapping from a specific JSON file.
    fn load_from_file(path: &Path) -> Result<(Self, ConfigSource), ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mapping = Self::from_json(&content).map_err(|err| match err {
            ConfigError::Malformed { source, .. } => ConfigError::Malformed {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        info!(
            path = %path.display(),
            extensions = mapping.len(),
            "loaded mapping"
        );
        Ok((mapping, ConfigSource::File(path.to_path_buf())))
    }

    /// Parses a mapping from a JSON string.
    ///
    /// # Examples
    ///
    /// ```
    /// use extsort::config::Mapping;
    ///
    /// let mapping = Mapping::from_json(r#"{"EXT_MAP": {"RS": "Rust"}}"#).unwrap();
    /// assert_eq!(mapping.folder_for(".rs"), "Rust");
    /// assert_eq!(mapping.folder_for(".xyz"), "Misc");
    /// ```
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            serde_json::from_str(content).map_err(|source| ConfigError::Malformed {
                path: PathBuf::new(),
                source,
            })?;
        let other_folder = raw.other_folder.as_deref().unwrap_or(DEFAULT_OTHER_FOLDER);
        Self::new(raw.ext_map, other_folder)
    }

    /// Returns the folder for a normalised extension key, falling back to the
    /// catch-all folder.
    pub fn folder_for(&self, extension: &str) -> &str {
        self.extensions
            .get(extension)
            .map(String::as_str)
            .unwrap_or(&self.other_folder)
    }

    /// The catch-all folder for unmapped extensions.
    pub fn other_folder(&self) -> &str {
        &self.other_folder
    }

    /// Every folder a file may be moved into, including the catch-all.
    pub fn folder_names(&self) -> BTreeSet<String> {
        self.extensions
            .values()
            .cloned()
            .chain(std::iter::once(self.other_folder.clone()))
            .collect()
    }

    /// Number of mapped extensions.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Iterates over `(extension, folder)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extensions
            .iter()
            .map(|(ext, folder)| (ext.as_str(), folder.as_str()))
    }
}

impl Default for Mapping {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXT_MAP
                .iter()
                .map(|(ext, folder)| (ext.to_string(), folder.to_string()))
                .collect(),
            other_folder: DEFAULT_OTHER_FOLDER.to_string(),
        }
    }
}

/// Lower-cases a key and adds the leading dot if it is missing.
fn normalize_extension(key: &str) -> Result<String, ConfigError> {
    let trimmed = key.trim().to_lowercase();
    if trimmed.is_empty() {
        return Ok(NO_EXTENSION_KEY.to_string());
    }
    if trimmed.contains(['/', '\\']) {
        return Err(ConfigError::InvalidExtension {
            key: key.to_string(),
            reason: "contains a path separator",
        });
    }
    if trimmed == "." {
        return Err(ConfigError::InvalidExtension {
            key: key.to_string(),
            reason: "is a bare dot",
        });
    }
    let normalized = if trimmed.starts_with('.') {
        trimmed
    } else {
        format!(".{trimmed}")
    };
    if normalized[1..].contains('.') {
        return Err(ConfigError::InvalidExtension {
            key: key.to_string(),
            reason: "only the part after the last dot is an extension",
        });
    }
    Ok(normalized)
}

/// Checks that a folder name is a single, creatable path component.
fn validate_folder_name(key: &str, folder: &str) -> Result<String, ConfigError> {
    let invalid = |reason| ConfigError::InvalidFolderName {
        key: key.to_string(),
        folder: folder.to_string(),
        reason,
    };

    let trimmed = folder.trim();
    if trimmed.is_empty() {
        return Err(invalid("folder name is empty"));
    }
    if trimmed.contains(['/', '\\']) {
        return Err(invalid("folder name contains a path separator"));
    }
    if trimmed.contains('\0') {
        return Err(invalid("folder name contains a NUL byte"));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(invalid("folder name refers to a relative directory"));
    }
    Ok(trimmed.to_string())
}
