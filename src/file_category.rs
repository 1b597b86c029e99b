/// Destination resolution for discovered files.
///
/// A file's destination folder is decided purely by its extension: the final
/// segment after the last dot of the file name, lower-cased and including the
/// dot. Files without an extension (including dotfiles such as `.bashrc`) use
/// the reserved empty key.
///
/// # Examples
///
/// ```
/// use extsort::config::Mapping;
/// use extsort::file_category::resolve_folder;
/// use std::path::Path;
///
/// let mapping = Mapping::default();
/// assert_eq!(resolve_folder(Path::new("photo.PNG"), &mapping), "Images");
/// assert_eq!(resolve_folder(Path::new("backup.tar.gz"), &mapping), "Archives");
/// assert_eq!(resolve_folder(Path::new("README"), &mapping), "Misc");
/// ```
use crate::config::{Mapping, NO_EXTENSION_KEY};
use std::path::{Path, PathBuf};

/// A file discovered by the scanner together with where it should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path of the file as found under the root.
    pub path: PathBuf,
    /// Normalised extension key (`".pdf"`), empty when the file has none.
    pub extension: String,
    /// Destination folder name, a direct child of the root.
    pub folder: String,
    /// Directory below the destination folder that mirrors the file's
    /// location relative to the root. Empty for top-level files or flat runs.
    pub subdir: PathBuf,
}

impl FileEntry {
    /// Resolves the destination of `path` found under `root`.
    ///
    /// When `preserve_structure` is set, the parent directories of `path`
    /// relative to `root` are kept below the destination folder.
    pub fn resolve(
        root: &Path,
        path: PathBuf,
        mapping: &Mapping,
        preserve_structure: bool,
    ) -> Self {
        let extension = extension_key(&path);
        let folder = mapping.folder_for(&extension).to_string();

        let subdir = if preserve_structure {
            path.strip_prefix(root)
                .ok()
                .and_then(Path::parent)
                .map(Path::to_path_buf)
                .unwrap_or_default()
        } else {
            PathBuf::new()
        };

        Self {
            path,
            extension,
            folder,
            subdir,
        }
    }

    /// The directory the file should end up in.
    pub fn destination_dir(&self, root: &Path) -> PathBuf {
        let dir = root.join(&self.folder);
        if self.subdir.as_os_str().is_empty() {
            dir
        } else {
            dir.join(&self.subdir)
        }
    }
}

/// Returns the lookup key for a path's extension.
///
/// # Examples
///
/// ```
/// use extsort::file_category::extension_key;
/// use std::path::Path;
///
/// assert_eq!(extension_key(Path::new("Report.PDF")), ".pdf");
/// assert_eq!(extension_key(Path::new("archive.tar.gz")), ".gz");
/// assert_eq!(extension_key(Path::new(".bashrc")), "");
/// ```
pub fn extension_key(path: &Path) -> String {
    match path.extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy().to_lowercase()),
        _ => NO_EXTENSION_KEY.to_string(),
    }
}

/// Returns the destination folder name for `path`.
pub fn resolve_folder<'a>(path: &Path, mapping: &'a Mapping) -> &'a str {
    mapping.folder_for(&extension_key(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_key_is_case_insensitive() {
        assert_eq!(extension_key(Path::new("a.JPG")), ".jpg");
        assert_eq!(extension_key(Path::new("a.Jpg")), ".jpg");
    }

    #[test]
    fn test_extension_key_uses_last_segment() {
        assert_eq!(extension_key(Path::new("archive.tar.gz")), ".gz");
        assert_eq!(extension_key(Path::new("v1.2.3.txt")), ".txt");
    }

    #[test]
    fn test_extension_key_without_extension() {
        assert_eq!(extension_key(Path::new("Makefile")), "");
        assert_eq!(extension_key(Path::new(".gitignore")), "");
        assert_eq!(extension_key(Path::new("trailing.")), "");
    }

    #[test]
    fn test_resolve_every_default_extension() {
        let mapping = Mapping::default();
        for (ext, folder) in mapping.iter() {
            let name = format!("file{ext}");
            assert_eq!(resolve_folder(Path::new(&name), &mapping), folder);
        }
    }

    #[test]
    fn test_resolve_unmapped_uses_catch_all() {
        let mapping = Mapping::default();
        assert_eq!(resolve_folder(Path::new("z.unknown"), &mapping), "Misc");
        assert_eq!(resolve_folder(Path::new("LICENSE"), &mapping), "Misc");
    }

    #[test]
    fn test_resolve_no_extension_key() {
        let mapping = Mapping::new([("", "Plain"), (".txt", "Text")], "Misc").unwrap();
        assert_eq!(resolve_folder(Path::new("LICENSE"), &mapping), "Plain");
        assert_eq!(resolve_folder(Path::new("notes.txt"), &mapping), "Text");
    }

    #[test]
    fn test_entry_preserves_relative_structure() {
        let root = Path::new("/data");
        let mapping = Mapping::default();
        let entry = FileEntry::resolve(
            root,
            PathBuf::from("/data/projects/2024/plan.pdf"),
            &mapping,
            true,
        );

        assert_eq!(entry.folder, "Documents");
        assert_eq!(entry.extension, ".pdf");
        assert_eq!(entry.subdir, PathBuf::from("projects/2024"));
        assert_eq!(
            entry.destination_dir(root),
            PathBuf::from("/data/Documents/projects/2024")
        );
    }

    #[test]
    fn test_entry_flat_ignores_structure() {
        let root = Path::new("/data");
        let mapping = Mapping::default();
        let entry = FileEntry::resolve(
            root,
            PathBuf::from("/data/projects/main.py"),
            &mapping,
            false,
        );

        assert_eq!(entry.subdir, PathBuf::new());
        assert_eq!(entry.destination_dir(root), PathBuf::from("/data/Code"));
    }

    #[test]
    fn test_top_level_entry_has_no_subdir() {
        let root = Path::new("/data");
        let entry = FileEntry::resolve(
            root,
            PathBuf::from("/data/song.mp3"),
            &Mapping::default(),
            true,
        );
        assert_eq!(entry.destination_dir(root), PathBuf::from("/data/Audio"));
    }
}
