use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::CoreError;

/// File extensions (lower case, without the dot) that are listed for viewing.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Where browsing starts, derived from the optional command-line path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartLocation {
    /// Directory whose images are listed.
    pub directory: PathBuf,
    /// File to show first, when the argument named one.
    pub target: Option<PathBuf>,
}

impl StartLocation {
    /// Resolve the start path.
    ///
    /// An existing file selects its directory and itself, an existing
    /// directory is browsed as-is, and anything else (including no argument)
    /// falls back to the current working directory.
    pub fn resolve(argument: Option<&Path>) -> crate::Result<Self> {
        if let Some(path) = argument {
            if path.is_file() {
                let directory = match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => PathBuf::from("."),
                };
                return Ok(Self {
                    directory,
                    target: Some(path.to_path_buf()),
                });
            }
            if path.is_dir() {
                return Ok(Self {
                    directory: path.to_path_buf(),
                    target: None,
                });
            }
            debug!(
                "Start path {} does not exist, using working directory",
                path.display()
            );
        }
        Ok(Self {
            directory: std::env::current_dir()?,
            target: None,
        })
    }
}

/// Whether `path` has one of the [`SUPPORTED_EXTENSIONS`], ignoring case.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// List the supported image files directly inside `directory`.
///
/// Entries come back in whatever order the filesystem yields them.
pub fn enumerate(directory: &Path) -> crate::Result<Vec<PathBuf>> {
    let dir_err = |source| CoreError::Directory {
        path: directory.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(directory).map_err(dir_err)? {
        let path = entry.map_err(dir_err)?.path();
        if is_supported(&path) && path.is_file() {
            files.push(path);
        }
    }
    info!("Found {} images in {}", files.len(), directory.display());
    Ok(files)
}

/// Position of `target` in `files`, comparing file names without regard to case.
///
/// All entries live in the same directory, so the file name alone identifies
/// an entry regardless of how the directory part was spelled.
pub fn position_of(files: &[PathBuf], target: &Path) -> Option<usize> {
    let wanted = target.file_name()?.to_string_lossy().to_lowercase();
    files.iter().position(|file| {
        file.file_name()
            .is_some_and(|name| name.to_string_lossy().to_lowercase() == wanted)
    })
}

/// One listed image file and, once visited, its decoded contents.
#[derive(Debug)]
pub struct ImageEntry<I> {
    path: PathBuf,
    cached: Option<I>,
}

impl<I> ImageEntry<I> {
    pub fn new(path: PathBuf) -> Self {
        Self { path, cached: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn image(&self) -> Option<&I> {
        self.cached.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.is_some()
    }

    /// File name without extension, as shown to the user.
    pub fn display_name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub(crate) fn store(&mut self, image: I) {
        self.cached = Some(image);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn extension_match_ignores_case() {
        assert!(is_supported(Path::new("a.jpg")));
        assert!(is_supported(Path::new("B.JPG")));
        assert!(is_supported(Path::new("c.JpEg")));
        assert!(!is_supported(Path::new("d.png")));
        assert!(!is_supported(Path::new("jpg")));
        assert!(!is_supported(Path::new("e.jpg.txt")));
    }

    #[test]
    fn enumerate_lists_only_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.jpg");
        let b = touch(dir.path(), "B.JPG");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "shot.png");
        fs::create_dir(dir.path().join("folder.jpg")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        touch(&dir.path().join("sub"), "nested.jpg");

        let found: HashSet<PathBuf> = enumerate(dir.path()).unwrap().into_iter().collect();
        assert_eq!(found, HashSet::from([a, b]));
    }

    #[test]
    fn enumerate_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = enumerate(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, CoreError::Directory { .. }));
    }

    #[test]
    fn resolve_file_selects_parent_and_target() {
        let dir = tempfile::tempdir().unwrap();
        let file = touch(dir.path(), "pic.jpg");
        let start = StartLocation::resolve(Some(&file)).unwrap();
        assert_eq!(start.directory, dir.path());
        assert_eq!(start.target, Some(file));
    }

    #[test]
    fn resolve_directory_has_no_target() {
        let dir = tempfile::tempdir().unwrap();
        let start = StartLocation::resolve(Some(dir.path())).unwrap();
        assert_eq!(start.directory, dir.path());
        assert_eq!(start.target, None);
    }

    #[test]
    fn resolve_missing_path_uses_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let start = StartLocation::resolve(Some(&dir.path().join("nope"))).unwrap();
        assert_eq!(start.directory, std::env::current_dir().unwrap());
        assert_eq!(start.target, None);

        let start = StartLocation::resolve(None).unwrap();
        assert_eq!(start.directory, std::env::current_dir().unwrap());
    }

    #[test]
    fn position_ignores_case_and_directory_spelling() {
        let files = vec![
            PathBuf::from("/photos/one.jpg"),
            PathBuf::from("/photos/Two.JPG"),
        ];
        assert_eq!(position_of(&files, Path::new("/photos/two.jpg")), Some(1));
        assert_eq!(position_of(&files, Path::new("ONE.jpg")), Some(0));
        assert_eq!(position_of(&files, Path::new("three.jpg")), None);
    }

    #[test]
    fn entry_display_name_drops_extension() {
        let entry: ImageEntry<()> = ImageEntry::new(PathBuf::from("/p/holiday.2024.jpg"));
        assert_eq!(entry.display_name(), "holiday.2024");
        assert!(!entry.is_loaded());
    }
}
