//! Where Glance keeps its settings file.

use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// File name of the settings store inside the data directory.
pub const SETTINGS_FILE_NAME: &str = "Settings.ini";

/// Per-user data directory, falling back to the executable's directory when
/// the platform reports no home directory.
pub fn data_directory() -> PathBuf {
    ProjectDirs::from("", "", "Glance")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(exe_directory)
}

/// Default location of the settings file.
pub fn settings_path() -> PathBuf {
    data_directory().join(SETTINGS_FILE_NAME)
}

/// Create the directory that will hold `settings_path`, if it is missing.
pub fn create_settings_directory(settings_path: &Path) -> io::Result<()> {
    match settings_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

/// Directory containing the running executable. Falls back to current directory if unavailable.
fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_file_lives_in_data_directory() {
        let path = settings_path();
        assert_eq!(path.file_name().unwrap(), SETTINGS_FILE_NAME);
        assert_eq!(path.parent().unwrap(), data_directory());
    }

    #[test]
    fn settings_directory_is_created() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("nested").join("Glance").join(SETTINGS_FILE_NAME);
        create_settings_directory(&path).unwrap();
        assert!(path.parent().unwrap().is_dir());
        assert!(!path.exists());
        // Already present is fine too.
        create_settings_directory(&path).unwrap();
    }

    #[test]
    fn bare_file_name_needs_no_directory() {
        create_settings_directory(Path::new(SETTINGS_FILE_NAME)).unwrap();
    }
}
