use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::codec;
use crate::error::SettingsError;

// ---------------------------------------------------------------------------
// Settings interface
// ---------------------------------------------------------------------------

/// Named string settings.
///
/// This is the only surface consumers depend on; they receive an
/// implementation from whoever owns the application lifecycle.
pub trait Settings {
    /// Current value of `name`, if set.
    fn get(&self, name: &str) -> Option<&str>;

    /// Store `value` under `name`, or remove the setting when `value` is `None`.
    ///
    /// Keys and values are validated against the file format before anything
    /// is stored.
    fn set(&mut self, name: &str, value: Option<&str>) -> crate::Result<()>;
}

// ---------------------------------------------------------------------------
// Typed accessors
// ---------------------------------------------------------------------------

/// Typed views over string settings.
///
/// Every getter takes a default. When `propagate` is set and the setting is
/// absent, the default is written back so it shows up in the settings file.
pub trait SettingsExt: Settings {
    /// Read a string setting. Fails with [`SettingsError::NotFound`] when the
    /// setting is absent and no default is given.
    fn get_string(
        &mut self,
        name: &str,
        default: Option<&str>,
        propagate: bool,
    ) -> crate::Result<String> {
        if let Some(value) = self.get(name) {
            return Ok(value.to_string());
        }
        let Some(default) = default else {
            return Err(SettingsError::NotFound(name.to_string()));
        };
        if propagate {
            self.set(name, Some(default))?;
        }
        Ok(default.to_string())
    }

    fn get_bool(&mut self, name: &str, default: bool, propagate: bool) -> crate::Result<bool> {
        get_typed(self, name, default, propagate, "a boolean", parse_bool)
    }

    fn get_int(&mut self, name: &str, default: i32, propagate: bool) -> crate::Result<i32> {
        get_typed(self, name, default, propagate, "an integer", |s| s.parse().ok())
    }

    fn get_double(&mut self, name: &str, default: f64, propagate: bool) -> crate::Result<f64> {
        get_typed(self, name, default, propagate, "a number", |s| s.parse().ok())
    }

    /// Read a list stored as `separator`-joined text.
    fn get_strings(
        &mut self,
        name: &str,
        separator: &str,
        default: &[&str],
        propagate: bool,
    ) -> crate::Result<Vec<String>> {
        if let Some(value) = self.get(name) {
            return Ok(value.split(separator).map(str::to_string).collect());
        }
        if propagate {
            self.set_strings(name, separator, default.iter().copied())?;
        }
        Ok(default.iter().map(|s| s.to_string()).collect())
    }

    fn set_bool(&mut self, name: &str, value: bool) -> crate::Result<()> {
        self.set(name, Some(&value.to_string()))
    }

    fn set_int(&mut self, name: &str, value: i32) -> crate::Result<()> {
        self.set(name, Some(&value.to_string()))
    }

    fn set_double(&mut self, name: &str, value: f64) -> crate::Result<()> {
        self.set(name, Some(&value.to_string()))
    }

    fn set_strings<'a, I>(&mut self, name: &str, separator: &str, values: I) -> crate::Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let joined = values.into_iter().collect::<Vec<_>>().join(separator);
        self.set(name, Some(&joined))
    }
}

impl<T: Settings + ?Sized> SettingsExt for T {}

fn get_typed<S, T>(
    settings: &mut S,
    name: &str,
    default: T,
    propagate: bool,
    expected: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> crate::Result<T>
where
    S: Settings + ?Sized,
    T: ToString,
{
    if let Some(text) = settings.get(name) {
        return parse(text.trim()).ok_or_else(|| SettingsError::Parse {
            key: name.to_string(),
            value: text.to_string(),
            expected,
        });
    }
    if propagate {
        settings.set(name, Some(&default.to_string()))?;
    }
    Ok(default)
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Settings persisted to a flat `key=value` file.
///
/// Changes stay in memory until [`save`](Self::save) or
/// [`flush`](Self::flush) is called; nothing is written on drop.
#[derive(Debug)]
pub struct SettingsFile {
    path: PathBuf,
    values: BTreeMap<String, String>,
    modified: bool,
}

impl SettingsFile {
    /// Open the settings file at `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> crate::Result<Self> {
        let mut settings = Self {
            path: path.into(),
            values: BTreeMap::new(),
            modified: false,
        };
        settings.load()?;
        Ok(settings)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether there are changes not yet written to disk.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace the in-memory values with the file contents.
    ///
    /// On a format error the current values are kept untouched.
    pub fn load(&mut self) -> crate::Result<()> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {}", self.path.display());
                String::new()
            }
            Err(source) => {
                return Err(SettingsError::File {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut values = BTreeMap::new();
        for record in codec::parse(&text) {
            let (key, value) = record?;
            values.insert(key.to_string(), value.to_string());
        }

        info!(
            count = values.len(),
            "Loaded settings from {}",
            self.path.display()
        );
        self.values = values;
        self.modified = false;
        Ok(())
    }

    /// Write all values to disk, creating the parent directory if needed.
    pub fn save(&mut self) -> crate::Result<()> {
        let text = codec::write(self.values.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
        let file_err = |source| SettingsError::File {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(file_err)?;
        }
        fs::write(&self.path, text).map_err(file_err)?;
        debug!(count = self.values.len(), "Saved settings");
        self.modified = false;
        Ok(())
    }

    /// Save only if something changed since the last load or save.
    ///
    /// Returns whether the file was written.
    pub fn flush(&mut self) -> crate::Result<bool> {
        if !self.modified {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }
}

impl Settings for SettingsFile {
    fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    fn set(&mut self, name: &str, value: Option<&str>) -> crate::Result<()> {
        codec::validate_key(name)?;
        let Some(value) = value else {
            if self.values.remove(name).is_some() {
                self.modified = true;
            }
            return Ok(());
        };
        codec::validate_value(name, value)?;
        if self.values.get(name).map(String::as_str) == Some(value) {
            return Ok(());
        }
        self.values.insert(name.to_string(), value.to_string());
        self.modified = true;
        Ok(())
    }
}
