use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::SettingsError;
use crate::store::{Settings, SettingsExt};

/// Stored value meaning "no saved bounds, let the platform place the window".
pub const DEFAULT_BOUNDS_VALUE: &str = "Default";

/// Outer window rectangle in logical pixels.
///
/// Serialised as `left,top,width,height` using Rust's locale-independent
/// float formatting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl WindowBounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

impl fmt::Display for WindowBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.left, self.top, self.width, self.height
        )
    }
}

impl FromStr for WindowBounds {
    type Err = SettingsError;

    /// Accepts comma and/or whitespace separated components.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SettingsError::InvalidBounds(s.to_string());
        let parts: Vec<f64> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<_, _>>()?;

        let [left, top, width, height] = parts[..] else {
            return Err(invalid());
        };
        if !parts.iter().all(|v| v.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(invalid());
        }
        Ok(Self::new(left, top, width, height))
    }
}

/// Restores and saves one window's rectangle under a named setting.
#[derive(Debug, Clone)]
pub struct WindowBoundsKeeper {
    key: String,
}

impl WindowBoundsKeeper {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Saved bounds, or `None` when nothing was saved or the value is the
    /// `Default` sentinel.
    pub fn restore(&self, settings: &mut dyn Settings) -> crate::Result<Option<WindowBounds>> {
        let value = settings.get_string(&self.key, Some(DEFAULT_BOUNDS_VALUE), false)?;
        if value.trim().eq_ignore_ascii_case(DEFAULT_BOUNDS_VALUE) {
            debug!(key = %self.key, "No saved window bounds");
            return Ok(None);
        }
        let bounds = value.parse::<WindowBounds>()?;
        debug!(key = %self.key, %bounds, "Restored window bounds");
        Ok(Some(bounds))
    }

    pub fn store(&self, settings: &mut dyn Settings, bounds: WindowBounds) -> crate::Result<()> {
        settings.set(&self.key, Some(&bounds.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SettingsFile;

    #[test]
    fn formats_without_trailing_zeros() {
        let bounds = WindowBounds::new(10.0, 20.0, 300.0, 400.0);
        assert_eq!(bounds.to_string(), "10,20,300,400");
        let bounds = WindowBounds::new(-8.5, 0.0, 1280.25, 720.0);
        assert_eq!(bounds.to_string(), "-8.5,0,1280.25,720");
    }

    #[test]
    fn parses_comma_and_space_separated() {
        let expected = WindowBounds::new(10.0, 20.0, 300.0, 400.0);
        assert_eq!("10,20,300,400".parse::<WindowBounds>().unwrap(), expected);
        assert_eq!("10 20 300 400".parse::<WindowBounds>().unwrap(), expected);
        assert_eq!(" 10, 20 ,300,400 ".parse::<WindowBounds>().unwrap(), expected);
    }

    #[test]
    fn rejects_malformed_bounds() {
        for text in ["", "1,2,3", "1,2,3,4,5", "a,b,c,d", "0,0,-1,10", "0,0,NaN,1"] {
            assert!(text.parse::<WindowBounds>().is_err(), "{text:?}");
        }
    }

    #[test]
    fn default_sentinel_means_no_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = SettingsFile::open(dir.path().join("s.ini")).unwrap();
        let keeper = WindowBoundsKeeper::new("WindowBounds");

        assert_eq!(keeper.restore(&mut settings).unwrap(), None);
        // Absent values are not written back.
        assert!(!settings.is_modified());

        settings.set("WindowBounds", Some("default")).unwrap();
        assert_eq!(keeper.restore(&mut settings).unwrap(), None);
    }

    #[test]
    fn store_then_restore() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = SettingsFile::open(dir.path().join("s.ini")).unwrap();
        let keeper = WindowBoundsKeeper::new("WindowBounds");
        let bounds = WindowBounds::new(10.0, 20.0, 300.0, 400.0);

        keeper.store(&mut settings, bounds).unwrap();
        assert_eq!(settings.get("WindowBounds"), Some("10,20,300,400"));
        assert_eq!(keeper.restore(&mut settings).unwrap(), Some(bounds));
    }

    #[test]
    fn corrupt_value_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = SettingsFile::open(dir.path().join("s.ini")).unwrap();
        settings.set("WindowBounds", Some("left,top")).unwrap();
        let err = WindowBoundsKeeper::new("WindowBounds")
            .restore(&mut settings)
            .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidBounds(_)));
    }
}
