pub mod bounds;
pub mod codec;
pub mod error;
pub mod store;

pub use bounds::{WindowBounds, WindowBoundsKeeper, DEFAULT_BOUNDS_VALUE};
pub use error::SettingsError;
pub use store::{Settings, SettingsExt, SettingsFile};

/// Convenience result type for the settings crate.
pub type Result<T> = std::result::Result<T, SettingsError>;
