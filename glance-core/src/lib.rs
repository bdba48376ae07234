pub mod catalog;
pub mod controller;
pub mod error;
pub mod loader;
pub mod transform;
pub mod vector;

// Re-export primary types for convenience.
pub use catalog::{ImageEntry, StartLocation, SUPPORTED_EXTENSIONS};
pub use controller::{Changes, Property, ViewController, ViewState};
pub use error::CoreError;
pub use loader::{DecodedImage, DiskLoader, ImageLoader, Picture};
pub use transform::{
    fit_scale, placement, wheel_scale, PanDrag, MAX_SCALE, MIN_SCALE, WHEEL_NOTCH,
};
pub use vector::Vector;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
