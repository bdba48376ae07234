use std::ops::BitOrAssign;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::catalog::{self, ImageEntry, StartLocation};
use crate::loader::{ImageLoader, Picture};
use crate::transform::{fit_scale, wheel_scale};
use crate::vector::Vector;

/// Minimum pan change, in image units, worth reporting.
const TRANSLATE_EPSILON: f64 = 0.01;

// ---------------------------------------------------------------------------
// Change notification
// ---------------------------------------------------------------------------

/// Observable properties of a [`ViewController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Image,
    ImageFileName,
    TranslateX,
    TranslateY,
    Scale,
}

impl Property {
    pub const ALL: [Property; 5] = [
        Property::Image,
        Property::ImageFileName,
        Property::TranslateX,
        Property::TranslateY,
        Property::Scale,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::ImageFileName => "ImageFileName",
            Self::TranslateX => "TranslateX",
            Self::TranslateY => "TranslateY",
            Self::Scale => "Scale",
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of properties changed by one or more operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes(u8);

impl Changes {
    pub const NONE: Self = Self(0);

    pub fn contains(self, property: Property) -> bool {
        self.0 & property.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, property: Property) {
        self.0 |= property.bit();
    }

    pub fn iter(self) -> impl Iterator<Item = Property> {
        Property::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl BitOrAssign for Changes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<Property> for Changes {
    fn from(property: Property) -> Self {
        Self(property.bit())
    }
}

type Observer = Box<dyn FnMut(Property)>;

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// Pan, zoom, selection, and viewport size of the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Selected entry. Meaningless while the list is empty.
    pub index: usize,
    /// Pan offset in image units.
    pub translate_x: f64,
    pub translate_y: f64,
    /// Zoom factor, image pixel → viewport pixel.
    pub scale: f64,
    /// Viewport size in pixels; zero until the first layout.
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            index: 0,
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            viewport_width: 0.0,
            viewport_height: 0.0,
        }
    }
}

impl ViewState {
    pub fn translate(&self) -> Vector {
        Vector::new(self.translate_x, self.translate_y)
    }

    pub fn viewport(&self) -> Vector {
        Vector::new(self.viewport_width, self.viewport_height)
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the image list and the view transform.
///
/// All mutation goes through [`shift`](Self::shift),
/// [`set_display`](Self::set_display), [`set_translate`](Self::set_translate)
/// and [`set_scale`](Self::set_scale). Each returns the [`Changes`] it made
/// and reports every changed property to subscribers, synchronously and in
/// order, before returning.
pub struct ViewController<L: ImageLoader> {
    loader: L,
    directory: PathBuf,
    entries: Vec<ImageEntry<L::Image>>,
    state: ViewState,
    observers: Vec<Observer>,
}

impl<L: ImageLoader> ViewController<L> {
    /// Browse the images around `argument` (a file, a directory, or nothing
    /// for the working directory).
    ///
    /// Only failing to list the directory is an error. If the first image
    /// cannot be decoded the controller is still returned, with no current
    /// image, and the load is retried on the next visit.
    pub fn open(argument: Option<&Path>, loader: L) -> crate::Result<Self> {
        let start = StartLocation::resolve(argument)?;
        let files = catalog::enumerate(&start.directory)?;
        Ok(Self::with_files(
            start.directory,
            files,
            start.target.as_deref(),
            loader,
        ))
    }

    /// Build a controller over an explicit file list.
    pub fn with_files(
        directory: PathBuf,
        files: Vec<PathBuf>,
        target: Option<&Path>,
        loader: L,
    ) -> Self {
        let initial = target
            .and_then(|target| catalog::position_of(&files, target))
            .unwrap_or(0);
        let mut controller = Self {
            loader,
            directory,
            entries: files.into_iter().map(ImageEntry::new).collect(),
            state: ViewState::default(),
            observers: Vec::new(),
        };
        // `initial` is a valid index, and the list is small enough for isize.
        if let Err(e) = controller.shift(initial as isize) {
            warn!("Initial image unavailable: {e}");
        }
        controller
    }

    /// Register a callback invoked once per changed property.
    pub fn subscribe(&mut self, observer: impl FnMut(Property) + 'static) {
        self.observers.push(Box::new(observer));
    }

    // -- Accessors ---------------------------------------------------------

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ImageEntry<L::Image>] {
        &self.entries
    }

    /// Selected index, or `None` for an empty list.
    pub fn index(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.state.index)
    }

    pub fn current_entry(&self) -> Option<&ImageEntry<L::Image>> {
        self.entries.get(self.state.index)
    }

    /// The displayed image, if the current entry has been loaded.
    pub fn image(&self) -> Option<&L::Image> {
        self.current_entry().and_then(ImageEntry::image)
    }

    /// Current file name without extension.
    pub fn image_file_name(&self) -> Option<String> {
        self.current_entry().map(ImageEntry::display_name)
    }

    pub fn translate(&self) -> Vector {
        self.state.translate()
    }

    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    // -- Operations --------------------------------------------------------

    /// Move the selection by `offset` entries, wrapping around both ends.
    ///
    /// Visiting an entry loads and caches its image. Pan is reset and the fit
    /// scale recomputed. A load failure still selects the entry (showing no
    /// image) and is returned as an error; the changes made are reported to
    /// subscribers either way.
    pub fn shift(&mut self, offset: isize) -> crate::Result<Changes> {
        let len = self.entries.len();
        if len == 0 {
            return Ok(Changes::NONE);
        }
        let step = offset.rem_euclid(len as isize) as usize;
        let index = (self.state.index + step) % len;
        if index == self.state.index && self.entries[index].is_loaded() {
            return Ok(Changes::NONE);
        }

        let entry = &mut self.entries[index];
        let loaded = if entry.is_loaded() {
            Ok(())
        } else {
            self.loader
                .load(entry.path())
                .map(|image| entry.store(image))
        };

        self.state.index = index;
        let mut changes = self.set_translate(0.0, 0.0);
        changes |= self.optimize_scale();
        self.emit(&mut changes, Property::Image);
        self.emit(&mut changes, Property::ImageFileName);
        debug!(index, len, loaded = loaded.is_ok(), "Shifted selection");

        loaded.map(|()| changes)
    }

    /// Record the viewport size, refitting the image when it really changed.
    pub fn set_display(&mut self, width: f64, height: f64) -> Changes {
        let dw = (width - self.state.viewport_width).abs();
        let dh = (height - self.state.viewport_height).abs();
        if dw.max(dh) <= f64::EPSILON {
            return Changes::NONE;
        }
        self.state.viewport_width = width;
        self.state.viewport_height = height;
        self.optimize_scale()
    }

    /// Set the pan offset. Sub-pixel jitter below 0.01 on an axis is ignored.
    pub fn set_translate(&mut self, x: f64, y: f64) -> Changes {
        let mut changes = Changes::NONE;
        if (x - self.state.translate_x).abs() > TRANSLATE_EPSILON {
            self.state.translate_x = x;
            self.emit(&mut changes, Property::TranslateX);
        }
        if (y - self.state.translate_y).abs() > TRANSLATE_EPSILON {
            self.state.translate_y = y;
            self.emit(&mut changes, Property::TranslateY);
        }
        changes
    }

    /// Set the zoom directly. Callers clamp; see [`zoom_by_wheel`](Self::zoom_by_wheel).
    pub fn set_scale(&mut self, scale: f64) -> Changes {
        let mut changes = Changes::NONE;
        if (scale - self.state.scale).abs() > f64::EPSILON {
            self.state.scale = scale;
            self.emit(&mut changes, Property::Scale);
        }
        changes
    }

    /// Apply a mouse-wheel delta (120 per notch, positive zooms in).
    pub fn zoom_by_wheel(&mut self, delta: f64) -> Changes {
        self.set_scale(wheel_scale(self.state.scale, delta))
    }

    fn optimize_scale(&mut self) -> Changes {
        let Some(image) = self.image() else {
            return Changes::NONE;
        };
        let size = Vector::new(image.width() as f64, image.height() as f64);
        match fit_scale(self.state.viewport(), size) {
            Some(scale) => self.set_scale(scale),
            None => Changes::NONE,
        }
    }

    fn emit(&mut self, changes: &mut Changes, property: Property) {
        changes.insert(property);
        for observer in &mut self.observers {
            observer(property);
        }
    }
}
