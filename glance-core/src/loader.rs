use std::borrow::Cow;
use std::path::Path;

use image::imageops;
use tracing::debug;

use crate::error::CoreError;

/// Anything with pixel dimensions that the controller can fit to a viewport.
pub trait Picture {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

/// Turns a file on disk into a displayable image.
///
/// The controller calls this synchronously on the thread driving navigation.
pub trait ImageLoader {
    type Image: Picture;

    fn load(&self, path: &Path) -> crate::Result<Self::Image>;
}

/// A decoded image as tightly packed, non-premultiplied RGBA8 rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    buffer: image::RgbaImage,
}

impl DecodedImage {
    /// Wrap an `image` crate buffer.
    pub fn from_rgba(buffer: image::RgbaImage) -> Self {
        Self { buffer }
    }

    /// RGBA bytes, `width * height * 4` long.
    pub fn pixels(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// This image, shrunk so neither side exceeds `max_side`.
    ///
    /// Aspect ratio is kept and no side drops below one pixel. Images that
    /// already fit are borrowed unchanged.
    pub fn fit_within(&self, max_side: u32) -> Cow<'_, DecodedImage> {
        let (width, height) = self.buffer.dimensions();
        let longest = width.max(height);
        if longest <= max_side || max_side == 0 {
            return Cow::Borrowed(self);
        }
        let ratio = max_side as f64 / longest as f64;
        let shrink = |side: u32| ((side as f64 * ratio).round() as u32).clamp(1, max_side);
        let (new_width, new_height) = (shrink(width), shrink(height));
        debug!(
            width,
            height,
            new_width,
            new_height,
            "Downscaling image to fit texture limit"
        );
        Cow::Owned(Self::from_rgba(imageops::resize(
            &self.buffer,
            new_width,
            new_height,
            imageops::FilterType::Triangle,
        )))
    }
}

impl Picture for DecodedImage {
    fn width(&self) -> u32 {
        self.buffer.width()
    }

    fn height(&self) -> u32 {
        self.buffer.height()
    }
}

/// Decodes files with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskLoader;

impl ImageLoader for DiskLoader {
    type Image = DecodedImage;

    fn load(&self, path: &Path) -> crate::Result<DecodedImage> {
        let start = std::time::Instant::now();
        let decoded = image::open(path).map_err(|source| CoreError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let image = DecodedImage::from_rgba(decoded.to_rgba8());
        debug!(
            width = image.width(),
            height = image.height(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Decoded {}",
            path.display()
        );
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        let mut buffer = image::RgbaImage::new(3, 2);
        buffer.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        buffer.save(&path).unwrap();

        let image = DiskLoader.load(&path).unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.pixels().len(), 3 * 2 * 4);
        assert_eq!(&image.pixels()[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn fit_within_keeps_small_images() {
        let image = DecodedImage::from_rgba(image::RgbaImage::new(64, 32));
        assert!(matches!(image.fit_within(64), Cow::Borrowed(_)));
    }

    #[test]
    fn fit_within_shrinks_longest_side() {
        let image = DecodedImage::from_rgba(image::RgbaImage::new(4096, 8));
        let fitted = image.fit_within(2048);
        assert_eq!((fitted.width(), fitted.height()), (2048, 4));
        assert_eq!(fitted.pixels().len(), 2048 * 4 * 4);
        // The source keeps its full size for layout.
        assert_eq!((image.width(), image.height()), (4096, 8));
    }

    #[test]
    fn fit_within_never_collapses_a_side() {
        let image = DecodedImage::from_rgba(image::RgbaImage::new(10_000, 1));
        let fitted = image.fit_within(100);
        assert_eq!((fitted.width(), fitted.height()), (100, 1));
    }

    #[test]
    fn corrupt_file_is_an_image_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        let err = DiskLoader.load(&path).unwrap_err();
        assert!(matches!(err, CoreError::ImageLoad { .. }), "{err}");
    }

    #[test]
    fn missing_file_is_an_image_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DiskLoader.load(&dir.path().join("gone.jpg")).unwrap_err();
        assert!(matches!(err, CoreError::ImageLoad { .. }));
    }
}
