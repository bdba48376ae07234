//! Pure pan/zoom math shared by the controller and the window shell.

use crate::vector::Vector;

/// Smallest zoom the wheel can reach.
pub const MIN_SCALE: f64 = 0.1;
/// Largest zoom the wheel can reach.
pub const MAX_SCALE: f64 = 10.0;

/// Wheel delta reported for one detent of a classic mouse wheel.
pub const WHEEL_NOTCH: f64 = 120.0;

/// Pivot of the square-root zoom curve.
const WHEEL_PIVOT: f64 = 4.0;
/// Wheel delta that moves one full unit along the square-root curve.
const WHEEL_DIVISOR: f64 = 5000.0;

/// Map a wheel delta onto a new zoom scale.
///
/// The step is applied in square-root space so each notch changes the
/// apparent image size by a similar amount at any zoom level:
///
/// ```text
/// scale' = clamp(4 · (√(scale / 4) + delta / 5000)², 0.1, 10)
/// ```
///
/// Positive deltas zoom in.
pub fn wheel_scale(scale: f64, delta: f64) -> f64 {
    let amount = delta / WHEEL_DIVISOR;
    let root = (scale / WHEEL_PIVOT).sqrt() + amount;
    (WHEEL_PIVOT * root * root).clamp(MIN_SCALE, MAX_SCALE)
}

/// Scale at which an image fits inside the viewport without being enlarged.
///
/// Returns `None` while either size is still unknown (zero or negative).
pub fn fit_scale(viewport: Vector, image: Vector) -> Option<f64> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 || image.x <= 0.0 || image.y <= 0.0 {
        return None;
    }
    let scale_x = viewport.x / image.x;
    let scale_y = viewport.y / image.y;
    Some(1.0_f64.min(scale_x).min(scale_y))
}

/// Where the image lands inside the viewport, as `(top_left, size)`.
///
/// The image is centred, then shifted by the pan offset. Pan is in image
/// units, so it is scaled along with the image.
pub fn placement(
    viewport: Vector,
    image: Vector,
    translate: Vector,
    scale: f64,
) -> (Vector, Vector) {
    let size = image * scale;
    let top_left = (viewport - size) / 2.0 + translate * scale;
    (top_left, size)
}

/// Tracks a pointer drag that pans the image.
///
/// The origin is chosen so that the image point under the cursor stays under
/// the cursor for the whole drag, whatever the current zoom.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanDrag {
    origin: Option<Vector>,
}

impl PanDrag {
    /// Start dragging from `pointer` with the current pan and zoom.
    pub fn begin(&mut self, pointer: Vector, translate: Vector, scale: f64) {
        self.origin = Some(pointer - translate * scale);
    }

    /// Pan offset for the pointer's new position, or `None` when no drag is
    /// in progress.
    pub fn update(&self, pointer: Vector, scale: f64) -> Option<Vector> {
        self.origin.map(|origin| (pointer - origin) / scale)
    }

    pub fn end(&mut self) {
        self.origin = None;
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    pub fn origin(&self) -> Option<Vector> {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn wheel_full_unit_clamps_to_max() {
        // 4 · (√(1/4) + 1)² = 4 · 1.5² = 9, still inside the bounds.
        assert_relative_eq!(wheel_scale(1.0, 5000.0), 9.0);
        // 4 · (1 + 1)² = 16 → clamped.
        assert_relative_eq!(wheel_scale(4.0, 5000.0), MAX_SCALE);
    }

    #[test]
    fn wheel_zero_delta_is_identity() {
        assert_relative_eq!(wheel_scale(4.0, 0.0), 4.0);
        assert_relative_eq!(wheel_scale(1.0, 0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(wheel_scale(0.37, 0.0), 0.37, epsilon = 1e-12);
    }

    #[test]
    fn wheel_one_notch_matches_formula() {
        let expected = 4.0 * ((1.0_f64 / 4.0).sqrt() + 120.0 / 5000.0).powi(2);
        assert_relative_eq!(wheel_scale(1.0, WHEEL_NOTCH), expected);
        assert!(wheel_scale(1.0, WHEEL_NOTCH) > 1.0);
        assert!(wheel_scale(1.0, -WHEEL_NOTCH) < 1.0);
    }

    #[test]
    fn wheel_clamps_at_min() {
        assert_relative_eq!(wheel_scale(0.1, -5000.0), MIN_SCALE);
    }

    #[test]
    fn wheel_sequences_stay_in_bounds() {
        let deltas = [
            120.0, -120.0, 5000.0, 5000.0, -240.0, -9000.0, -120.0, 360.0, 1e6, -1e6, 17.0,
        ];
        let mut scale = 1.0;
        for _ in 0..20 {
            for &d in &deltas {
                scale = wheel_scale(scale, d);
                assert!((MIN_SCALE..=MAX_SCALE).contains(&scale), "{scale}");
            }
        }
    }

    #[test]
    fn fit_shrinks_to_smaller_axis() {
        let scale = fit_scale(Vector::new(800.0, 600.0), Vector::new(1600.0, 300.0));
        assert_relative_eq!(scale.unwrap(), 0.5);
    }

    #[test]
    fn fit_never_upscales() {
        let scale = fit_scale(Vector::new(800.0, 600.0), Vector::new(200.0, 100.0));
        assert_relative_eq!(scale.unwrap(), 1.0);
    }

    #[test]
    fn fit_needs_known_sizes() {
        assert_eq!(fit_scale(Vector::ZERO, Vector::new(10.0, 10.0)), None);
        assert_eq!(fit_scale(Vector::new(10.0, 10.0), Vector::new(0.0, 10.0)), None);
    }

    #[test]
    fn placement_centres_then_pans() {
        let viewport = Vector::new(800.0, 600.0);
        let image = Vector::new(400.0, 200.0);
        let (top_left, size) = placement(viewport, image, Vector::ZERO, 1.0);
        assert_eq!(top_left, Vector::new(200.0, 200.0));
        assert_eq!(size, image);

        let (top_left, size) = placement(viewport, image, Vector::new(25.0, 15.0), 2.0);
        assert_eq!(size, Vector::new(800.0, 400.0));
        assert_eq!(top_left, Vector::new(50.0, 130.0));
    }

    #[test]
    fn drag_keeps_point_under_cursor() {
        let mut drag = PanDrag::default();
        // Pan (0, 0) at any scale puts the origin at the press position.
        drag.begin(Vector::new(100.0, 100.0), Vector::ZERO, 2.0);
        assert_eq!(drag.origin(), Some(Vector::new(100.0, 100.0)));

        let pan = drag.update(Vector::new(150.0, 130.0), 2.0).unwrap();
        assert_relative_eq!(pan.x, 25.0);
        assert_relative_eq!(pan.y, 15.0);
    }

    #[test]
    fn drag_accounts_for_existing_pan() {
        let mut drag = PanDrag::default();
        drag.begin(Vector::new(100.0, 100.0), Vector::new(10.0, -5.0), 0.5);
        // Not moving the pointer must reproduce the current pan.
        let pan = drag.update(Vector::new(100.0, 100.0), 0.5).unwrap();
        assert_relative_eq!(pan.x, 10.0);
        assert_relative_eq!(pan.y, -5.0);
    }

    #[test]
    fn drag_end_clears_origin() {
        let mut drag = PanDrag::default();
        assert!(drag.update(Vector::new(1.0, 1.0), 1.0).is_none());
        drag.begin(Vector::ZERO, Vector::ZERO, 1.0);
        assert!(drag.is_active());
        drag.end();
        assert!(!drag.is_active());
        assert!(drag.update(Vector::new(1.0, 1.0), 1.0).is_none());
    }
}
