use crate::error::{DriftError, DriftResult};

pub use kurbo::{Point, Vec2};

/// Raw reference rectangle as reported by the host, in pixels.
///
/// Re-queried from the host's bounding box on every pointer move (the host
/// may resize between events), then validated into a [`ViewRect`] before any
/// model math runs.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RectPx {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl RectPx {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A validated reference rectangle: finite, with strictly positive area.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewRect {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl ViewRect {
    pub fn new(raw: RectPx) -> DriftResult<Self> {
        let finite = raw.left.is_finite()
            && raw.top.is_finite()
            && raw.width.is_finite()
            && raw.height.is_finite();
        if !finite {
            return Err(DriftError::invalid_rect("rect components must be finite"));
        }
        if raw.width <= 0.0 || raw.height <= 0.0 {
            return Err(DriftError::invalid_rect(format!(
                "rect must have positive area (got {}x{})",
                raw.width, raw.height
            )));
        }
        Ok(Self {
            left: raw.left,
            top: raw.top,
            width: raw.width,
            height: raw.height,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Center of the rectangle in pixel space.
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Distance from the center to a corner. Always > 0 for a valid rect;
    /// used to normalize falloff distances.
    pub fn corner_distance(&self) -> f64 {
        (self.width / 2.0).hypot(self.height / 2.0)
    }

    /// Map a pixel-space point into [0,1]², clamped.
    pub fn normalize(&self, px: Point) -> Point {
        let x = ((px.x - self.left) / self.width).clamp(0.0, 1.0);
        let y = ((px.y - self.top) / self.height).clamp(0.0, 1.0);
        Point::new(x, y)
    }

    /// Pixel offset of `px` from the rect center.
    pub fn offset_from_center(&self, px: Point) -> Vec2 {
        px - self.center()
    }
}

/// One normalized pointer observation. Immutable; built per event by
/// [`PointerSample::from_event`](crate::pointer) and passed by reference
/// into the field model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// Normalized position, clamped to [0,1]².
    pub uv: Point,
    /// Raw pixel position (client space, unclamped).
    pub px: Point,
    /// The rectangle the sample was taken against.
    pub rect: ViewRect,
}

/// A computed displacement: translation plus an optional tilt.
///
/// Units of `dx`/`dy` are backend-specific (CSS pixels for the layered
/// backend, filter-scale units for the sprite backend, world units for the
/// mesh backend); the shape of the computation is shared. Tilt is only
/// produced for the layered backend and is bounded independently of the
/// translation clamp.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Displacement {
    pub dx: f64,
    pub dy: f64,
    pub tilt_x_deg: f64,
    pub tilt_y_deg: f64,
}

impl Displacement {
    pub const NEUTRAL: Self = Self {
        dx: 0.0,
        dy: 0.0,
        tilt_x_deg: 0.0,
        tilt_y_deg: 0.0,
    };

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            ..Self::NEUTRAL
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    pub fn translation_vec(&self) -> Vec2 {
        Vec2::new(self.dx, self.dy)
    }
}

impl Default for Displacement {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_rect_rejects_zero_area() {
        assert!(ViewRect::new(RectPx::new(0.0, 0.0, 0.0, 100.0)).is_err());
        assert!(ViewRect::new(RectPx::new(0.0, 0.0, 200.0, 0.0)).is_err());
        assert!(ViewRect::new(RectPx::new(0.0, 0.0, -10.0, 100.0)).is_err());
        assert!(ViewRect::new(RectPx::new(0.0, 0.0, 200.0, 100.0)).is_ok());
    }

    #[test]
    fn view_rect_rejects_non_finite() {
        assert!(ViewRect::new(RectPx::new(f64::NAN, 0.0, 200.0, 100.0)).is_err());
        assert!(ViewRect::new(RectPx::new(0.0, 0.0, f64::INFINITY, 100.0)).is_err());
    }

    #[test]
    fn normalize_clamps_outside_points() {
        let rect = ViewRect::new(RectPx::new(10.0, 20.0, 200.0, 100.0)).unwrap();
        assert_eq!(rect.normalize(Point::new(10.0, 20.0)), Point::new(0.0, 0.0));
        assert_eq!(
            rect.normalize(Point::new(210.0, 120.0)),
            Point::new(1.0, 1.0)
        );
        assert_eq!(
            rect.normalize(Point::new(-50.0, 500.0)),
            Point::new(0.0, 1.0)
        );
    }

    #[test]
    fn center_and_corner_distance() {
        let rect = ViewRect::new(RectPx::new(0.0, 0.0, 200.0, 100.0)).unwrap();
        assert_eq!(rect.center(), Point::new(100.0, 50.0));
        assert!((rect.corner_distance() - (100.0f64.hypot(50.0))).abs() < 1e-12);
        assert_eq!(
            rect.offset_from_center(Point::new(150.0, 25.0)),
            Vec2::new(50.0, -25.0)
        );
    }

    #[test]
    fn neutral_displacement_is_neutral() {
        assert!(Displacement::NEUTRAL.is_neutral());
        assert!(!Displacement::translation(0.1, 0.0).is_neutral());
    }
}
