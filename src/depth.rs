use std::path::Path;

use crate::{
    core::Point,
    error::{DriftError, DriftResult},
};

/// Read-only accessor over a depth field.
///
/// `sample` maps a normalized coordinate to a depth intensity in [0,1]
/// (1 = nearest to the viewer). Implementations clamp the input themselves,
/// so callers may pass unclamped coordinates. Sampling never mutates the
/// underlying data; depth maps are shared read-only resources.
pub trait DepthSample {
    fn sample(&self, uv: Point) -> f64;
}

/// A uniform depth field.
///
/// `ConstantDepth(0.0)` is the fallback for a layer whose depth map is not
/// yet available: flat, never reacting to the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantDepth(pub f64);

impl DepthSample for ConstantDepth {
    fn sample(&self, _uv: Point) -> f64 {
        self.0.clamp(0.0, 1.0)
    }
}

/// A decoded depth map. Intensity is read from the red channel, matching
/// the convention the mesh backend's vertex stage uses.
#[derive(Clone, Debug)]
pub struct DepthImage {
    pixels: image::RgbaImage,
}

impl DepthImage {
    pub fn from_image(img: image::DynamicImage) -> DriftResult<Self> {
        let pixels = img.to_rgba8();
        let (w, h) = pixels.dimensions();
        if w == 0 || h == 0 {
            return Err(DriftError::missing_depth("depth map has zero area"));
        }
        Ok(Self { pixels })
    }

    pub fn open(path: impl AsRef<Path>) -> DriftResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| {
            DriftError::asset_load(format!("open depth map '{}': {e}", path.display()))
        })?;
        Self::from_image(img)
    }

    pub fn decode(bytes: &[u8]) -> DriftResult<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| DriftError::asset_load(format!("decode depth map: {e}")))?;
        Self::from_image(img)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

impl DepthSample for DepthImage {
    /// Nearest-pixel lookup of the red channel, scaled to [0,1].
    fn sample(&self, uv: Point) -> f64 {
        let x = uv.x.clamp(0.0, 1.0) * f64::from(self.pixels.width() - 1);
        let y = uv.y.clamp(0.0, 1.0) * f64::from(self.pixels.height() - 1);
        let px = self.pixels.get_pixel(x.round() as u32, y.round() as u32);
        f64::from(px.0[0]) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_map() -> DepthImage {
        // 4x2, red channel ramps left to right: 0, 85, 170, 255.
        let img = image::RgbaImage::from_fn(4, 2, |x, _y| image::Rgba([(x * 85) as u8, 0, 0, 255]));
        DepthImage::from_image(image::DynamicImage::ImageRgba8(img)).unwrap()
    }

    #[test]
    fn samples_red_channel_nearest() {
        let map = gradient_map();
        assert_eq!(map.sample(Point::new(0.0, 0.0)), 0.0);
        assert_eq!(map.sample(Point::new(1.0, 1.0)), 1.0);
        assert!((map.sample(Point::new(1.0 / 3.0, 0.5)) - 85.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn sample_clamps_out_of_range_coordinates() {
        let map = gradient_map();
        assert_eq!(map.sample(Point::new(-5.0, 0.0)), 0.0);
        assert_eq!(map.sample(Point::new(5.0, 0.0)), 1.0);
    }

    #[test]
    fn constant_depth_clamps() {
        assert_eq!(ConstantDepth(0.5).sample(Point::new(0.1, 0.9)), 0.5);
        assert_eq!(ConstantDepth(2.0).sample(Point::ORIGIN), 1.0);
        assert_eq!(ConstantDepth(-1.0).sample(Point::ORIGIN), 0.0);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = DepthImage::decode(b"not an image").unwrap_err();
        assert!(err.to_string().contains("asset load failure"));
    }

    #[test]
    fn decode_roundtrips_png_bytes() {
        let img = image::RgbaImage::from_fn(2, 2, |_, _| image::Rgba([128, 0, 0, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();

        let map = DepthImage::decode(&buf).unwrap();
        assert_eq!(map.width(), 2);
        assert!((map.sample(Point::new(0.5, 0.5)) - 128.0 / 255.0).abs() < 1e-12);
    }
}
