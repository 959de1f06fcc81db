use crate::{
    adapter::ParallaxAdapter,
    core::{Point, PointerSample, RectPx, Vec2},
    depth::{DepthImage, DepthSample},
    error::{DriftError, DriftResult},
    smooth::Smoother,
};

/// Shader inputs for the depth-displaced mesh.
///
/// `mouse` is normalized with y flipped to texture orientation (0 at the
/// bottom), unlike the screen-oriented samples the other backends consume.
/// Fed raw on every move; the vertex stage does the weighting per pixel.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeshUniforms {
    pub mouse: Point,
    pub displacement_scale: f64,
}

impl MeshUniforms {
    pub fn neutral(displacement_scale: f64) -> Self {
        Self {
            mouse: Point::new(0.5, 0.5),
            displacement_scale,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeshConfig {
    pub displacement_scale: f64,
    /// Smoothing factor of the camera drift, independent of any other
    /// smoother in the system.
    pub camera_alpha: f64,
    /// How far the camera strays from its rest position per unit of
    /// centered pointer offset, in world units.
    pub camera_drift: f64,
    /// Camera rest distance along +z.
    pub camera_z: f64,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            displacement_scale: 0.3,
            camera_alpha: 0.05,
            camera_drift: 0.5,
            camera_z: 3.0,
        }
    }
}

impl MeshConfig {
    pub fn validate(&self) -> DriftResult<()> {
        if !self.displacement_scale.is_finite() || self.displacement_scale < 0.0 {
            return Err(DriftError::validation("displacement_scale must be >= 0"));
        }
        if !self.camera_drift.is_finite() || self.camera_drift < 0.0 {
            return Err(DriftError::validation("camera_drift must be >= 0"));
        }
        if !self.camera_z.is_finite() || self.camera_z <= 0.0 {
            return Err(DriftError::validation("camera_z must be > 0"));
        }
        Ok(())
    }
}

/// Camera position plus the unit direction re-aimed at the scene origin,
/// recomputed every tick.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraPose {
    pub position: [f64; 3],
}

impl CameraPose {
    pub fn aim(&self) -> [f64; 3] {
        let [x, y, z] = self.position;
        let len = (x * x + y * y + z * z).sqrt();
        if len == 0.0 {
            return [0.0, 0.0, -1.0];
        }
        [-x / len, -y / len, -z / len]
    }
}

/// Shader-mesh backend: raw pointer uniform plus a depth texture reference,
/// with the displacement computed per-vertex in the shading stage.
///
/// The CPU reference of that stage is [`displace_vertex`]; the adapter's own
/// job is uniform bookkeeping and the eased camera drift toward the pointer.
#[derive(Clone, Debug)]
pub struct MeshAdapter {
    cfg: MeshConfig,
    uniforms: MeshUniforms,
    camera_target: Vec2,
    camera: Smoother<Vec2>,
    depth: Option<DepthImage>,
}

impl MeshAdapter {
    pub fn new(cfg: MeshConfig) -> DriftResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            uniforms: MeshUniforms::neutral(cfg.displacement_scale),
            camera_target: Vec2::ZERO,
            camera: Smoother::new(Vec2::ZERO, cfg.camera_alpha)?,
            depth: None,
        })
    }

    pub fn set_depth_texture(&mut self, map: DepthImage) {
        self.depth = Some(map);
    }

    pub fn depth_texture(&self) -> Option<&DepthImage> {
        self.depth.as_ref()
    }

    pub fn uniforms(&self) -> &MeshUniforms {
        &self.uniforms
    }

    pub fn camera_pose(&self) -> CameraPose {
        let drift = *self.camera.current();
        CameraPose {
            position: [drift.x, drift.y, self.cfg.camera_z],
        }
    }
}

impl ParallaxAdapter for MeshAdapter {
    fn pointer_moved(&mut self, client: Point, rect: RectPx) -> DriftResult<()> {
        if self.depth.is_none() {
            self.uniforms.mouse = Point::new(0.5, 0.5);
            self.camera_target = Vec2::ZERO;
            tracing::debug!("mesh adapter has no depth texture; staying neutral");
            return Err(DriftError::missing_depth("depth texture not loaded"));
        }

        let sample = match PointerSample::from_event(client, rect) {
            Ok(sample) => sample,
            Err(err) => {
                tracing::debug!(%err, "dropping pointer event");
                return Err(err);
            }
        };

        // Texture orientation: y grows upward.
        let mouse = Point::new(sample.uv.x, 1.0 - sample.uv.y);
        self.uniforms.mouse = mouse;
        self.camera_target = Vec2::new(
            (mouse.x - 0.5) * self.cfg.camera_drift,
            (mouse.y - 0.5) * self.cfg.camera_drift,
        );
        Ok(())
    }

    fn pointer_left(&mut self) {
        self.uniforms.mouse = Point::new(0.5, 0.5);
        self.camera_target = Vec2::ZERO;
        self.camera.snap(Vec2::ZERO);
    }

    fn tick(&mut self) {
        let target = self.camera_target;
        self.camera.step(&target);
    }

    fn is_neutral(&self) -> bool {
        self.uniforms.mouse == Point::new(0.5, 0.5)
            && self.camera_target == Vec2::ZERO
            && *self.camera.current() == Vec2::ZERO
    }
}

/// CPU reference of the vertex-stage displacement.
///
/// Depth is the red-channel sample at the vertex uv; the centered mouse
/// offset spans [-1,1] per axis. z gains half the configured scale at full
/// depth, x/y shear a tenth of the offset per unit depth. Vertices at depth
/// 0 do not move at all.
pub fn displace_vertex(
    position: [f64; 3],
    uv: Point,
    depth: &dyn DepthSample,
    uniforms: &MeshUniforms,
) -> [f64; 3] {
    let d = depth.sample(uv);
    let offset_x = (uniforms.mouse.x - 0.5) * 2.0;
    let offset_y = (uniforms.mouse.y - 0.5) * 2.0;
    [
        position[0] + d * offset_x * 0.1,
        position[1] + d * offset_y * 0.1,
        position[2] + d * uniforms.displacement_scale * 0.5,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::ConstantDepth;

    const RECT: RectPx = RectPx {
        left: 0.0,
        top: 0.0,
        width: 200.0,
        height: 100.0,
    };

    fn test_depth() -> DepthImage {
        let img = image::RgbaImage::from_fn(8, 8, |_, _| image::Rgba([255, 0, 0, 255]));
        DepthImage::from_image(image::DynamicImage::ImageRgba8(img)).unwrap()
    }

    #[test]
    fn mouse_uniform_is_y_flipped() {
        let mut adapter = MeshAdapter::new(MeshConfig::default()).unwrap();
        adapter.set_depth_texture(test_depth());
        adapter.pointer_moved(Point::new(150.0, 25.0), RECT).unwrap();
        assert_eq!(adapter.uniforms().mouse, Point::new(0.75, 0.75));
    }

    #[test]
    fn camera_eases_toward_pointer_and_reaims_at_origin() {
        let mut adapter = MeshAdapter::new(MeshConfig::default()).unwrap();
        adapter.set_depth_texture(test_depth());
        adapter.pointer_moved(Point::new(200.0, 0.0), RECT).unwrap();

        // target = (1.0-0.5)*0.5 on both axes
        let mut prev = 0.0;
        for _ in 0..300 {
            adapter.tick();
            let pose = adapter.camera_pose();
            assert!(pose.position[0] >= prev);
            assert!(pose.position[0] <= 0.25 + 1e-12);
            prev = pose.position[0];
        }
        assert!((prev - 0.25).abs() < 1e-3);

        let pose = adapter.camera_pose();
        assert_eq!(pose.position[2], 3.0);
        // aim points back toward the origin
        let aim = pose.aim();
        assert!(aim[0] < 0.0);
        assert!(aim[2] < 0.0);
        let len = (aim[0] * aim[0] + aim[1] * aim[1] + aim[2] * aim[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-12);
    }

    #[test]
    fn missing_depth_texture_keeps_everything_neutral() {
        let mut adapter = MeshAdapter::new(MeshConfig::default()).unwrap();
        let err = adapter
            .pointer_moved(Point::new(10.0, 10.0), RECT)
            .unwrap_err();
        assert!(matches!(err, DriftError::MissingDepthData(_)));
        adapter.tick();
        assert!(adapter.is_neutral());
    }

    #[test]
    fn pointer_leave_recenters_uniform_and_camera() {
        let mut adapter = MeshAdapter::new(MeshConfig::default()).unwrap();
        adapter.set_depth_texture(test_depth());
        adapter.pointer_moved(Point::new(180.0, 20.0), RECT).unwrap();
        for _ in 0..10 {
            adapter.tick();
        }
        assert!(!adapter.is_neutral());

        adapter.pointer_left();
        assert!(adapter.is_neutral());
        assert_eq!(adapter.camera_pose().position[0], 0.0);
    }

    #[test]
    fn vertex_displacement_weights_by_sampled_depth() {
        let uniforms = MeshUniforms {
            mouse: Point::new(1.0, 0.5),
            displacement_scale: 0.3,
        };

        let flat = displace_vertex([0.0; 3], Point::new(0.5, 0.5), &ConstantDepth(0.0), &uniforms);
        assert_eq!(flat, [0.0; 3]);

        let near = displace_vertex([0.0; 3], Point::new(0.5, 0.5), &ConstantDepth(1.0), &uniforms);
        // offset_x = 1.0, so x gains 0.1; z gains 0.3*0.5
        assert!((near[0] - 0.1).abs() < 1e-12);
        assert_eq!(near[1], 0.0);
        assert!((near[2] - 0.15).abs() < 1e-12);

        let half = displace_vertex([0.0; 3], Point::new(0.5, 0.5), &ConstantDepth(0.5), &uniforms);
        assert!((half[0] - 0.05).abs() < 1e-12);
    }
}
