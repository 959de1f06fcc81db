use crate::{
    adapter::ParallaxAdapter,
    core::{Point, PointerSample, RectPx, Vec2},
    depth::DepthImage,
    error::{DriftError, DriftResult},
    field::{Falloff, FieldConfig, Gain},
    smooth::Smoother,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpriteConfig {
    pub field: FieldConfig,
    /// Smoothing factor for the filter scale, applied once per tick.
    pub alpha: f64,
}

impl SpriteConfig {
    /// The original demo tuning: no falloff, alpha 0.10.
    pub fn classic() -> Self {
        Self {
            field: FieldConfig {
                gain: Gain::PixelDivisor(20.0),
                max_scale: 15.0,
                falloff: None,
            },
            alpha: 0.10,
        }
    }

    /// The edge-hardened variant: distance falloff with a 0.3 floor,
    /// alpha 0.15. Tapers displacement near the borders so the filter never
    /// tears at the image edge.
    pub fn edge_safe() -> Self {
        Self {
            field: FieldConfig {
                gain: Gain::PixelDivisor(20.0),
                max_scale: 15.0,
                falloff: Some(Falloff { min_factor: 0.3 }),
            },
            alpha: 0.15,
        }
    }
}

/// Sprite-displacement backend: the whole visible area is one depth field
/// sampled by a displacement filter from a depth sprite.
///
/// One target scale vector per pointer-move, eased toward every tick; the
/// host feeds [`filter_scale`](Self::filter_scale) into the filter's
/// per-axis scale. Depth weighting happens per-pixel inside the filter, so
/// the model runs with weight 1.0 here.
#[derive(Clone, Debug)]
pub struct SpriteAdapter {
    cfg: SpriteConfig,
    target: Vec2,
    scale: Smoother<Vec2>,
    depth: Option<DepthImage>,
}

impl SpriteAdapter {
    pub fn new(cfg: SpriteConfig) -> DriftResult<Self> {
        cfg.field.validate()?;
        Ok(Self {
            cfg,
            target: Vec2::ZERO,
            scale: Smoother::new(Vec2::ZERO, cfg.alpha)?,
            depth: None,
        })
    }

    /// Attach the depth sprite. The adapter refuses to react until one is
    /// present; a layer whose map is still pending stays flat.
    pub fn set_depth_sprite(&mut self, map: DepthImage) {
        self.depth = Some(map);
    }

    pub fn depth_sprite(&self) -> Option<&DepthImage> {
        self.depth.as_ref()
    }

    /// The smoothed per-axis filter scale for the current frame.
    pub fn filter_scale(&self) -> Vec2 {
        *self.scale.current()
    }

    /// Where the scale is heading (pre-smoothing). Mostly useful in tests
    /// and diagnostics.
    pub fn target_scale(&self) -> Vec2 {
        self.target
    }
}

impl ParallaxAdapter for SpriteAdapter {
    fn pointer_moved(&mut self, client: Point, rect: RectPx) -> DriftResult<()> {
        if self.depth.is_none() {
            // No depth sprite yet: stay neutral rather than animate garbage.
            self.target = Vec2::ZERO;
            tracing::debug!("sprite adapter has no depth sprite; staying neutral");
            return Err(DriftError::missing_depth("depth sprite not loaded"));
        }

        let sample = match PointerSample::from_event(client, rect) {
            Ok(sample) => sample,
            Err(err) => {
                tracing::debug!(%err, "dropping pointer event");
                return Err(err);
            }
        };

        let d = self.cfg.field.displacement(&sample, 1.0)?;
        self.target = d.translation_vec();
        Ok(())
    }

    fn pointer_left(&mut self) {
        self.target = Vec2::ZERO;
        self.scale.snap(Vec2::ZERO);
    }

    fn tick(&mut self) {
        let target = self.target;
        self.scale.step(&target);
    }

    fn is_neutral(&self) -> bool {
        self.target == Vec2::ZERO && *self.scale.current() == Vec2::ZERO
    }
}
