use crate::{
    adapter::ParallaxAdapter,
    core::{Point, PointerSample, RectPx},
    error::{DriftError, DriftResult},
    field::{FieldConfig, Gain, TiltConfig},
};

/// The transform a host writes into one flat layer.
///
/// `dx`/`dy`/`lift` are CSS pixels (`lift` is the translate-z push that
/// sells the stacking), tilts are degrees. Identity means the layer sits
/// exactly where static layout put it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerPose {
    pub dx: f64,
    pub dy: f64,
    pub lift: f64,
    pub tilt_x_deg: f64,
    pub tilt_y_deg: f64,
}

impl LayerPose {
    pub const IDENTITY: Self = Self {
        dx: 0.0,
        dy: 0.0,
        lift: 0.0,
        tilt_x_deg: 0.0,
        tilt_y_deg: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerStackConfig {
    /// Depth weight of layer `i` is `(i + 1) * base_unit`; index 0 is the
    /// flattest layer.
    pub base_unit: f64,
    pub field: FieldConfig,
    pub tilt: TiltConfig,
    /// Z push per unit of depth weight, in px.
    pub lift_px: f64,
}

impl Default for LayerStackConfig {
    fn default() -> Self {
        Self {
            base_unit: 0.1,
            field: FieldConfig {
                gain: Gain::Amplitude(50.0),
                max_scale: 15.0,
                falloff: None,
            },
            tilt: TiltConfig::default(),
            lift_px: 10.0,
        }
    }
}

impl LayerStackConfig {
    pub fn validate(&self) -> DriftResult<()> {
        if !self.base_unit.is_finite() || self.base_unit <= 0.0 {
            return Err(DriftError::validation("base_unit must be > 0"));
        }
        if !self.lift_px.is_finite() || self.lift_px < 0.0 {
            return Err(DriftError::validation("lift_px must be >= 0"));
        }
        self.field.validate()?;
        self.tilt.validate()
    }
}

/// Flat-layer backend: a stack of DOM-style layers with fixed per-layer
/// depth weights.
///
/// Applies the raw model output on every pointer-move, trading smoothness
/// for responsiveness; `tick` is a no-op. The host reads [`poses`](Self::poses)
/// after each event and writes them into its layer transforms.
#[derive(Clone, Debug)]
pub struct LayerStack {
    cfg: LayerStackConfig,
    poses: Vec<LayerPose>,
}

impl LayerStack {
    pub fn new(layer_count: usize, cfg: LayerStackConfig) -> DriftResult<Self> {
        if layer_count == 0 {
            return Err(DriftError::validation("layer_count must be > 0"));
        }
        cfg.validate()?;
        Ok(Self {
            cfg,
            poses: vec![LayerPose::IDENTITY; layer_count],
        })
    }

    pub fn with_defaults(layer_count: usize) -> DriftResult<Self> {
        Self::new(layer_count, LayerStackConfig::default())
    }

    pub fn layer_count(&self) -> usize {
        self.poses.len()
    }

    pub fn depth_weight(&self, index: usize) -> f64 {
        (index as f64 + 1.0) * self.cfg.base_unit
    }

    /// Current pose per layer, index 0 = flattest.
    pub fn poses(&self) -> &[LayerPose] {
        &self.poses
    }

    fn apply(&mut self, sample: &PointerSample) -> DriftResult<()> {
        for index in 0..self.poses.len() {
            let weight = self.depth_weight(index);
            let d = self.cfg.field.displacement(sample, weight)?;
            let (tilt_x, tilt_y) = self.cfg.tilt.tilt(sample, weight);
            self.poses[index] = LayerPose {
                dx: d.dx,
                dy: d.dy,
                lift: weight * self.cfg.lift_px,
                tilt_x_deg: tilt_x,
                tilt_y_deg: tilt_y,
            };
        }
        Ok(())
    }
}

impl ParallaxAdapter for LayerStack {
    fn pointer_moved(&mut self, client: Point, rect: RectPx) -> DriftResult<()> {
        let sample = match PointerSample::from_event(client, rect) {
            Ok(sample) => sample,
            Err(err) => {
                // Collapsed rect: drop the event, keep the last good poses.
                tracing::debug!(%err, "dropping pointer event");
                return Err(err);
            }
        };
        self.apply(&sample)
    }

    fn pointer_left(&mut self) {
        for pose in &mut self.poses {
            *pose = LayerPose::IDENTITY;
        }
    }

    fn tick(&mut self) {
        // Raw per-event application; nothing eases between frames.
    }

    fn is_neutral(&self) -> bool {
        self.poses.iter().all(LayerPose::is_identity)
    }
}
