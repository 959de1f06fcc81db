use crate::{
    core::{Displacement, PointerSample, Vec2},
    error::{DriftError, DriftResult},
};

/// How pointer offset turns into displacement magnitude.
///
/// Both variants were observed in production depth demos and are equivalent
/// up to sign and units; neither is canonical, so both are configuration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Gain {
    /// Divide the centered pixel offset by a sensitivity. Sign convention is
    /// center minus pointer (displacement filter scale units). Larger
    /// divisor, smaller displacement per pixel of pointer travel.
    PixelDivisor(f64),
    /// Multiply the centered normalized offset by an amplitude. Sign
    /// convention is pointer minus center (layer translation in px).
    Amplitude(f64),
}

impl Gain {
    fn validate(&self) -> DriftResult<()> {
        let v = match self {
            Self::PixelDivisor(s) => *s,
            Self::Amplitude(a) => *a,
        };
        if !v.is_finite() || v <= 0.0 {
            return Err(DriftError::validation(format!(
                "gain must be finite and > 0, got {v}"
            )));
        }
        Ok(())
    }
}

/// Distance-from-center attenuation with a floor.
///
/// Keeps displacement non-zero at the extreme edges while tapering it from
/// center outward, which avoids visible tearing at image boundaries.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Falloff {
    /// Lower bound for the attenuation factor, in [0,1].
    pub min_factor: f64,
}

impl Falloff {
    pub fn validate(&self) -> DriftResult<()> {
        if !self.min_factor.is_finite() || !(0.0..=1.0).contains(&self.min_factor) {
            return Err(DriftError::validation(format!(
                "falloff min_factor must be in [0,1], got {}",
                self.min_factor
            )));
        }
        Ok(())
    }

    /// Attenuation factor for a pointer sample: 1 at the rect center,
    /// tapering linearly with normalized center distance down to
    /// `min_factor` at the corners. Monotonically non-increasing in the
    /// distance.
    pub fn factor(&self, sample: &PointerSample) -> f64 {
        let centered = centered_px(sample);
        let normalized = centered.hypot() / sample.rect.corner_distance();
        (1.0 - normalized * (1.0 - self.min_factor)).max(self.min_factor)
    }
}

/// Configuration of the displacement-field model.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldConfig {
    pub gain: Gain,
    /// Per-component clamp applied last; |dx| and |dy| never exceed it.
    pub max_scale: f64,
    pub falloff: Option<Falloff>,
}

impl FieldConfig {
    pub fn validate(&self) -> DriftResult<()> {
        self.gain.validate()?;
        if !self.max_scale.is_finite() || self.max_scale <= 0.0 {
            return Err(DriftError::validation(format!(
                "max_scale must be finite and > 0, got {}",
                self.max_scale
            )));
        }
        if let Some(falloff) = &self.falloff {
            falloff.validate()?;
        }
        Ok(())
    }

    /// Evaluate the field at one pointer sample for one depth weight.
    ///
    /// Steps: centered offset per [`Gain`], scaled linearly by
    /// `depth_weight`, attenuated by [`Falloff`] when configured, then each
    /// component clamped independently to `[-max_scale, +max_scale]`.
    ///
    /// A depth weight of exactly 0 short-circuits to
    /// [`Displacement::NEUTRAL`]: the flattest layer never moves, and a
    /// missing depth map (weight forced to 0) yields no reaction at all.
    #[tracing::instrument(skip(self, sample))]
    pub fn displacement(
        &self,
        sample: &PointerSample,
        depth_weight: f64,
    ) -> DriftResult<Displacement> {
        self.validate()?;
        if !depth_weight.is_finite() || depth_weight < 0.0 {
            return Err(DriftError::validation(format!(
                "depth weight must be finite and >= 0, got {depth_weight}"
            )));
        }
        if depth_weight == 0.0 {
            return Ok(Displacement::NEUTRAL);
        }

        let centered = centered_px(sample);
        let mut offset = match self.gain {
            // center - pointer, in pixels, divided down.
            Gain::PixelDivisor(sensitivity) => -centered * depth_weight / sensitivity,
            // pointer - center, normalized, amplified.
            Gain::Amplitude(amplitude) => {
                Vec2::new(sample.uv.x - 0.5, sample.uv.y - 0.5) * depth_weight * amplitude
            }
        };

        if let Some(falloff) = &self.falloff {
            offset = offset * falloff.factor(sample);
        }

        Ok(Displacement::translation(
            offset.x.clamp(-self.max_scale, self.max_scale),
            offset.y.clamp(-self.max_scale, self.max_scale),
        ))
    }
}

/// Tilt derived from the unclamped centered pointer offset. Bounded on its
/// own range, separate from the translation clamp: layers may translate and
/// rotate on independent budgets.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TiltConfig {
    pub amplitude_deg: f64,
    pub max_deg: f64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            amplitude_deg: 20.0,
            max_deg: 20.0,
        }
    }
}

impl TiltConfig {
    pub fn validate(&self) -> DriftResult<()> {
        if !self.amplitude_deg.is_finite() || self.amplitude_deg < 0.0 {
            return Err(DriftError::validation("tilt amplitude must be >= 0"));
        }
        if !self.max_deg.is_finite() || self.max_deg < 0.0 {
            return Err(DriftError::validation("tilt bound must be >= 0"));
        }
        Ok(())
    }

    /// `(tilt_x_deg, tilt_y_deg)`: tilt around the x axis follows the
    /// vertical pointer offset, tilt around y follows the horizontal one.
    pub fn tilt(&self, sample: &PointerSample, depth_weight: f64) -> (f64, f64) {
        if depth_weight == 0.0 {
            return (0.0, 0.0);
        }
        let raw_x = (sample.uv.y - 0.5) * depth_weight * self.amplitude_deg;
        let raw_y = (sample.uv.x - 0.5) * depth_weight * self.amplitude_deg;
        (
            raw_x.clamp(-self.max_deg, self.max_deg),
            raw_y.clamp(-self.max_deg, self.max_deg),
        )
    }
}

/// Pixel offset of the clamped pointer position from the rect center.
///
/// Derived from the clamped `uv` rather than the raw pixel position, so
/// events outside the rect behave as if pinned to its edge.
fn centered_px(sample: &PointerSample) -> Vec2 {
    Vec2::new(
        (sample.uv.x - 0.5) * sample.rect.width(),
        (sample.uv.y - 0.5) * sample.rect.height(),
    )
}
