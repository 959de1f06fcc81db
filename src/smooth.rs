use crate::{
    core::{Displacement, Vec2},
    error::{DriftError, DriftResult},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Displacement {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            dx: f64::lerp(&a.dx, &b.dx, t),
            dy: f64::lerp(&a.dy, &b.dy, t),
            tilt_x_deg: f64::lerp(&a.tilt_x_deg, &b.tilt_x_deg, t),
            tilt_y_deg: f64::lerp(&a.tilt_y_deg, &b.tilt_y_deg, t),
        }
    }
}

/// Exponential convergence of an actual value toward a target, one step per
/// render tick.
///
/// `current += (target - current) * alpha`, per component. There is no
/// velocity term, so convergence is monotone and cannot overshoot for any
/// `alpha` in (0,1]. Stepping is tick-coupled, not wall-clock-coupled; ticks
/// arriving at uneven intervals produce slightly uneven easing, which is
/// accepted.
///
/// Each animated quantity owns exactly one `Smoother`; they are never shared
/// across backends.
#[derive(Clone, Debug)]
pub struct Smoother<T: Lerp + Clone> {
    current: T,
    alpha: f64,
}

impl<T: Lerp + Clone> Smoother<T> {
    /// `alpha` closer to 1 is snappier, closer to 0 is smoother. Values
    /// outside (0,1] would stall or oscillate and are rejected.
    pub fn new(initial: T, alpha: f64) -> DriftResult<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(DriftError::validation(format!(
                "smoothing alpha must be in (0,1], got {alpha}"
            )));
        }
        Ok(Self {
            current: initial,
            alpha,
        })
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Advance one tick toward `target` and return the updated value.
    pub fn step(&mut self, target: &T) -> &T {
        self.current = T::lerp(&self.current, target, self.alpha);
        &self.current
    }

    /// Hard reset, bypassing easing. Used on pointer-leave and load failure,
    /// where the contract requires the neutral state immediately.
    pub fn snap(&mut self, value: T) {
        self.current = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_alpha_out_of_range() {
        assert!(Smoother::new(0.0f64, 0.0).is_err());
        assert!(Smoother::new(0.0f64, -0.5).is_err());
        assert!(Smoother::new(0.0f64, 1.5).is_err());
        assert!(Smoother::new(0.0f64, f64::NAN).is_err());
        assert!(Smoother::new(0.0f64, 1.0).is_ok());
    }

    #[test]
    fn fixed_point_is_idempotent() {
        let mut s = Smoother::new(3.5f64, 0.2).unwrap();
        s.step(&3.5);
        assert_eq!(*s.current(), 3.5);
    }

    #[test]
    fn converges_without_overshoot() {
        let target = 10.0f64;
        for alpha in [0.05, 0.1, 0.5, 1.0] {
            let mut s = Smoother::new(0.0f64, alpha).unwrap();
            let mut prev = 0.0f64;
            for _ in 0..400 {
                let cur = *s.step(&target);
                assert!(cur >= prev, "must approach monotonically");
                assert!(cur <= target, "must not overshoot");
                prev = cur;
            }
            assert!((target - prev).abs() < 1e-3, "alpha={alpha} got {prev}");
        }
    }

    #[test]
    fn alpha_one_snaps_in_a_single_step() {
        let mut s = Smoother::new(Vec2::ZERO, 1.0).unwrap();
        s.step(&Vec2::new(-4.0, 2.0));
        assert_eq!(*s.current(), Vec2::new(-4.0, 2.0));
    }

    #[test]
    fn snap_overrides_history() {
        let mut s = Smoother::new(Displacement::translation(5.0, 5.0), 0.1).unwrap();
        s.step(&Displacement::translation(9.0, 9.0));
        s.snap(Displacement::NEUTRAL);
        assert!(s.current().is_neutral());
    }

    #[test]
    fn displacement_lerp_covers_tilt() {
        let a = Displacement::NEUTRAL;
        let b = Displacement {
            dx: 2.0,
            dy: -2.0,
            tilt_x_deg: 10.0,
            tilt_y_deg: -10.0,
        };
        let mid = Displacement::lerp(&a, &b, 0.5);
        assert_eq!(mid.dx, 1.0);
        assert_eq!(mid.dy, -1.0);
        assert_eq!(mid.tilt_x_deg, 5.0);
        assert_eq!(mid.tilt_y_deg, -5.0);
    }
}
