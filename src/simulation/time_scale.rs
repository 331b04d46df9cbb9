//! Caller-side time scaling
//!
//! The core has no notion of wall-clock time. A frame driver multiplies its
//! wall-clock delta by a `TimeScale` before calling `System::tick`.

/// Simulated seconds per wall-clock second
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    multiplier: f64,
}

impl TimeScale {
    /// One simulated second per second
    pub const MIN: f64 = 1.0;
    /// One simulated year per second
    pub const MAX: f64 = 86400.0 * 365.0;
    /// One simulated day per second
    pub const DEFAULT: f64 = 86400.0;

    /// Clamped to `[MIN, MAX]`; NaN falls back to the default
    pub fn new(multiplier: f64) -> Self {
        Self {
            multiplier: bounded(multiplier, Self::DEFAULT),
        }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Multiply the scale by `factor`, clamped to `[MIN, MAX]`.
    /// A NaN product leaves the scale unchanged.
    pub fn change(&mut self, factor: f64) {
        self.multiplier = bounded(self.multiplier * factor, self.multiplier);
    }

    /// Simulated seconds covered by a wall-clock step of `wall_dt`
    pub fn scaled(&self, wall_dt: f64) -> f64 {
        wall_dt * self.multiplier
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

fn bounded(multiplier: f64, fallback: f64) -> f64 {
    if multiplier.is_nan() {
        fallback
    } else {
        multiplier.clamp(TimeScale::MIN, TimeScale::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_is_clamped() {
        let mut scale = TimeScale::default();
        scale.change(2.0);
        assert_eq!(scale.multiplier(), 172800.0);

        scale.change(1e9);
        assert_eq!(scale.multiplier(), TimeScale::MAX);

        scale.change(1e-20);
        assert_eq!(scale.multiplier(), TimeScale::MIN);
    }

    #[test]
    fn nan_never_reaches_the_multiplier() {
        assert_eq!(TimeScale::new(f64::NAN).multiplier(), TimeScale::DEFAULT);
        assert_eq!(TimeScale::new(f64::INFINITY).multiplier(), TimeScale::MAX);

        let mut scale = TimeScale::new(3600.0);
        scale.change(f64::NAN);
        assert_eq!(scale.multiplier(), 3600.0);
        scale.change(f64::INFINITY);
        assert_eq!(scale.multiplier(), TimeScale::MAX);
    }

    #[test]
    fn scales_wall_clock_step() {
        let scale = TimeScale::new(3600.0);
        assert_eq!(scale.scaled(0.5), 1800.0);
    }
}
