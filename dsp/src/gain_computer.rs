//! Static soft-knee curves mapping detected level to target gain.
//!
//! The knee is a quadratic segment joining the flat region with the slope
//! region. Its first derivative matches both neighbours at the knee
//! boundaries, so there is no audible corner while sweeping through it.

/// Smallest knee width, keeps the quadratic segment away from division by
/// zero while behaving as a hard knee.
pub const MIN_KNEE: f32 = 1.0e-3;

/// Shape of the static curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Curve {
    /// Reduce gain above the threshold.
    Compression,
    /// Reduce gain below the threshold.
    Expansion,
    /// Add gain below the range.
    Lift,
}

/// Memoryless level-to-gain mapping.
///
/// Gain is returned signed in decibels: never positive for compression
/// and expansion, never negative for lift.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GainComputer {
    curve: Curve,
    center: f32,
    knee: f32,
    ratio: f32,
    slope: f32,
    knee_start: f32,
    knee_end: f32,
}

impl GainComputer {
    #[must_use]
    pub fn new(curve: Curve, center: f32, knee: f32, ratio: f32) -> Self {
        let mut gain_computer = Self {
            curve,
            center,
            knee: MIN_KNEE,
            ratio: 1.0,
            slope: 0.0,
            knee_start: center,
            knee_end: center,
        };
        gain_computer.set_ratio(ratio);
        gain_computer.set_knee(knee);
        gain_computer
    }

    /// Expects a ratio of at least 1.0, callers clamp.
    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio;
        self.slope = match self.curve {
            Curve::Compression | Curve::Lift => 1.0 - 1.0 / ratio,
            Curve::Expansion => ratio - 1.0,
        };
    }

    /// Threshold for compression and expansion, range for lift.
    pub fn set_center(&mut self, center: f32) {
        self.center = center;
        self.update_knee_range();
    }

    pub fn set_knee(&mut self, knee: f32) {
        self.knee = f32::max(knee, MIN_KNEE);
        self.update_knee_range();
    }

    fn update_knee_range(&mut self) {
        let half = self.knee / 2.0;
        self.knee_start = self.center - half;
        self.knee_end = self.center + half;
    }

    #[must_use]
    pub fn gain_db(&self, level_db: f32) -> f32 {
        match self.curve {
            Curve::Compression => self.compression(level_db),
            Curve::Expansion => self.expansion(level_db),
            Curve::Lift => self.lift(level_db),
        }
    }

    fn compression(&self, level_db: f32) -> f32 {
        if level_db > self.knee_end {
            -(level_db - self.center) * self.slope
        } else if level_db > self.knee_start {
            let x = level_db - self.knee_start;
            -self.slope / (2.0 * self.knee) * x * x
        } else {
            0.0
        }
    }

    fn expansion(&self, level_db: f32) -> f32 {
        if level_db < self.knee_start {
            (level_db - self.center) * self.slope
        } else if level_db < self.knee_end {
            let x = level_db - self.knee_end;
            -self.slope / (2.0 * self.knee) * x * x
        } else {
            0.0
        }
    }

    fn lift(&self, level_db: f32) -> f32 {
        if level_db < self.knee_start {
            (self.center - level_db) * self.slope
        } else if level_db < self.knee_end {
            let x = self.knee_end - level_db;
            self.slope / (2.0 * self.knee) * x * x
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn curve(&self) -> Curve {
        self.curve
    }

    #[must_use]
    pub fn center(&self) -> f32 {
        self.center
    }

    #[must_use]
    pub fn knee(&self) -> f32 {
        self.knee
    }

    #[must_use]
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    #[must_use]
    pub fn knee_start(&self) -> f32 {
        self.knee_start
    }

    #[must_use]
    pub fn knee_end(&self) -> f32 {
        self.knee_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_continuous_at(gain_computer: &GainComputer, boundary: f32) {
        const EPSILON: f32 = 1.0e-3;
        let below = gain_computer.gain_db(boundary - EPSILON);
        let above = gain_computer.gain_db(boundary + EPSILON);
        let tolerance = 4.0 * EPSILON * f32::max(gain_computer.slope, 1.0) + 1.0e-3;
        assert!(
            (below - above).abs() <= tolerance,
            "jump at {boundary}: {below} vs {above}"
        );
    }

    #[test]
    fn given_compression_below_knee_it_leaves_gain_intact() {
        let gain_computer = GainComputer::new(Curve::Compression, -12.0, 6.0, 4.0);
        for level in [-100.0, -40.0, -15.001, -15.0] {
            assert_eq!(gain_computer.gain_db(level), 0.0);
        }
    }

    #[test]
    fn given_compression_above_knee_it_follows_the_ratio() {
        let gain_computer = GainComputer::new(Curve::Compression, -12.0, 6.0, 4.0);
        assert_relative_eq!(gain_computer.gain_db(0.0), -9.0);
        assert_relative_eq!(gain_computer.gain_db(-4.0), -6.0);
        assert_relative_eq!(gain_computer.gain_db(12.0), -18.0);
    }

    #[test]
    fn given_compression_inside_knee_it_bends_quadratically() {
        let gain_computer = GainComputer::new(Curve::Compression, -12.0, 6.0, 4.0);
        // Halfway through the knee, a quarter of the slope region's value at its end.
        assert_relative_eq!(gain_computer.gain_db(-12.0), -0.75 / 12.0 * 9.0);
        assert_relative_eq!(gain_computer.gain_db(-9.0), -2.25, epsilon = 1e-5);
    }

    #[test]
    fn given_expansion_above_knee_it_leaves_gain_intact() {
        let gain_computer = GainComputer::new(Curve::Expansion, -80.0, 9.0, 6.0);
        for level in [-75.5, -40.0, 0.0] {
            assert_eq!(gain_computer.gain_db(level), 0.0);
        }
    }

    #[test]
    fn given_expansion_below_knee_it_scales_the_distance_from_threshold() {
        let gain_computer = GainComputer::new(Curve::Expansion, -80.0, 9.0, 6.0);
        assert_relative_eq!(gain_computer.gain_db(-100.0), -100.0);
        assert_relative_eq!(gain_computer.gain_db(-90.0), -50.0);
    }

    #[test]
    fn given_lift_below_range_it_adds_gain() {
        let gain_computer = GainComputer::new(Curve::Lift, -40.0, 6.0, 4.0);
        assert_relative_eq!(gain_computer.gain_db(-60.0), 15.0);
        assert_eq!(gain_computer.gain_db(-37.0), 0.0);
        assert_eq!(gain_computer.gain_db(0.0), 0.0);
    }

    #[test]
    fn knee_boundaries_are_recomputed_together() {
        let mut gain_computer = GainComputer::new(Curve::Compression, -12.0, 6.0, 4.0);
        gain_computer.set_center(-20.0);
        assert_relative_eq!(gain_computer.knee_start(), -23.0);
        assert_relative_eq!(gain_computer.knee_end(), -17.0);
        gain_computer.set_knee(10.0);
        assert_relative_eq!(gain_computer.knee_start(), -25.0);
        assert_relative_eq!(gain_computer.knee_end(), -15.0);
    }

    #[test]
    fn given_zero_knee_it_acts_as_hard_knee_without_singularity() {
        let gain_computer = GainComputer::new(Curve::Compression, -12.0, 0.0, 4.0);
        assert!(gain_computer.knee() > 0.0);
        for level in [-12.001, -12.0, -11.999] {
            assert!(gain_computer.gain_db(level).is_finite());
        }
        assert_eq!(gain_computer.gain_db(-12.01), 0.0);
        assert_relative_eq!(gain_computer.gain_db(-11.0), -0.75);
    }

    proptest! {
        #[test]
        fn compression_knee_is_continuous(
            threshold in -60.0f32..0.0,
            knee in 0.1f32..30.0,
            ratio in 1.0f32..100.0,
        ) {
            let gain_computer = GainComputer::new(Curve::Compression, threshold, knee, ratio);
            assert_continuous_at(&gain_computer, gain_computer.knee_start());
            assert_continuous_at(&gain_computer, gain_computer.knee_end());
        }

        #[test]
        fn expansion_knee_is_continuous(
            threshold in -100.0f32..0.0,
            knee in 0.1f32..30.0,
            ratio in 1.0f32..100.0,
        ) {
            let gain_computer = GainComputer::new(Curve::Expansion, threshold, knee, ratio);
            assert_continuous_at(&gain_computer, gain_computer.knee_start());
            assert_continuous_at(&gain_computer, gain_computer.knee_end());
        }

        #[test]
        fn lift_knee_is_continuous(
            range in -80.0f32..0.0,
            knee in 0.1f32..30.0,
            ratio in 1.0f32..100.0,
        ) {
            let gain_computer = GainComputer::new(Curve::Lift, range, knee, ratio);
            assert_continuous_at(&gain_computer, gain_computer.knee_start());
            assert_continuous_at(&gain_computer, gain_computer.knee_end());
        }

        #[test]
        fn compression_matches_ratio_outside_knee(
            threshold in -60.0f32..0.0,
            knee in 0.0f32..30.0,
            ratio in 1.0f32..100.0,
            distance in 0.01f32..60.0,
        ) {
            let gain_computer = GainComputer::new(Curve::Compression, threshold, knee, ratio);
            let above = gain_computer.knee_end() + distance;
            let expected = (above - threshold) * (1.0 - 1.0 / ratio);
            prop_assert!((-gain_computer.gain_db(above) - expected).abs() <= 1.0e-3 * expected.max(1.0));
            let below = gain_computer.knee_start() - distance;
            prop_assert_eq!(gain_computer.gain_db(below), 0.0);
        }

        #[test]
        fn curves_never_change_sign(level in -140.0f32..20.0, ratio in 1.0f32..100.0) {
            let compression = GainComputer::new(Curve::Compression, -20.0, 6.0, ratio);
            let expansion = GainComputer::new(Curve::Expansion, -60.0, 6.0, ratio);
            let lift = GainComputer::new(Curve::Lift, -40.0, 6.0, ratio);
            prop_assert!(compression.gain_db(level) <= 0.0);
            prop_assert!(expansion.gain_db(level) <= 0.0);
            prop_assert!(lift.gain_db(level) >= 0.0);
        }
    }
}
