//! Peak level detection in decibels.

use libm::fabsf;

use crate::math;

/// Convert a sample's magnitude into decibels, floored to avoid `log(0)`.
///
/// The detector does not care where the sample comes from. Processors feed
/// it either the signal they modulate or an external sidechain.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LevelDetector {
    floor: f32,
    floor_db: f32,
}

impl LevelDetector {
    /// Floor is a linear magnitude, e.g. `1.0e-5` for -100 dB.
    #[must_use]
    pub fn new(floor: f32) -> Self {
        Self {
            floor,
            floor_db: math::gain_to_db(floor),
        }
    }

    #[must_use]
    pub fn level_db(&self, x: f32) -> f32 {
        math::gain_to_db(f32::max(fabsf(x), self.floor))
    }

    /// Level reported for silence. Equal to `level_db(0.0)` bit for bit.
    #[must_use]
    pub fn floor_db(&self) -> f32 {
        self.floor_db
    }
}
