//! Upward compressor, lifting quiet passages towards the range.
//!
//! Unlike the compressor and the gate, the envelope is smoothed as a linear
//! gain factor.

use crate::gain_computer::{Curve, GainComputer};
use crate::math;
use crate::parameters::{Attributes, Topology};
use crate::processor::{Processor, Profile};

/// Highest gain factor the lifter may apply, +40 dB.
pub const LIFT_CEILING: f32 = 100.0;

pub type Lifter = Processor<Lift>;

/// Add gain to signal below range.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lift;

impl Profile for Lift {
    const CURVE: Curve = Curve::Lift;
    const FLOOR: f32 = 1.0e-5; // -100 dB
    const NEUTRAL: f32 = 1.0;
    const FEED_BACK: bool = true;

    fn default_attributes() -> Attributes {
        Attributes {
            ratio: 4.0,
            threshold: -40.0,
            knee: 6.0,
            attack: 10.0,
            release: 100.0,
            makeup: 0.0,
            mix: 1.0,
            topology: Topology::FeedForward,
        }
    }

    fn target(gain_computer: &GainComputer, level_db: f32, floor_db: f32) -> f32 {
        // Digital silence is left alone instead of being lifted into noise.
        if level_db <= floor_db {
            return Self::NEUTRAL;
        }
        f32::min(math::db_to_gain(gain_computer.gain_db(level_db)), LIFT_CEILING)
    }

    fn is_attacking(target: f32, current: f32) -> bool {
        target > current
    }

    fn envelope_to_gain(envelope: f32) -> f32 {
        envelope
    }

    fn envelope_to_db(envelope: f32) -> f32 {
        math::gain_to_db(f32::max(envelope, Self::FLOOR))
    }
}

impl Processor<Lift> {
    /// Gain currently added on the first channel, in decibels. Zero or
    /// positive.
    #[must_use]
    pub fn gain_addition(&self) -> f32 {
        self.meter()
    }

    /// Level in decibels under which the signal gets lifted.
    pub fn set_range(&mut self, range: f32) {
        self.set_threshold(range);
    }

    #[must_use]
    pub fn range(&self) -> f32 {
        self.threshold()
    }
}
