//! Downward expander, steep enough to serve as a noise gate.

use crate::gain_computer::{Curve, GainComputer};
use crate::math;
use crate::parameters::{Attributes, Topology};
use crate::processor::{Processor, Profile};

pub type Gate = Processor<Expansion>;

/// Reduce gain of signal below threshold.
///
/// The detector floor sits lower than the compressor's, so the gate can
/// tell apart quiet tails from true silence. It also bounds the reduction,
/// keeping the time needed to reopen the gate finite.
///
/// The gate is always feed-forward. A closed gate observing its own output
/// would only ever see signal below the threshold.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Expansion;

impl Profile for Expansion {
    const CURVE: Curve = Curve::Expansion;
    const FLOOR: f32 = 1.0e-6; // -120 dB
    const NEUTRAL: f32 = 0.0;
    const FEED_BACK: bool = false;

    fn default_attributes() -> Attributes {
        Attributes {
            ratio: 6.0,
            threshold: -80.0,
            knee: 9.0,
            attack: 10.0,
            release: 10.0,
            makeup: 0.0,
            mix: 1.0,
            topology: Topology::FeedForward,
        }
    }

    fn target(gain_computer: &GainComputer, level_db: f32, floor_db: f32) -> f32 {
        f32::max(gain_computer.gain_db(level_db), floor_db)
    }

    fn is_attacking(target: f32, current: f32) -> bool {
        target < current
    }

    fn envelope_to_gain(envelope: f32) -> f32 {
        math::db_to_gain(envelope)
    }

    fn envelope_to_db(envelope: f32) -> f32 {
        envelope
    }
}

impl Processor<Expansion> {
    /// Gain currently applied on the first channel, in decibels. Zero or
    /// negative.
    #[must_use]
    pub fn gain_reduction(&self) -> f32 {
        self.meter()
    }
}
