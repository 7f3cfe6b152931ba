//! Downward compressor.
//!
//! Based on the README of <https://github.com/p-hlp/CTAGDRC>.

use crate::gain_computer::{Curve, GainComputer};
use crate::math;
use crate::parameters::{Attributes, Topology};
use crate::processor::{Processor, Profile};

pub type Compressor = Processor<Compression>;

/// Reduce gain of signal above threshold.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Compression;

impl Profile for Compression {
    const CURVE: Curve = Curve::Compression;
    const FLOOR: f32 = 1.0e-5; // -100 dB
    const NEUTRAL: f32 = 0.0;
    const FEED_BACK: bool = true;

    fn default_attributes() -> Attributes {
        Attributes {
            ratio: 4.0,
            threshold: -12.0,
            knee: 6.0,
            attack: 10.0,
            release: 100.0,
            makeup: 0.0,
            mix: 1.0,
            topology: Topology::FeedForward,
        }
    }

    fn target(gain_computer: &GainComputer, level_db: f32, _floor_db: f32) -> f32 {
        gain_computer.gain_db(level_db)
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

impl Processor<Compression> {
    /// Gain currently applied on the first channel, in decibels. Zero or
    /// negative.
    #[must_use]
    pub fn gain_reduction(&self) -> f32 {
        self.meter()
    }
}
