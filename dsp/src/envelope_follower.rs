//! Peak envelope of a signal, for meters and modulation.

#[allow(unused_imports)]
use micromath::F32Ext as _;

use crate::ballistics::Ballistics;
use crate::math;
use crate::parameters::TIME_RANGE;
use crate::processor::{self, Error, DEFAULT_SAMPLE_RATE};

const DEFAULT_ATTACK: f32 = 10.0;
const DEFAULT_RELEASE: f32 = 100.0;

// Meters treat anything quieter as silence.
const FLOOR_DB: f32 = -96.0;

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnvelopeFollower {
    ballistics: Ballistics,
    envelope: f32,
}

impl EnvelopeFollower {
    /// An invalid sample rate is replaced by [`DEFAULT_SAMPLE_RATE`].
    #[must_use]
    pub fn new(sample_rate: f32) -> Self {
        let sample_rate = if processor::check_sample_rate(sample_rate).is_ok() {
            sample_rate
        } else {
            DEFAULT_SAMPLE_RATE
        };
        Self {
            ballistics: Ballistics::new(sample_rate, DEFAULT_ATTACK, DEFAULT_RELEASE),
            envelope: 0.0,
        }
    }

    /// Set the sample rate and reset the envelope.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSampleRate` when the sample rate is not a
    /// positive finite number. The follower is left untouched.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<(), Error> {
        processor::check_sample_rate(sample_rate)?;
        self.ballistics.set_sample_rate(sample_rate);
        self.envelope = 0.0;
        Ok(())
    }

    /// Attack time in milliseconds.
    pub fn set_attack(&mut self, attack: f32) {
        self.ballistics.set_attack(math::clamp(attack, TIME_RANGE));
    }

    /// Release time in milliseconds.
    pub fn set_release(&mut self, release: f32) {
        self.ballistics.set_release(math::clamp(release, TIME_RANGE));
    }

    pub fn tick(&mut self, x: f32) -> f32 {
        let target = x.abs();
        self.envelope = self
            .ballistics
            .smooth(self.envelope, target, target > self.envelope);
        self.envelope
    }

    /// Follow the loudest channel of a channel-major block.
    pub fn process(&mut self, buffer: &[&[f32]]) {
        let length = buffer.iter().map(|channel| channel.len()).max().unwrap_or(0);
        for i in 0..length {
            let peak = buffer
                .iter()
                .filter_map(|channel| channel.get(i))
                .fold(0.0, |a: f32, b| a.max(b.abs()));
            self.tick(peak);
        }
    }

    #[must_use]
    pub fn envelope(&self) -> f32 {
        self.envelope
    }

    #[must_use]
    pub fn envelope_db(&self) -> f32 {
        f32::max(math::gain_to_db(self.envelope), FLOOR_DB)
    }

    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }

    #[must_use]
    pub fn sample_rate(&self) -> f32 {
        self.ballistics.sample_rate()
    }

    #[must_use]
    pub fn attack(&self) -> f32 {
        self.ballistics.attack()
    }

    #[must_use]
    pub fn release(&self) -> f32 {
        self.ballistics.release()
    }
}
