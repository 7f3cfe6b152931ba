//! Shared skeleton of all dynamics processors.
//!
//! Every sample of every channel passes through the same chain:
//!
//! ```text
//!   key ──> [ LevelDetector ] ──> [ GainComputer ] ──> [ Ballistics ] ──+
//!    A                                                                   |
//!    | (feed-back: input scaled by the previous envelope)                V
//! input ─────────────────────────────────────────────> (x gain) ──> dry/wet ──> output
//! ```
//!
//! What differs between a compressor, a gate and a lifter is captured by a
//! [`Profile`]: the curve, the detector floor and the domain the envelope
//! is smoothed in.

use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::ballistics::Ballistics;
use crate::detector::LevelDetector;
use crate::gain_computer::{Curve, GainComputer};
use crate::log;
use crate::math;
use crate::parameters::{
    Attributes, Topology, CENTER_RANGE, KNEE_RANGE, MAKEUP_RANGE, MIX_RANGE, RATIO_RANGE,
    TIME_RANGE,
};

/// Sample rate assumed until `prepare` is called.
pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;

/// Configuration of a processor family.
pub trait Profile {
    const CURVE: Curve;

    /// Linear magnitude under which the detector treats input as silence.
    const FLOOR: f32;

    /// Envelope value applying no gain change.
    const NEUTRAL: f32;

    /// Whether the detector may observe the processed signal. Profiles
    /// whose reduction can drop the detected level below the threshold
    /// would never recover, so they stay feed-forward.
    const FEED_BACK: bool;

    fn default_attributes() -> Attributes;

    /// Translate the curve's gain for the given level into the domain the
    /// envelope is smoothed in.
    fn target(gain_computer: &GainComputer, level_db: f32, floor_db: f32) -> f32;

    /// Whether moving from `current` to `target` is heading to more extreme
    /// gain, and therefore should use the attack time.
    fn is_attacking(target: f32, current: f32) -> bool;

    fn envelope_to_gain(envelope: f32) -> f32;

    fn envelope_to_db(envelope: f32) -> f32;
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    InvalidSampleRate,
}

/// # Errors
///
/// Returns `Error::InvalidSampleRate` when the sample rate is not a
/// positive finite number.
pub(crate) fn check_sample_rate(sample_rate: f32) -> Result<(), Error> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        log::warning!("Rejecting sample_rate={}", sample_rate);
        Err(Error::InvalidSampleRate)
    }
}

/// Dynamics processor with per-channel envelopes.
///
/// A single instance is meant to be driven by one audio thread. Parameter
/// changes coming from elsewhere are applied between blocks through the
/// setters or [`Processor::set_attributes`].
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Processor<P: Profile> {
    detector: LevelDetector,
    gain_computer: GainComputer,
    ballistics: Ballistics,
    topology: Topology,
    makeup: f32,
    makeup_gain: f32,
    mix: f32,
    envelopes: Vec<f32>,
    mismatch_reported: bool,
    profile: PhantomData<P>,
}

impl<P: Profile> Default for Processor<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Profile> Processor<P> {
    /// Create a processor with the profile's default attributes, no
    /// channels and [`DEFAULT_SAMPLE_RATE`].
    #[must_use]
    pub fn new() -> Self {
        let attributes = P::default_attributes();
        let mut processor = Self {
            detector: LevelDetector::new(P::FLOOR),
            gain_computer: GainComputer::new(P::CURVE, 0.0, 0.0, 1.0),
            ballistics: Ballistics::new(DEFAULT_SAMPLE_RATE, attributes.attack, attributes.release),
            topology: Topology::default(),
            makeup: 0.0,
            makeup_gain: 1.0,
            mix: 1.0,
            envelopes: Vec::new(),
            mismatch_reported: false,
            profile: PhantomData,
        };
        processor.set_attributes(attributes);
        processor
    }

    /// Set the sample rate and channel layout, resetting all envelopes.
    ///
    /// This allocates and must not run concurrently with processing.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSampleRate` when the sample rate is not a
    /// positive finite number. The processor is left untouched.
    pub fn prepare(&mut self, sample_rate: f32, channels: usize) -> Result<(), Error> {
        check_sample_rate(sample_rate)?;

        self.ballistics.set_sample_rate(sample_rate);
        self.envelopes.clear();
        self.envelopes.resize(channels, P::NEUTRAL);
        self.mismatch_reported = false;

        Ok(())
    }

    pub fn reset(&mut self) {
        self.envelopes.fill(P::NEUTRAL);
    }

    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.set_ratio(attributes.ratio);
        self.set_threshold(attributes.threshold);
        self.set_knee(attributes.knee);
        self.set_attack(attributes.attack);
        self.set_release(attributes.release);
        self.set_makeup(attributes.makeup);
        self.set_mix(attributes.mix);
        self.set_topology(attributes.topology);
    }

    #[must_use]
    pub fn attributes(&self) -> Attributes {
        Attributes {
            ratio: self.ratio(),
            threshold: self.threshold(),
            knee: self.knee(),
            attack: self.attack(),
            release: self.release(),
            makeup: self.makeup(),
            mix: self.mix(),
            topology: self.topology(),
        }
    }

    pub fn set_ratio(&mut self, ratio: f32) {
        self.gain_computer.set_ratio(math::clamp(ratio, RATIO_RANGE));
    }

    /// Threshold in decibels, the range of a lifter.
    pub fn set_threshold(&mut self, threshold: f32) {
        self.gain_computer
            .set_center(math::clamp(threshold, CENTER_RANGE));
    }

    pub fn set_knee(&mut self, knee: f32) {
        self.gain_computer.set_knee(math::clamp(knee, KNEE_RANGE));
    }

    /// Attack time in milliseconds.
    pub fn set_attack(&mut self, attack: f32) {
        self.ballistics.set_attack(math::clamp(attack, TIME_RANGE));
    }

    /// Release time in milliseconds.
    pub fn set_release(&mut self, release: f32) {
        self.ballistics.set_release(math::clamp(release, TIME_RANGE));
    }

    /// Makeup gain in decibels.
    pub fn set_makeup(&mut self, makeup: f32) {
        self.makeup = math::clamp(makeup, MAKEUP_RANGE);
        self.makeup_gain = math::db_to_gain(self.makeup);
    }

    /// Portion of the processed signal in the output, between 0.0 and 1.0.
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = math::clamp(mix, MIX_RANGE);
    }

    /// Profiles without feed-back support stay feed-forward.
    pub fn set_topology(&mut self, topology: Topology) {
        self.topology = if P::FEED_BACK {
            topology
        } else {
            Topology::FeedForward
        };
    }

    pub fn set_feed_forward(&mut self, feed_forward: bool) {
        self.set_topology(feed_forward.into());
    }

    /// Process a channel-major buffer in place.
    pub fn process(&mut self, buffer: &mut [&mut [f32]]) {
        self.process_with_sidechain(buffer, &[]);
    }

    /// Process a channel-major buffer in place, detecting level on the
    /// sidechain instead of the buffer.
    ///
    /// A sidechain with fewer channels than the buffer feeds the remaining
    /// channels from its last channel, so a mono key drives all of them.
    /// Samples past the end of a sidechain channel, as well as an empty
    /// sidechain, fall back to detecting the processed signal itself.
    pub fn process_with_sidechain(&mut self, buffer: &mut [&mut [f32]], sidechain: &[&[f32]]) {
        self.ensure_channels(buffer.len());

        for (i, channel) in buffer.iter_mut().enumerate() {
            let keys = sidechain.get(i).or_else(|| sidechain.last()).copied().unwrap_or(&[]);
            let mut envelope = self.envelopes[i];
            for (j, x) in channel.iter_mut().enumerate() {
                let key = keys.get(j).copied().unwrap_or(*x);
                let (y, next_envelope) = self.tick(*x, key, envelope);
                *x = y;
                envelope = next_envelope;
            }
            self.envelopes[i] = envelope;
        }
    }

    #[inline]
    fn tick(&self, x: f32, key: f32, envelope: f32) -> (f32, f32) {
        // Feed-back estimates the previous output from the envelope before
        // this sample's update. It lags by one sample behind true feedback.
        let key = match self.topology {
            Topology::FeedForward => key,
            Topology::FeedBack => key * self.applied_gain(envelope),
        };

        let level = self.detector.level_db(key);
        let target = P::target(&self.gain_computer, level, self.detector.floor_db());
        let envelope = self
            .ballistics
            .smooth(envelope, target, P::is_attacking(target, envelope));

        let wet = x * self.applied_gain(envelope);
        (wet * self.mix + x * (1.0 - self.mix), envelope)
    }

    fn applied_gain(&self, envelope: f32) -> f32 {
        P::envelope_to_gain(envelope) * self.makeup_gain
    }

    fn ensure_channels(&mut self, channels: usize) {
        if self.envelopes.len() == channels {
            return;
        }

        if !self.mismatch_reported {
            log::warning!(
                "Resizing envelopes from channels={} to channels={}, prepare was not called",
                self.envelopes.len(),
                channels
            );
            self.mismatch_reported = true;
        }
        self.envelopes.resize(channels, P::NEUTRAL);
    }

    /// Static curve of the processor, in decibels, for drawing and tests.
    #[must_use]
    pub fn curve_gain(&self, level_db: f32) -> f32 {
        P::envelope_to_db(P::target(
            &self.gain_computer,
            level_db,
            self.detector.floor_db(),
        ))
    }

    /// Smoothed gain of the given channel in decibels.
    #[must_use]
    pub fn envelope_db(&self, channel: usize) -> Option<f32> {
        self.envelopes.get(channel).map(|e| P::envelope_to_db(*e))
    }

    pub(crate) fn meter(&self) -> f32 {
        self.envelope_db(0).unwrap_or(0.0)
    }

    #[must_use]
    pub fn channels(&self) -> usize {
        self.envelopes.len()
    }

    #[must_use]
    pub fn sample_rate(&self) -> f32 {
        self.ballistics.sample_rate()
    }

    #[must_use]
    pub fn ratio(&self) -> f32 {
        self.gain_computer.ratio()
    }

    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.gain_computer.center()
    }

    #[must_use]
    pub fn knee(&self) -> f32 {
        self.gain_computer.knee()
    }

    #[must_use]
    pub fn attack(&self) -> f32 {
        self.ballistics.attack()
    }

    #[must_use]
    pub fn release(&self) -> f32 {
        self.ballistics.release()
    }

    #[must_use]
    pub fn makeup(&self) -> f32 {
        self.makeup
    }

    #[must_use]
    pub fn mix(&self) -> f32 {
        self.mix
    }

    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }
}
