//! Asymmetric one-pole smoothing of the gain envelope.
//!
//! The coefficient for a time constant `t` at sample rate `fs` is
//! `exp(-1 / (fs * t))`, the envelope covering ~63 % of a step after `t`
//! and settling within 1 % after five time constants.

use libm::expf;

/// Attack and release coefficients derived from their time constants.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ballistics {
    sample_rate: f32,
    attack: f32,
    release: f32,
    attack_coefficient: f32,
    release_coefficient: f32,
}

impl Ballistics {
    /// Times are in milliseconds.
    #[must_use]
    pub fn new(sample_rate: f32, attack: f32, release: f32) -> Self {
        Self {
            sample_rate,
            attack,
            release,
            attack_coefficient: time_coefficient(sample_rate, attack),
            release_coefficient: time_coefficient(sample_rate, release),
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.attack_coefficient = time_coefficient(sample_rate, self.attack);
        self.release_coefficient = time_coefficient(sample_rate, self.release);
    }

    pub fn set_attack(&mut self, attack: f32) {
        self.attack = attack;
        self.attack_coefficient = time_coefficient(self.sample_rate, attack);
    }

    pub fn set_release(&mut self, release: f32) {
        self.release = release;
        self.release_coefficient = time_coefficient(self.sample_rate, release);
    }

    /// Move `current` towards `target`, using the attack coefficient when
    /// the target is heading to a more extreme gain.
    #[must_use]
    pub fn smooth(&self, current: f32, target: f32, attacking: bool) -> f32 {
        let alpha = if attacking {
            self.attack_coefficient
        } else {
            self.release_coefficient
        };
        alpha * current + (1.0 - alpha) * target
    }

    #[must_use]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    #[must_use]
    pub fn attack(&self) -> f32 {
        self.attack
    }

    #[must_use]
    pub fn release(&self) -> f32 {
        self.release
    }

    #[must_use]
    pub fn attack_coefficient(&self) -> f32 {
        self.attack_coefficient
    }

    #[must_use]
    pub fn release_coefficient(&self) -> f32 {
        self.release_coefficient
    }
}

/// One-pole decay coefficient for a time constant given in milliseconds.
#[must_use]
pub fn time_coefficient(sample_rate: f32, time: f32) -> f32 {
    expf(-1.0 / (sample_rate * time * 0.001))
}
