//! User-facing parameters of dynamics processors and their valid ranges.

pub const RATIO_RANGE: (f32, f32) = (1.0, 100.0);

/// Threshold of compressor and gate, range of lifter, in decibels.
pub const CENTER_RANGE: (f32, f32) = (-160.0, 24.0);

// The lower bound is further raised by the gain computer to a minimal knee.
pub const KNEE_RANGE: (f32, f32) = (0.0, 60.0);

/// Attack and release in milliseconds.
pub const TIME_RANGE: (f32, f32) = (0.01, 10_000.0);

pub const MAKEUP_RANGE: (f32, f32) = (-60.0, 60.0);

pub const MIX_RANGE: (f32, f32) = (0.0, 1.0);

/// Which signal the level detector observes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Topology {
    /// Detect the input before gain is applied.
    #[default]
    FeedForward,
    /// Detect an estimate of the output, the input scaled by the gain of
    /// the previous sample.
    FeedBack,
}

impl From<bool> for Topology {
    fn from(feed_forward: bool) -> Self {
        if feed_forward {
            Self::FeedForward
        } else {
            Self::FeedBack
        }
    }
}

/// Complete set of parameters, passed from the control loop to the
/// processor in one piece.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Attributes {
    pub ratio: f32,
    /// Threshold in decibels, range for the lifter.
    pub threshold: f32,
    /// Knee width in decibels.
    pub knee: f32,
    /// Attack in milliseconds.
    pub attack: f32,
    /// Release in milliseconds.
    pub release: f32,
    /// Makeup gain in decibels.
    pub makeup: f32,
    /// Portion of the processed signal, 0.0 is dry and 1.0 fully wet.
    pub mix: f32,
    pub topology: Topology,
}
