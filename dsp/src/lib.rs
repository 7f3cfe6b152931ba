//! Dynamic range processors that must run in real-time.
//!
//! All of them share one skeleton: detect level, map it through a soft-knee
//! curve, smooth the result with attack and release ballistics and apply
//! it as gain.
//!
//! * [`compressor::Compressor`] reduces gain above a threshold.
//! * [`gate::Gate`] reduces gain below a threshold.
//! * [`lifter::Lifter`] adds gain below a range.

#![cfg_attr(not(test), no_std)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate approx;

mod log;
mod math;

pub mod ballistics;
pub mod compressor;
pub mod detector;
pub mod envelope_follower;
pub mod gain_computer;
pub mod gate;
pub mod lifter;
pub mod parameters;
pub mod processor;

pub use math::{db_to_gain, gain_to_db};
