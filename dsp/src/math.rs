use libm::{log10f, powf};

#[must_use]
pub fn db_to_gain(db: f32) -> f32 {
    powf(10.0, db / 20.0)
}

/// Caller is responsible for keeping `gain` above zero.
#[must_use]
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * log10f(gain)
}

/// Clamp into the range, mapping NaN to its lower bound.
pub(crate) fn clamp(value: f32, range: (f32, f32)) -> f32 {
    if value.is_nan() {
        range.0
    } else {
        value.clamp(range.0, range.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_between_decibels_and_gain_matches_known_points() {
        assert_relative_eq!(db_to_gain(0.0), 1.0);
        assert_relative_eq!(db_to_gain(-20.0), 0.1, epsilon = 1e-6);
        assert_relative_eq!(db_to_gain(6.0), 1.995_262_3, epsilon = 1e-5);
        assert_relative_eq!(gain_to_db(0.5), -6.020_6, epsilon = 1e-3);
        assert_relative_eq!(gain_to_db(db_to_gain(-42.0)), -42.0, epsilon = 1e-4);
    }

    #[test]
    fn clamping_handles_out_of_range_and_nan() {
        assert_relative_eq!(clamp(5.0, (0.0, 1.0)), 1.0);
        assert_relative_eq!(clamp(-5.0, (0.0, 1.0)), 0.0);
        assert_relative_eq!(clamp(0.3, (0.0, 1.0)), 0.3);
        assert_relative_eq!(clamp(f32::NAN, (0.5, 1.0)), 0.5);
        assert_relative_eq!(clamp(f32::INFINITY, (0.5, 1.0)), 1.0);
    }
}
