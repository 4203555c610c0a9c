//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 to the nearest integer and clamp it into `[floor, u32::MAX]`.
/// Non-finite values collapse to `floor`.
#[must_use]
pub fn round_f64_to_u32_floored(value: f64, floor: u32) -> u32 {
    if !value.is_finite() {
        return floor;
    }
    let min = f64::from(floor);
    let max = f64::from(u32::MAX);
    let clamped = value.round().clamp(min, max);
    cast::<f64, u32>(clamped).unwrap_or(floor)
}

/// Round a non-negative f64 to the nearest u64, saturating at the bounds and
/// returning 0 for NaN.
#[must_use]
pub fn round_f64_to_u64(value: f64) -> u64 {
    if value.is_nan() {
        return 0;
    }
    let max = cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX);
    let clamped = value.round().clamp(0.0, max);
    cast::<f64, u64>(clamped).unwrap_or(u64::MAX)
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(f64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floored_rounding_respects_floor() {
        assert_eq!(round_f64_to_u32_floored(0.2, 1), 1);
        assert_eq!(round_f64_to_u32_floored(-40.0, 1), 1);
        assert_eq!(round_f64_to_u32_floored(f64::NAN, 1), 1);
        assert_eq!(round_f64_to_u32_floored(129.5, 1), 130);
        assert_eq!(round_f64_to_u32_floored(1e20, 1), u32::MAX);
    }

    #[test]
    fn u64_rounding_saturates() {
        assert_eq!(round_f64_to_u64(2.5), 3);
        assert_eq!(round_f64_to_u64(-3.0), 0);
        assert_eq!(round_f64_to_u64(f64::NAN), 0);
        assert_eq!(round_f64_to_u64(f64::INFINITY), u64::MAX);
    }
}
