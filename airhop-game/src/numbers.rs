//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Ceil a f64 and clamp it to the i64 range, returning 0 for non-finite values.
#[must_use]
pub fn ceil_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).ceil();
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Whole minutes needed to cover `distance` at `speed` units per hour.
///
/// Returns `None` when the speed cannot move the player.
#[must_use]
pub fn flight_minutes(distance: f64, speed: i64) -> Option<i64> {
    if speed <= 0 {
        return None;
    }
    let hours = distance.max(0.0) / i64_to_f64(speed);
    Some(ceil_f64_to_i64(hours * crate::constants::MINUTES_PER_HOUR))
}
