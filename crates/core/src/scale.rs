//! Range mapping for unit-interval draws.

/// Maps a unit draw in `[0, 1)` linearly onto `[min, max)`.
pub fn scale_unit(unit: f64, min: f64, max: f64) -> f64 {
    debug_assert!((0.0..1.0).contains(&unit));
    debug_assert!(min <= max);
    min + unit * (max - min)
}

/// Maps a unit draw in `[0, 1)` onto the inclusive integer range
/// `[min, max]`, each value equally likely.
pub fn scale_unit_to_int(unit: f64, min: i64, max: i64) -> i64 {
    debug_assert!((0.0..1.0).contains(&unit));
    debug_assert!(min <= max);
    let span = (max - min + 1) as f64;
    min + (unit * span) as i64
}
