//! Integer trigonometry over a fixed-point angle domain.
//!
//! Angles are expressed in angle units where one full turn is 2^30 units.
//! Sine values are scaled so that 1.0 maps to `i32::MAX` (2^31 - 1).
//!
//! The quarter wave is evaluated with a Q61 fixed-point Taylor polynomial in
//! `i128`; the other three quadrants are obtained by reflection and
//! negation. Every step is integer arithmetic, so results are bit-identical
//! on every platform.

use crate::fixed::SCALE;

/// Angle units in one full turn.
pub const ANGLES_IN_CYCLE: i64 = 1 << 30;

/// Angle units in a quarter turn.
pub const QUARTER_CYCLE: i64 = ANGLES_IN_CYCLE >> 2;

/// Output amplitude: `sin` returns values in `[-MAX_AMPLITUDE, MAX_AMPLITUDE]`.
pub const MAX_AMPLITUDE: i64 = i32::MAX as i64;

const FRAC_BITS: u32 = 61;

/// pi/2 in Q61.
const HALF_PI_Q61: i128 = 3_622_009_729_038_561_421;

/// log2(QUARTER_CYCLE).
const QUARTER_BITS: u32 = 28;

/// Number of Taylor terms after the linear one; x^19/19! < 2^-61 on [0, pi/2].
const TAYLOR_TERMS: i128 = 9;

/// Sine of `angle` (angle units, any value, wraps modulo one turn).
pub fn sin(angle: i64) -> i64 {
    let angle = angle.rem_euclid(ANGLES_IN_CYCLE);
    let quadrant = angle / QUARTER_CYCLE;
    let mut offset = angle % QUARTER_CYCLE;
    if quadrant % 2 == 1 {
        offset = QUARTER_CYCLE - offset;
    }

    let magnitude = quarter_wave(offset);
    if quadrant >= 2 {
        -magnitude
    } else {
        magnitude
    }
}

/// Cosine of `angle` (angle units).
pub fn cos(angle: i64) -> i64 {
    sin(angle.wrapping_add(QUARTER_CYCLE))
}

/// Convert a fixed-point degree value into angle units, flooring.
pub fn degrees_to_angle(degrees: i64) -> i64 {
    let scaled = degrees as i128 * ANGLES_IN_CYCLE as i128;
    scaled.div_euclid(360 * SCALE as i128) as i64
}

/// sin(offset) for `offset` in `[0, QUARTER_CYCLE]`, scaled to `MAX_AMPLITUDE`.
fn quarter_wave(offset: i64) -> i64 {
    let x = (offset as i128 * HALF_PI_Q61) >> QUARTER_BITS;
    let x2 = (x * x) >> FRAC_BITS;

    let mut term = x;
    let mut sum = x;
    for k in 1..=TAYLOR_TERMS {
        term = -((term * x2) >> FRAC_BITS) / ((2 * k) * (2 * k + 1));
        sum += term;
    }

    let scaled = (sum * MAX_AMPLITUDE as i128 + (1 << (FRAC_BITS - 1))) >> FRAC_BITS;
    (scaled as i64).min(MAX_AMPLITUDE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angle_of(degrees: i64) -> i64 {
        degrees * ANGLES_IN_CYCLE / 360
    }

    fn as_unit(value: i64) -> f64 {
        value as f64 / MAX_AMPLITUDE as f64
    }

    #[test]
    fn test_sin_reference_angles() {
        for degrees in [10, 30, 45, 90, 200, 300] {
            let expected = (degrees as f64).to_radians().sin();
            let actual = as_unit(sin(angle_of(degrees)));
            assert!(
                (actual - expected).abs() < 1e-8,
                "sin({degrees}) = {actual}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_sin_exact_points() {
        assert_eq!(sin(0), 0);
        assert_eq!(sin(QUARTER_CYCLE), MAX_AMPLITUDE);
        assert_eq!(sin(2 * QUARTER_CYCLE), 0);
        assert_eq!(sin(3 * QUARTER_CYCLE), -MAX_AMPLITUDE);
        assert_eq!(sin(ANGLES_IN_CYCLE), 0);
    }

    #[test]
    fn test_sin_regression_values() {
        assert_eq!(sin(angle_of(30)), 1_073_741_820);
        assert_eq!(sin(angle_of(45)), 1_518_500_249);
        assert_eq!(sin(angle_of(200)), -734_482_658);
        assert_eq!(sin(angle_of(300)), -1_859_775_395);
    }

    #[test]
    fn test_sin_wraps() {
        let a = angle_of(37);
        assert_eq!(sin(a), sin(a + ANGLES_IN_CYCLE));
        assert_eq!(sin(a), sin(a - 3 * ANGLES_IN_CYCLE));
        assert_eq!(sin(-a), -sin(a));
        // total over the whole i64 domain
        let _ = sin(i64::MIN);
        let _ = sin(i64::MAX);
    }

    #[test]
    fn test_sin_within_one_unit() {
        let step = ANGLES_IN_CYCLE / 4093;
        for i in 0..4093 {
            let angle = i * step + 7;
            let radians = angle as f64 / ANGLES_IN_CYCLE as f64 * std::f64::consts::TAU;
            let expected = radians.sin() * MAX_AMPLITUDE as f64;
            let actual = sin(angle) as f64;
            assert!(
                (actual - expected).abs() <= 1.0,
                "angle {angle}: {actual} vs {expected}"
            );
        }
    }

    #[test]
    fn test_cos() {
        assert_eq!(cos(0), MAX_AMPLITUDE);
        assert_eq!(cos(QUARTER_CYCLE), 0);
        let a = angle_of(60);
        assert!((as_unit(cos(a)) - 0.5).abs() < 1e-8);
    }

    #[test]
    fn test_degrees_to_angle() {
        assert_eq!(degrees_to_angle(90 * SCALE), QUARTER_CYCLE);
        assert_eq!(degrees_to_angle(360 * SCALE), ANGLES_IN_CYCLE);
        assert_eq!(degrees_to_angle(-90 * SCALE), -QUARTER_CYCLE);
        // floor for values between angle units
        assert_eq!(degrees_to_angle(-1), -1);
        assert_eq!(degrees_to_angle(1), 0);
    }
}
