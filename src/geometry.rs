//! Planar geometry primitives
//!
//! Rounding, line evaluation and polygon orientation. Everything here is a
//! pure function over `DVec2` positions.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::DegenerateEdgeError;

/// Quantized position used as a hash key for exact-match deduplication
pub type PositionKey = (i64, i64);

/// Rounding tolerance applied to every vertex position
///
/// Two positions are the same vertex exactly when they round to the same
/// value at this many decimal places.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    /// Number of decimal places kept
    pub decimals: u32,
}

impl Precision {
    /// Largest supported number of decimals; beyond this `i64` keys overflow
    /// for realistic coordinates.
    pub const MAX_DECIMALS: u32 = 12;

    /// Create a precision keeping `decimals` decimal places
    pub const fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    #[inline]
    fn scale(self) -> f64 {
        10f64.powi(self.decimals as i32)
    }

    /// Round a scalar to this precision
    #[inline]
    pub fn round(self, value: f64) -> f64 {
        let scale = self.scale();
        (value * scale).round() / scale
    }

    /// Round both coordinates of a position
    #[inline]
    pub fn round_point(self, p: DVec2) -> DVec2 {
        DVec2::new(self.round(p.x), self.round(p.y))
    }

    /// Quantized integer key of a position
    ///
    /// `key(a) == key(b)` if and only if `round_point(a) == round_point(b)`.
    /// Returns `None` when a coordinate is non-finite or too large to quantize
    /// into an `i64` at this precision.
    #[inline]
    pub fn key(self, p: DVec2) -> Option<PositionKey> {
        let scale = self.scale();
        Some((quantize(p.x * scale)?, quantize(p.y * scale)?))
    }

    /// Position represented by a quantized key
    #[inline]
    pub fn from_key(self, key: PositionKey) -> DVec2 {
        let scale = self.scale();
        DVec2::new(key.0 as f64 / scale, key.1 as f64 / scale)
    }
}

fn quantize(scaled: f64) -> Option<i64> {
    let rounded = scaled.round();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    (rounded.is_finite() && rounded.abs() < i64::MAX as f64).then_some(rounded as i64)
}

impl Default for Precision {
    fn default() -> Self {
        Precision::new(3)
    }
}

/// Winding of a closed polygon, from the sign of its shoelace area
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Positive signed area
    Clockwise,
    /// Negative signed area
    CounterClockwise,
    /// Zero area (collinear or collapsed polygon)
    Degenerate,
}

impl Orientation {
    /// Classify a signed area as returned by [`signed_area`]
    pub fn from_area(area: f64) -> Self {
        if area > 0.0 {
            Orientation::Clockwise
        } else if area < 0.0 {
            Orientation::CounterClockwise
        } else {
            Orientation::Degenerate
        }
    }

    /// Sign of the area: `1`, `-1` or `0`
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Orientation::Clockwise => 1,
            Orientation::CounterClockwise => -1,
            Orientation::Degenerate => 0,
        }
    }
}

/// Value at `x` of the line through `p0` and `p1`
///
/// Both points are rounded to `precision` first. Fails when the rounded
/// points share an x-coordinate, since the slope is then undefined.
pub fn line_value(
    p0: DVec2,
    p1: DVec2,
    x: f64,
    precision: Precision,
) -> Result<f64, DegenerateEdgeError> {
    let p0 = precision.round_point(p0);
    let p1 = precision.round_point(p1);

    if p0.x == p1.x {
        return Err(DegenerateEdgeError {
            x: p0.x,
            y0: p0.y,
            y1: p1.y,
        });
    }

    let slope = (p1.y - p0.y) / (p1.x - p0.x);
    Ok(p0.y + slope * (x - p0.x))
}

/// Signed area of a closed polygon (shoelace formula)
///
/// Computes `0.5 * (Σ xᵢ·yᵢ₋₁ − Σ yᵢ·xᵢ₋₁)` over the cyclic sequence.
/// Positive for clockwise winding, negative for counter-clockwise, zero for
/// degenerate polygons. Repeated consecutive points contribute nothing.
pub fn signed_area(points: &[DVec2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..n {
        let current = points[i];
        let previous = points[(i + n - 1) % n];
        sum += current.x * previous.y - current.y * previous.x;
    }

    0.5 * sum
}

/// `count` evenly spaced values from `start` to `end`, both inclusive
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|k| if k == count - 1 { end } else { start + step * k as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_rounding() {
        let precision = Precision::default();
        assert_eq!(precision.round(1.23456), 1.235);
        assert_eq!(precision.round(-0.0004), 0.0);
        assert_eq!(Precision::new(1).round(2.26), 2.3);
    }

    #[test]
    fn test_key_matches_rounded_equality() {
        let precision = Precision::default();
        let a = DVec2::new(0.50004, 1.99996);
        let b = DVec2::new(0.49996, 2.00004);
        assert_eq!(precision.key(a), precision.key(b));
        assert_eq!(precision.round_point(a), precision.round_point(b));
        assert_eq!(precision.from_key(precision.key(a).unwrap()), DVec2::new(0.5, 2.0));

        let c = DVec2::new(0.5006, 2.0);
        assert_ne!(precision.key(a), precision.key(c));
    }

    #[test]
    fn test_key_rejects_unquantizable_positions() {
        let precision = Precision::new(12);
        // 1e8 * 1e12 overflows i64
        assert_eq!(precision.key(DVec2::new(1e8, 0.0)), None);
        assert_eq!(precision.key(DVec2::new(0.0, -2e8)), None);
        assert_eq!(precision.key(DVec2::new(f64::NAN, 0.0)), None);
        assert_eq!(precision.key(DVec2::new(0.0, f64::INFINITY)), None);

        // Still fine at a coarser precision
        let coarse = Precision::default();
        assert_eq!(coarse.key(DVec2::new(1e8, 0.0)), Some((100_000_000_000, 0)));
    }

    #[test]
    fn test_line_value() {
        let p0 = DVec2::new(0.0, 1.0);
        let p1 = DVec2::new(2.0, 5.0);
        let precision = Precision::default();

        assert_eq!(line_value(p0, p1, 0.0, precision).unwrap(), 1.0);
        assert_eq!(line_value(p0, p1, 1.0, precision).unwrap(), 3.0);
        assert_eq!(line_value(p0, p1, 2.0, precision).unwrap(), 5.0);
    }

    #[test]
    fn test_line_value_vertical_is_error() {
        let p0 = DVec2::new(1.5, 0.5);
        let p1 = DVec2::new(1.5, 1.5);
        let err = line_value(p0, p1, 1.5, Precision::default()).unwrap_err();
        assert_eq!(err, DegenerateEdgeError { x: 1.5, y0: 0.5, y1: 1.5 });
    }

    #[test]
    fn test_line_value_vertical_after_rounding() {
        // Distinct x values that collapse at three decimals
        let p0 = DVec2::new(1.0001, 0.0);
        let p1 = DVec2::new(1.0002, 4.0);
        assert!(line_value(p0, p1, 1.0, Precision::default()).is_err());
        assert!(line_value(p0, p1, 1.0, Precision::new(4)).is_ok());
    }

    #[test]
    fn test_signed_area_orientation() {
        let ccw = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ];
        let cw: Vec<DVec2> = ccw.iter().rev().copied().collect();

        assert_eq!(signed_area(&ccw), -1.0);
        assert_eq!(signed_area(&cw), 1.0);
        assert_eq!(Orientation::from_area(signed_area(&ccw)), Orientation::CounterClockwise);
        assert_eq!(Orientation::from_area(signed_area(&cw)), Orientation::Clockwise);
    }

    #[test]
    fn test_signed_area_ignores_repeated_points() {
        let doubled = [
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 0.0),
        ];
        assert_eq!(signed_area(&doubled), -2.0);
    }

    #[test]
    fn test_signed_area_degenerate() {
        let collinear = [
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(2.0, 2.0),
        ];
        assert_eq!(signed_area(&collinear), 0.0);
        assert_eq!(signed_area(&collinear[..2]), 0.0);
        assert_eq!(Orientation::from_area(0.0), Orientation::Degenerate);
        assert_eq!(Orientation::Degenerate.sign(), 0);
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 2), vec![0.0, 1.0]);
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(3.0, 1.0, 3), vec![3.0, 2.0, 1.0]);
        assert_eq!(linspace(2.0, 9.0, 1), vec![2.0]);
        assert!(linspace(2.0, 9.0, 0).is_empty());
    }
}
