//! Freehand stroke simplification.
//!
//! Strokes arrive from the pointer as flat `x, y, x, y, ...` sequences.
//! The filter here is a single pass over the input: each interior point is
//! compared against its raw predecessor in the original sequence, not
//! against the last point that was kept. It is a cheap stand-in for
//! Ramer-Douglas-Peucker that stays O(n) while the pointer is still moving.

use kurbo::Point;

/// Default distance below which consecutive points are merged.
pub const DEFAULT_TOLERANCE: f64 = 2.5;

/// Minimum number of point pairs before simplification kicks in.
const MIN_PAIRS: usize = 3;

/// Simplify a flat point sequence.
///
/// Sequences with fewer than three pairs are returned unchanged, as are
/// malformed (odd-length) ones. Otherwise the first and last pairs are
/// always kept and an interior pair survives only when it lies farther
/// than `tolerance` from the pair right before it.
pub fn simplify(points: &[f64], tolerance: f64) -> Vec<f64> {
    if points.len() % 2 != 0 {
        log::warn!("Ignoring malformed stroke with {} scalars", points.len());
        return points.to_vec();
    }
    if points.len() < MIN_PAIRS * 2 {
        return points.to_vec();
    }

    let last = points.len() - 2;
    let mut out = Vec::with_capacity(points.len());
    out.extend_from_slice(&points[..2]);

    for i in (2..last).step_by(2) {
        let dx = points[i] - points[i - 2];
        let dy = points[i + 1] - points[i - 1];
        if dx.hypot(dy) > tolerance {
            out.extend_from_slice(&points[i..i + 2]);
        }
    }

    out.extend_from_slice(&points[last..]);
    out
}

/// Simplify a point-typed path with the same rules as [`simplify`].
pub fn simplify_path(points: &[Point], tolerance: f64) -> Vec<Point> {
    unflatten_points(&simplify(&flatten_points(points), tolerance))
}

/// Flatten points into an `x, y, x, y, ...` sequence.
pub fn flatten_points(points: &[Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

/// Rebuild points from a flat sequence. A dangling trailing scalar is dropped.
pub fn unflatten_points(flat: &[f64]) -> Vec<Point> {
    flat.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_sequences_unchanged() {
        let empty: Vec<f64> = Vec::new();
        assert_eq!(simplify(&empty, DEFAULT_TOLERANCE), empty);

        let one = vec![1.0, 2.0];
        assert_eq!(simplify(&one, DEFAULT_TOLERANCE), one);

        // Two identical points would otherwise collapse.
        let two = vec![5.0, 5.0, 5.0, 5.0];
        assert_eq!(simplify(&two, DEFAULT_TOLERANCE), two);
    }

    #[test]
    fn test_keeps_endpoints() {
        let points = vec![0.0, 0.0, 0.5, 0.5, 1.0, 1.0, 1.5, 1.5];
        let out = simplify(&points, DEFAULT_TOLERANCE);
        assert_eq!(out, vec![0.0, 0.0, 1.5, 1.5]);
    }

    #[test]
    fn test_drops_close_interior_points() {
        let points = vec![
            0.0, 0.0, //
            1.0, 0.0, // 1.0 from predecessor: dropped
            10.0, 0.0, // 9.0 from predecessor: kept
            11.0, 0.0, // dropped
            20.0, 0.0,
        ];
        let out = simplify(&points, 2.5);
        assert_eq!(out, vec![0.0, 0.0, 10.0, 0.0, 20.0, 0.0]);
    }

    #[test]
    fn test_compares_against_raw_predecessor() {
        // Each step is 2 units, so every interior point is dropped even
        // though the stroke drifts 6 units from the first kept point.
        let points = vec![0.0, 0.0, 2.0, 0.0, 4.0, 0.0, 6.0, 0.0, 8.0, 0.0];
        let out = simplify(&points, 2.5);
        assert_eq!(out, vec![0.0, 0.0, 8.0, 0.0]);
    }

    #[test]
    fn test_zero_tolerance_keeps_distinct_points() {
        let points = vec![0.0, 0.0, 0.1, 0.0, 0.2, 0.0, 0.3, 0.0];
        assert_eq!(simplify(&points, 0.0), points);
    }

    #[test]
    fn test_negative_tolerance_keeps_every_point() {
        let points = vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0];
        assert_eq!(simplify(&points, -1.0), points);
    }

    #[test]
    fn test_odd_length_unchanged() {
        let points = vec![0.0, 0.0, 10.0, 10.0, 20.0, 20.0, 30.0];
        assert_eq!(simplify(&points, DEFAULT_TOLERANCE), points);
    }

    #[test]
    fn test_simplify_path() {
        let path = vec![
            Point::new(0.0, 0.0),
            Point::new(0.5, 0.0),
            Point::new(30.0, 40.0),
            Point::new(31.0, 40.0),
        ];
        let out = simplify_path(&path, DEFAULT_TOLERANCE);
        assert_eq!(
            out,
            vec![Point::new(0.0, 0.0), Point::new(30.0, 40.0), Point::new(31.0, 40.0)]
        );
    }

    #[test]
    fn test_unflatten_drops_dangling_scalar() {
        let points = unflatten_points(&[1.0, 2.0, 3.0]);
        assert_eq!(points, vec![Point::new(1.0, 2.0)]);
    }
}
