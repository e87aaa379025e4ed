extern crate nalgebra as na;
use na::{Point2, Unit, Vector2};

pub type Float = f64;
pub type P2 = Point2<Float>;
pub type V2 = Vector2<Float>;
pub type U2 = Unit<V2>;

/// grazing tolerance of every swept query; resolved actors rest `2 * EPSILON` away from a face
pub const EPSILON: Float = 0.000_1;

/// below this frame time a platform is teleported instead of given a velocity
pub const NEAR_ZERO_DELTA_TIME: Float = 0.000_001;

pub fn between(num: Float, a: Float, b: Float) -> bool {
    (num >= a) && (num <= b)
}

/// whether the open intervals `(a_min, a_max)` and `(b_min, b_max)` share more than `tolerance`
pub fn spans_overlap(a_min: Float, a_max: Float, b_min: Float, b_max: Float, tolerance: Float) -> bool {
    a_min < b_max - tolerance && a_max > b_min + tolerance
}

pub fn span_midpoint(a_min: Float, a_max: Float, b_min: Float, b_max: Float) -> Float {
    0.5 * (a_min.max(b_min) + a_max.min(b_max))
}

/// picks the earlier of two optional hits, keeping `a` on ties
pub fn earliest<T>(a: Option<(Float, T)>, b: Option<(Float, T)>) -> Option<(Float, T)> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if b.0 < a.0 {
                Some(b)
            } else {
                Some(a)
            }
        }
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_need_more_than_tolerance() {
        assert!(spans_overlap(0.0, 10.0, 5.0, 15.0, EPSILON));
        assert!(!spans_overlap(0.0, 10.0, 10.0, 15.0, 0.0));
        assert!(!spans_overlap(0.0, 10.0, 10.0 - EPSILON * 0.5, 15.0, EPSILON));
    }

    #[test]
    fn earliest_keeps_first_on_tie() {
        assert_eq!(earliest(Some((0.5, 'a')), Some((0.5, 'b'))), Some((0.5, 'a')));
        assert_eq!(earliest(Some((0.5, 'a')), Some((0.25, 'b'))), Some((0.25, 'b')));
        assert_eq!(earliest(None, Some((0.25, 'b'))), Some((0.25, 'b')));
        assert!(between(0.5, 0.0, 1.0));
    }
}
