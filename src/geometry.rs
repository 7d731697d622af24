//! Three-point joint angle calculation
//!
//! Measures the angle at a vertex joint from the directions towards its two
//! neighbours, e.g. shoulder→hip←knee for the hip hinge.

use crate::pose::{JointPosition, Point};

/// Angle at a vertex in degrees, always within [0, 180].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct AngleMeasurement(f32);

impl AngleMeasurement {
    pub fn degrees(&self) -> f32 {
        self.0
    }

    /// Two-decimal value for display. Comparisons use `degrees()`.
    pub fn rounded(&self) -> f32 {
        round2(self.0)
    }
}

/// Angle at `b` between the rays towards `a` and `c`.
///
/// Returns `None` when any of the three joints is absent.
pub fn angle_between(a: JointPosition, b: JointPosition, c: JointPosition) -> Option<AngleMeasurement> {
    let (a, b, c) = (a?, b?, c?);
    Some(AngleMeasurement(vertex_angle(a, b, c)))
}

fn vertex_angle(a: Point, b: Point, c: Point) -> f32 {
    let towards_c = (c.y - b.y).atan2(c.x - b.x);
    let towards_a = (a.y - b.y).atan2(a.x - b.x);

    let angle = (towards_c - towards_a).to_degrees().abs();
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

pub(crate) fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> JointPosition {
        Some(Point::new(x, y))
    }

    fn degrees(a: JointPosition, b: JointPosition, c: JointPosition) -> f32 {
        angle_between(a, b, c).unwrap().degrees()
    }

    #[test]
    fn test_straight_limb() {
        let angle = degrees(p(0.0, 0.0), p(0.5, 0.0), p(1.0, 0.0));
        assert!((angle - 180.0).abs() < 1e-4);
    }

    #[test]
    fn test_right_angle() {
        let angle = degrees(p(1.0, 0.0), p(0.0, 0.0), p(0.0, 1.0));
        assert!((angle - 90.0).abs() < 1e-4);
    }

    #[test]
    fn reflex_difference_folds_below_180() {
        // rays at +170° and -170° differ by 340° raw
        let a = p(-0.984_807_7, 0.173_648_2);
        let c = p(-0.984_807_7, -0.173_648_2);
        let angle = degrees(a, p(0.0, 0.0), c);
        assert!((angle - 20.0).abs() < 1e-3, "got {angle}");
    }

    #[test]
    fn symmetric_around_vertex() {
        let cases = [
            (p(0.1, 0.2), p(0.4, 0.5), p(0.9, 0.3)),
            (p(0.0, 0.0), p(0.0, 1.0), p(0.1, 2.0)),
            (p(-0.7, 0.2), p(0.0, 0.0), p(-0.7, -0.25)),
            (p(0.3, 0.9), p(0.31, 0.1), p(0.8, 0.8)),
        ];
        for (a, b, c) in cases {
            let forward = degrees(a, b, c);
            let backward = degrees(c, b, a);
            assert!((0.0..=180.0).contains(&forward));
            assert!((forward - backward).abs() < 1e-4);
        }
    }

    #[test]
    fn absent_joint_is_undefined() {
        let present = p(0.5, 0.5);
        for mask in 0..7u8 {
            let pick = |bit: u8| if mask & bit != 0 { present } else { None };
            assert_eq!(angle_between(pick(1), pick(2), pick(4)), None, "mask {mask:03b}");
        }
    }

    #[test]
    fn rounding_is_cosmetic() {
        let angle = angle_between(p(0.0, 0.0), p(0.0, 1.0), p(0.1, 2.0)).unwrap();
        assert!((angle.degrees() - 174.289_4).abs() < 1e-3);
        assert_eq!(angle.rounded(), 174.29);
    }
}
