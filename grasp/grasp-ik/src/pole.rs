//! Pole constraint: bend-plane disambiguation.

use grasp_types::{Point3, UnitQuaternion, Vector3};
use nalgebra::Unit;

/// Rotate each interior joint about its neighbor axis so it faces the pole
/// target.
///
/// A chain of three or more joints has one rotational degree of freedom per
/// interior joint: the bend plane. The pole resolves it by rotating the joint
/// around the (previous joint → next joint) axis until the joint lies in the
/// plane containing the axis and the pole. Segment lengths and the root/tip
/// positions are unchanged.
pub fn apply_pole_constraint(positions: &mut [Point3<f64>], pole: Point3<f64>) {
    let n = positions.len();
    if n < 3 {
        return;
    }

    for i in 1..n - 1 {
        let prev = positions[i - 1];
        let next = positions[i + 1];

        let Some(axis) = (next - prev).try_normalize(1e-12) else {
            continue;
        };
        let axis = Unit::new_unchecked(axis);

        // Project the joint and the pole into the plane orthogonal to the axis
        let joint_offset = positions[i] - prev;
        let pole_offset = pole - prev;

        let joint_in_plane = joint_offset - axis.as_ref() * joint_offset.dot(&axis);
        let pole_in_plane = pole_offset - axis.as_ref() * pole_offset.dot(&axis);

        let (Some(from), Some(to)) = (
            joint_in_plane.try_normalize(1e-12),
            pole_in_plane.try_normalize(1e-12),
        ) else {
            continue;
        };

        let angle = signed_angle(&from, &to, &axis);
        let rotation = UnitQuaternion::from_axis_angle(&axis, angle);
        positions[i] = prev + rotation * joint_offset;
    }
}

/// Signed angle from `a` to `b` around `axis` (all unit length).
fn signed_angle(a: &Vector3<f64>, b: &Vector3<f64>, axis: &Unit<Vector3<f64>>) -> f64 {
    let cos = a.dot(b).clamp(-1.0, 1.0);
    let sin = a.cross(b).dot(axis);
    sin.atan2(cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn interior_joint_rotates_into_pole_plane() {
        // Bent chain in the XY plane, pole on the +Z side
        let mut positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let pole = Point3::new(1.0, 0.0, 5.0);

        let root = positions[0];
        let tip = positions[2];
        let seg0 = (positions[1] - positions[0]).norm();
        let seg1 = (positions[2] - positions[1]).norm();

        apply_pole_constraint(&mut positions, pole);

        // Endpoints fixed, lengths preserved
        assert_eq!(positions[0], root);
        assert_eq!(positions[2], tip);
        assert_relative_eq!((positions[1] - positions[0]).norm(), seg0, epsilon = 1e-12);
        assert_relative_eq!((positions[2] - positions[1]).norm(), seg1, epsilon = 1e-12);

        // The elbow now bends toward the pole
        assert!(positions[1].z > 0.9);
        assert!(positions[1].y.abs() < 1e-9);
    }

    #[test]
    fn two_joint_chain_untouched() {
        let mut positions = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        let before = positions.clone();
        apply_pole_constraint(&mut positions, Point3::new(0.0, 5.0, 0.0));
        assert_eq!(positions, before);
    }

    #[test]
    fn straight_chain_is_stable() {
        // Interior joint exactly on the axis: projection degenerates, no-op
        let mut positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let before = positions.clone();
        apply_pole_constraint(&mut positions, Point3::new(1.0, 3.0, 0.0));
        assert_eq!(positions, before);
    }
}
