//! Delta-composed joint rotation output.

use grasp_types::{BoneChain, Point3, UnitQuaternion, Vector3};
use nalgebra::Unit;

/// Compute per-joint local rotations for a solved pose.
///
/// For each joint that owns a segment, the delta rotation taking the
/// rest-pose segment direction onto the solved direction is composed onto
/// the joint's rest-pose local rotation (`delta * rest`). The tip joint has
/// no segment and keeps its rest rotation.
///
/// Composing deltas rather than assigning absolute orientations preserves
/// any roll/twist the rig authored into the rest pose.
#[must_use]
pub fn segment_rotations(
    chain: &BoneChain,
    solved_positions: &[Point3<f64>],
) -> Vec<UnitQuaternion<f64>> {
    let joints = chain.joints();
    let n = joints.len();
    let mut rotations = Vec::with_capacity(n);

    for i in 0..n {
        if i + 1 >= n {
            rotations.push(joints[i].rotation);
            break;
        }

        let rest_dir = chain.segment_direction(i);
        let solved_dir =
            (solved_positions[i + 1] - solved_positions[i]).try_normalize(1e-12);

        let delta = match (rest_dir, solved_dir) {
            (Some(rest), Some(solved)) => rotation_between(&rest, &solved),
            _ => UnitQuaternion::identity(),
        };

        rotations.push(delta * joints[i].rotation);
    }

    rotations
}

/// Shortest-arc rotation taking `from` onto `to`, handling the antiparallel
/// case that `UnitQuaternion::rotation_between` reports as `None`.
fn rotation_between(from: &Vector3<f64>, to: &Vector3<f64>) -> UnitQuaternion<f64> {
    UnitQuaternion::rotation_between(from, to).unwrap_or_else(|| {
        // Antiparallel: rotate half a turn around any axis orthogonal to `from`
        let axis = from
            .cross(&Vector3::y())
            .try_normalize(1e-9)
            .or_else(|| from.cross(&Vector3::z()).try_normalize(1e-9))
            .unwrap_or_else(Vector3::x);
        UnitQuaternion::from_axis_angle(&Unit::new_unchecked(axis), std::f64::consts::PI)
    })
}
