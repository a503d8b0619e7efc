//! Forward kinematics of a three-phalanx digit.

use crate::closure::CurlState;
use crate::{CurlError, CurlResult};
use grasp_types::{Point3, UnitQuaternion, Vector3};
use nalgebra::Unit;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Immutable geometry of one digit: base joint, bend frame, phalanx lengths.
///
/// The frame is defined by two unit vectors:
///
/// - `forward` - where the digit points at zero flexion
/// - `flex_axis` - the axis flexion rotates around (positive flexion curls
///   the digit toward `flex_axis × forward`)
///
/// Abduction rotates around `flex_axis × forward` (the palm-normal-like
/// axis), spreading the digit sideways.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FingerGeometry {
    base: Point3<f64>,
    forward: Vector3<f64>,
    flex_axis: Vector3<f64>,
    phalanx_lengths: [f64; 3],
}

impl FingerGeometry {
    /// Create a digit geometry.
    ///
    /// `forward` and `flex_axis` are normalized; `flex_axis` is
    /// re-orthogonalized against `forward`.
    ///
    /// # Errors
    ///
    /// - [`CurlError::NonFiniteBase`] for a non-finite base position.
    /// - [`CurlError::DegenerateAxes`] if the two directions do not span a
    ///   plane.
    /// - [`CurlError::InvalidPhalanxLength`] for a non-positive length.
    pub fn new(
        base: Point3<f64>,
        forward: Vector3<f64>,
        flex_axis: Vector3<f64>,
        phalanx_lengths: [f64; 3],
    ) -> CurlResult<Self> {
        if !base.coords.iter().all(|c| c.is_finite()) {
            return Err(CurlError::NonFiniteBase);
        }
        let forward = forward
            .try_normalize(1e-9)
            .ok_or(CurlError::DegenerateAxes)?;
        // Remove any forward component so the axis is exactly orthogonal
        let flex_axis = (flex_axis - forward * flex_axis.dot(&forward))
            .try_normalize(1e-9)
            .ok_or(CurlError::DegenerateAxes)?;
        for (index, &length) in phalanx_lengths.iter().enumerate() {
            if length <= 0.0 || !length.is_finite() {
                return Err(CurlError::InvalidPhalanxLength { index, length });
            }
        }
        Ok(Self {
            base,
            forward,
            flex_axis,
            phalanx_lengths,
        })
    }

    /// The base (MCP) joint position.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> Point3<f64> {
        self.base
    }

    /// Replace the base position (used by the solver's micro-translation).
    #[inline]
    pub fn set_base(&mut self, base: Point3<f64>) {
        self.base = base;
    }

    /// Phalanx lengths, proximal to distal.
    #[inline]
    #[must_use]
    pub const fn phalanx_lengths(&self) -> [f64; 3] {
        self.phalanx_lengths
    }

    /// Total digit length.
    #[inline]
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.phalanx_lengths.iter().sum()
    }

    /// Joint positions `[base, pip, dip, tip]` for a curl state.
    ///
    /// Flexion angles compose in local frames: each joint bends relative to
    /// the segment before it, matching how a tendon curls a real digit.
    #[must_use]
    pub fn joint_positions(&self, state: &CurlState) -> [Point3<f64>; 4] {
        let flex = Unit::new_unchecked(self.flex_axis);
        let spread_axis = self.flex_axis.cross(&self.forward);
        let spread = Unit::new_unchecked(spread_axis);

        let mut orientation = UnitQuaternion::from_axis_angle(&spread, state.mcp_abduction)
            * UnitQuaternion::from_axis_angle(&flex, state.mcp_flex);

        let mut points = [self.base; 4];
        let mut position = self.base;
        for (i, &length) in self.phalanx_lengths.iter().enumerate() {
            if i == 1 {
                orientation *= UnitQuaternion::from_axis_angle(&flex, state.pip_flex);
            } else if i == 2 {
                orientation *= UnitQuaternion::from_axis_angle(&flex, state.dip_flex);
            }
            position += orientation * self.forward * length;
            points[i + 1] = position;
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn straight_finger() -> FingerGeometry {
        FingerGeometry::new(
            Point3::origin(),
            Vector3::x(),
            Vector3::z(),
            [0.04, 0.025, 0.018],
        )
        .unwrap()
    }

    #[test]
    fn zero_state_points_forward() {
        let finger = straight_finger();
        let joints = finger.joint_positions(&CurlState::default());
        assert_relative_eq!(joints[3].x, finger.total_length(), epsilon = 1e-12);
        assert_relative_eq!(joints[3].y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(joints[3].z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn full_right_angle_mcp_flex() {
        let finger = straight_finger();
        let state = CurlState {
            mcp_flex: std::f64::consts::FRAC_PI_2,
            ..CurlState::default()
        };
        let joints = finger.joint_positions(&state);
        // Rotation about +z takes +x to +y
        assert_relative_eq!(joints[1].y, 0.04, epsilon = 1e-12);
        assert_relative_eq!(joints[1].x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn pip_flex_composes_on_mcp() {
        let finger = straight_finger();
        let state = CurlState {
            mcp_flex: std::f64::consts::FRAC_PI_2,
            pip_flex: std::f64::consts::FRAC_PI_2,
            ..CurlState::default()
        };
        let joints = finger.joint_positions(&state);
        // After two right angles the middle phalanx points in -x
        let dir = (joints[2] - joints[1]) / 0.025;
        assert_relative_eq!(dir.x, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn segment_lengths_always_preserved() {
        let finger = straight_finger();
        let state = CurlState {
            mcp_flex: 0.7,
            pip_flex: 1.1,
            dip_flex: 0.7,
            mcp_abduction: 0.2,
        };
        let joints = finger.joint_positions(&state);
        for (i, &len) in finger.phalanx_lengths().iter().enumerate() {
            assert_relative_eq!((joints[i + 1] - joints[i]).norm(), len, epsilon = 1e-12);
        }
    }

    #[test]
    fn abduction_moves_sideways() {
        let finger = straight_finger();
        let state = CurlState {
            mcp_abduction: 0.3,
            ..CurlState::default()
        };
        let joints = finger.joint_positions(&state);
        // Spread axis is z × x = y... rotation about y moves +x toward -z
        assert!(joints[3].z.abs() > 1e-3);
        assert_relative_eq!(joints[3].y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn rejects_bad_geometry() {
        assert!(matches!(
            FingerGeometry::new(Point3::origin(), Vector3::x(), Vector3::x(), [0.1; 3]),
            Err(CurlError::DegenerateAxes)
        ));
        assert!(matches!(
            FingerGeometry::new(Point3::origin(), Vector3::x(), Vector3::z(), [0.0, 0.1, 0.1]),
            Err(CurlError::InvalidPhalanxLength { index: 0, .. })
        ));
        assert!(matches!(
            FingerGeometry::new(
                Point3::new(f64::NAN, 0.0, 0.0),
                Vector3::x(),
                Vector3::z(),
                [0.1; 3]
            ),
            Err(CurlError::NonFiniteBase)
        ));
    }
}
