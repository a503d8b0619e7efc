//! Bone chains for IK solving.

use crate::ChainError;
use nalgebra::{Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum number of joints in a solvable chain.
pub const MIN_CHAIN_JOINTS: usize = 2;

/// Maximum number of joints in a solvable chain.
pub const MAX_CHAIN_JOINTS: usize = 4;

/// A single joint: world position plus the local rotation baked into the
/// rest pose.
///
/// The local rotation carries any roll/twist the rig authored into the joint;
/// solvers compose deltas onto it rather than overwriting it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoneJoint {
    /// World-space position.
    pub position: Point3<f64>,
    /// Local rotation from the rest pose.
    pub rotation: UnitQuaternion<f64>,
}

impl BoneJoint {
    /// Create a joint from a position and local rotation.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self { position, rotation }
    }

    /// Create a joint at a position with identity rotation.
    #[inline]
    #[must_use]
    pub fn at(position: Point3<f64>) -> Self {
        Self::new(position, UnitQuaternion::identity())
    }
}

/// An ordered chain of 2–4 joints with fixed segment lengths.
///
/// Segment lengths are captured once from the rest pose and treated as rigid
/// thereafter; the root position is the anchor every solve preserves.
///
/// # Example
///
/// ```
/// use grasp_types::{BoneChain, BoneJoint, Point3};
///
/// let chain = BoneChain::from_rest_pose(vec![
///     BoneJoint::at(Point3::new(0.0, 0.0, 0.0)),
///     BoneJoint::at(Point3::new(0.03, 0.0, 0.0)),
///     BoneJoint::at(Point3::new(0.055, 0.0, 0.0)),
///     BoneJoint::at(Point3::new(0.073, 0.0, 0.0)),
/// ]).unwrap();
///
/// assert_eq!(chain.joint_count(), 4);
/// assert!((chain.total_length() - 0.073).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoneChain {
    joints: Vec<BoneJoint>,
    segment_lengths: Vec<f64>,
}

impl BoneChain {
    /// Build a chain from rest-pose joints, capturing segment lengths.
    ///
    /// # Errors
    ///
    /// - [`ChainError::InvalidLength`] for fewer than 2 or more than 4 joints
    ///   (a caller precondition, not a solver state).
    /// - [`ChainError::NonFiniteJoint`] if any position has a NaN/inf
    ///   component.
    /// - [`ChainError::DegenerateSegment`] if two consecutive joints
    ///   coincide.
    pub fn from_rest_pose(joints: Vec<BoneJoint>) -> Result<Self, ChainError> {
        if !(MIN_CHAIN_JOINTS..=MAX_CHAIN_JOINTS).contains(&joints.len()) {
            return Err(ChainError::InvalidLength { got: joints.len() });
        }
        for (index, joint) in joints.iter().enumerate() {
            if !joint.position.coords.iter().all(|c| c.is_finite()) {
                return Err(ChainError::NonFiniteJoint { index });
            }
        }
        let segment_lengths: Vec<f64> = joints
            .windows(2)
            .map(|w| (w[1].position - w[0].position).norm())
            .collect();
        for (index, &len) in segment_lengths.iter().enumerate() {
            if len < 1e-9 {
                return Err(ChainError::DegenerateSegment { index });
            }
        }
        Ok(Self {
            joints,
            segment_lengths,
        })
    }

    /// The joints in root-to-tip order.
    #[inline]
    #[must_use]
    pub fn joints(&self) -> &[BoneJoint] {
        &self.joints
    }

    /// Number of joints.
    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Fixed segment lengths, root-to-tip (one fewer than joints).
    #[inline]
    #[must_use]
    pub fn segment_lengths(&self) -> &[f64] {
        &self.segment_lengths
    }

    /// Sum of all segment lengths: the chain's maximum reach.
    #[inline]
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.segment_lengths.iter().sum()
    }

    /// The root joint position (the anchor solvers must preserve).
    #[inline]
    #[must_use]
    pub fn root(&self) -> Point3<f64> {
        self.joints[0].position
    }

    /// The tip (end effector) position.
    #[inline]
    #[must_use]
    pub fn tip(&self) -> Point3<f64> {
        self.joints[self.joints.len() - 1].position
    }

    /// Current joint positions as a plain vector (solver working buffer).
    #[must_use]
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.joints.iter().map(|j| j.position).collect()
    }

    /// Direction of segment `i` (joint `i` toward joint `i + 1`) in the rest
    /// pose, or `None` if out of range.
    #[must_use]
    pub fn segment_direction(&self, i: usize) -> Option<Vector3<f64>> {
        if i + 1 >= self.joints.len() {
            return None;
        }
        (self.joints[i + 1].position - self.joints[i].position).try_normalize(1e-12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_chain() -> BoneChain {
        BoneChain::from_rest_pose(vec![
            BoneJoint::at(Point3::new(0.0, 0.0, 0.0)),
            BoneJoint::at(Point3::new(0.03, 0.0, 0.0)),
            BoneJoint::at(Point3::new(0.055, 0.0, 0.0)),
            BoneJoint::at(Point3::new(0.073, 0.0, 0.0)),
        ])
        .unwrap()
    }

    #[test]
    fn captures_segment_lengths() {
        let chain = straight_chain();
        let lengths = chain.segment_lengths();
        assert!((lengths[0] - 0.03).abs() < 1e-12);
        assert!((lengths[1] - 0.025).abs() < 1e-12);
        assert!((lengths[2] - 0.018).abs() < 1e-12);
    }

    #[test]
    fn rejects_single_joint() {
        let result = BoneChain::from_rest_pose(vec![BoneJoint::at(Point3::origin())]);
        assert!(matches!(result, Err(ChainError::InvalidLength { got: 1 })));
    }

    #[test]
    fn rejects_five_joints() {
        let joints = (0..5)
            .map(|i| BoneJoint::at(Point3::new(f64::from(i) * 0.01, 0.0, 0.0)))
            .collect();
        let result = BoneChain::from_rest_pose(joints);
        assert!(matches!(result, Err(ChainError::InvalidLength { got: 5 })));
    }

    #[test]
    fn rejects_non_finite_joint() {
        let result = BoneChain::from_rest_pose(vec![
            BoneJoint::at(Point3::origin()),
            BoneJoint::at(Point3::new(f64::NAN, 0.0, 0.0)),
        ]);
        assert!(matches!(result, Err(ChainError::NonFiniteJoint { index: 1 })));
    }

    #[test]
    fn rejects_coincident_joints() {
        let result = BoneChain::from_rest_pose(vec![
            BoneJoint::at(Point3::origin()),
            BoneJoint::at(Point3::origin()),
        ]);
        assert!(matches!(result, Err(ChainError::DegenerateSegment { index: 0 })));
    }

    #[test]
    fn total_length_and_tip() {
        let chain = straight_chain();
        assert!((chain.total_length() - 0.073).abs() < 1e-12);
        assert!((chain.tip().x - 0.073).abs() < 1e-12);
        assert!(chain.root() == Point3::origin());
    }

    #[test]
    fn segment_direction_is_unit() {
        let chain = straight_chain();
        let dir = chain.segment_direction(0).unwrap();
        assert!((dir.norm() - 1.0).abs() < 1e-12);
        assert!(chain.segment_direction(3).is_none());
    }
}
