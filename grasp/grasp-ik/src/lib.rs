//! FABRIK inverse kinematics for short joint chains.
//!
//! The solver implements Forward-And-Backward-Reaching IK specialized for
//! digit chains: the root joint is re-pinned to its original position on
//! every forward pass, unconditionally. For an unreachable target the chain
//! extends fully toward it without ever leaving the root — the behavior that
//! distinguishes finger IK from generic limb IK.
//!
//! Optional passes after convergence:
//!
//! - **Pole constraint** - resolves the bend-plane ambiguity of interior
//!   joints by rotating them toward a pole target.
//! - **Collision correction** - pushes interior segments out of a
//!   [`DistanceField`](grasp_sdf::DistanceField) by a damped fraction,
//!   preserving segment lengths.
//!
//! Joint rotations are returned as deltas composed onto the rest-pose local
//! rotations, never as absolute orientations, so authored roll/twist
//! survives the solve.
//!
//! # Example
//!
//! ```
//! use grasp_ik::{FabrikConfig, FabrikSolver};
//! use grasp_types::{BoneChain, BoneJoint, Point3};
//!
//! let chain = BoneChain::from_rest_pose(vec![
//!     BoneJoint::at(Point3::new(0.0, 0.0, 0.0)),
//!     BoneJoint::at(Point3::new(0.03, 0.0, 0.0)),
//!     BoneJoint::at(Point3::new(0.055, 0.0, 0.0)),
//!     BoneJoint::at(Point3::new(0.073, 0.0, 0.0)),
//! ]).unwrap();
//!
//! let solver = FabrikSolver::new(FabrikConfig::default());
//! let solution = solver.solve(&chain, Point3::new(0.04, 0.03, 0.0)).unwrap();
//!
//! assert!(solution.converged);
//! assert!(solution.tip_error < 1e-3);
//! // The root never moves
//! assert_eq!(solution.positions[0], chain.root());
//! ```

#![warn(missing_docs)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod collision;
mod error;
mod fabrik;
mod pole;
mod rotations;

pub use collision::CollisionConfig;
pub use error::{IkError, IkResult};
pub use fabrik::{FabrikConfig, FabrikSolution, FabrikSolver, SolvePhase};
pub use rotations::segment_rotations;
