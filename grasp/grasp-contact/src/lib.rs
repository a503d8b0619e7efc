//! Contact planning: where should each fingertip touch the object?
//!
//! The planner places one contact target per digit on an arbitrary grip
//! surface in two stages:
//!
//! 1. **Candidate generation** - a guess ray from the digit base toward the
//!    surface centroid is projected onto the surface, then perturbed around
//!    the tangent plane to build a local candidate set.
//! 2. **Scoring + refinement** - candidates are scored by a configurable
//!    multi-criterion cost (reach, normal alignment, comfort, separation
//!    from already-placed digits, thumb opposition) and the winner is
//!    polished by finite-difference gradient descent on the surface.
//!
//! The output per digit is a [`ContactTarget`]: a pad-offset position, the
//! surface frame, and an orientation quaternion the IK layer treats as the
//! desired end-effector pose. For mesh surfaces the target also carries a
//! surface cluster so it can be re-evaluated as the mesh deforms.
//!
//! Exact sphere, Y-axis cylinder, and box surfaces take a closed-form
//! placement shortcut; the sampling path handles everything else and
//! reproduces the same results for those shapes.
//!
//! # Example
//!
//! ```
//! use grasp_contact::{ContactPlanner, CostWeights, DigitSpec, GripSurface};
//! use grasp_sdf::SphereField;
//! use grasp_types::{Point3, Vector3};
//!
//! let surface = GripSurface::Sphere(SphereField::new(Point3::origin(), 0.03));
//! let digits = vec![
//!     DigitSpec::finger(Point3::new(0.06, 0.02, 0.0), Vector3::new(-1.0, 0.0, 0.0)),
//!     DigitSpec::thumb(Point3::new(0.06, -0.03, 0.0), Vector3::new(-1.0, 0.0, 0.0)),
//! ];
//!
//! let planner = ContactPlanner::new(CostWeights::default());
//! let targets = planner.plan(&digits, &surface);
//! assert_eq!(targets.len(), 2);
//! assert!(targets.iter().all(Result::is_ok));
//! ```

#![warn(missing_docs)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod candidates;
mod cost;
mod error;
mod planner;
mod pose;
mod refine;
mod smoothing;
mod surface;

pub use candidates::{candidate_set, ContactCandidate, CANDIDATE_RING_RADIUS, REACH_CAP};
pub use cost::CostWeights;
pub use error::{ContactError, ContactResult};
pub use planner::{separation_violations, ContactPlanner, DigitSpec, PlacedContact};
pub use pose::ContactTarget;
pub use refine::{refine_candidate, RefineConfig};
pub use smoothing::TargetFilter;
pub use surface::{GripSurface, MeshSurface, SurfaceHit};
