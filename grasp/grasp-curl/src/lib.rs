//! Collision-aware joint closure.
//!
//! Where the FABRIK solver answers "reach this point", this crate answers
//! "close around this object": flexion angles increase step by step until the
//! digit's capsule samples meet the target's distance field, backing off
//! proportionally on penetration and nudging the base joint outward when the
//! object presses into the proximal segment.
//!
//! The solve is a soft constraint iteration, not a hard stop: corrections
//! are damped fractions so repeated solves settle at the surface instead of
//! jittering across it. A solve that exhausts its budget reports
//! `converged = false` with the best-effort pose — it never silently returns
//! a penetrating pose as success.
//!
//! # Example
//!
//! ```
//! use grasp_curl::{CurlConfig, CurlSolver, FingerGeometry};
//! use grasp_sdf::SphereField;
//! use grasp_types::{FingerLimits, Point3, Vector3};
//!
//! // A digit above a sphere, curling down onto it
//! let finger = FingerGeometry::new(
//!     Point3::new(0.0, 0.05, 0.0),
//!     Vector3::new(1.0, 0.0, 0.0),
//!     Vector3::new(0.0, 0.0, 1.0),
//!     [0.045, 0.025, 0.018],
//! ).unwrap();
//! let sphere = SphereField::new(Point3::new(0.04, 0.0, 0.0), 0.03);
//!
//! let solver = CurlSolver::new(CurlConfig::default(), FingerLimits::default());
//! let outcome = solver.solve(&finger, &sphere);
//! assert!(outcome.worst_penetration <= 1e-3);
//! ```

#![warn(missing_docs)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::missing_const_for_fn)]

mod closure;
mod error;
mod kinematics;

pub use closure::{CurlConfig, CurlOutcome, CurlSolver, CurlState};
pub use error::{CurlError, CurlResult};
pub use kinematics::FingerGeometry;
