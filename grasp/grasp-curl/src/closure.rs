//! The iterative closure solve.

use crate::kinematics::FingerGeometry;
use grasp_sdf::DistanceField;
use grasp_types::{FingerLimits, Point3, Vector3};
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The four solved angles of a digit, radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurlState {
    /// MCP flexion.
    pub mcp_flex: f64,
    /// PIP flexion.
    pub pip_flex: f64,
    /// DIP flexion (slaved to PIP).
    pub dip_flex: f64,
    /// MCP abduction (sideways spread).
    pub mcp_abduction: f64,
}

/// Configuration for the closure solve.
///
/// Defaults are tuned for human-scale digits (meters): 2.5° steps, a 40
/// iteration budget, millimeter-scale contact tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurlConfig {
    /// Flexion increase per iteration.
    pub step: f64,
    /// Iteration budget.
    pub max_iterations: usize,
    /// Acceptable gap between fingertip pad and surface at termination.
    pub contact_gap: f64,
    /// How far past the surface the fingertip may rest (tiny epsilon).
    pub surface_epsilon: f64,
    /// Worst capsule penetration allowed in a converged pose.
    pub penetration_tolerance: f64,
    /// Capsule radius swept along each phalanx.
    pub capsule_radius: f64,
    /// Extra clearance that triggers back-off before real penetration.
    pub safety_padding: f64,
    /// Interior field samples per phalanx.
    pub samples_per_phalanx: usize,
    /// Fraction of the worst penetration applied as base-joint push-out.
    pub mcp_damping: f64,
    /// Radians of flexion back-off per meter of penetration (capped at
    /// `step`).
    pub backoff_gain: f64,
    /// Target MCP abduction, clamped by the limit configuration.
    pub abduction: f64,
}

impl Default for CurlConfig {
    fn default() -> Self {
        Self {
            step: 2.5_f64.to_radians(),
            max_iterations: 40,
            contact_gap: 2e-3,
            surface_epsilon: 1e-4,
            penetration_tolerance: 1e-4,
            capsule_radius: 0.006,
            safety_padding: 5e-4,
            samples_per_phalanx: 4,
            mcp_damping: 0.5,
            backoff_gain: 50.0,
            abduction: 0.0,
        }
    }
}

/// The result of a closure solve.
///
/// `converged = false` means the budget ran out before the termination
/// condition held; the pose is still the best effort reached and
/// `worst_penetration` tells the caller exactly how bad it is.
#[derive(Debug, Clone, Copy)]
pub struct CurlOutcome {
    /// Final joint angles.
    pub state: CurlState,
    /// Joint positions `[base, pip, dip, tip]` for the final state.
    pub joints: [Point3<f64>; 4],
    /// Whether the termination condition was met within budget.
    pub converged: bool,
    /// Iterations actually run.
    pub iterations: usize,
    /// Deepest capsule penetration in the final pose (≤ 0 means clear).
    pub worst_penetration: f64,
    /// Fingertip pad clearance to the surface (field value minus capsule
    /// radius).
    pub tip_clearance: f64,
}

/// Distance-field-driven closure solver.
#[derive(Debug, Clone)]
pub struct CurlSolver {
    config: CurlConfig,
    limits: FingerLimits,
}

impl CurlSolver {
    /// Create a solver from a configuration and limit set.
    #[must_use]
    pub const fn new(config: CurlConfig, limits: FingerLimits) -> Self {
        Self { config, limits }
    }

    /// The solver configuration.
    #[must_use]
    pub const fn config(&self) -> &CurlConfig {
        &self.config
    }

    /// Curl the digit around the field's solid.
    ///
    /// Flexion rises monotonically except for penetration back-off; the base
    /// joint micro-translates outward along the worst penetration normal by
    /// a damped fraction. The solve never reports a penetrating pose as
    /// converged.
    pub fn solve<F: DistanceField>(&self, finger: &FingerGeometry, field: &F) -> CurlOutcome {
        let cfg = &self.config;
        let mut geometry = *finger;
        let mut state = CurlState {
            mcp_flex: self.limits.mcp.clamp_flexion(0.0),
            pip_flex: self.limits.pip.clamp_flexion(0.0),
            dip_flex: self.limits.slaved_dip(self.limits.pip.clamp_flexion(0.0)),
            mcp_abduction: self.limits.mcp.clamp_abduction(cfg.abduction),
        };

        let mut iterations = 0;
        let mut converged = false;

        loop {
            if iterations >= cfg.max_iterations {
                break;
            }
            iterations += 1;

            // Tentative flexion increase, DIP slaved to PIP
            let pip = self.limits.pip.clamp_flexion(state.pip_flex + cfg.step);
            let tentative = CurlState {
                mcp_flex: self.limits.mcp.clamp_flexion(state.mcp_flex + cfg.step),
                pip_flex: pip,
                dip_flex: self.limits.slaved_dip(pip),
                mcp_abduction: state.mcp_abduction,
            };

            let joints = geometry.joint_positions(&tentative);
            let (depth, normal) = worst_sample(&joints, field, cfg);

            if depth > -cfg.safety_padding {
                // Contact or near-contact: back off proportionally (capped)
                // and nudge the base outward. Soft constraint, not a hard
                // stop.
                let back = (depth.max(0.0) * cfg.backoff_gain).min(cfg.step);
                let advance = cfg.step - back;
                let pip = self.limits.pip.clamp_flexion(state.pip_flex + advance);
                state = CurlState {
                    mcp_flex: self.limits.mcp.clamp_flexion(state.mcp_flex + advance),
                    pip_flex: pip,
                    dip_flex: self.limits.slaved_dip(pip),
                    mcp_abduction: state.mcp_abduction,
                };
                if depth > 0.0 {
                    let push = normal * (depth * cfg.mcp_damping);
                    geometry.set_base(geometry.base() + push);
                    trace!(depth, "base push-out");
                }
            } else {
                state = tentative;
            }

            let joints = geometry.joint_positions(&state);
            let (worst, _) = worst_sample(&joints, field, cfg);
            let tip_clearance = field.distance(joints[3]) - cfg.capsule_radius;

            trace!(iteration = iterations, worst, tip_clearance, "curl iteration");

            if tip_clearance <= cfg.contact_gap
                && tip_clearance >= -cfg.surface_epsilon
                && worst <= cfg.penetration_tolerance
            {
                converged = true;
                break;
            }

            // Fully flexed without reaching the surface: no further progress
            let at_limits = state.mcp_flex >= self.limits.mcp.max_flexion() - 1e-12
                && state.pip_flex >= self.limits.pip.max_flexion() - 1e-12;
            if at_limits && worst <= cfg.penetration_tolerance {
                break;
            }
        }

        let joints = geometry.joint_positions(&state);
        let (worst_penetration, _) = worst_sample(&joints, field, cfg);
        let tip_clearance = field.distance(joints[3]) - cfg.capsule_radius;

        debug!(
            converged,
            iterations, worst_penetration, tip_clearance, "curl solve finished"
        );

        CurlOutcome {
            state,
            joints,
            converged,
            iterations,
            worst_penetration,
            tip_clearance,
        }
    }
}

/// Deepest penetration over all capsule samples of all three phalanges,
/// with the field normal at the worst sample.
///
/// Depth is `capsule_radius - distance`: positive means the capsule surface
/// is inside the solid.
fn worst_sample<F: DistanceField>(
    joints: &[Point3<f64>; 4],
    field: &F,
    cfg: &CurlConfig,
) -> (f64, Vector3<f64>) {
    let samples = cfg.samples_per_phalanx.max(1);
    let mut worst = f64::NEG_INFINITY;
    let mut worst_normal = Vector3::y();

    for seg in 0..3 {
        let start = joints[seg];
        let end = joints[seg + 1];
        for s in 0..=samples {
            #[allow(clippy::cast_precision_loss)]
            let t = s as f64 / samples as f64;
            let point = start + (end - start) * t;
            let sample = field.sample(point);
            let depth = cfg.capsule_radius - sample.distance;
            if depth > worst {
                worst = depth;
                worst_normal = sample.normal;
            }
        }
    }

    (worst, worst_normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grasp_sdf::SphereField;
    use grasp_types::FingerLimits;

    fn downward_curl_finger() -> FingerGeometry {
        // Points along +x, curls toward -y (flex axis -z: rotation about -z
        // takes +x toward -y)
        FingerGeometry::new(
            Point3::new(0.0, 0.045, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            [0.045, 0.025, 0.018],
        )
        .unwrap()
    }

    #[test]
    fn curl_onto_sphere_terminates_clean() {
        // Sphere of known radius below the finger root
        let sphere = SphereField::new(Point3::new(0.035, 0.0, 0.0), 0.03);
        let solver = CurlSolver::new(CurlConfig::default(), FingerLimits::default());
        let outcome = solver.solve(&downward_curl_finger(), &sphere);

        // Either converged with no unresolved penetration, or explicitly
        // reported non-convergence. Never a silently penetrating success.
        if outcome.converged {
            assert!(outcome.worst_penetration <= solver.config().penetration_tolerance);
            assert!(outcome.tip_clearance <= solver.config().contact_gap);
        }
        assert!(outcome.iterations <= solver.config().max_iterations);
        // In all cases the final pose must be penetration-free to tolerance
        assert!(
            outcome.worst_penetration <= 1e-3,
            "unresolved penetration {}",
            outcome.worst_penetration
        );
    }

    #[test]
    fn empty_space_exhausts_flexion_without_convergence() {
        // Sphere far away: the digit curls fully and never touches
        let sphere = SphereField::new(Point3::new(10.0, 0.0, 0.0), 0.03);
        let solver = CurlSolver::new(CurlConfig::default(), FingerLimits::default());
        let outcome = solver.solve(&downward_curl_finger(), &sphere);

        assert!(!outcome.converged);
        assert!(outcome.worst_penetration < 0.0);
        // Flexion reached the MCP limit
        let limits = FingerLimits::default();
        assert!(outcome.state.mcp_flex >= limits.mcp.max_flexion() - 1e-9);
    }

    #[test]
    fn dip_stays_slaved_to_pip() {
        let sphere = SphereField::new(Point3::new(0.035, 0.0, 0.0), 0.03);
        let solver = CurlSolver::new(CurlConfig::default(), FingerLimits::default());
        let outcome = solver.solve(&downward_curl_finger(), &sphere);

        let limits = FingerLimits::default();
        let expected = limits.slaved_dip(outcome.state.pip_flex);
        assert!((outcome.state.dip_flex - expected).abs() < 1e-9);
    }

    #[test]
    fn flexion_respects_limits() {
        let sphere = SphereField::new(Point3::new(10.0, 0.0, 0.0), 0.03);
        let limits = FingerLimits::default();
        let solver = CurlSolver::new(CurlConfig::default(), limits);
        let outcome = solver.solve(&downward_curl_finger(), &sphere);

        assert!(outcome.state.mcp_flex <= limits.mcp.max_flexion() + 1e-12);
        assert!(outcome.state.pip_flex <= limits.pip.max_flexion() + 1e-12);
        assert!(outcome.state.dip_flex <= limits.dip.max_flexion() + 1e-12);
    }

    #[test]
    fn abduction_is_clamped() {
        let sphere = SphereField::new(Point3::new(10.0, 0.0, 0.0), 0.03);
        let config = CurlConfig {
            abduction: 1.0, // far past the ±20 degree limit
            ..CurlConfig::default()
        };
        let limits = FingerLimits::default();
        let solver = CurlSolver::new(config, limits);
        let outcome = solver.solve(&downward_curl_finger(), &sphere);

        assert!((outcome.state.mcp_abduction - limits.mcp.abduction_range()).abs() < 1e-12);
    }
}
