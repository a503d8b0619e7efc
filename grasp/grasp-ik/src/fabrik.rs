//! The FABRIK solve loop.

use crate::collision::{correct_collisions, CollisionConfig};
use crate::pole::apply_pole_constraint;
use crate::rotations::segment_rotations;
use crate::{IkError, IkResult};
use grasp_sdf::DistanceField;
use grasp_types::{BoneChain, Point3, UnitQuaternion, Vector3};
use tracing::{debug, trace};

/// Configuration for a FABRIK solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FabrikConfig {
    /// Upper bound on backward/forward iteration pairs.
    pub max_iterations: usize,
    /// Tip-to-target distance below which the solve stops early.
    pub tolerance: f64,
    /// Optional pole target resolving the bend-plane ambiguity.
    pub pole: Option<Point3<f64>>,
}

impl Default for FabrikConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            tolerance: 1e-3,
            pole: None,
        }
    }
}

/// Terminal phase of the solve's state machine.
///
/// The solve walks Initialize → (Backward → Forward)\* and terminates in
/// either `Converged` or `Failed`. `Failed` still carries a usable
/// best-effort pose — it reports that the tolerance was not met (budget
/// exhausted or target unreachable), not that the output is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolvePhase {
    /// Segment lengths captured, buffers initialized.
    Initialize,
    /// Walking tip-to-root, tip pinned to the target.
    BackwardPass,
    /// Walking root-to-tip, root re-pinned to its original position.
    ForwardPass,
    /// Tip error fell below tolerance.
    Converged,
    /// Iteration budget exhausted without reaching tolerance.
    Failed,
}

/// The result of a FABRIK solve.
#[derive(Debug, Clone)]
pub struct FabrikSolution {
    /// Solved joint positions, root to tip. The root is bit-for-bit the
    /// chain's original root.
    pub positions: Vec<Point3<f64>>,
    /// Per-joint local rotations: the segment delta composed onto the
    /// rest-pose rotation. The tip keeps its rest rotation.
    pub rotations: Vec<UnitQuaternion<f64>>,
    /// Whether the tip reached the target within tolerance.
    pub converged: bool,
    /// Iterations actually run.
    pub iterations: usize,
    /// Final tip-to-target distance.
    pub tip_error: f64,
    /// Terminal state of the solve.
    pub phase: SolvePhase,
}

/// FABRIK solver for 2–4 joint chains.
#[derive(Debug, Clone, Default)]
pub struct FabrikSolver {
    config: FabrikConfig,
}

impl FabrikSolver {
    /// Create a solver with the given configuration.
    #[must_use]
    pub const fn new(config: FabrikConfig) -> Self {
        Self { config }
    }

    /// The solver configuration.
    #[must_use]
    pub const fn config(&self) -> &FabrikConfig {
        &self.config
    }

    /// Solve the chain toward a target position.
    ///
    /// # Errors
    ///
    /// Returns [`IkError::NonFiniteTarget`] or [`IkError::NonFiniteJoint`]
    /// for invalid input. Non-convergence is reported through
    /// [`FabrikSolution::converged`], not as an error.
    pub fn solve(&self, chain: &BoneChain, target: Point3<f64>) -> IkResult<FabrikSolution> {
        self.solve_inner::<grasp_sdf::SphereField>(chain, target, None, None)
    }

    /// Solve with a collision correction pass against a distance field.
    ///
    /// The correction runs after convergence on interior segments, never on
    /// the end effector.
    ///
    /// # Errors
    ///
    /// Same as [`FabrikSolver::solve`].
    pub fn solve_collision_aware<F: DistanceField>(
        &self,
        chain: &BoneChain,
        target: Point3<f64>,
        field: &F,
        collision: CollisionConfig,
    ) -> IkResult<FabrikSolution> {
        self.solve_inner(chain, target, Some(field), Some(collision))
    }

    fn solve_inner<F: DistanceField>(
        &self,
        chain: &BoneChain,
        target: Point3<f64>,
        field: Option<&F>,
        collision: Option<CollisionConfig>,
    ) -> IkResult<FabrikSolution> {
        // Initialize: validate inputs, capture working buffers
        if !target.coords.iter().all(|c| c.is_finite()) {
            return Err(IkError::NonFiniteTarget);
        }
        for (index, joint) in chain.joints().iter().enumerate() {
            if !joint.position.coords.iter().all(|c| c.is_finite()) {
                return Err(IkError::NonFiniteJoint { index });
            }
        }

        let root = chain.root();
        let lengths = chain.segment_lengths();
        let total_length = chain.total_length();
        let mut positions = chain.positions();
        let n = positions.len();

        let root_to_target = target - root;
        let target_distance = root_to_target.norm();

        let mut phase = SolvePhase::Initialize;
        let mut iterations = 0;

        if target_distance >= total_length {
            // At or beyond full reach: extend fully toward the target
            // without leaving the root. No iteration needed; the straight
            // chain is the closest attainable pose. A target sitting exactly
            // at full reach still counts as converged.
            let dir = root_to_target
                .try_normalize(f64::EPSILON)
                .unwrap_or_else(Vector3::x);
            let mut reach = 0.0;
            for i in 1..n {
                reach += lengths[i - 1];
                positions[i] = root + dir * reach;
            }
            let tip_error = (positions[n - 1] - target).norm();
            phase = if tip_error < self.config.tolerance {
                SolvePhase::Converged
            } else {
                SolvePhase::Failed
            };
            debug!(
                target_distance,
                total_length, "target at or beyond reach, chain fully extended"
            );
        } else {
            for iteration in 0..self.config.max_iterations {
                iterations = iteration + 1;

                backward_pass(&mut positions, lengths, target);
                forward_pass(&mut positions, lengths, root);
                phase = SolvePhase::ForwardPass;

                let tip_error = (positions[n - 1] - target).norm();
                trace!(iteration, tip_error, "fabrik iteration");
                if tip_error < self.config.tolerance {
                    phase = SolvePhase::Converged;
                    break;
                }
            }
            if phase != SolvePhase::Converged {
                phase = SolvePhase::Failed;
            }
        }

        if let Some(pole) = self.config.pole {
            apply_pole_constraint(&mut positions, pole);
        }

        if let (Some(field), Some(collision)) = (field, collision) {
            correct_collisions(&mut positions, lengths, root, field, &collision);
        }

        let tip_error = (positions[n - 1] - target).norm();
        let converged = phase == SolvePhase::Converged;
        let rotations = segment_rotations(chain, &positions);

        debug!(
            converged,
            iterations, tip_error, "fabrik solve finished"
        );

        Ok(FabrikSolution {
            positions,
            rotations,
            converged,
            iterations,
            tip_error,
            phase,
        })
    }
}

/// Backward pass: pin the tip to the target, walk toward the root keeping
/// each joint at its fixed distance from its successor.
fn backward_pass(positions: &mut [Point3<f64>], lengths: &[f64], target: Point3<f64>) {
    let n = positions.len();
    positions[n - 1] = target;
    for i in (0..n - 1).rev() {
        let dir = (positions[i] - positions[i + 1])
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::x);
        positions[i] = positions[i + 1] + dir * lengths[i];
    }
}

/// Forward pass: re-pin the root unconditionally, walk toward the tip
/// keeping each joint at its fixed distance from its predecessor.
fn forward_pass(positions: &mut [Point3<f64>], lengths: &[f64], root: Point3<f64>) {
    positions[0] = root;
    for i in 0..positions.len() - 1 {
        let dir = (positions[i + 1] - positions[i])
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::x);
        positions[i + 1] = positions[i] + dir * lengths[i];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use grasp_types::BoneJoint;

    /// The finger-sized chain from the solver's acceptance scenario:
    /// segments [0.03, 0.025, 0.018] m rooted at the origin.
    fn finger_chain() -> BoneChain {
        BoneChain::from_rest_pose(vec![
            BoneJoint::at(Point3::new(0.0, 0.0, 0.0)),
            BoneJoint::at(Point3::new(0.03, 0.0, 0.0)),
            BoneJoint::at(Point3::new(0.055, 0.0, 0.0)),
            BoneJoint::at(Point3::new(0.073, 0.0, 0.0)),
        ])
        .unwrap()
    }

    #[test]
    fn reachable_target_converges_within_budget() {
        let chain = finger_chain();
        let target = Point3::new(0.04, 0.03, 0.0);
        let solution = FabrikSolver::default().solve(&chain, target).unwrap();

        assert!(solution.converged);
        assert!(solution.iterations <= 10);
        assert!(solution.tip_error < 1e-3);
        assert_eq!(solution.phase, SolvePhase::Converged);
    }

    #[test]
    fn root_is_bit_for_bit_unchanged() {
        let chain = finger_chain();
        let target = Point3::new(0.04, 0.03, 0.0);
        let solution = FabrikSolver::default().solve(&chain, target).unwrap();

        // Exact equality, not tolerance: the root is re-pinned, never recomputed
        assert_eq!(solution.positions[0], chain.root());
    }

    #[test]
    fn segment_lengths_preserved() {
        let chain = finger_chain();
        let solution = FabrikSolver::default()
            .solve(&chain, Point3::new(0.02, 0.04, 0.01))
            .unwrap();

        for (i, &len) in chain.segment_lengths().iter().enumerate() {
            let solved = (solution.positions[i + 1] - solution.positions[i]).norm();
            assert_relative_eq!(solved, len, epsilon = 1e-9);
        }
    }

    #[test]
    fn unreachable_target_fully_extends() {
        let chain = finger_chain();
        let target = Point3::new(0.2, 0.0, 0.0);
        let solution = FabrikSolver::default().solve(&chain, target).unwrap();

        assert!(!solution.converged);
        assert_eq!(solution.phase, SolvePhase::Failed);
        assert_eq!(solution.positions[0], chain.root());

        // Fully extended: tip at total length along the target direction
        let tip = solution.positions[3];
        assert_relative_eq!(tip.x, chain.total_length(), epsilon = 1e-12);
        assert_relative_eq!(tip.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            solution.tip_error,
            0.2 - chain.total_length(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn two_joint_chain_points_at_target() {
        // A single rigid segment reaches exactly its length: a 3-4-5 target
        // on the reach sphere converges, anything nearer cannot
        let chain = BoneChain::from_rest_pose(vec![
            BoneJoint::at(Point3::origin()),
            BoneJoint::at(Point3::new(0.05, 0.0, 0.0)),
        ])
        .unwrap();
        let solution = FabrikSolver::default()
            .solve(&chain, Point3::new(0.03, 0.04, 0.0))
            .unwrap();
        assert!(solution.converged);
        assert_relative_eq!(solution.tip_error, 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            (solution.positions[1] - solution.positions[0]).norm(),
            0.05,
            epsilon = 1e-12
        );

        // Inside the reach sphere: best effort, reported honestly
        let inside = FabrikSolver::default()
            .solve(&chain, Point3::new(0.0, 0.04, 0.0))
            .unwrap();
        assert!(!inside.converged);
        assert_relative_eq!(
            (inside.positions[1] - inside.positions[0]).norm(),
            0.05,
            epsilon = 1e-12
        );
    }

    #[test]
    fn non_finite_target_rejected() {
        let chain = finger_chain();
        let result = FabrikSolver::default().solve(&chain, Point3::new(f64::NAN, 0.0, 0.0));
        assert!(matches!(result, Err(IkError::NonFiniteTarget)));
    }

    #[test]
    fn target_at_root_keeps_root_pinned() {
        // Degenerate: target exactly at the root
        let chain = finger_chain();
        let solution = FabrikSolver::default().solve(&chain, chain.root()).unwrap();
        assert_eq!(solution.positions[0], chain.root());
        for (i, &len) in chain.segment_lengths().iter().enumerate() {
            let solved = (solution.positions[i + 1] - solution.positions[i]).norm();
            assert_relative_eq!(solved, len, epsilon = 1e-9);
        }
    }

    #[test]
    fn collision_aware_solve_preserves_invariants() {
        use crate::CollisionConfig;
        use grasp_sdf::SphereField;

        let chain = finger_chain();
        let target = Point3::new(0.04, 0.03, 0.0);
        // Obstacle sitting under the first segment's midpoint
        let field = SphereField::new(Point3::new(0.015, -0.001, 0.0), 0.008);

        let solution = FabrikSolver::default()
            .solve_collision_aware(
                &chain,
                target,
                &field,
                CollisionConfig {
                    capsule_radius: 0.004,
                    ..CollisionConfig::default()
                },
            )
            .unwrap();

        assert_eq!(solution.positions[0], chain.root());
        for (i, &len) in chain.segment_lengths().iter().enumerate() {
            let solved = (solution.positions[i + 1] - solution.positions[i]).norm();
            assert_relative_eq!(solved, len, epsilon = 1e-9);
        }
    }

    #[test]
    fn pole_pulls_bend_toward_target() {
        let chain = finger_chain();
        let target = Point3::new(0.04, 0.03, 0.0);

        let mut config = FabrikConfig::default();
        config.pole = Some(Point3::new(0.02, 0.0, 0.05));
        let with_pole = FabrikSolver::new(config).solve(&chain, target).unwrap();

        let without = FabrikSolver::default().solve(&chain, target).unwrap();

        // Interior joints should move toward the pole side (+z)
        let pole_side = with_pole.positions[1].z + with_pole.positions[2].z;
        let plain_side = without.positions[1].z + without.positions[2].z;
        assert!(pole_side >= plain_side);

        // Without leaving the root or stretching segments
        assert_eq!(with_pole.positions[0], chain.root());
        for (i, &len) in chain.segment_lengths().iter().enumerate() {
            let solved = (with_pole.positions[i + 1] - with_pole.positions[i]).norm();
            assert_relative_eq!(solved, len, epsilon = 1e-9);
        }
    }
}
