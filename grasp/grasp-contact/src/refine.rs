//! Stage 2: local gradient refinement.

use crate::candidates::ContactCandidate;
use crate::cost::CostWeights;
use crate::planner::{DigitSpec, PlacedContact};
use crate::surface::GripSurface;
use grasp_types::Vector3;
use tracing::trace;

/// Configuration for the finite-difference refinement pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineConfig {
    /// Finite-difference probe step (~1 mm).
    pub epsilon: f64,
    /// Iteration budget.
    pub max_iterations: usize,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-3,
            max_iterations: 10,
        }
    }
}

/// Polish a winning candidate by gradient descent on the surface.
///
/// The gradient is estimated by central differences along the three world
/// axes; every probe and every step is re-projected onto the surface so the
/// search never leaves it. A step is accepted only if the cost strictly
/// decreases; the first non-improving step ends the search.
#[must_use]
pub fn refine_candidate(
    candidate: ContactCandidate,
    digit: &DigitSpec,
    surface: &GripSurface,
    weights: &CostWeights,
    placed: &[PlacedContact],
    config: &RefineConfig,
) -> ContactCandidate {
    let mut best = candidate;
    let mut best_cost = weights.score(best.position, best.normal, digit, placed);

    for iteration in 0..config.max_iterations {
        let mut gradient = Vector3::zeros();
        for axis in [Vector3::x(), Vector3::y(), Vector3::z()] {
            let plus = surface.project(best.position + axis * config.epsilon);
            let minus = surface.project(best.position - axis * config.epsilon);
            let cost_plus = weights.score(plus.position, plus.normal, digit, placed);
            let cost_minus = weights.score(minus.position, minus.normal, digit, placed);
            gradient += axis * (cost_plus - cost_minus) / (2.0 * config.epsilon);
        }

        let Some(descent) = (-gradient).try_normalize(1e-12) else {
            break;
        };

        let trial = surface.project(best.position + descent * config.epsilon);
        let trial_cost = weights.score(trial.position, trial.normal, digit, placed);

        if trial_cost >= best_cost {
            trace!(iteration, "refinement stalled");
            break;
        }

        best = ContactCandidate {
            position: trial.position,
            normal: trial.normal,
            face: trial.face,
            cost: trial_cost,
        };
        best_cost = trial_cost;
    }

    best.cost = best_cost;
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use grasp_sdf::SphereField;
    use grasp_types::Point3;

    #[test]
    fn refinement_never_increases_cost() {
        let surface = GripSurface::Sphere(SphereField::new(Point3::origin(), 0.03));
        let digit = DigitSpec::finger(Point3::new(0.08, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0));
        let weights = CostWeights::default();

        // Deliberately poor starting candidate on the far side
        let hit = surface.project(Point3::new(-0.05, 0.02, 0.0));
        let start = ContactCandidate {
            position: hit.position,
            normal: hit.normal,
            face: None,
            cost: f64::MAX,
        };
        let start_cost = weights.score(start.position, start.normal, &digit, &[]);

        let refined = refine_candidate(
            start,
            &digit,
            &surface,
            &weights,
            &[],
            &RefineConfig::default(),
        );

        assert!(refined.cost <= start_cost);
        // Still on the sphere
        assert!((refined.position.coords.norm() - 0.03).abs() < 1e-9);
    }

    #[test]
    fn good_candidate_is_stable() {
        let surface = GripSurface::Sphere(SphereField::new(Point3::origin(), 0.03));
        let digit = DigitSpec::finger(Point3::new(0.08, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0));
        let weights = CostWeights::default();

        // The near pole is already the optimum for a lone digit
        let hit = surface.project(Point3::new(0.08, 0.0, 0.0));
        let start = ContactCandidate {
            position: hit.position,
            normal: hit.normal,
            face: None,
            cost: f64::MAX,
        };
        let refined = refine_candidate(
            start,
            &digit,
            &surface,
            &weights,
            &[],
            &RefineConfig::default(),
        );

        assert!((refined.position - hit.position).norm() < 2e-3);
    }
}
