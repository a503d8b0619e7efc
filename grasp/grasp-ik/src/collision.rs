//! Penetration-aware segment correction.

use grasp_sdf::DistanceField;
use grasp_types::{Point3, Vector3};
use tracing::trace;

/// Configuration for the post-convergence collision correction pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionConfig {
    /// Radius of the capsule swept along each bone segment.
    pub capsule_radius: f64,
    /// Penetration below this depth is ignored entirely (~0.3 mm).
    pub dead_zone: f64,
    /// Penetration must additionally exceed this threshold before any
    /// correction applies (~1.5 mm).
    pub min_penetration: f64,
    /// Fraction of the penetration corrected per pass. Deliberately
    /// fractional so repeated solves settle instead of oscillating.
    pub correction_damping: f64,
    /// Number of interior sample points per segment.
    pub samples_per_segment: usize,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            capsule_radius: 0.006,
            dead_zone: 3e-4,
            min_penetration: 1.5e-3,
            correction_damping: 0.5,
            samples_per_segment: 3,
        }
    }
}

/// Push interior segments out of the field by a damped fraction of their
/// penetration, then restore segment lengths with a forward re-pin from the
/// root.
///
/// The last segment (the end effector) is never corrected: its placement is
/// the solve's whole point, and contact there is handled by the planner's
/// pad offset instead.
pub fn correct_collisions<F: DistanceField>(
    positions: &mut [Point3<f64>],
    lengths: &[f64],
    root: Point3<f64>,
    field: &F,
    config: &CollisionConfig,
) {
    let n = positions.len();
    if n < 3 {
        return;
    }

    // Interior segments only: exclude the final (end effector) segment
    for seg in 0..n - 2 {
        let (worst_depth, worst_normal) =
            worst_penetration(positions[seg], positions[seg + 1], field, config);

        let effective = worst_depth - config.dead_zone;
        if effective <= config.min_penetration {
            continue;
        }

        let push = worst_normal * (effective * config.correction_damping);
        trace!(segment = seg, depth = worst_depth, "collision push-out");
        positions[seg + 1] += push;
        if seg > 0 {
            positions[seg] += push * 0.5;
        }
    }

    // Restore segment lengths without moving the root
    positions[0] = root;
    for i in 0..n - 1 {
        let dir = (positions[i + 1] - positions[i])
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::x);
        positions[i + 1] = positions[i] + dir * lengths[i];
    }
}

/// Deepest capsule-sample penetration along a segment and the field normal
/// at that sample.
fn worst_penetration<F: DistanceField>(
    start: Point3<f64>,
    end: Point3<f64>,
    field: &F,
    config: &CollisionConfig,
) -> (f64, Vector3<f64>) {
    let samples = config.samples_per_segment.max(1);
    let mut worst_depth = 0.0;
    let mut worst_normal = Vector3::zeros();

    for s in 1..=samples {
        #[allow(clippy::cast_precision_loss)]
        let t = s as f64 / (samples + 1) as f64;
        let point = start + (end - start) * t;
        let sample = field.sample(point);
        let depth = config.capsule_radius - sample.distance;
        if depth > worst_depth {
            worst_depth = depth;
            worst_normal = sample.normal;
        }
    }

    (worst_depth, worst_normal)
}
