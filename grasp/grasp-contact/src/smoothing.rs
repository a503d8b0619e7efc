//! Temporal smoothing of re-planned targets.

use grasp_types::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Low-pass filter for contact targets that are re-planned against a
/// deforming surface.
///
/// Without filtering, a target recomputed every frame twitches with every
/// mesh wobble and the digits visibly jitter. The filter blends toward the
/// newly planned position, caps the per-update step, and ignores
/// sub-debounce movement entirely.
///
/// The defaults (blend 0.35, max step 5 mm, debounce 0.5 mm) are empirically
/// tuned values, exposed as configuration precisely so they can be re-tuned
/// per rig.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TargetFilter {
    /// Fraction of the remaining delta applied per update.
    pub blend: f64,
    /// Maximum movement per update.
    pub max_step: f64,
    /// Deltas below this are ignored outright.
    pub debounce: f64,
    current: Option<Point3<f64>>,
}

impl Default for TargetFilter {
    fn default() -> Self {
        Self {
            blend: 0.35,
            max_step: 5e-3,
            debounce: 5e-4,
            current: None,
        }
    }
}

impl TargetFilter {
    /// Create a filter with explicit tuning.
    #[must_use]
    pub const fn new(blend: f64, max_step: f64, debounce: f64) -> Self {
        Self {
            blend,
            max_step,
            debounce,
            current: None,
        }
    }

    /// Feed a newly planned target, returning the smoothed position.
    ///
    /// The first update passes through unchanged and seeds the filter state.
    pub fn update(&mut self, target: Point3<f64>) -> Point3<f64> {
        let Some(current) = self.current else {
            self.current = Some(target);
            return target;
        };

        let delta = target - current;
        let distance = delta.norm();
        if distance < self.debounce {
            return current;
        }

        let step = (distance * self.blend).min(self.max_step);
        let next = current + delta * (step / distance);
        self.current = Some(next);
        next
    }

    /// The filter's current output, if seeded.
    #[must_use]
    pub const fn current(&self) -> Option<Point3<f64>> {
        self.current
    }

    /// Forget the filter state (e.g. when the grip is re-planned from
    /// scratch).
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Direction and magnitude still to travel toward the last target fed
    /// in, if any update has been rejected by the debounce.
    #[must_use]
    pub fn pending(&self, target: Point3<f64>) -> Option<Vector3<f64>> {
        self.current.map(|c| target - c)
    }
}
