//! The multi-criterion contact cost.

use crate::planner::{DigitSpec, PlacedContact};
use grasp_types::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Weights and scales for the contact cost. All terms are configuration;
/// the scorer hardcodes nothing.
///
/// The cost is a weighted sum, lower is better:
///
/// - `distance` × squared reach from the digit base to the pad point
/// - `normal_alignment` × `(1 − candidateNormal · padNormal)`
/// - `comfort` × exponential penalty beyond `comfortable_reach`
/// - `separation` × Gaussian falloff against each already-placed contact
///   (`separation_sigma` sets how close two digits may comfortably get)
/// - `opposition` × thumb-only penalty for facing *with* the mean normal of
///   the placed non-thumb digits (rewarding opposition produces the pinch
///   grip instead of all digits crowding one side)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CostWeights {
    /// Weight on the squared base-to-contact distance.
    pub distance: f64,
    /// Weight on pad/surface normal misalignment.
    pub normal_alignment: f64,
    /// Weight on the over-reach comfort penalty.
    pub comfort: f64,
    /// Reach beyond which the comfort penalty kicks in.
    pub comfortable_reach: f64,
    /// Weight on inter-digit separation.
    pub separation: f64,
    /// Gaussian sigma for the separation penalty.
    pub separation_sigma: f64,
    /// Weight on the thumb opposition term.
    pub opposition: f64,
    /// Fingertip pad thickness: contacts are offset outward by this much
    /// and the reach penalty measures to the offset point.
    pub pad_thickness: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            distance: 1.0,
            normal_alignment: 0.5,
            comfort: 0.3,
            comfortable_reach: 0.08,
            separation: 0.8,
            separation_sigma: 0.02,
            opposition: 0.6,
            pad_thickness: 0.003,
        }
    }
}

impl CostWeights {
    /// Score a candidate contact for a digit against the placed snapshot.
    ///
    /// `placed` is a read-only snapshot of contacts already selected for
    /// other digits this planning round.
    #[must_use]
    pub fn score(
        &self,
        position: Point3<f64>,
        normal: Vector3<f64>,
        digit: &DigitSpec,
        placed: &[PlacedContact],
    ) -> f64 {
        let pad_point = position + normal * self.pad_thickness;
        let reach = (pad_point - digit.base).norm();

        let mut cost = self.distance * reach * reach;

        cost += self.normal_alignment * (1.0 - normal.dot(&digit.pad_normal));

        if reach > self.comfortable_reach {
            let over = (reach - self.comfortable_reach) / self.comfortable_reach;
            cost += self.comfort * (over.exp() - 1.0);
        }

        let two_sigma_sq = 2.0 * self.separation_sigma * self.separation_sigma;
        for other in placed {
            let d_sq = (position - other.position).norm_squared();
            cost += self.separation * (-d_sq / two_sigma_sq).exp();
        }

        if digit.is_thumb {
            if let Some(mean) = mean_normal(placed) {
                // 0 when perfectly opposed, `opposition` when aligned
                cost += self.opposition * (1.0 + normal.dot(&mean)) * 0.5;
            }
        }

        cost
    }
}

/// Mean outward normal of the placed non-thumb contacts.
fn mean_normal(placed: &[PlacedContact]) -> Option<Vector3<f64>> {
    let sum: Vector3<f64> = placed
        .iter()
        .filter(|p| !p.is_thumb)
        .map(|p| p.normal)
        .sum();
    sum.try_normalize(1e-9)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grasp_types::Point3;

    fn digit() -> DigitSpec {
        DigitSpec::finger(Point3::new(0.05, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0))
    }

    #[test]
    fn closer_contact_scores_better() {
        let w = CostWeights::default();
        let d = digit();
        let near = w.score(Point3::new(0.03, 0.0, 0.0), -Vector3::x(), &d, &[]);
        let far = w.score(Point3::new(-0.03, 0.0, 0.0), -Vector3::x(), &d, &[]);
        assert!(near < far);
    }

    #[test]
    fn aligned_normal_scores_better() {
        let w = CostWeights::default();
        let d = digit();
        let p = Point3::new(0.02, 0.0, 0.0);
        let aligned = w.score(p, Vector3::new(-1.0, 0.0, 0.0), &d, &[]);
        let misaligned = w.score(p, Vector3::new(1.0, 0.0, 0.0), &d, &[]);
        assert!(aligned < misaligned);
    }

    #[test]
    fn crowding_a_placed_digit_is_penalized() {
        let w = CostWeights::default();
        let d = digit();
        let placed = [PlacedContact {
            position: Point3::new(0.02, 0.0, 0.0),
            normal: -Vector3::x(),
            is_thumb: false,
        }];
        let crowded = w.score(Point3::new(0.02, 0.001, 0.0), -Vector3::x(), &d, &placed);
        let spaced = w.score(Point3::new(0.02, 0.08, 0.0), -Vector3::x(), &d, &placed);
        // Separation dominates when everything else is comparable
        let base_crowded = w.score(Point3::new(0.02, 0.001, 0.0), -Vector3::x(), &d, &[]);
        let base_spaced = w.score(Point3::new(0.02, 0.08, 0.0), -Vector3::x(), &d, &[]);
        assert!((crowded - base_crowded) > (spaced - base_spaced));
    }

    #[test]
    fn thumb_prefers_opposing_normal() {
        // Isolate the opposition term: no pad-alignment weight
        let w = CostWeights {
            normal_alignment: 0.0,
            ..CostWeights::default()
        };
        let thumb = DigitSpec::thumb(Point3::new(0.0, -0.05, 0.0), Vector3::y());
        let placed = [PlacedContact {
            position: Point3::new(0.0, 0.02, 0.0),
            normal: Vector3::y(),
            is_thumb: false,
        }];
        let p = Point3::new(0.0, -0.02, 0.0);
        let opposing = w.score(p, -Vector3::y(), &thumb, &placed);
        let aligned = w.score(p, Vector3::y(), &thumb, &placed);
        assert!(opposing < aligned);
    }

    #[test]
    fn opposition_term_ignores_non_thumb_digits() {
        let w = CostWeights {
            normal_alignment: 0.0,
            ..CostWeights::default()
        };
        let finger = digit();
        let placed = [PlacedContact {
            position: Point3::new(0.0, 0.02, 0.0),
            normal: Vector3::y(),
            is_thumb: false,
        }];
        let p = Point3::new(0.02, 0.0, 0.0);
        let opposing = w.score(p, -Vector3::y(), &finger, &placed);
        let aligned = w.score(p, Vector3::y(), &finger, &placed);
        assert!((opposing - aligned).abs() < 1e-12);
    }

    #[test]
    fn comfort_penalty_only_beyond_reach() {
        // Isolate the comfort term
        let w = CostWeights {
            distance: 0.0,
            normal_alignment: 0.0,
            ..CostWeights::default()
        };
        let d = digit();
        // Reach 0.05 + pad: comfortably within 0.08
        let within = w.score(Point3::new(0.0, 0.0, 0.0), -Vector3::x(), &d, &[]);
        assert!(within.abs() < 1e-12);
        // Reach ~0.15: well past comfortable
        let beyond = w.score(Point3::new(-0.1, 0.0, 0.0), -Vector3::x(), &d, &[]);
        assert!(beyond > 0.1);
    }
}
