//! Five-digit planning orchestration.

use crate::candidates::{candidate_set, ContactCandidate};
use crate::cost::CostWeights;
use crate::pose::ContactTarget;
use crate::refine::{refine_candidate, RefineConfig};
use crate::surface::GripSurface;
use crate::{ContactError, ContactResult};
use grasp_surface::SurfaceCluster;
use grasp_types::{Point3, Vector3};
use rayon::prelude::*;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of triangles anchoring a mesh target's deformation cluster.
const CLUSTER_ANCHORS: usize = 4;

/// One digit's planning input: where its base joint sits and how its pad
/// faces. The planner knows nothing about hands beyond this.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DigitSpec {
    /// Base (MCP) joint position.
    pub base: Point3<f64>,
    /// Canonical pad-facing direction used for normal alignment scoring.
    pub pad_normal: Vector3<f64>,
    /// Thumbs get the opposition bonus and are planned after the fingers.
    pub is_thumb: bool,
    /// Reach cap for the initial guess ray.
    pub max_reach: f64,
}

impl DigitSpec {
    /// A non-thumb digit with the default reach cap.
    #[must_use]
    pub fn finger(base: Point3<f64>, pad_normal: Vector3<f64>) -> Self {
        Self {
            base,
            pad_normal,
            is_thumb: false,
            max_reach: crate::candidates::REACH_CAP,
        }
    }

    /// A thumb with the default reach cap.
    #[must_use]
    pub fn thumb(base: Point3<f64>, pad_normal: Vector3<f64>) -> Self {
        Self {
            base,
            pad_normal,
            is_thumb: true,
            max_reach: crate::candidates::REACH_CAP,
        }
    }
}

/// Read-only snapshot entry of an already-placed contact, consulted by the
/// separation and opposition terms of later digits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedContact {
    /// Contact position on the surface.
    pub position: Point3<f64>,
    /// Outward normal at the contact.
    pub normal: Vector3<f64>,
    /// Whether the contact belongs to a thumb.
    pub is_thumb: bool,
}

/// The two-stage contact planner.
#[derive(Debug, Clone)]
pub struct ContactPlanner {
    weights: CostWeights,
    refine: RefineConfig,
    use_primitive_shortcut: bool,
}

impl ContactPlanner {
    /// Create a planner with the given cost weights and default refinement.
    #[must_use]
    pub fn new(weights: CostWeights) -> Self {
        Self {
            weights,
            refine: RefineConfig::default(),
            use_primitive_shortcut: true,
        }
    }

    /// Override the refinement configuration.
    #[must_use]
    pub const fn with_refine(mut self, refine: RefineConfig) -> Self {
        self.refine = refine;
        self
    }

    /// Disable the closed-form shortcut for exact primitive surfaces,
    /// forcing the general sampling path everywhere.
    #[must_use]
    pub const fn without_primitive_shortcut(mut self) -> Self {
        self.use_primitive_shortcut = false;
        self
    }

    /// The cost weights in use.
    #[must_use]
    pub const fn weights(&self) -> &CostWeights {
        &self.weights
    }

    /// Plan one contact target per digit.
    ///
    /// Digits are solved non-thumb first, thumb last (the opposition term
    /// needs the fingers' mean normal), each against a read-only snapshot of
    /// the contacts placed so far. Results come back in input order. A digit
    /// that fails does not abort its siblings.
    #[must_use]
    pub fn plan(
        &self,
        digits: &[DigitSpec],
        surface: &GripSurface,
    ) -> Vec<ContactResult<ContactTarget>> {
        let mut order: Vec<usize> = (0..digits.len()).collect();
        order.sort_by_key(|&i| digits[i].is_thumb);

        let mut placed: Vec<PlacedContact> = Vec::with_capacity(digits.len());
        let mut results: Vec<Option<ContactResult<ContactTarget>>> =
            (0..digits.len()).map(|_| None).collect();

        for idx in order {
            let digit = &digits[idx];
            let result = self.plan_digit(digit, surface, &placed);
            match &result {
                Ok(target) => {
                    placed.push(PlacedContact {
                        position: target.surface_point(self.weights.pad_thickness),
                        normal: target.normal,
                        is_thumb: digit.is_thumb,
                    });
                }
                Err(err) => {
                    warn!(digit = idx, %err, "digit planning failed");
                }
            }
            results[idx] = Some(result);
        }

        results
            .into_iter()
            .map(|r| r.unwrap_or(Err(ContactError::NoCandidates)))
            .collect()
    }

    /// Plan a single digit against a snapshot of placed contacts.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::NonFiniteBase`] for invalid input and
    /// propagates cluster construction failures for mesh surfaces.
    pub fn plan_digit(
        &self,
        digit: &DigitSpec,
        surface: &GripSurface,
        placed: &[PlacedContact],
    ) -> ContactResult<ContactTarget> {
        if !digit.base.coords.iter().all(|c| c.is_finite()) {
            return Err(ContactError::NonFiniteBase);
        }

        let best = if self.use_primitive_shortcut && surface.has_primitive_shortcut() {
            // Closed-form placement: project the base straight onto the
            // exact collider. Equivalent to what the sampling path converges
            // to for these shapes, without the sampling.
            let hit = surface.project(digit.base);
            let cost = self
                .weights
                .score(hit.position, hit.normal, digit, placed);
            let mut candidate = ContactCandidate::from(hit);
            candidate.cost = cost;
            candidate
        } else {
            let candidates = candidate_set(digit, surface);
            if candidates.is_empty() {
                return Err(ContactError::NoCandidates);
            }

            // Score the candidate set in parallel against the immutable
            // snapshot, then refine the winner.
            let winner = candidates
                .as_slice()
                .par_iter()
                .map(|c| {
                    let cost = self.weights.score(c.position, c.normal, digit, placed);
                    ContactCandidate { cost, ..*c }
                })
                .min_by(|a, b| a.cost.total_cmp(&b.cost))
                .ok_or(ContactError::NoCandidates)?;

            refine_candidate(winner, digit, surface, &self.weights, placed, &self.refine)
        };

        debug!(cost = best.cost, "digit contact selected");

        // Roll reference: point the tangent back toward the digit base so
        // the pad faces a consistent way as the mesh deforms.
        let toward_base = digit.base - best.position;
        let tangent = toward_base - best.normal * toward_base.dot(&best.normal);

        let cluster = match surface {
            GripSurface::Mesh(mesh_surface) => Some(SurfaceCluster::build(
                mesh_surface.mesh(),
                best.position,
                CLUSTER_ANCHORS,
                None,
            )?),
            _ => None,
        };

        Ok(ContactTarget::from_contact(
            best.position,
            best.normal,
            tangent,
            self.weights.pad_thickness,
            cluster,
        ))
    }
}

/// Pairs of targets whose surface contacts sit closer than `min_distance`.
///
/// The planner discourages crowding through the separation cost; this
/// post-hoc check lets callers detect the geometrically unavoidable cases
/// and decide whether to re-plan or accept them.
#[must_use]
pub fn separation_violations(
    targets: &[&ContactTarget],
    pad_thickness: f64,
    min_distance: f64,
) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for i in 0..targets.len() {
        for j in i + 1..targets.len() {
            let a = targets[i].surface_point(pad_thickness);
            let b = targets[j].surface_point(pad_thickness);
            if (a - b).norm() < min_distance {
                out.push((i, j));
            }
        }
    }
    out
}
