//! Stage 1: candidate generation.

use crate::planner::DigitSpec;
use crate::surface::{GripSurface, MeshSurface, SurfaceHit};
use grasp_geometry::{fibonacci_sphere, ray_mesh_intersect};
use grasp_types::{Point3, Vector3};
use smallvec::SmallVec;

/// Absolute cap on the initial guess reach from the digit base (10 cm).
pub const REACH_CAP: f64 = 0.10;

/// Fraction of the base-to-centroid distance the guess ray travels.
const REACH_FRACTION: f64 = 0.7;

/// Radius of the tangent-plane perturbation ring (1 cm).
pub const CANDIDATE_RING_RADIUS: f64 = 0.01;

/// Number of angular offsets around the ring (45° apart).
const RING_STEPS: usize = 8;

/// Ray directions swept when the visibility fallback engages on a mesh.
const VISIBILITY_RAYS: usize = 32;

/// An ephemeral contact candidate: generated, scored, and discarded within
/// one planning call. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactCandidate {
    /// Candidate position on the surface.
    pub position: Point3<f64>,
    /// Outward surface normal at the position.
    pub normal: Vector3<f64>,
    /// Mesh face index when available.
    pub face: Option<usize>,
    /// Cost assigned by the scorer; `f64::MAX` until scored.
    pub cost: f64,
}

impl From<SurfaceHit> for ContactCandidate {
    fn from(hit: SurfaceHit) -> Self {
        Self {
            position: hit.position,
            normal: hit.normal,
            face: hit.face,
            cost: f64::MAX,
        }
    }
}

/// Generate the candidate set for one digit: the seed projection plus a ring
/// of eight tangent-plane perturbations, each re-projected onto the surface.
///
/// The seed comes from a guess ray shot from the digit base toward the
/// surface centroid, clamped to `min(0.7 × distance, REACH_CAP)` so a digit
/// next to a large object aims at its near side rather than its middle.
#[must_use]
pub fn candidate_set(digit: &DigitSpec, surface: &GripSurface) -> SmallVec<[ContactCandidate; 9]> {
    let mut out = SmallVec::new();

    let centroid = surface.centroid();
    let to_center = centroid - digit.base;
    let distance = to_center.norm();

    let guess = if distance > 1e-12 {
        let reach = (REACH_FRACTION * distance).min(digit.max_reach.min(REACH_CAP));
        digit.base + to_center * (reach / distance)
    } else {
        digit.base
    };

    let mut seed = surface.project(guess);

    // On a concave mesh the closest point can sit on a back face whose
    // normal points away from the digit. Fall back to a visibility sweep:
    // the nearest surface the digit can actually see.
    if let GripSurface::Mesh(mesh_surface) = surface {
        if seed.normal.dot(&(digit.base - seed.position)) <= 0.0 {
            if let Some(visible) = visible_seed(digit.base, mesh_surface) {
                seed = visible;
            }
        }
    }

    out.push(ContactCandidate::from(seed));

    // Perturb within the tangent plane at the seed and re-project
    let (tangent, bitangent) = tangent_basis(seed.normal);
    for step in 0..RING_STEPS {
        #[allow(clippy::cast_precision_loss)]
        let angle = (step as f64) * std::f64::consts::TAU / (RING_STEPS as f64);
        let offset =
            (tangent * angle.cos() + bitangent * angle.sin()) * CANDIDATE_RING_RADIUS;
        let hit = surface.project(seed.position + offset);
        out.push(ContactCandidate::from(hit));
    }

    out
}

/// Nearest mesh point visible from `origin` over a Fibonacci-sphere ray
/// sweep, with the interpolated normal at the hit.
fn visible_seed(origin: Point3<f64>, mesh_surface: &MeshSurface) -> Option<SurfaceHit> {
    let mut best: Option<(f64, SurfaceHit)> = None;
    for dir in fibonacci_sphere(VISIBILITY_RAYS) {
        let Some((face, hit)) = ray_mesh_intersect(origin, dir, mesh_surface.mesh()) else {
            continue;
        };
        if best.as_ref().map_or(true, |(t, _)| hit.t < *t) {
            let normal = mesh_surface.interpolated_normal(face, hit.barycentric());
            best = Some((
                hit.t,
                SurfaceHit {
                    position: origin + dir * hit.t,
                    normal,
                    face: Some(face),
                },
            ));
        }
    }
    best.map(|(_, hit)| hit)
}

/// An orthonormal basis of the plane orthogonal to `normal`.
fn tangent_basis(normal: Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let tangent = normal
        .cross(&Vector3::y())
        .try_normalize(1e-6)
        .or_else(|| normal.cross(&Vector3::z()).try_normalize(1e-6))
        .unwrap_or_else(Vector3::x);
    let bitangent = normal.cross(&tangent);
    (tangent, bitangent)
}
