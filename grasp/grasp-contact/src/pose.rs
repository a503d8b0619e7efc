//! Contact target output: position, frame, orientation.

use grasp_surface::SurfaceCluster;
use grasp_types::{Point3, UnitQuaternion, Vector3};

/// The planner's output for one digit: where the fingertip pad should sit
/// and how it should be oriented.
///
/// The position is offset outward from the surface by the configured pad
/// thickness. The orientation maps the local +Z axis onto the surface
/// normal (pad-forward) with roll taken from the projected tangent, which is
/// the convention the downstream IK/rotation stage consumes as its desired
/// end-effector pose.
#[derive(Debug, Clone)]
pub struct ContactTarget {
    /// Pad position: surface contact offset outward by the pad thickness.
    pub position: Point3<f64>,
    /// Outward surface normal at the contact.
    pub normal: Vector3<f64>,
    /// Surface tangent providing the roll reference.
    pub tangent: Vector3<f64>,
    /// Desired end-effector orientation (+Z = `normal`, +Y from `tangent`).
    pub orientation: UnitQuaternion<f64>,
    /// Deformation anchor, present when the surface is a mesh: re-evaluate
    /// it to follow the contact as the mesh deforms.
    pub cluster: Option<SurfaceCluster>,
}

impl ContactTarget {
    /// Assemble a target from a surface contact.
    ///
    /// `tangent` is projected orthogonal to `normal` before the frame is
    /// built; a degenerate projection falls back to any perpendicular.
    #[must_use]
    pub fn from_contact(
        contact: Point3<f64>,
        normal: Vector3<f64>,
        tangent: Vector3<f64>,
        pad_thickness: f64,
        cluster: Option<SurfaceCluster>,
    ) -> Self {
        let normal = normal.try_normalize(1e-12).unwrap_or_else(Vector3::z);
        let projected = tangent - normal * tangent.dot(&normal);
        let tangent = projected
            .try_normalize(1e-9)
            .or_else(|| normal.cross(&Vector3::y()).try_normalize(1e-9))
            .or_else(|| normal.cross(&Vector3::z()).try_normalize(1e-9))
            .unwrap_or_else(Vector3::x);

        let orientation = UnitQuaternion::face_towards(&normal, &tangent);

        Self {
            position: contact + normal * pad_thickness,
            normal,
            tangent,
            orientation,
            cluster,
        }
    }

    /// The raw surface contact point (pad offset removed).
    #[must_use]
    pub fn surface_point(&self, pad_thickness: f64) -> Point3<f64> {
        self.position - self.normal * pad_thickness
    }
}
