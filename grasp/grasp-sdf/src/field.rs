//! The distance field capability.

use nalgebra::{Point3, Vector3};

/// A signed distance sample: distance to the nearest surface plus the
/// outward surface normal at the closest point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SdfSample {
    /// Signed distance: positive outside, negative inside.
    pub distance: f64,
    /// Unit normal pointing out of the solid.
    pub normal: Vector3<f64>,
}

impl SdfSample {
    /// Create a sample.
    #[inline]
    #[must_use]
    pub const fn new(distance: f64, normal: Vector3<f64>) -> Self {
        Self { distance, normal }
    }
}

/// The signed-distance capability consumed by the solvers.
///
/// Implementations must be pure with respect to a single solve: the surface
/// is immutable for the duration of any call that holds the field.
pub trait DistanceField {
    /// Sample the field at a point.
    fn sample(&self, point: Point3<f64>) -> SdfSample;

    /// Signed distance only.
    #[inline]
    fn distance(&self, point: Point3<f64>) -> f64 {
        self.sample(point).distance
    }

    /// Whether a point lies inside the solid.
    #[inline]
    fn is_inside(&self, point: Point3<f64>) -> bool {
        self.distance(point) < 0.0
    }

    /// Project a point onto the surface along the sampled normal.
    #[inline]
    fn project_to_surface(&self, point: Point3<f64>) -> Point3<f64> {
        let s = self.sample(point);
        point - s.normal * s.distance
    }
}

impl<F: DistanceField + ?Sized> DistanceField for &F {
    #[inline]
    fn sample(&self, point: Point3<f64>) -> SdfSample {
        (**self).sample(point)
    }
}

impl<F: DistanceField + ?Sized> DistanceField for Box<F> {
    #[inline]
    fn sample(&self, point: Point3<f64>) -> SdfSample {
        (**self).sample(point)
    }
}
