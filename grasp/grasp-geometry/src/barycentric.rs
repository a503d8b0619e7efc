//! Barycentric coordinate solve and interpolation.

use nalgebra::Point3;

/// Denominator threshold below which a triangle is treated as degenerate
/// and the solve falls back to the uniform centroid weights.
pub const DEGENERATE_DENOMINATOR: f64 = 1e-5;

/// Barycentric coordinates of a point with respect to a triangle.
///
/// The point is implicitly projected onto the triangle's plane. For a
/// degenerate (near-zero area) triangle the uniform centroid weights
/// (⅓, ⅓, ⅓) are returned instead of dividing by a vanishing denominator.
///
/// # Example
///
/// ```
/// use grasp_geometry::barycentric_coordinates;
/// use nalgebra::Point3;
///
/// let a = Point3::new(0.0, 0.0, 0.0);
/// let b = Point3::new(1.0, 0.0, 0.0);
/// let c = Point3::new(0.0, 1.0, 0.0);
///
/// // Query exactly at vertex b
/// let w = barycentric_coordinates(b, a, b, c);
/// assert!((w[1] - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn barycentric_coordinates(
    point: Point3<f64>,
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
) -> [f64; 3] {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = point - a;

    let d00 = v0.dot(&v0);
    let d01 = v0.dot(&v1);
    let d11 = v1.dot(&v1);
    let d20 = v2.dot(&v0);
    let d21 = v2.dot(&v1);

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < DEGENERATE_DENOMINATOR {
        // Degenerate triangle: centroid fallback
        return [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];
    }

    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    [1.0 - v - w, v, w]
}

/// Reconstruct a point from barycentric weights over a triangle.
#[inline]
#[must_use]
pub fn barycentric_interpolate(
    weights: [f64; 3],
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
) -> Point3<f64> {
    Point3::from(a.coords * weights[0] + b.coords * weights[1] + c.coords * weights[2])
}
