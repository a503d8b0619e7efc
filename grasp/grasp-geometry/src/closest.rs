//! Closest-point queries on triangles and segments.

use nalgebra::Point3;

/// Compute the closest point on a triangle to a query point.
///
/// Implements the Voronoi-region walk from "Real-Time Collision Detection"
/// (Ericson).
///
/// # Example
///
/// ```
/// use grasp_geometry::closest_point_on_triangle;
/// use nalgebra::Point3;
///
/// let p = closest_point_on_triangle(
///     Point3::new(0.25, 0.25, 2.0),
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
/// assert!((p.z - 0.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn closest_point_on_triangle(
    point: Point3<f64>,
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
) -> Point3<f64> {
    closest_point_on_triangle_barycentric(point, a, b, c).0
}

/// Closest point on a triangle together with its barycentric coordinates.
///
/// The returned weights `[wa, wb, wc]` satisfy
/// `closest = wa·a + wb·b + wc·c` and sum to 1. Cluster construction uses the
/// weights directly; plain distance queries can ignore them.
#[must_use]
#[allow(clippy::many_single_char_names)] // Ericson's variable names
pub fn closest_point_on_triangle_barycentric(
    point: Point3<f64>,
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
) -> (Point3<f64>, [f64; 3]) {
    let ab = b - a;
    let ac = c - a;
    let ap = point - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);

    // Vertex region A
    if d1 <= 0.0 && d2 <= 0.0 {
        return (a, [1.0, 0.0, 0.0]);
    }

    let bp = point - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);

    // Vertex region B
    if d3 >= 0.0 && d4 <= d3 {
        return (b, [0.0, 1.0, 0.0]);
    }

    // Edge region AB
    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return (a + ab * v, [1.0 - v, v, 0.0]);
    }

    let cp = point - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);

    // Vertex region C
    if d6 >= 0.0 && d5 <= d6 {
        return (c, [0.0, 0.0, 1.0]);
    }

    // Edge region AC
    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return (a + ac * w, [1.0 - w, 0.0, w]);
    }

    // Edge region BC
    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return (b + (c - b) * w, [0.0, 1.0 - w, w]);
    }

    // Face region
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    (a + ab * v + ac * w, [1.0 - v - w, v, w])
}

/// Squared distance from a point to a line segment.
#[must_use]
pub fn point_segment_distance_squared(
    point: Point3<f64>,
    a: Point3<f64>,
    b: Point3<f64>,
) -> f64 {
    (point - closest_point_on_segment(point, a, b)).norm_squared()
}

/// Closest point on a segment to a query point.
#[must_use]
pub fn closest_point_on_segment(
    point: Point3<f64>,
    a: Point3<f64>,
    b: Point3<f64>,
) -> Point3<f64> {
    let ab = b - a;
    let t = (point - a).dot(&ab) / ab.norm_squared().max(f64::EPSILON);
    a + ab * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tri() -> (Point3<f64>, Point3<f64>, Point3<f64>) {
        (
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(5.0, 10.0, 0.0),
        )
    }

    #[test]
    fn face_region_projects_onto_plane() {
        let (a, b, c) = tri();
        let (p, bary) = closest_point_on_triangle_barycentric(Point3::new(5.0, 3.0, 4.0), a, b, c);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);
        let sum: f64 = bary.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn vertex_region_returns_vertex_weight() {
        let (a, b, c) = tri();
        let (p, bary) = closest_point_on_triangle_barycentric(Point3::new(-5.0, -5.0, 0.0), a, b, c);
        assert_relative_eq!((p - a).norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(bary[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn edge_region_weights_interpolate() {
        let (a, b, c) = tri();
        // Below the AB edge midpoint
        let (p, bary) = closest_point_on_triangle_barycentric(Point3::new(5.0, -3.0, 0.0), a, b, c);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(bary[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(bary[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(bary[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn barycentric_reconstructs_closest_point() {
        let (a, b, c) = tri();
        let q = Point3::new(3.0, 2.0, 7.0);
        let (p, w) = closest_point_on_triangle_barycentric(q, a, b, c);
        let rebuilt = Point3::from(a.coords * w[0] + b.coords * w[1] + c.coords * w[2]);
        assert_relative_eq!((p - rebuilt).norm(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn segment_distance_perpendicular() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(10.0, 0.0, 0.0);
        let d2 = point_segment_distance_squared(Point3::new(5.0, 5.0, 0.0), a, b);
        assert_relative_eq!(d2, 25.0, epsilon = 1e-12);
    }

    #[test]
    fn segment_distance_clamps_to_endpoint() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(10.0, 0.0, 0.0);
        let d2 = point_segment_distance_squared(Point3::new(-3.0, 4.0, 0.0), a, b);
        assert_relative_eq!(d2, 25.0, epsilon = 1e-12);
    }
}
