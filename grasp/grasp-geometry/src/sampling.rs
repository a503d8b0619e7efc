//! Direction sampling on the unit sphere.

use nalgebra::Vector3;

/// Generate `n` near-uniformly distributed unit directions using the
/// Fibonacci spiral.
///
/// Deterministic: the same `n` always yields the same directions. Used for
/// spherical candidate spreads and CPU-side visibility sweeps.
///
/// # Example
///
/// ```
/// use grasp_geometry::fibonacci_sphere;
///
/// let dirs = fibonacci_sphere(64);
/// assert_eq!(dirs.len(), 64);
/// for d in &dirs {
///     assert!((d.norm() - 1.0).abs() < 1e-12);
/// }
/// ```
#[must_use]
pub fn fibonacci_sphere(n: usize) -> Vec<Vector3<f64>> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![Vector3::z()];
    }

    let golden_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    #[allow(clippy::cast_precision_loss)]
    let count = n as f64;

    (0..n)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let idx = i as f64;
            // y runs from +1 to -1; radius is the circle at that latitude
            let y = 1.0 - 2.0 * idx / (count - 1.0);
            let radius = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden_angle * idx;
            Vector3::new(radius * theta.cos(), y, radius * theta.sin())
        })
        .collect()
}
