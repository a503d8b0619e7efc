//! Radial basis function interpolation.
//!
//! Interpolates a smooth displacement field from a sparse set of driver
//! points. The field is built by solving a dense linear system that makes the
//! interpolant match the driver displacements exactly.

use crate::{GeometryError, GeometryResult};
use nalgebra::{DMatrix, DVector, Point3, Vector3};

/// Regularization ladder applied when the kernel matrix is near-singular.
///
/// Each retry adds the next ridge value to the diagonal before factoring
/// again; the solve fails only if the final rung is still singular.
const RIDGE_LADDER: [f64; 4] = [1e-10, 1e-8, 1e-6, 1e-4];

/// RBF kernel function.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[non_exhaustive]
pub enum RbfKernel {
    /// Thin-plate spline `r² ln r`. Smooth global deformations; solved with
    /// affine polynomial terms for stability.
    #[default]
    ThinPlateSpline,

    /// Gaussian `exp(-r²/σ²)`. Local support controlled by `sigma`.
    Gaussian {
        /// Support radius parameter.
        sigma: f64,
    },

    /// Multiquadric `√(r² + c²)`. Balanced local/global influence.
    Multiquadric {
        /// Shape parameter.
        c: f64,
    },
}

impl RbfKernel {
    /// Evaluate the kernel at distance `r`.
    #[must_use]
    pub fn evaluate(&self, r: f64) -> f64 {
        match self {
            Self::ThinPlateSpline => {
                if r < 1e-10 {
                    0.0
                } else {
                    r * r * r.ln()
                }
            }
            Self::Gaussian { sigma } => (-(r * r) / (sigma * sigma)).exp(),
            Self::Multiquadric { c } => (r * r + c * c).sqrt(),
        }
    }

    /// Whether the kernel needs affine polynomial terms in the system.
    #[must_use]
    pub const fn needs_polynomial_terms(&self) -> bool {
        matches!(self, Self::ThinPlateSpline)
    }
}

/// A solved RBF displacement field.
///
/// # Example
///
/// ```
/// use grasp_geometry::{RbfInterpolator, RbfKernel};
/// use nalgebra::{Point3, Vector3};
///
/// let sources = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(0.0, 0.0, 1.0),
/// ];
/// let lift = Vector3::new(0.0, 0.0, 0.1);
/// let displacements = vec![lift; 4];
///
/// let field = RbfInterpolator::solve(
///     &sources,
///     &displacements,
///     RbfKernel::Gaussian { sigma: 1.0 },
/// ).unwrap();
///
/// // The field reproduces the driver displacement at a driver point
/// let d = field.displacement(&sources[0]);
/// assert!((d - lift).norm() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct RbfInterpolator {
    sources: Vec<Point3<f64>>,
    kernel: RbfKernel,
    weights: [DVector<f64>; 3],
    has_polynomial: bool,
}

impl RbfInterpolator {
    /// Solve the interpolation system for a set of driver displacements.
    ///
    /// # Errors
    ///
    /// - [`GeometryError::NoConstraints`] for empty input.
    /// - [`GeometryError::MismatchedConstraints`] if the slices differ in
    ///   length.
    /// - [`GeometryError::SingularSystem`] if the kernel matrix stays
    ///   singular through the whole regularization ladder.
    pub fn solve(
        sources: &[Point3<f64>],
        displacements: &[Vector3<f64>],
        kernel: RbfKernel,
    ) -> GeometryResult<Self> {
        if sources.is_empty() {
            return Err(GeometryError::NoConstraints);
        }
        if sources.len() != displacements.len() {
            return Err(GeometryError::MismatchedConstraints {
                sources: sources.len(),
                displacements: displacements.len(),
            });
        }

        let n = sources.len();
        let has_polynomial = kernel.needs_polynomial_terms();
        let size = if has_polynomial { n + 4 } else { n };

        let mut matrix = DMatrix::<f64>::zeros(size, size);
        for i in 0..n {
            for j in 0..n {
                let r = (sources[i] - sources[j]).norm();
                matrix[(i, j)] = kernel.evaluate(r);
            }
        }

        if has_polynomial {
            for i in 0..n {
                let p = &sources[i];
                matrix[(i, n)] = 1.0;
                matrix[(i, n + 1)] = p.x;
                matrix[(i, n + 2)] = p.y;
                matrix[(i, n + 3)] = p.z;
                matrix[(n, i)] = 1.0;
                matrix[(n + 1, i)] = p.x;
                matrix[(n + 2, i)] = p.y;
                matrix[(n + 3, i)] = p.z;
            }
        }

        let mut rhs = [
            DVector::<f64>::zeros(size),
            DVector::<f64>::zeros(size),
            DVector::<f64>::zeros(size),
        ];
        for (i, d) in displacements.iter().enumerate() {
            rhs[0][i] = d.x;
            rhs[1][i] = d.y;
            rhs[2][i] = d.z;
        }

        let weights = solve_regularized(matrix, &rhs, n)?;

        Ok(Self {
            sources: sources.to_vec(),
            kernel,
            weights,
            has_polynomial,
        })
    }

    /// Evaluate the displacement field at a point.
    #[must_use]
    pub fn displacement(&self, point: &Point3<f64>) -> Vector3<f64> {
        let n = self.sources.len();
        let mut out = Vector3::zeros();

        for (i, s) in self.sources.iter().enumerate() {
            let k = self.kernel.evaluate((point - s).norm());
            out.x += self.weights[0][i] * k;
            out.y += self.weights[1][i] * k;
            out.z += self.weights[2][i] * k;
        }

        if self.has_polynomial {
            for (axis, w) in self.weights.iter().enumerate() {
                out[axis] += w[n] + w[n + 1] * point.x + w[n + 2] * point.y + w[n + 3] * point.z;
            }
        }

        out
    }

    /// Apply the field to a point.
    #[inline]
    #[must_use]
    pub fn transform(&self, point: &Point3<f64>) -> Point3<f64> {
        point + self.displacement(point)
    }
}

/// LU-solve with partial pivoting, retrying up the ridge ladder when the
/// factorization fails or produces non-finite weights.
fn solve_regularized(
    matrix: DMatrix<f64>,
    rhs: &[DVector<f64>; 3],
    n: usize,
) -> GeometryResult<[DVector<f64>; 3]> {
    let mut ridge_used = 0.0;
    for attempt in 0..=RIDGE_LADDER.len() {
        let mut m = matrix.clone();
        if attempt > 0 {
            ridge_used = RIDGE_LADDER[attempt - 1];
            // Regularize only the kernel block; polynomial rows stay exact
            for i in 0..n {
                m[(i, i)] += ridge_used;
            }
        }

        let lu = m.lu();
        let solved: Option<Vec<DVector<f64>>> = rhs
            .iter()
            .map(|b| {
                lu.solve(b)
                    .filter(|w| w.iter().all(|x| x.is_finite()))
            })
            .collect();

        if let Some(ws) = solved {
            if let Ok(weights) = <[DVector<f64>; 3]>::try_from(ws) {
                return Ok(weights);
            }
        }
    }

    Err(GeometryError::SingularSystem {
        max_ridge: ridge_used,
    })
}
