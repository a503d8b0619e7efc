//! Union of distance fields.

use crate::{DistanceField, SdfError, SdfResult, SdfSample};
use nalgebra::Point3;

/// The union of several solids: the sample with the minimum signed distance
/// wins, carrying its normal along.
///
/// # Example
///
/// ```
/// use grasp_sdf::{DistanceField, SphereField, UnionField};
/// use nalgebra::Point3;
///
/// let pair = UnionField::new(vec![
///     Box::new(SphereField::new(Point3::new(-2.0, 0.0, 0.0), 1.0)),
///     Box::new(SphereField::new(Point3::new(2.0, 0.0, 0.0), 1.0)),
/// ]).unwrap();
///
/// // Halfway between: one unit from either sphere
/// assert!((pair.distance(Point3::origin()) - 1.0).abs() < 1e-12);
/// ```
pub struct UnionField {
    fields: Vec<Box<dyn DistanceField + Send + Sync>>,
}

impl UnionField {
    /// Build a union from boxed member fields.
    ///
    /// # Errors
    ///
    /// Returns [`SdfError::EmptyUnion`] if no members are supplied.
    pub fn new(fields: Vec<Box<dyn DistanceField + Send + Sync>>) -> SdfResult<Self> {
        if fields.is_empty() {
            return Err(SdfError::EmptyUnion);
        }
        Ok(Self { fields })
    }

    /// Number of member fields.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the union has no members (never true for a constructed value).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl std::fmt::Debug for UnionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnionField")
            .field("members", &self.fields.len())
            .finish()
    }
}

impl DistanceField for UnionField {
    fn sample(&self, point: Point3<f64>) -> SdfSample {
        let mut best: Option<SdfSample> = None;
        for field in &self.fields {
            let s = field.sample(point);
            match best {
                Some(b) if b.distance <= s.distance => {}
                _ => best = Some(s),
            }
        }
        // A constructed union always has at least one member
        best.unwrap_or(SdfSample::new(f64::MAX, nalgebra::Vector3::y()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SphereField;
    use approx::assert_relative_eq;

    #[test]
    fn empty_union_rejected() {
        assert!(matches!(UnionField::new(vec![]), Err(SdfError::EmptyUnion)));
    }

    #[test]
    fn nearest_member_wins() {
        let union = UnionField::new(vec![
            Box::new(SphereField::new(Point3::new(-3.0, 0.0, 0.0), 1.0)),
            Box::new(SphereField::new(Point3::new(3.0, 0.0, 0.0), 1.0)),
        ])
        .unwrap();

        let sample = union.sample(Point3::new(2.5, 0.0, 0.0));
        // Inside the right-hand sphere
        assert_relative_eq!(sample.distance, -0.5, epsilon = 1e-12);
        assert!(sample.normal.x < 0.0);
    }

    #[test]
    fn union_is_inside_any_member() {
        let union = UnionField::new(vec![
            Box::new(SphereField::new(Point3::new(-3.0, 0.0, 0.0), 1.0)),
            Box::new(SphereField::new(Point3::new(3.0, 0.0, 0.0), 1.0)),
        ])
        .unwrap();

        assert!(union.is_inside(Point3::new(-3.0, 0.5, 0.0)));
        assert!(union.is_inside(Point3::new(3.0, 0.5, 0.0)));
        assert!(!union.is_inside(Point3::origin()));
    }
}
