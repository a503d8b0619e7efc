//! Angular joint limits.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Flexion and abduction limits for one joint, in radians.
///
/// Immutable configuration: solvers read limits, they never mutate them.
///
/// # Example
///
/// ```
/// use grasp_types::JointLimits;
///
/// let limits = JointLimits::new(0.0, 90.0_f64.to_radians(), 20.0_f64.to_radians());
/// assert!(limits.contains_flexion(0.5));
/// assert!(!limits.contains_flexion(2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointLimits {
    min_flexion: f64,
    max_flexion: f64,
    abduction_range: f64,
}

impl JointLimits {
    /// Create limits from a flexion range and a symmetric abduction range.
    ///
    /// Swapped flexion bounds are corrected; the abduction range is taken as
    /// an absolute value.
    #[must_use]
    pub fn new(min_flexion: f64, max_flexion: f64, abduction_range: f64) -> Self {
        let (min_flexion, max_flexion) = if min_flexion <= max_flexion {
            (min_flexion, max_flexion)
        } else {
            (max_flexion, min_flexion)
        };
        Self {
            min_flexion,
            max_flexion,
            abduction_range: abduction_range.abs(),
        }
    }

    /// Flexion-only limits with no abduction freedom.
    #[must_use]
    pub fn flexion_only(min: f64, max: f64) -> Self {
        Self::new(min, max, 0.0)
    }

    /// Minimum flexion angle.
    #[inline]
    #[must_use]
    pub fn min_flexion(&self) -> f64 {
        self.min_flexion
    }

    /// Maximum flexion angle.
    #[inline]
    #[must_use]
    pub fn max_flexion(&self) -> f64 {
        self.max_flexion
    }

    /// Symmetric abduction bound (±).
    #[inline]
    #[must_use]
    pub fn abduction_range(&self) -> f64 {
        self.abduction_range
    }

    /// Whether a flexion angle is within limits.
    #[inline]
    #[must_use]
    pub fn contains_flexion(&self, angle: f64) -> bool {
        angle >= self.min_flexion && angle <= self.max_flexion
    }

    /// Clamp a flexion angle to the limit range.
    #[inline]
    #[must_use]
    pub fn clamp_flexion(&self, angle: f64) -> f64 {
        angle.clamp(self.min_flexion, self.max_flexion)
    }

    /// Clamp an abduction angle to the symmetric range.
    #[inline]
    #[must_use]
    pub fn clamp_abduction(&self, angle: f64) -> f64 {
        angle.clamp(-self.abduction_range, self.abduction_range)
    }
}

/// The anatomical limit set for a three-joint digit.
///
/// Defaults follow typical human ranges: MCP flexion 0–90° with ±20°
/// abduction, PIP 0–110°, DIP 0–80°, and the DIP angle slaved to the PIP at
/// a fixed ratio to model their tendon coupling.
///
/// # Example
///
/// ```
/// use grasp_types::FingerLimits;
///
/// let limits = FingerLimits::default();
/// let dip = limits.slaved_dip(1.0);
/// assert!((dip - 0.66).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FingerLimits {
    /// Metacarpophalangeal joint limits (flexion + abduction).
    pub mcp: JointLimits,
    /// Proximal interphalangeal joint limits.
    pub pip: JointLimits,
    /// Distal interphalangeal joint limits.
    pub dip: JointLimits,
    /// Ratio coupling DIP flexion to PIP flexion.
    pub dip_pip_ratio: f64,
}

impl FingerLimits {
    /// DIP flexion for a given PIP flexion, clamped to the DIP range.
    #[inline]
    #[must_use]
    pub fn slaved_dip(&self, pip_flexion: f64) -> f64 {
        self.dip.clamp_flexion(pip_flexion * self.dip_pip_ratio)
    }
}

impl Default for FingerLimits {
    fn default() -> Self {
        Self {
            mcp: JointLimits::new(0.0, 90.0_f64.to_radians(), 20.0_f64.to_radians()),
            pip: JointLimits::flexion_only(0.0, 110.0_f64.to_radians()),
            dip: JointLimits::flexion_only(0.0, 80.0_f64.to_radians()),
            dip_pip_ratio: 0.66,
        }
    }
}
