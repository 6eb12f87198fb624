use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::consts::{COEFFICIENT_LIMIT, RANGE_EPSILON};

/// Input bound of one of the two ranges.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Lower bound of range 1.
    Min1,
    /// Upper bound of range 1.
    Max1,
    /// Lower bound of range 2.
    Min2,
    /// Upper bound of range 2.
    Max2,
}

impl Bound {
    /// Port name of the bound.
    pub const fn key(self) -> &'static str {
        match self {
            Bound::Min1 => "Min 1 (V)",
            Bound::Max1 => "Max 1 (V)",
            Bound::Min2 => "Min 2 (V)",
            Bound::Max2 => "Max 2 (V)",
        }
    }

    /// Resolve a port name to a bound.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Min 1 (V)" => Some(Bound::Min1),
            "Max 1 (V)" => Some(Bound::Max1),
            "Min 2 (V)" => Some(Bound::Min2),
            "Max 2 (V)" => Some(Bound::Max2),
            _ => None,
        }
    }
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Derived coefficient of the mapping.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Coefficient {
    /// Scale factor of the range 1 to range 2 transform.
    Scale12,
    /// Offset term of the range 1 to range 2 transform.
    Offset12,
    /// Scale factor of the range 2 to range 1 transform.
    Scale21,
    /// Offset term of the range 2 to range 1 transform.
    Offset21,
}

impl Coefficient {
    /// Port name of the coefficient.
    pub const fn key(self) -> &'static str {
        match self {
            Coefficient::Scale12 => "Scale 1-2",
            Coefficient::Offset12 => "Offset 1-2",
            Coefficient::Scale21 => "Scale 2-1",
            Coefficient::Offset21 => "Offset 2-1",
        }
    }

    /// Resolve a port name to a coefficient.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Scale 1-2" => Some(Coefficient::Scale12),
            "Offset 1-2" => Some(Coefficient::Offset12),
            "Scale 2-1" => Some(Coefficient::Scale21),
            "Offset 2-1" => Some(Coefficient::Offset21),
            _ => None,
        }
    }
}

impl std::fmt::Display for Coefficient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Affine transform coefficients.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    /// Scale factor.
    pub scale: f64,
    /// Offset term.
    pub offset: f64,
}

impl Affine {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: 0.0,
    };

    /// Apply the transform to a value.
    #[inline]
    pub fn apply(&self, value: f64) -> f64 {
        self.scale * value + self.offset
    }
}

/// Bidirectional affine mapping between two linear ranges.
///
/// The mapper holds the four range bounds and derives the unique affine
/// map sending range 1 onto range 2, together with its algebraic inverse.
/// Bounds are set one at a time; the coefficients are only recomputed on
/// an explicit [`RangeMapper::recompute`] call.
///
/// A degenerate or non-finite range has no well-defined affine map, so
/// recomputation falls back to the identity transform rather than
/// propagating NaN or infinity. The derived coefficients are always
/// finite.
#[derive(Clone, Debug)]
pub struct RangeMapper {
    min1: f64,
    max1: f64,
    min2: f64,
    max2: f64,
    forward: Affine,
    inverse: Affine,
}

impl Default for RangeMapper {
    fn default() -> Self {
        Self {
            min1: 0.0,
            max1: 1.0,
            min2: 0.0,
            max2: 1.0,
            forward: Affine::IDENTITY,
            inverse: Affine::IDENTITY,
        }
    }
}

impl RangeMapper {
    /// Construct a mapper with default bounds and identity transforms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of the given bound.
    pub fn bound(&self, bound: Bound) -> f64 {
        match bound {
            Bound::Min1 => self.min1,
            Bound::Max1 => self.max1,
            Bound::Min2 => self.min2,
            Bound::Max2 => self.max2,
        }
    }

    /// Overwrite the given bound.
    ///
    /// A non-finite value is ignored and the previous bound is retained.
    pub fn set_bound(&mut self, bound: Bound, value: f64) {
        if !value.is_finite() {
            log::trace!("Ignoring non-finite value for bound {}", bound);
            return;
        }

        match bound {
            Bound::Min1 => self.min1 = value,
            Bound::Max1 => self.max1 = value,
            Bound::Min2 => self.min2 = value,
            Bound::Max2 => self.max2 = value,
        }
    }

    /// Transform mapping range 1 onto range 2.
    #[inline]
    pub fn forward(&self) -> Affine {
        self.forward
    }

    /// Transform mapping range 2 onto range 1.
    #[inline]
    pub fn inverse(&self) -> Affine {
        self.inverse
    }

    /// Current value of the given coefficient.
    pub fn coefficient(&self, coefficient: Coefficient) -> f64 {
        match coefficient {
            Coefficient::Scale12 => self.forward.scale,
            Coefficient::Offset12 => self.forward.offset,
            Coefficient::Scale21 => self.inverse.scale,
            Coefficient::Offset21 => self.inverse.offset,
        }
    }

    fn reset_identity(&mut self) {
        self.forward = Affine::IDENTITY;
        self.inverse = Affine::IDENTITY;
    }

    /// Derive the coefficients from the current bounds.
    ///
    /// A non-finite bound, a range narrower than
    /// [`RANGE_EPSILON`](crate::consts::RANGE_EPSILON) or a non-finite
    /// intermediate resets both transforms to identity. Derived values are
    /// clamped to ±[`COEFFICIENT_LIMIT`](crate::consts::COEFFICIENT_LIMIT).
    pub fn recompute(&mut self) {
        if !self.min1.is_finite()
            || !self.max1.is_finite()
            || !self.min2.is_finite()
            || !self.max2.is_finite()
        {
            log::debug!("Non-finite bound, falling back to identity transform");
            self.reset_identity();
            return;
        }

        let range1 = self.max1 - self.min1;
        let range2 = self.max2 - self.min2;

        if !range1.is_finite()
            || !range2.is_finite()
            || range1.abs() < RANGE_EPSILON
            || range2.abs() < RANGE_EPSILON
        {
            log::debug!("Degenerate range, falling back to identity transform");
            self.reset_identity();
            return;
        }

        let scale12 = range2 / range1;
        let scale21 = range1 / range2;
        let offset12 = self.min2 - self.min1 * scale12;
        let offset21 = self.min1 - self.min2 * scale21;

        if !scale12.is_finite()
            || !scale21.is_finite()
            || !offset12.is_finite()
            || !offset21.is_finite()
        {
            log::debug!("Non-finite coefficient, falling back to identity transform");
            self.reset_identity();
            return;
        }

        self.forward = Affine {
            scale: scale12.clamp(-COEFFICIENT_LIMIT, COEFFICIENT_LIMIT),
            offset: offset12.clamp(-COEFFICIENT_LIMIT, COEFFICIENT_LIMIT),
        };
        self.inverse = Affine {
            scale: scale21.clamp(-COEFFICIENT_LIMIT, COEFFICIENT_LIMIT),
            offset: offset21.clamp(-COEFFICIENT_LIMIT, COEFFICIENT_LIMIT),
        };
    }
}

impl Block for RangeMapper {
    fn inputs() -> &'static [&'static str] {
        const INPUTS: &[&str] = &[
            Bound::Min1.key(),
            Bound::Max1.key(),
            Bound::Min2.key(),
            Bound::Max2.key(),
        ];
        INPUTS
    }

    fn outputs() -> &'static [&'static str] {
        const OUTPUTS: &[&str] = &[
            Coefficient::Scale12.key(),
            Coefficient::Offset12.key(),
            Coefficient::Scale21.key(),
            Coefficient::Offset21.key(),
        ];
        OUTPUTS
    }

    fn set_input(&mut self, key: &str, value: f64) {
        if let Some(bound) = Bound::from_key(key) {
            self.set_bound(bound, value);
        }
    }

    fn output(&self, key: &str) -> f64 {
        Coefficient::from_key(key).map_or(0.0, |coefficient| self.coefficient(coefficient))
    }

    fn update(&mut self) {
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn mapper_with_bounds(min1: f64, max1: f64, min2: f64, max2: f64) -> RangeMapper {
        let mut mapper = RangeMapper::new();
        mapper.set_bound(Bound::Min1, min1);
        mapper.set_bound(Bound::Max1, max1);
        mapper.set_bound(Bound::Min2, min2);
        mapper.set_bound(Bound::Max2, max2);
        mapper.recompute();
        mapper
    }

    #[test]
    fn test_default_identity() {
        let mapper = RangeMapper::new();

        assert_eq!(mapper.output("Scale 1-2"), 1.0);
        assert_eq!(mapper.output("Offset 1-2"), 0.0);
        assert_eq!(mapper.output("Scale 2-1"), 1.0);
        assert_eq!(mapper.output("Offset 2-1"), 0.0);
        assert_eq!(mapper.bound(Bound::Min1), 0.0);
        assert_eq!(mapper.bound(Bound::Max1), 1.0);
    }

    #[test]
    fn test_affine_correctness() {
        let mapper = mapper_with_bounds(0.0, 10.0, 0.0, 100.0);

        assert_eq!(mapper.coefficient(Coefficient::Scale12), 10.0);
        assert_eq!(mapper.coefficient(Coefficient::Offset12), 0.0);
        assert_eq!(mapper.coefficient(Coefficient::Scale21), 0.1);
        assert_eq!(mapper.coefficient(Coefficient::Offset21), 0.0);

        assert_eq!(mapper.forward().apply(0.0), 0.0);
        assert_eq!(mapper.forward().apply(10.0), 100.0);
        assert_eq!(mapper.inverse().apply(0.0), 0.0);
        assert_eq!(mapper.inverse().apply(100.0), 10.0);
    }

    #[test]
    fn test_nonzero_offset() {
        let mapper = mapper_with_bounds(-5.0, 5.0, 0.0, 1.0);

        assert!((mapper.coefficient(Coefficient::Scale12) - 0.1).abs() < TOLERANCE);
        assert!((mapper.coefficient(Coefficient::Offset12) - 0.5).abs() < TOLERANCE);
        assert!((mapper.forward().apply(-5.0)).abs() < TOLERANCE);
        assert!((mapper.forward().apply(5.0) - 1.0).abs() < TOLERANCE);
        assert!((mapper.inverse().apply(0.0) + 5.0).abs() < TOLERANCE);
        assert!((mapper.inverse().apply(1.0) - 5.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_degenerate_range_fallback() {
        let mapper = mapper_with_bounds(5.0, 5.0, 0.0, 10.0);

        assert_eq!(mapper.forward(), Affine::IDENTITY);
        assert_eq!(mapper.inverse(), Affine::IDENTITY);
    }

    #[test]
    fn test_near_degenerate_range_fallback() {
        let mapper = mapper_with_bounds(0.0, 1e-16, 0.0, 10.0);

        assert_eq!(mapper.forward(), Affine::IDENTITY);
        assert_eq!(mapper.inverse(), Affine::IDENTITY);
    }

    #[test]
    fn test_non_finite_input_ignored() {
        let mut mapper = RangeMapper::new();
        mapper.set_bound(Bound::Max1, 10.0);

        mapper.set_bound(Bound::Max1, f64::NAN);
        assert_eq!(mapper.bound(Bound::Max1), 10.0);

        mapper.set_bound(Bound::Max1, f64::INFINITY);
        assert_eq!(mapper.bound(Bound::Max1), 10.0);

        mapper.set_bound(Bound::Min2, 0.0);
        mapper.set_bound(Bound::Max2, 100.0);
        mapper.recompute();
        assert_eq!(mapper.coefficient(Coefficient::Scale12), 10.0);
    }

    #[test]
    fn test_non_finite_bound_resets_identity() {
        let mut mapper = mapper_with_bounds(0.0, 10.0, 0.0, 100.0);
        assert_eq!(mapper.coefficient(Coefficient::Scale12), 10.0);

        // Bounds cannot become non-finite through the public API; poke the
        // field directly to exercise the recompute guard.
        mapper.min1 = f64::NAN;
        mapper.recompute();

        assert_eq!(mapper.forward(), Affine::IDENTITY);
        assert_eq!(mapper.inverse(), Affine::IDENTITY);
    }

    #[test]
    fn test_scale_clamped() {
        let mapper = mapper_with_bounds(0.0, 1e-6, 0.0, 2.0);

        assert_eq!(mapper.coefficient(Coefficient::Scale12), 1e6);
        assert!((mapper.coefficient(Coefficient::Scale21) - 5e-7).abs() < TOLERANCE);
    }

    #[test]
    fn test_scale_clamped_negative() {
        let mapper = mapper_with_bounds(0.0, 1e-6, 0.0, -2.0);

        assert_eq!(mapper.coefficient(Coefficient::Scale12), -1e6);
    }

    #[test]
    fn test_unknown_port() {
        let mut mapper = mapper_with_bounds(0.0, 10.0, 0.0, 100.0);

        mapper.set_input("bogus", 5.0);
        assert_eq!(mapper.bound(Bound::Min1), 0.0);
        assert_eq!(mapper.bound(Bound::Max1), 10.0);
        assert_eq!(mapper.bound(Bound::Min2), 0.0);
        assert_eq!(mapper.bound(Bound::Max2), 100.0);

        assert_eq!(mapper.output("bogus"), 0.0);
    }

    #[test]
    fn test_port_match_is_exact() {
        let mut mapper = RangeMapper::new();

        mapper.set_input("Min 1 (V) ", 7.0);
        mapper.set_input("min 1 (V)", 7.0);
        mapper.set_input("Min 1", 7.0);

        assert_eq!(mapper.bound(Bound::Min1), 0.0);
        assert_eq!(mapper.output("scale 1-2"), 0.0);
    }

    #[test]
    fn test_inverse_consistency() {
        let mapper = mapper_with_bounds(-2.5, 7.5, 3.0, -11.0);

        let product =
            mapper.coefficient(Coefficient::Scale12) * mapper.coefficient(Coefficient::Scale21);
        assert!((product - 1.0).abs() < TOLERANCE);

        assert!((mapper.forward().apply(-2.5) - 3.0).abs() < TOLERANCE);
        assert!((mapper.forward().apply(7.5) + 11.0).abs() < TOLERANCE);
        assert!((mapper.inverse().apply(3.0) + 2.5).abs() < TOLERANCE);
        assert!((mapper.inverse().apply(-11.0) - 7.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_update_is_explicit() {
        let mut mapper = RangeMapper::new();

        mapper.set_input("Max 2 (V)", 100.0);
        assert_eq!(mapper.output("Scale 1-2"), 1.0);

        mapper.update();
        assert_eq!(mapper.output("Scale 1-2"), 100.0);
    }

    #[test]
    fn test_port_round_trip() {
        for key in RangeMapper::inputs() {
            assert_eq!(Bound::from_key(key).unwrap().key(), *key);
        }
        for key in RangeMapper::outputs() {
            assert_eq!(Coefficient::from_key(key).unwrap().key(), *key);
        }
    }
}
