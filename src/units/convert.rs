//! Quantity conversion
//!
//! Scales a stored ingredient quantity by a serving count and converts it
//! between units of the same category. Cross-category or unrecognized units
//! degrade to the scaled-but-unconverted value; this is policy, not an error.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::{base_factor, categorize_unit, UnitCategory};

/// Error for an out-of-range serving count
#[derive(Debug, Error, PartialEq, Eq)]
#[error("servings must be a positive integer, got {0}")]
pub struct InvalidServings(pub i64);

/// A user-adjustable serving multiplier, always a positive integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Servings(NonZeroU32);

impl Servings {
    /// One serving
    pub const ONE: Servings = Servings(NonZeroU32::MIN);

    /// Create from a raw count, rejecting zero and negative values
    pub fn new(count: i64) -> Result<Self, InvalidServings> {
        u32::try_from(count)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Servings)
            .ok_or(InvalidServings(count))
    }

    /// The serving count
    pub fn get(&self) -> u32 {
        self.0.get()
    }

    /// The count as a scale factor for quantity arithmetic
    pub fn as_f64(&self) -> f64 {
        f64::from(self.0.get())
    }
}

impl Default for Servings {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<i64> for Servings {
    type Error = InvalidServings;

    fn try_from(count: i64) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

impl From<Servings> for i64 {
    fn from(servings: Servings) -> i64 {
        i64::from(servings.get())
    }
}

/// Scale a stored quantity and convert it to the target unit
///
/// The scaled value `base_qty * scale` is always computed first. Conversion
/// is applied only when both units are recognized and share a category;
/// otherwise the scaled value is returned as-is. A missing quantity
/// propagates as None. No rounding happens here - display truncation is
/// [`format_quantity`](super::format::format_quantity)'s job, which keeps
/// this function numerically exact for chained calls.
///
/// Never panics, for any unit input.
pub fn convert_quantity(
    base_qty: Option<f64>,
    base_unit: Option<&str>,
    target_unit: Option<&str>,
    scale: f64,
) -> Option<f64> {
    let qty = base_qty?;
    let scaled = qty * scale;

    let from_category = categorize_unit(base_unit);
    let to_category = categorize_unit(target_unit);

    if from_category == UnitCategory::Unknown
        || to_category == UnitCategory::Unknown
        || from_category != to_category
    {
        tracing::debug!(
            from = ?base_unit,
            to = ?target_unit,
            "no conversion between {:?} and {:?}, returning scaled quantity",
            from_category,
            to_category
        );
        return Some(scaled);
    }

    // Both units are cataloged members of the same category, so the factor
    // lookups cannot miss.
    let from_factor = base_factor(base_unit?)?;
    let to_factor = base_factor(target_unit?)?;

    Some(scaled * from_factor / to_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::catalog::{MASS_UNITS, SPOON_UNITS, VOLUME_UNITS};

    #[test]
    fn test_identity_conversion() {
        for unit in MASS_UNITS.iter().chain(VOLUME_UNITS).chain(SPOON_UNITS) {
            let result = convert_quantity(Some(7.5), Some(unit), Some(unit), 1.0);
            assert_eq!(result, Some(7.5), "identity failed for {}", unit);
        }
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let pairs = [("g", "kg"), ("ml", "cup"), ("tl", "spl"), ("oz", "lb")];
        for (a, b) in pairs {
            let there = convert_quantity(Some(123.45), Some(a), Some(b), 1.0).unwrap();
            let back = convert_quantity(Some(there), Some(b), Some(a), 1.0).unwrap();
            assert!((back - 123.45).abs() < 1e-9, "round trip failed for {}/{}", a, b);
        }
    }

    #[test]
    fn test_mass_conversion() {
        // 500 g at 2 servings -> 1000 g -> 1 kg
        let result = convert_quantity(Some(500.0), Some("g"), Some("kg"), 2.0);
        assert_eq!(result, Some(1.0));
    }

    #[test]
    fn test_spoon_conversion() {
        // 2 tl -> 2/3 spl
        let result = convert_quantity(Some(2.0), Some("tl"), Some("spl"), 1.0).unwrap();
        assert!((result - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_cross_category_returns_scaled() {
        // kg -> ml: different categories, scale only
        assert_eq!(
            convert_quantity(Some(10.0), Some("kg"), Some("ml"), 1.0),
            Some(10.0)
        );
        assert_eq!(
            convert_quantity(Some(10.0), Some("kg"), Some("ml"), 3.0),
            Some(30.0)
        );
    }

    #[test]
    fn test_unknown_unit_returns_scaled() {
        assert_eq!(
            convert_quantity(Some(4.0), Some("scoop"), Some("g"), 2.0),
            Some(8.0)
        );
        assert_eq!(
            convert_quantity(Some(4.0), Some("g"), None, 2.0),
            Some(8.0)
        );
    }

    #[test]
    fn test_piece_is_scale_only() {
        // 3 tk at 4 servings -> 12 tk, unaffected by conversion
        assert_eq!(
            convert_quantity(Some(3.0), Some("tk"), Some("tk"), 4.0),
            Some(12.0)
        );
    }

    #[test]
    fn test_null_quantity_propagates() {
        assert_eq!(convert_quantity(None, Some("g"), Some("kg"), 2.0), None);
    }

    #[test]
    fn test_scaling_linearity() {
        for s in 1..=6 {
            let scaled = convert_quantity(Some(250.0), Some("g"), Some("kg"), s as f64).unwrap();
            let unit = convert_quantity(Some(250.0), Some("g"), Some("kg"), 1.0).unwrap();
            assert!((scaled - unit * s as f64).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_scale_yields_zero() {
        assert_eq!(
            convert_quantity(Some(42.0), Some("g"), Some("kg"), 0.0),
            Some(0.0)
        );
    }

    #[test]
    fn test_no_rounding_inside_converter() {
        // 1 g -> kg must stay exact, not get truncated to 0
        let result = convert_quantity(Some(1.0), Some("g"), Some("kg"), 1.0).unwrap();
        assert_eq!(result, 0.001);
    }

    #[test]
    fn test_servings_rejects_non_positive() {
        assert_eq!(Servings::new(0), Err(InvalidServings(0)));
        assert_eq!(Servings::new(-3), Err(InvalidServings(-3)));
        assert_eq!(Servings::new(2).unwrap().get(), 2);
        assert_eq!(Servings::default().get(), 1);
    }

    #[test]
    fn test_servings_serde_boundary() {
        let s: Servings = serde_json::from_str("4").unwrap();
        assert_eq!(s.get(), 4);
        assert!(serde_json::from_str::<Servings>("0").is_err());
        assert!(serde_json::from_str::<Servings>("-1").is_err());
    }
}
