//! Unit catalog and category resolution
//!
//! Fixed partition of unit symbols into categories, each unit carrying a
//! conversion factor relative to its category base unit.

use serde::{Deserialize, Serialize};

/// Category of a measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    /// Mass units (g, kg, oz, lb)
    Mass,
    /// Volume units (ml, l, dl, fl oz, qt, gal, cup)
    Volume,
    /// Spoon units (tl = teaspoon, spl = tablespoon)
    Spoon,
    /// Discrete pieces (tk) - converts only to itself
    Piece,
    /// Unrecognized or missing unit
    Unknown,
}

/// Mass units, base gram. Order is the picker order.
pub const MASS_UNITS: &[&str] = &["g", "kg", "oz", "lb"];

/// Volume units, base milliliter. Order is the picker order.
pub const VOLUME_UNITS: &[&str] = &["ml", "l", "dl", "fl oz", "qt", "gal", "cup"];

/// Spoon units, base teaspoon. Order is the picker order.
pub const SPOON_UNITS: &[&str] = &["tl", "spl"];

/// Piece units. No alternatives.
pub const PIECE_UNITS: &[&str] = &["tk"];

// ============================================================================
// Conversion Factors (to category base unit)
// ============================================================================

/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.349523125;
/// Grams per pound
pub const G_PER_LB: f64 = 453.59237;
/// Milliliters per liter
pub const ML_PER_L: f64 = 1000.0;
/// Milliliters per deciliter
pub const ML_PER_DL: f64 = 100.0;
/// Milliliters per cup
pub const ML_PER_CUP: f64 = 240.0;
/// Milliliters per fluid ounce
pub const ML_PER_FL_OZ: f64 = 29.5735;
/// Milliliters per quart (US)
pub const ML_PER_QT: f64 = 946.353;
/// Milliliters per gallon (US)
pub const ML_PER_GAL: f64 = 3785.41;
/// Teaspoons per tablespoon
pub const TL_PER_SPL: f64 = 3.0;

/// Get the conversion factor to the category base unit for a cataloged unit
///
/// Base units (g, ml, tl, tk) have factor 1. Returns None for unrecognized
/// symbols. Case-insensitive; "fl oz" is a two-word symbol.
pub fn base_factor(unit: &str) -> Option<f64> {
    let lower = unit.to_lowercase();
    let trimmed = lower.trim();

    match trimmed {
        // mass (g base)
        "g" => Some(1.0),
        "kg" => Some(G_PER_KG),
        "oz" => Some(G_PER_OZ),
        "lb" => Some(G_PER_LB),

        // volume (ml base)
        "ml" => Some(1.0),
        "l" => Some(ML_PER_L),
        "dl" => Some(ML_PER_DL),
        "cup" => Some(ML_PER_CUP),
        "fl oz" => Some(ML_PER_FL_OZ),
        "qt" => Some(ML_PER_QT),
        "gal" => Some(ML_PER_GAL),

        // spoons (tl base)
        "tl" => Some(1.0),
        "spl" => Some(TL_PER_SPL),

        // pieces
        "tk" => Some(1.0),

        _ => None,
    }
}

/// Determine the category of a unit symbol
///
/// Pure function: case-folds, trims, returns `Unknown` for missing or
/// unrecognized symbols.
pub fn categorize_unit(unit: Option<&str>) -> UnitCategory {
    let Some(unit) = unit else {
        return UnitCategory::Unknown;
    };

    let lower = unit.to_lowercase();
    let trimmed = lower.trim();

    if MASS_UNITS.contains(&trimmed) {
        return UnitCategory::Mass;
    }
    if VOLUME_UNITS.contains(&trimmed) {
        return UnitCategory::Volume;
    }
    if SPOON_UNITS.contains(&trimmed) {
        return UnitCategory::Spoon;
    }
    if PIECE_UNITS.contains(&trimmed) {
        return UnitCategory::Piece;
    }

    UnitCategory::Unknown
}

/// Get the ordered list of interchangeable units for a unit symbol
///
/// Used to populate a unit picker. Piece units have no alternatives; an
/// unrecognized unit yields a single-element list with the original symbol
/// (no conversion possible); a missing unit yields an empty list.
pub fn unit_options(unit: Option<&str>) -> Vec<String> {
    let Some(unit) = unit else {
        return Vec::new();
    };

    let category = categorize_unit(Some(unit));
    let canonical = match category {
        UnitCategory::Mass => MASS_UNITS,
        UnitCategory::Volume => VOLUME_UNITS,
        UnitCategory::Spoon => SPOON_UNITS,
        UnitCategory::Piece => PIECE_UNITS,
        UnitCategory::Unknown => return vec![unit.to_string()],
    };

    canonical.iter().map(|u| u.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_mass_units() {
        assert_eq!(categorize_unit(Some("g")), UnitCategory::Mass);
        assert_eq!(categorize_unit(Some("kg")), UnitCategory::Mass);
        assert_eq!(categorize_unit(Some("oz")), UnitCategory::Mass);
        assert_eq!(categorize_unit(Some("lb")), UnitCategory::Mass);
    }

    #[test]
    fn test_categorize_volume_units() {
        assert_eq!(categorize_unit(Some("ml")), UnitCategory::Volume);
        assert_eq!(categorize_unit(Some("l")), UnitCategory::Volume);
        assert_eq!(categorize_unit(Some("dl")), UnitCategory::Volume);
        assert_eq!(categorize_unit(Some("cup")), UnitCategory::Volume);
        assert_eq!(categorize_unit(Some("fl oz")), UnitCategory::Volume);
    }

    #[test]
    fn test_categorize_spoon_and_piece_units() {
        assert_eq!(categorize_unit(Some("tl")), UnitCategory::Spoon);
        assert_eq!(categorize_unit(Some("spl")), UnitCategory::Spoon);
        assert_eq!(categorize_unit(Some("tk")), UnitCategory::Piece);
    }

    #[test]
    fn test_categorize_is_case_insensitive() {
        assert_eq!(categorize_unit(Some("KG")), UnitCategory::Mass);
        assert_eq!(categorize_unit(Some("Fl Oz")), UnitCategory::Volume);
        assert_eq!(categorize_unit(Some(" tl ")), UnitCategory::Spoon);
    }

    #[test]
    fn test_categorize_unknown() {
        assert_eq!(categorize_unit(None), UnitCategory::Unknown);
        assert_eq!(categorize_unit(Some("scoop")), UnitCategory::Unknown);
        assert_eq!(categorize_unit(Some("")), UnitCategory::Unknown);
    }

    #[test]
    fn test_base_factor_base_units_are_one() {
        assert_eq!(base_factor("g"), Some(1.0));
        assert_eq!(base_factor("ml"), Some(1.0));
        assert_eq!(base_factor("tl"), Some(1.0));
        assert_eq!(base_factor("tk"), Some(1.0));
    }

    #[test]
    fn test_base_factor_derived_units() {
        assert_eq!(base_factor("kg"), Some(G_PER_KG));
        assert_eq!(base_factor("lb"), Some(G_PER_LB));
        assert_eq!(base_factor("cup"), Some(ML_PER_CUP));
        assert_eq!(base_factor("fl oz"), Some(ML_PER_FL_OZ));
        assert_eq!(base_factor("spl"), Some(TL_PER_SPL));
        assert_eq!(base_factor("handful"), None);
    }

    #[test]
    fn test_unit_options_mass() {
        let options = unit_options(Some("kg"));
        assert_eq!(options, vec!["g", "kg", "oz", "lb"]);
    }

    #[test]
    fn test_unit_options_volume_picker_order() {
        let options = unit_options(Some("dl"));
        assert_eq!(options, vec!["ml", "l", "dl", "fl oz", "qt", "gal", "cup"]);
    }

    #[test]
    fn test_unit_options_piece_has_no_alternatives() {
        assert_eq!(unit_options(Some("tk")), vec!["tk"]);
    }

    #[test]
    fn test_unit_options_unrecognized_returns_original() {
        assert_eq!(unit_options(Some("scoop")), vec!["scoop"]);
    }

    #[test]
    fn test_unit_options_none_is_empty() {
        assert!(unit_options(None).is_empty());
    }

    #[test]
    fn test_every_cataloged_unit_has_a_factor() {
        for unit in MASS_UNITS
            .iter()
            .chain(VOLUME_UNITS)
            .chain(SPOON_UNITS)
            .chain(PIECE_UNITS)
        {
            assert!(base_factor(unit).is_some(), "missing factor for {}", unit);
        }
    }
}
