//! Display formatting for converted quantities
//!
//! Rounding and truncation live here, never in the converter.

/// Epsilon for treating a value as a whole number
const NEAR_INTEGER_EPSILON: f64 = 1e-6;

/// Render a quantity for display
///
/// Missing or NaN quantities render as an empty string ("nothing to
/// display"). Values within epsilon of an integer drop the decimal point
/// entirely; everything else is rounded to 2 decimal places with trailing
/// zeros trimmed. Always uses a dot decimal separator.
pub fn format_quantity(qty: Option<f64>) -> String {
    let Some(q) = qty else {
        return String::new();
    };
    if q.is_nan() {
        return String::new();
    }

    let rounded = q.round();
    if (q - rounded).abs() < NEAR_INTEGER_EPSILON {
        return format!("{}", rounded as i64);
    }

    let fixed = format!("{:.2}", q);
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_numbers_have_no_decimal_point() {
        assert_eq!(format_quantity(Some(3.0)), "3");
        assert_eq!(format_quantity(Some(12.0)), "12");
        assert_eq!(format_quantity(Some(0.0)), "0");
    }

    #[test]
    fn test_near_integers_snap_to_integer() {
        assert_eq!(format_quantity(Some(3.0000001)), "3");
        assert_eq!(format_quantity(Some(2.9999999)), "3");
    }

    #[test]
    fn test_bounded_precision() {
        assert_eq!(format_quantity(Some(3.25)), "3.25");
        assert_eq!(format_quantity(Some(2.0 / 3.0)), "0.67");
        assert_eq!(format_quantity(Some(1.234)), "1.23");
    }

    #[test]
    fn test_trailing_zeros_trimmed() {
        assert_eq!(format_quantity(Some(3.101)), "3.1");
        assert_eq!(format_quantity(Some(0.5)), "0.5");
    }

    #[test]
    fn test_none_and_nan_render_empty() {
        assert_eq!(format_quantity(None), "");
        assert_eq!(format_quantity(Some(f64::NAN)), "");
    }

    #[test]
    fn test_concrete_scenario_500g_doubled_to_kg() {
        use crate::units::convert_quantity;

        let converted = convert_quantity(Some(500.0), Some("g"), Some("kg"), 2.0);
        assert_eq!(format_quantity(converted), "1");
    }

    #[test]
    fn test_concrete_scenario_teaspoons_to_tablespoons() {
        use crate::units::convert_quantity;

        let converted = convert_quantity(Some(2.0), Some("tl"), Some("spl"), 1.0);
        assert_eq!(format_quantity(converted), "0.67");
    }
}
