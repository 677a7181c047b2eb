//! Display-only formatting helpers.
//!
//! Nothing here feeds back into stored or sorted values.

/// Longest technology label shown before truncation.
pub const MAX_LABEL_CHARS: usize = 24;

/// Abbreviate a numeric metric value for display.
///
/// - `|v| >= 1_000` uses a K/M/B suffix (`1500.0` -> `"1.5K"`)
/// - `0 < |v| < 0.01` uses exponential notation (`0.00123` -> `"1.23e-3"`)
/// - otherwise two decimals with trailing zeros stripped (`2.50` -> `"2.5"`)
pub fn format_metric_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let abs = value.abs();
    if abs < 0.01 {
        return format!("{:.2e}", value);
    }

    // Pick the unit after rounding so 999_999 reads "1M" rather than "1000K".
    let mut unit = UNITS.iter().rposition(|(scale, _)| abs >= *scale).unwrap_or(0);
    loop {
        let (scale, suffix) = UNITS[unit];
        let mantissa = round2(value / scale);
        if mantissa.abs() >= 1e3 && unit + 1 < UNITS.len() {
            unit += 1;
            continue;
        }
        return format!("{}{}", two_decimals(mantissa), suffix);
    }
}

const UNITS: [(f64, &str); 4] = [(1.0, ""), (1e3, "K"), (1e6, "M"), (1e9, "B")];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn two_decimals(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Shortened display label for a technology identifier.
///
/// Drops parenthesised qualifiers (`"CCGT 500MW (Unit 3)"` -> `"CCGT 500MW"`),
/// collapses whitespace and truncates long names with an ellipsis. Pivot columns
/// are ordered case-insensitively on this form.
pub fn short_technology_label(technology: &str) -> String {
    let mut stripped = String::with_capacity(technology.len());
    let mut depth = 0usize;
    for ch in technology.chars() {
        match ch {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => stripped.push(ch),
            _ => {}
        }
    }

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let label = if collapsed.is_empty() {
        technology.trim().to_string()
    } else {
        collapsed
    };

    if label.chars().count() > MAX_LABEL_CHARS {
        let mut truncated: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        truncated.push('…');
        truncated
    } else {
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes() {
        assert_eq!(format_metric_value(1500.0), "1.5K");
        assert_eq!(format_metric_value(-2_500_000.0), "-2.5M");
        assert_eq!(format_metric_value(3_000_000_000.0), "3B");
        assert_eq!(format_metric_value(1000.0), "1K");
    }

    #[test]
    fn test_rounding_carries_into_next_suffix() {
        assert_eq!(format_metric_value(999_999.0), "1M");
        assert_eq!(format_metric_value(999.996), "1K");
        assert_eq!(format_metric_value(-999_999_000.0), "-1B");
        assert_eq!(format_metric_value(999_994.0), "999.99K");
    }

    #[test]
    fn test_small_values_use_exponent() {
        assert_eq!(format_metric_value(0.00123), "1.23e-3");
        assert_eq!(format_metric_value(-0.005), "-5.00e-3");
        assert_eq!(format_metric_value(0.0), "0");
    }

    #[test]
    fn test_plain_values_strip_zeros() {
        assert_eq!(format_metric_value(2.5), "2.5");
        assert_eq!(format_metric_value(12.0), "12");
        assert_eq!(format_metric_value(999.456), "999.46");
        assert_eq!(format_metric_value(0.01), "0.01");
    }

    #[test]
    fn test_short_label() {
        assert_eq!(short_technology_label("CCGT 500MW (Unit 3)"), "CCGT 500MW");
        assert_eq!(short_technology_label("  Wind   150MW "), "Wind 150MW");
        assert_eq!(short_technology_label("(only qualifier)"), "(only qualifier)");

        let long = short_technology_label("Offshore Wind Phase Two Expansion Block A");
        assert_eq!(long.chars().count(), MAX_LABEL_CHARS);
        assert!(long.ends_with('…'));
    }
}
