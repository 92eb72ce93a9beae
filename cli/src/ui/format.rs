/// Fraction digits kept when displaying amounts and rates.
const MAX_FRACTION_DIGITS: usize = 6;

/// Formats a number with thousands separators and at most six fraction
/// digits, dropping trailing zeros (`9000000.0` → `9,000,000`).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Avoid printing "-0" for values that round away
    let sign = if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };

    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_number;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_number(9_000_000.0), "9,000,000");
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(100_000.0), "100,000");
    }

    #[test]
    fn trims_fraction_digits() {
        assert_eq!(format_number(0.00005), "0.00005");
        assert_eq!(format_number(90_000.000_000_000_01), "90,000");
        assert_eq!(format_number(0.123_456_789), "0.123457");
        assert_eq!(format_number(0.000_000_1), "0");
    }

    #[test]
    fn negatives_and_oddities() {
        assert_eq!(format_number(-1234.5678), "-1,234.5678");
        assert_eq!(format_number(-0.000_000_1), "0");
        assert_eq!(format_number(f64::NAN), "-");
        assert_eq!(format_number(f64::INFINITY), "-");
    }
}
