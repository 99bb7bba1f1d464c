//! Number formatting for labels and ticks
//!
//! Rust's formatter has no shortest-of-fixed-or-exponent mode, so the
//! general (`%g`) format used for legend labels lives here.

/// Format `value` like C's `%.{precision}g`
///
/// Uses exponent notation when the decimal exponent is below -4 or at least
/// `precision`, fixed notation otherwise. Trailing zeros are removed.
/// Exponents carry a sign and at least two digits (`1.5e+04`).
pub fn format_general(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }

    let p = precision.max(1);
    let sci = format!("{:.*e}", p - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => (sci.clone(), 0),
    };

    if exp < -4 || exp >= p as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_zeros(&mantissa), sign, exp.abs())
    } else {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        strip_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Curve label for a snapshot at `time` seconds: `t = {%6.4g} s`
pub fn legend_label(time: f64) -> String {
    format!("t = {:>6} s", format_general(time, 4))
}

/// Split a tick value into mantissa and power of ten
///
/// Returns the exponent shared by an axis whose largest magnitude is
/// `max_abs` when it falls outside [1e-5, 1e6), else `None`.
pub fn offset_exponent(max_abs: f64) -> Option<i32> {
    if !max_abs.is_finite() || max_abs == 0.0 {
        return None;
    }
    let exp = max_abs.abs().log10().floor() as i32;
    if exp >= 6 || exp <= -5 {
        Some(exp)
    } else {
        None
    }
}

/// Tick label with up to three significant digits
pub fn tick_label(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format_general(value, 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_notation() {
        assert_eq!(format_general(1.5, 4), "1.5");
        assert_eq!(format_general(0.0, 4), "0");
        assert_eq!(format_general(100.0, 4), "100");
        assert_eq!(format_general(-2.25, 4), "-2.25");
        assert_eq!(format_general(0.000123, 4), "0.000123");
        assert_eq!(format_general(1234.0, 4), "1234");
    }

    #[test]
    fn test_exponent_notation() {
        assert_eq!(format_general(12346.0, 4), "1.235e+04");
        assert_eq!(format_general(1.0e-5, 4), "1e-05");
        assert_eq!(format_general(2.5e-7, 4), "2.5e-07");
        assert_eq!(format_general(6.02e23, 3), "6.02e+23");
    }

    #[test]
    fn test_rounding_bumps_exponent() {
        // 9999.7 rounds to 1.000e+04 at four significant digits
        assert_eq!(format_general(9999.7, 4), "1e+04");
    }

    #[test]
    fn test_legend_label_is_padded() {
        assert_eq!(legend_label(1.5), "t =    1.5 s");
        assert_eq!(legend_label(0.0), "t =      0 s");
        assert_eq!(legend_label(3.0e-4), "t = 0.0003 s");
        assert_eq!(legend_label(2.5e-5), "t = 2.5e-05 s");
    }

    #[test]
    fn test_offset_exponent() {
        assert_eq!(offset_exponent(4.0e8), Some(8));
        assert_eq!(offset_exponent(2.0e-6), Some(-6));
        assert_eq!(offset_exponent(999.0), None);
        assert_eq!(offset_exponent(0.0), None);
    }

    #[test]
    fn test_tick_label() {
        assert_eq!(tick_label(0.0), "0");
        assert_eq!(tick_label(2.5), "2.5");
        assert_eq!(tick_label(1.0e8), "1e+08");
    }
}
