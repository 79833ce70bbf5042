//! Format checks shared by the schema, intake, and designer.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("valid regex"));

/// Returns `true` if `value` looks like an e-mail address.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Returns `true` if `value` is blank or parses as a finite number.
///
/// Surrounding whitespace is ignored, so `" 42 "` and `"   "` both pass.
pub fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Returns `true` for `#rgb` or `#rrggbb` colors.
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR_RE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_numeric() {
        for ok in ["42", "-3.5", " 7 ", "1e3", "", "   "] {
            assert!(is_numeric(ok), "{ok:?} should be numeric");
        }
        for bad in ["abc", "4 2", "NaN", "inf", "12px"] {
            assert!(!is_numeric(bad), "{bad:?} should not be numeric");
        }
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#3B82F6"));
        assert!(!is_hex_color("3b82f6"));
        assert!(!is_hex_color("#ffff"));
        assert!(!is_hex_color("#ggg"));
    }
}
