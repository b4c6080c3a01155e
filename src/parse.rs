//! Lenient numeric parsing for raw census cells.
//!
//! The published tables leave cells blank instead of writing an explicit
//! zero, and the odd cell carries non-numeric noise. Both parse to 0 here,
//! matching how the original data was consumed for decades. This silently
//! masks malformed upstream data, so every coercion of *non-blank* text is
//! logged at warn level; watch those logs when ingesting a new extract.

use tracing::warn;

/// Parse a census count cell. Blank ⇒ 0, unparseable ⇒ 0 (logged).
pub fn parse_lenient_int(raw: &str) -> i32 {
    let v = raw.trim();
    if v.is_empty() {
        return 0;
    }
    match v.parse::<i32>() {
        Ok(n) => n,
        Err(_) => {
            warn!(cell = v, "non-numeric count cell coerced to 0");
            0
        }
    }
}

/// Parse a real-valued cell (area, easting, northing). Blank ⇒ 0.0,
/// unparseable ⇒ 0.0 (logged).
pub fn parse_lenient_double(raw: &str) -> f64 {
    let v = raw.trim();
    if v.is_empty() {
        return 0.0;
    }
    match v.parse::<f64>() {
        Ok(n) => n,
        Err(_) => {
            warn!(cell = v, "non-numeric measure cell coerced to 0.0");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cells_are_zero() {
        assert_eq!(parse_lenient_int(""), 0);
        assert_eq!(parse_lenient_int("   "), 0);
        assert_eq!(parse_lenient_double(""), 0.0);
    }

    #[test]
    fn numeric_cells_parse() {
        assert_eq!(parse_lenient_int("42"), 42);
        assert_eq!(parse_lenient_int(" -7 "), -7);
        assert_eq!(parse_lenient_double("153.25"), 153.25);
        assert_eq!(parse_lenient_double("-0.5"), -0.5);
    }

    #[test]
    fn junk_cells_coerce_to_zero() {
        assert_eq!(parse_lenient_int("n/a"), 0);
        assert_eq!(parse_lenient_int("5.0"), 0);
        assert_eq!(parse_lenient_double("five"), 0.0);
    }
}
