//! Lexical-space primitives
//!
//! The building blocks every builtin type descriptor is composed from:
//! compiled patterns, structured predicates, and bounded integer ranges that
//! compare digit strings instead of parsing into fixed-width integers.

use crate::names;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

/// A lexical-space check owned by a single type descriptor
#[derive(Clone, Copy)]
pub enum Lexical {
    /// Every string is accepted
    Any,
    /// The value must match a pattern
    Pattern(&'static Lazy<Regex>),
    /// The value must satisfy a structured check
    Predicate(fn(&str) -> bool),
    /// The value (already a valid integer literal) must lie in the range
    IntegerRange {
        /// Inclusive lower bound
        min: Option<&'static str>,
        /// Inclusive upper bound
        max: Option<&'static str>,
    },
}

impl Lexical {
    /// Run the check against an already sanitized value
    pub fn check(&self, value: &str) -> bool {
        match self {
            Lexical::Any => true,
            Lexical::Pattern(re) => re.is_match(value),
            Lexical::Predicate(f) => f(value),
            Lexical::IntegerRange { min, max } => {
                if !INTEGER.is_match(value) {
                    return false;
                }
                let lower_ok = min.map_or(true, |m| compare_integers(value, m) != Ordering::Less);
                let upper_ok = max.map_or(true, |m| compare_integers(value, m) != Ordering::Greater);
                lower_ok && upper_ok
            }
        }
    }

    /// Short human readable description used in violation reasons
    pub fn describe(&self) -> String {
        match self {
            Lexical::Any => "any string".to_string(),
            Lexical::Pattern(re) => format!("pattern {}", re.as_str()),
            Lexical::Predicate(_) => "structural check".to_string(),
            Lexical::IntegerRange { min, max } => format!(
                "integer in [{}, {}]",
                min.unwrap_or("-inf"),
                max.unwrap_or("+inf")
            ),
        }
    }
}

impl fmt::Debug for Lexical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lexical({})", self.describe())
    }
}

// =============================================================================
// Patterns
// =============================================================================

const YEAR: &str = r"-?([1-9][0-9]{3,}|0[0-9]{3})";
const MONTH: &str = r"(0[1-9]|1[0-2])";
const DAY: &str = r"(0[1-9]|[12][0-9]|3[01])";
const TIME: &str = r"(([01][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9](\.[0-9]+)?|24:00:00(\.0+)?)";
const TIMEZONE: &str = r"(Z|[+-]((0[0-9]|1[0-3]):[0-5][0-9]|14:00))?";

fn anchored(body: &str) -> Regex {
    Regex::new(&format!("^{}$", body)).unwrap()
}

/// xs:decimal
pub static DECIMAL: Lazy<Regex> = Lazy::new(|| anchored(r"[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)"));

/// xs:integer
pub static INTEGER: Lazy<Regex> = Lazy::new(|| anchored(r"[+-]?[0-9]+"));

/// xs:boolean
pub static BOOLEAN: Lazy<Regex> = Lazy::new(|| anchored(r"(true|false|1|0)"));

/// xs:float and xs:double
pub static FLOATING: Lazy<Regex> = Lazy::new(|| {
    anchored(r"([+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([Ee][+-]?[0-9]+)?|[+-]?INF|NaN)")
});

/// xs:language
pub static LANGUAGE: Lazy<Regex> = Lazy::new(|| anchored(r"[a-zA-Z]{1,8}(-[a-zA-Z0-9]{1,8})*"));

/// xs:hexBinary
pub static HEX_BINARY: Lazy<Regex> = Lazy::new(|| anchored(r"([0-9a-fA-F]{2})*"));

static BASE64: Lazy<Regex> = Lazy::new(|| {
    anchored(r"([A-Za-z0-9+/]{4})*([A-Za-z0-9+/][AQgw]==|[A-Za-z0-9+/]{2}[AEIMQUYcgkosw048]=)?")
});

static DURATION: Lazy<Regex> = Lazy::new(|| {
    anchored(r"-?P([0-9]+Y)?([0-9]+M)?([0-9]+D)?(T([0-9]+H)?([0-9]+M)?([0-9]+(\.[0-9]+)?S)?)?")
});

static DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    anchored(&format!("{}-{}-{}T{}{}", YEAR, MONTH, DAY, TIME, TIMEZONE))
});

static DATE: Lazy<Regex> =
    Lazy::new(|| anchored(&format!("{}-{}-{}{}", YEAR, MONTH, DAY, TIMEZONE)));

/// xs:time
pub static TIME_OF_DAY: Lazy<Regex> = Lazy::new(|| anchored(&format!("{}{}", TIME, TIMEZONE)));

/// xs:gYearMonth
pub static G_YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| anchored(&format!("{}-{}{}", YEAR, MONTH, TIMEZONE)));

/// xs:gYear
pub static G_YEAR: Lazy<Regex> = Lazy::new(|| anchored(&format!("{}{}", YEAR, TIMEZONE)));

static G_MONTH_DAY: Lazy<Regex> =
    Lazy::new(|| anchored(&format!("--{}-{}{}", MONTH, DAY, TIMEZONE)));

/// xs:gDay
pub static G_DAY: Lazy<Regex> = Lazy::new(|| anchored(&format!("---{}{}", DAY, TIMEZONE)));

/// xs:gMonth
pub static G_MONTH: Lazy<Regex> = Lazy::new(|| anchored(&format!("--{}{}", MONTH, TIMEZONE)));

/// Required timezone suffix of xs:dateTimeStamp
pub static EXPLICIT_TIMEZONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(Z|[+-][0-9]{2}:[0-9]{2})$").unwrap());

// =============================================================================
// Predicates
// =============================================================================

/// No TAB, LF or CR characters
pub fn is_normalized_string(value: &str) -> bool {
    !value.contains(['\t', '\n', '\r'])
}

/// No leading, trailing or doubled spaces (in addition to normalizedString)
pub fn is_token(value: &str) -> bool {
    !value.starts_with(' ') && !value.ends_with(' ') && !value.contains("  ")
}

/// xs:Name
pub fn is_name(value: &str) -> bool {
    names::is_valid_name(value)
}

/// xs:NCName
pub fn is_ncname(value: &str) -> bool {
    names::is_valid_ncname(value)
}

/// xs:NMTOKEN
pub fn is_nmtoken(value: &str) -> bool {
    names::is_valid_nmtoken(value)
}

/// xs:QName and xs:NOTATION
pub fn is_qname(value: &str) -> bool {
    names::is_valid_qname(value)
}

/// xs:duration: at least one component, and no dangling `T`
pub fn is_duration(value: &str) -> bool {
    DURATION.is_match(value) && !value.ends_with('P') && !value.ends_with('T')
}

/// xs:dateTime with a day that exists in its month
pub fn is_date_time(value: &str) -> bool {
    DATE_TIME.is_match(value) && has_valid_day(value)
}

/// xs:date with a day that exists in its month
pub fn is_date(value: &str) -> bool {
    DATE.is_match(value) && has_valid_day(value)
}

/// xs:gMonthDay; February 29th is allowed
pub fn is_g_month_day(value: &str) -> bool {
    if !G_MONTH_DAY.is_match(value) {
        return false;
    }
    let month: u32 = value[2..4].parse().unwrap_or(0);
    let day: u32 = value[5..7].parse().unwrap_or(0);
    day <= days_in_month(month, true)
}

/// xs:base64Binary; single spaces between characters are allowed
pub fn is_base64(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| *c != ' ').collect();
    BASE64.is_match(&compact)
}

/// xs:anyURI: no control characters and well-formed percent escapes
pub fn is_any_uri(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < 0x20 || b == 0x7f {
            return false;
        }
        if b == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            match escape {
                Some(hex) if hex.iter().all(u8::is_ascii_hexdigit) => i += 2,
                _ => return false,
            }
        }
        i += 1;
    }
    true
}

fn is_leap_year(year_digits: &str) -> bool {
    // 10000 is a multiple of 400, so the last four digits decide
    let tail = &year_digits[year_digits.len().saturating_sub(4)..];
    let year: u32 = tail.parse().unwrap_or(0);
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(month: u32, leap: bool) -> u32 {
    match month {
        2 if leap => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Check the day of a value starting with `[-]YYYY-MM-DD`
fn has_valid_day(value: &str) -> bool {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let mut parts = unsigned.splitn(3, '-');
    let (Some(year), Some(month), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let month: u32 = month.parse().unwrap_or(0);
    let day: u32 = rest.get(..2).and_then(|d| d.parse().ok()).unwrap_or(0);
    day <= days_in_month(month, is_leap_year(year))
}

// =============================================================================
// Integer ranges
// =============================================================================

/// Split a valid integer literal into sign and significant digits
fn integer_parts(literal: &str) -> (bool, &str) {
    let (negative, digits) = match literal.as_bytes().first() {
        Some(b'-') => (true, &literal[1..]),
        Some(b'+') => (false, &literal[1..]),
        _ => (false, literal),
    };
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        (false, "0")
    } else {
        (negative, digits)
    }
}

/// Compare two integer literals of arbitrary length
pub fn compare_integers(a: &str, b: &str) -> Ordering {
    let (a_neg, a_digits) = integer_parts(a);
    let (b_neg, b_digits) = integer_parts(b);

    match (a_neg, b_neg) {
        (false, true) => Ordering::Greater,
        (true, false) => Ordering::Less,
        (negative, _) => {
            let magnitude = a_digits
                .len()
                .cmp(&b_digits.len())
                .then_with(|| a_digits.cmp(b_digits));
            if negative {
                magnitude.reverse()
            } else {
                magnitude
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_integers() {
        assert_eq!(compare_integers("10", "9"), Ordering::Greater);
        assert_eq!(compare_integers("-10", "-9"), Ordering::Less);
        assert_eq!(compare_integers("-0", "+0000"), Ordering::Equal);
        assert_eq!(compare_integers("007", "7"), Ordering::Equal);
        assert_eq!(
            compare_integers("18446744073709551616", "18446744073709551615"),
            Ordering::Greater
        );
        assert_eq!(compare_integers("-1", "0"), Ordering::Less);
    }

    #[test]
    fn test_integer_range() {
        let byte = Lexical::IntegerRange {
            min: Some("-128"),
            max: Some("127"),
        };
        assert!(byte.check("127"));
        assert!(byte.check("-128"));
        assert!(byte.check("+0000127"));
        assert!(!byte.check("128"));
        assert!(!byte.check("-129"));
        assert!(!byte.check("1.0"));
        assert!(!byte.check(""));
    }

    #[test]
    fn test_duration() {
        assert!(is_duration("P1Y2M3DT10H30M"));
        assert!(is_duration("-P120D"));
        assert!(is_duration("PT0.5S"));
        assert!(!is_duration("P"));
        assert!(!is_duration("P1DT"));
        assert!(!is_duration("1Y"));
        assert!(!is_duration("P1S"));
    }

    #[test]
    fn test_dates() {
        assert!(is_date("2024-02-29"));
        assert!(is_date("2000-02-29Z"));
        assert!(!is_date("1900-02-29"));
        assert!(!is_date("2023-02-29"));
        assert!(!is_date("2024-04-31"));
        assert!(!is_date("2024-13-01"));
        assert!(is_date("-0044-03-15"));
        assert!(is_date_time("2024-01-15T10:30:00.123+02:00"));
        assert!(is_date_time("2024-01-15T24:00:00"));
        assert!(!is_date_time("2024-01-15T24:00:01"));
        assert!(!is_date_time("2024-01-15 10:30:00"));
        assert!(!is_date_time("2024-01-15T10:30:00+15:00"));
    }

    #[test]
    fn test_g_month_day() {
        assert!(is_g_month_day("--02-29"));
        assert!(!is_g_month_day("--04-31"));
        assert!(is_g_month_day("--12-25Z"));
    }

    #[test]
    fn test_base64() {
        assert!(is_base64(""));
        assert!(is_base64("SGVsbG8="));
        assert!(is_base64("SGVs bG8="));
        assert!(is_base64("QQ=="));
        assert!(!is_base64("QR=="));
        assert!(!is_base64("SGVsbG8"));
        assert!(!is_base64("SGVs*G8="));
    }

    #[test]
    fn test_any_uri() {
        assert!(is_any_uri("https://example.org/a%20b"));
        assert!(is_any_uri("urn:oasis:names:tc:SAML:2.0:assertion"));
        assert!(is_any_uri("../relative"));
        assert!(!is_any_uri("https://example.org/%zz"));
        assert!(!is_any_uri("bad\u{7f}"));
    }
}
