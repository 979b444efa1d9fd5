//! XML name validation and utilities
//!
//! Validation of Name, NCName, QName and Nmtoken productions following the
//! character classes of XML 1.0 (fifth edition).

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// NameStartChar without the colon
const NC_NAME_START_CHAR: &str = r"A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\u{37F}-\u{1FFF}\u{200C}-\u{200D}\u{2070}-\u{218F}\u{2C00}-\u{2FEF}\u{3001}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFFD}\u{10000}-\u{EFFFF}";

/// Characters allowed after the first one, in addition to NameStartChar
const NAME_CHAR_EXTRA: &str = r"\-\.0-9\u{B7}\u{300}-\u{36F}\u{203F}-\u{2040}";

static NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^[:{start}][:{start}{extra}]*$",
        start = NC_NAME_START_CHAR,
        extra = NAME_CHAR_EXTRA
    ))
    .unwrap()
});

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^[{start}][{start}{extra}]*$",
        start = NC_NAME_START_CHAR,
        extra = NAME_CHAR_EXTRA
    ))
    .unwrap()
});

static NMTOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^[:{start}{extra}]+$",
        start = NC_NAME_START_CHAR,
        extra = NAME_CHAR_EXTRA
    ))
    .unwrap()
});

/// Check if a string is a valid XML Name
pub fn is_valid_name(name: &str) -> bool {
    NAME.is_match(name)
}

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Check if a string is a valid Nmtoken
pub fn is_valid_nmtoken(name: &str) -> bool {
    NMTOKEN.is_match(name)
}

/// Check if a string is a valid QName (qualified name)
pub fn is_valid_qname(name: &str) -> bool {
    // QName can be "prefix:localName" or just "localName"
    if let Some((prefix, local)) = name.split_once(':') {
        is_valid_ncname(prefix) && is_valid_ncname(local)
    } else {
        is_valid_ncname(name)
    }
}

/// Validate an NCName and return an error if invalid
pub fn validate_ncname(name: &str) -> Result<()> {
    if is_valid_ncname(name) {
        Ok(())
    } else {
        Err(Error::violation(format!("Invalid NCName: '{}'", name)))
    }
}

/// Validate a QName and return an error if invalid
pub fn validate_qname(name: &str) -> Result<()> {
    if is_valid_qname(name) {
        Ok(())
    } else {
        Err(Error::violation(format!("Invalid QName: '{}'", name)))
    }
}

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}
