//! Pre-evaluation filter for untrusted XPath expressions
//!
//! The filter does not parse XPath. It removes the contents of string
//! literals, then makes one pass over the remaining text looking for names
//! followed by `::` (an axis step) or `(` (a call). Known axes and functions
//! that are not on the allow-list reject the whole expression.
//!
//! ```rust
//! use xml_common::xpath::{check_axes, check_functions};
//!
//! assert!(check_functions("count(//a)", &["count"]).is_ok());
//! assert!(check_functions("'count()'", &[]).is_ok());
//! assert!(check_axes("ancestor::x", &["self"]).is_err());
//! ```

use crate::error::{Error, Result};
use crate::xpath::inventory::{is_axis, is_function, XPathAxis};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Axes allowed by [`XPathFilter::default`]: everything but `namespace`
pub const DEFAULT_ALLOWED_AXES: [&str; 12] = [
    "child",
    "descendant",
    "descendant-or-self",
    "self",
    "parent",
    "ancestor",
    "ancestor-or-self",
    "following-sibling",
    "preceding-sibling",
    "following",
    "preceding",
    "attribute",
];

/// Functions allowed by [`XPathFilter::default`]
pub const DEFAULT_ALLOWED_FUNCTIONS: [&str; 1] = ["not"];

static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"]*"|'[^']*'"#).unwrap());

/// Replace every string literal by an empty one (`'abc'` becomes `''`)
///
/// An unterminated quote is left in place, so the text after it is still
/// inspected.
pub fn remove_string_literals(expression: &str) -> String {
    STRING_LITERAL
        .replace_all(expression, |caps: &Captures<'_>| {
            let quote = &caps[0][..1];
            format!("{}{}", quote, quote)
        })
        .into_owned()
}

/// What follows a name token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRole {
    /// `name ::`
    Axis,
    /// `name (`
    Call,
    /// Anything else
    Other,
}

/// An unprefixed name found by [`scan_names`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameToken<'a> {
    /// The name
    pub name: &'a str,
    /// Byte offset of the name
    pub offset: usize,
    /// Whether it is used as an axis or called
    pub role: NameRole,
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || (!c.is_ascii() && c.is_alphabetic())
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-' || c == '.'
}

/// Find every unprefixed name and the role it plays
///
/// Names are maximal runs of name characters, so a name is never reported
/// as a suffix of a longer one. Prefixed names (`ns:f`) and variable
/// references (`$v`) are skipped. Runs in linear time.
pub fn scan_names(expression: &str) -> Vec<NameToken<'_>> {
    let bytes = expression.as_bytes();
    let mut tokens = Vec::new();
    let mut chars = expression.char_indices().peekable();
    let mut previous: Option<char> = None;

    while let Some((start, c)) = chars.next() {
        if c.is_ascii_digit() || c == '.' {
            // numbers and abbreviated steps: skip digits and dots only
            while let Some(&(_, n)) = chars.peek() {
                if n.is_ascii_digit() || n == '.' {
                    chars.next();
                } else {
                    break;
                }
            }
            previous = Some(c);
            continue;
        }
        if !is_name_start(c) {
            previous = Some(c);
            continue;
        }

        let is_variable = previous == Some('$');
        let mut end = start + c.len_utf8();
        let mut prefixed = false;
        loop {
            while let Some(&(i, n)) = chars.peek() {
                if is_name_char(n) {
                    end = i + n.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            // a single ':' followed by a name start makes a prefixed name;
            // '::' ends the name
            if prefixed || bytes.get(end) != Some(&b':') {
                break;
            }
            let after = expression[end + 1..].chars().next();
            match after {
                Some(n) if is_name_start(n) => {
                    prefixed = true;
                    chars.next();
                    end += 1;
                }
                _ => break,
            }
        }

        let name = &expression[start..end];
        previous = name.chars().last();

        // look past whitespace without consuming anything else
        let rest = expression[end..].trim_start();
        let role = if rest.starts_with("::") {
            NameRole::Axis
        } else if rest.starts_with('(') {
            NameRole::Call
        } else {
            NameRole::Other
        };

        if !prefixed && !is_variable {
            tokens.push(NameToken {
                name,
                offset: start,
                role,
            });
        }
    }

    tokens
}

/// Reject `expression` if it uses a known axis not in `allowed`
pub fn check_axes(expression: &str, allowed: &[&str]) -> Result<()> {
    let cleaned = remove_string_literals(expression);
    for token in scan_names(&cleaned) {
        if token.role == NameRole::Axis && is_axis(token.name) && !allowed.contains(&token.name) {
            log::debug!("Rejected XPath expression using axis '{}'", token.name);
            return Err(Error::Runtime(format!(
                "XPath axis '{}' is not allowed",
                token.name
            )));
        }
    }
    Ok(())
}

/// Reject `expression` if it calls a known function not in `allowed`
pub fn check_functions(expression: &str, allowed: &[&str]) -> Result<()> {
    let cleaned = remove_string_literals(expression);
    for token in scan_names(&cleaned) {
        if token.role == NameRole::Call
            && is_function(token.name)
            && !allowed.contains(&token.name)
        {
            log::debug!("Rejected XPath expression calling '{}'", token.name);
            return Err(Error::Runtime(format!(
                "XPath function '{}' is not allowed",
                token.name
            )));
        }
    }
    Ok(())
}

/// Apply both checks
pub fn filter_xpath(expression: &str, axes: &[&str], functions: &[&str]) -> Result<()> {
    check_axes(expression, axes)?;
    check_functions(expression, functions)
}

/// A reusable allow-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPathFilter {
    axes: Vec<String>,
    functions: Vec<String>,
}

impl Default for XPathFilter {
    fn default() -> Self {
        Self::new(&DEFAULT_ALLOWED_AXES, &DEFAULT_ALLOWED_FUNCTIONS)
    }
}

impl XPathFilter {
    /// Create a filter allowing the given axes and functions
    pub fn new(axes: &[&str], functions: &[&str]) -> Self {
        Self {
            axes: axes.iter().map(|s| s.to_string()).collect(),
            functions: functions.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Allow every axis
    pub fn allow_all_axes(mut self) -> Self {
        self.axes = XPathAxis::ALL.iter().map(|a| a.name().to_string()).collect();
        self
    }

    /// Allow one more function
    pub fn allow_function(mut self, name: impl Into<String>) -> Self {
        self.functions.push(name.into());
        self
    }

    /// Check an expression
    pub fn check(&self, expression: &str) -> Result<()> {
        let axes: Vec<&str> = self.axes.iter().map(String::as_str).collect();
        let functions: Vec<&str> = self.functions.iter().map(String::as_str).collect();
        filter_xpath(expression, &axes, &functions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_remove_string_literals() {
        assert_eq!(remove_string_literals(r#"a["x'y" = 'count()']"#), r#"a["" = '']"#);
        assert_eq!(remove_string_literals("'open"), "'open");
        assert_eq!(remove_string_literals(""), "");
    }

    #[test]
    fn test_scan_names_roles() {
        let tokens = scan_names("child::a[count (b) > 1]/@id");
        let found: Vec<_> = tokens.iter().map(|t| (t.name, t.role)).collect();
        assert_eq!(
            found,
            vec![
                ("child", NameRole::Axis),
                ("a", NameRole::Other),
                ("count", NameRole::Call),
                ("b", NameRole::Other),
                ("id", NameRole::Other),
            ]
        );
    }

    #[test]
    fn test_scan_skips_prefixed_and_variables() {
        let names: Vec<_> = scan_names("ns:count(x) + $count + fn:id(1)")
            .iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["x"]);
    }

    #[test]
    fn test_scan_does_not_match_suffixes() {
        assert!(check_functions("my-count(a)", &[]).is_ok());
        assert!(check_functions("recount(a)", &[]).is_ok());
        assert!(check_axes("myself::a", &[]).is_ok());
    }

    #[test]
    fn test_minus_does_not_hide_a_call() {
        assert!(check_functions("1 -count(a)", &[]).is_err());
        assert!(check_functions("1-count(a)", &[]).is_err());
    }

    #[test]
    fn test_check_functions() {
        assert!(check_functions("count()", &["count"]).is_ok());
        let err = check_functions("count()", &[]).unwrap_err();
        assert!(err.is_runtime());
        assert!(err.to_string().contains("count"));
        assert!(check_functions("\"count()\"", &[]).is_ok());
        assert!(check_functions("document('x')", &["count"]).is_err());
    }

    #[test]
    fn test_node_tests_pass() {
        assert!(check_functions("//text() | //node() | comment()", &[]).is_ok());
        assert!(check_functions("processing-instruction('x')", &[]).is_ok());
    }

    #[test]
    fn test_check_axes() {
        assert!(check_axes("self::x", &["self"]).is_ok());
        let err = check_axes("ancestor::x", &["self"]).unwrap_err();
        assert!(err.to_string().contains("ancestor"));
        assert!(check_axes("ancestor :: x", &["self"]).is_err());
        assert!(check_axes("'ancestor::x'", &["self"]).is_ok());
    }

    #[test]
    fn test_default_filter() {
        let filter = XPathFilter::default();
        assert!(filter.check("/a/b[not(@c)]").is_ok());
        assert!(filter.check("namespace::*").is_err());
        assert!(filter.check("count(//a)").is_err());
        assert!(filter.clone().allow_function("count").check("count(//a)").is_ok());
        assert!(filter.allow_all_axes().check("namespace::*").is_ok());
    }
}
