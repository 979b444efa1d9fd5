//! The whiteSpace facet

use crate::error::{Error, Result};

/// White space handling modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WhiteSpace {
    /// Preserve all white space
    Preserve,
    /// Replace tabs and newlines with spaces
    Replace,
    /// Replace and collapse multiple spaces
    Collapse,
}

impl WhiteSpace {
    /// Parse from the facet's attribute value
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "preserve" => Ok(WhiteSpace::Preserve),
            "replace" => Ok(WhiteSpace::Replace),
            "collapse" => Ok(WhiteSpace::Collapse),
            _ => Err(Error::InvalidConfiguration(format!(
                "Invalid whiteSpace value: '{}'. Must be 'preserve', 'replace', or 'collapse'",
                s
            ))),
        }
    }

    /// Normalize a string according to this white space mode
    pub fn normalize(&self, s: &str) -> String {
        match self {
            WhiteSpace::Preserve => s.to_string(),
            WhiteSpace::Replace => s.replace(['\t', '\n', '\r'], " "),
            WhiteSpace::Collapse => {
                let mut result = String::with_capacity(s.len());
                let mut prev_space = true; // Start with true to trim leading spaces

                for c in s.chars() {
                    if matches!(c, ' ' | '\t' | '\n' | '\r') {
                        if !prev_space {
                            result.push(' ');
                            prev_space = true;
                        }
                    } else {
                        result.push(c);
                        prev_space = false;
                    }
                }

                if result.ends_with(' ') {
                    result.pop();
                }
                result
            }
        }
    }

    /// Check that a value is already normalized for this mode
    pub fn is_normalized(&self, value: &str) -> bool {
        match self {
            WhiteSpace::Preserve => true,
            WhiteSpace::Replace => !value.contains(['\t', '\n', '\r']),
            WhiteSpace::Collapse => {
                !value.contains(['\t', '\n', '\r'])
                    && !value.contains("  ")
                    && !value.starts_with(' ')
                    && !value.ends_with(' ')
            }
        }
    }
}
