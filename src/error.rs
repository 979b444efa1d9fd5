//! Error types for xml-common
//!
//! Every fallible operation in the crate returns [`Result`]. The variants
//! separate schema correctness problems (the input is not valid for its XSD
//! type) from host failures and from programmer errors detected when types
//! or handlers are registered.

use std::fmt;
use thiserror::Error;

/// Result type alias using the xml-common Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xml-common operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input fails an XSD lexical or structural constraint
    #[error("schema violation: {0}")]
    SchemaViolation(#[from] SchemaViolation),

    /// Host or environment failure (numeric overflow, rejected XPath,
    /// unreadable provider files)
    #[error("runtime error: {0}")]
    Runtime(String),

    /// A handler or type definition does not satisfy what the crate requires
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A processing limit was exceeded
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// XML parsing or writing error
    #[error("XML error: {0}")]
    Xml(String),
}

impl Error {
    /// Shorthand for a schema violation carrying only a message
    pub fn violation(message: impl Into<String>) -> Self {
        Error::SchemaViolation(SchemaViolation::new(message))
    }

    /// Check if this error is a schema violation
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, Error::SchemaViolation(_))
    }

    /// Check if this error is a runtime error
    pub fn is_runtime(&self) -> bool {
        matches!(self, Error::Runtime(_))
    }
}

/// Schema violation with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Error message
    pub message: String,
    /// XSD type or component the value was checked against
    pub type_name: Option<String>,
    /// The offending literal
    pub value: Option<String>,
    /// Detailed reason
    pub reason: Option<String>,
}

impl SchemaViolation {
    /// Create a new schema violation
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            type_name: None,
            value: None,
            reason: None,
        }
    }

    /// Set the type name
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Set the offending value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref type_name) = self.type_name {
            write!(f, " (xs:{})", type_name)?;
        }

        if let Some(ref value) = self.value {
            write!(f, "\n\nValue: '{}'", value)?;
        }

        if let Some(ref reason) = self.reason {
            write!(f, "\n\nReason: {}", reason)?;
        }

        Ok(())
    }
}

impl std::error::Error for SchemaViolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_violation_display() {
        let err = SchemaViolation::new("'12a' is not a valid integer")
            .with_type_name("integer")
            .with_value("12a")
            .with_reason("unexpected character 'a'");

        let msg = format!("{}", err);
        assert!(msg.contains("'12a' is not a valid integer"));
        assert!(msg.contains("(xs:integer)"));
        assert!(msg.contains("Value:"));
        assert!(msg.contains("Reason:"));
    }

    #[test]
    fn test_error_conversion() {
        let violation = SchemaViolation::new("test");
        let err: Error = violation.into();
        assert!(matches!(err, Error::SchemaViolation(_)));
        assert!(err.is_schema_violation());
        assert!(!err.is_runtime());
    }

    #[test]
    fn test_runtime_is_distinct() {
        let err = Error::Runtime("overflow".to_string());
        assert!(err.is_runtime());
        assert!(!err.is_schema_violation());
        assert_eq!(err.to_string(), "runtime error: overflow");
    }
}
