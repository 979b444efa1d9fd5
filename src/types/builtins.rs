//! XSD built-in types
//!
//! Every builtin datatype is a declarative [`TypeDescriptor`]: its name, the
//! type it restricts, its whiteSpace facet and its own lexical check. The
//! restriction hierarchy is data, and [`TypeDescriptor::validate`] always
//! walks it from the root down, so a derived type enforces every ancestor's
//! constraint without having to remember to call them.

use crate::error::{Error, Result, SchemaViolation};
use crate::limits::MAX_LIST_TOKENS;
use crate::types::lexical::{self, Lexical};
use crate::types::whitespace::WhiteSpace;
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// XSD Type Names
// =============================================================================

/// XSD anySimpleType type name
pub const XSD_ANY_SIMPLE_TYPE: &str = "anySimpleType";
/// XSD string type name
pub const XSD_STRING: &str = "string";
/// XSD normalizedString type name
pub const XSD_NORMALIZED_STRING: &str = "normalizedString";
/// XSD token type name
pub const XSD_TOKEN: &str = "token";
/// XSD language type name
pub const XSD_LANGUAGE: &str = "language";
/// XSD Name type name
pub const XSD_NAME: &str = "Name";
/// XSD NCName type name
pub const XSD_NCNAME: &str = "NCName";
/// XSD ID type name
pub const XSD_ID: &str = "ID";
/// XSD IDREF type name
pub const XSD_IDREF: &str = "IDREF";
/// XSD IDREFS type name
pub const XSD_IDREFS: &str = "IDREFS";
/// XSD ENTITY type name
pub const XSD_ENTITY: &str = "ENTITY";
/// XSD ENTITIES type name
pub const XSD_ENTITIES: &str = "ENTITIES";
/// XSD NMTOKEN type name
pub const XSD_NMTOKEN: &str = "NMTOKEN";
/// XSD NMTOKENS type name
pub const XSD_NMTOKENS: &str = "NMTOKENS";

/// XSD boolean type name
pub const XSD_BOOLEAN: &str = "boolean";

/// XSD decimal type name
pub const XSD_DECIMAL: &str = "decimal";
/// XSD integer type name
pub const XSD_INTEGER: &str = "integer";
/// XSD nonPositiveInteger type name
pub const XSD_NON_POSITIVE_INTEGER: &str = "nonPositiveInteger";
/// XSD negativeInteger type name
pub const XSD_NEGATIVE_INTEGER: &str = "negativeInteger";
/// XSD long type name
pub const XSD_LONG: &str = "long";
/// XSD int type name
pub const XSD_INT: &str = "int";
/// XSD short type name
pub const XSD_SHORT: &str = "short";
/// XSD byte type name
pub const XSD_BYTE: &str = "byte";
/// XSD nonNegativeInteger type name
pub const XSD_NON_NEGATIVE_INTEGER: &str = "nonNegativeInteger";
/// XSD unsignedLong type name
pub const XSD_UNSIGNED_LONG: &str = "unsignedLong";
/// XSD unsignedInt type name
pub const XSD_UNSIGNED_INT: &str = "unsignedInt";
/// XSD unsignedShort type name
pub const XSD_UNSIGNED_SHORT: &str = "unsignedShort";
/// XSD unsignedByte type name
pub const XSD_UNSIGNED_BYTE: &str = "unsignedByte";
/// XSD positiveInteger type name
pub const XSD_POSITIVE_INTEGER: &str = "positiveInteger";

/// XSD float type name
pub const XSD_FLOAT: &str = "float";
/// XSD double type name
pub const XSD_DOUBLE: &str = "double";

/// XSD duration type name
pub const XSD_DURATION: &str = "duration";
/// XSD dateTime type name
pub const XSD_DATETIME: &str = "dateTime";
/// XSD dateTimeStamp type name (XSD 1.1)
pub const XSD_DATETIME_STAMP: &str = "dateTimeStamp";
/// XSD time type name
pub const XSD_TIME: &str = "time";
/// XSD date type name
pub const XSD_DATE: &str = "date";
/// XSD gYearMonth type name
pub const XSD_GYEAR_MONTH: &str = "gYearMonth";
/// XSD gYear type name
pub const XSD_GYEAR: &str = "gYear";
/// XSD gMonthDay type name
pub const XSD_GMONTH_DAY: &str = "gMonthDay";
/// XSD gDay type name
pub const XSD_GDAY: &str = "gDay";
/// XSD gMonth type name
pub const XSD_GMONTH: &str = "gMonth";

/// XSD hexBinary type name
pub const XSD_HEX_BINARY: &str = "hexBinary";
/// XSD base64Binary type name
pub const XSD_BASE64_BINARY: &str = "base64Binary";

/// XSD anyURI type name
pub const XSD_ANY_URI: &str = "anyURI";
/// XSD QName type name
pub const XSD_QNAME: &str = "QName";
/// XSD NOTATION type name
pub const XSD_NOTATION: &str = "NOTATION";

// =============================================================================
// Type Descriptor
// =============================================================================

/// Whether values are single items or whitespace-separated lists
#[derive(Debug, Clone, Copy)]
pub enum Variety {
    /// A single lexical item
    Atomic,
    /// A list whose items belong to the given type
    List(&'static TypeDescriptor),
}

/// Declarative definition of an XSD simple type
#[derive(Debug)]
pub struct TypeDescriptor {
    /// Type name (local name in the XSD namespace)
    pub name: &'static str,
    /// The type this one restricts (None only for anySimpleType)
    pub base: Option<&'static TypeDescriptor>,
    /// White space handling applied by `sanitize`
    pub white_space: WhiteSpace,
    /// This type's own lexical check, on top of its ancestors'
    pub lexical: Lexical,
    /// Atomic or list
    pub variety: Variety,
}

impl TypeDescriptor {
    /// Define an atomic restriction of `base`
    pub const fn restriction(
        name: &'static str,
        base: &'static TypeDescriptor,
        white_space: WhiteSpace,
        lexical: Lexical,
    ) -> Self {
        Self {
            name,
            base: Some(base),
            white_space,
            lexical,
            variety: Variety::Atomic,
        }
    }

    /// Define a list of `item`
    pub const fn list(name: &'static str, item: &'static TypeDescriptor) -> Self {
        Self {
            name,
            base: Some(&ANY_SIMPLE_TYPE),
            white_space: WhiteSpace::Collapse,
            lexical: Lexical::Any,
            variety: Variety::List(item),
        }
    }

    /// Look up a builtin type by name
    pub fn lookup(name: &str) -> Option<&'static TypeDescriptor> {
        BUILTIN_TYPES_BY_NAME.get(name).copied()
    }

    /// Look up a builtin type by name, failing for unknown names
    pub fn require(name: &str) -> Result<&'static TypeDescriptor> {
        Self::lookup(name).ok_or_else(|| {
            Error::InvalidConfiguration(format!("'{}' is not a builtin XSD type", name))
        })
    }

    /// Apply the whiteSpace facet
    pub fn sanitize(&self, raw: &str) -> String {
        self.white_space.normalize(raw)
    }

    /// Validate a sanitized value against this type and all its ancestors
    pub fn validate(&self, value: &str) -> Result<()> {
        if let Some(base) = self.base {
            base.validate(value).map_err(|e| self.rename_violation(e))?;
        }
        self.validate_own(value)
    }

    /// Sanitize, then validate
    pub fn check(&self, raw: &str) -> Result<String> {
        let value = self.sanitize(raw);
        self.validate(&value)?;
        Ok(value)
    }

    /// Check if a raw string belongs to this type
    pub fn is_valid(&self, raw: &str) -> bool {
        self.check(raw).is_ok()
    }

    /// Iterate over this type and its ancestors, most derived first
    pub fn ancestry(&'static self) -> impl Iterator<Item = &'static TypeDescriptor> {
        std::iter::successors(Some(self), |t| t.base)
    }

    /// Check if this type is `other` or derived from it by restriction
    pub fn is_derived_from(&'static self, other: &TypeDescriptor) -> bool {
        self.ancestry().any(|t| std::ptr::eq(t, other))
    }

    /// Item type for list types
    pub fn item_type(&self) -> Option<&'static TypeDescriptor> {
        match self.variety {
            Variety::List(item) => Some(item),
            Variety::Atomic => None,
        }
    }

    fn validate_own(&self, value: &str) -> Result<()> {
        match self.variety {
            Variety::Atomic => {
                if self.lexical.check(value) {
                    Ok(())
                } else {
                    Err(self.violation(value, self.lexical.describe()))
                }
            }
            Variety::List(item) => {
                let tokens = split_list(value);
                if tokens.is_empty() {
                    return Err(self.violation(value, "a list must contain at least one item"));
                }
                for token in tokens {
                    item.validate(token).map_err(|e| match e {
                        Error::SchemaViolation(inner) => {
                            let reason = format!(
                                "item '{}' is not a valid xs:{}: {}",
                                token, item.name, inner.message
                            );
                            self.violation(value, reason)
                        }
                        other => other,
                    })?;
                }
                Ok(())
            }
        }
    }

    fn violation(&self, value: &str, reason: impl Into<String>) -> Error {
        Error::SchemaViolation(
            SchemaViolation::new(format!("'{}' is not a valid xs:{}", value, self.name))
                .with_type_name(self.name)
                .with_value(value)
                .with_reason(reason),
        )
    }

    /// Report an ancestor's failure under this type's name
    fn rename_violation(&self, error: Error) -> Error {
        match error {
            Error::SchemaViolation(inner) => {
                let value = inner.value.clone().unwrap_or_default();
                let reason = match inner.reason {
                    Some(reason) if reason.contains("(inherited from xs:") => reason,
                    Some(reason) => format!(
                        "{} (inherited from xs:{})",
                        reason,
                        inner.type_name.unwrap_or_default()
                    ),
                    None => inner.message,
                };
                self.violation(&value, reason)
            }
            other => other,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "xs:{}", self.name)
    }
}

/// Split a list value on ASCII whitespace, keeping at most
/// [`MAX_LIST_TOKENS`] tokens; the remainder stays in the last token
pub fn split_list(value: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = value.trim_start_matches(|c: char| c.is_ascii_whitespace());

    while !rest.is_empty() {
        if tokens.len() + 1 == MAX_LIST_TOKENS {
            tokens.push(rest.trim_end_matches(|c: char| c.is_ascii_whitespace()));
            break;
        }
        match rest.find(|c: char| c.is_ascii_whitespace()) {
            Some(end) => {
                tokens.push(&rest[..end]);
                rest = rest[end..].trim_start_matches(|c: char| c.is_ascii_whitespace());
            }
            None => {
                tokens.push(rest);
                break;
            }
        }
    }

    tokens
}

// =============================================================================
// Builtin Descriptors
// =============================================================================

/// xs:anySimpleType, the root of every simple type
pub static ANY_SIMPLE_TYPE: TypeDescriptor = TypeDescriptor {
    name: XSD_ANY_SIMPLE_TYPE,
    base: None,
    white_space: WhiteSpace::Preserve,
    lexical: Lexical::Any,
    variety: Variety::Atomic,
};

/// xs:string
pub static STRING: TypeDescriptor =
    TypeDescriptor::restriction(XSD_STRING, &ANY_SIMPLE_TYPE, WhiteSpace::Preserve, Lexical::Any);
/// xs:normalizedString
pub static NORMALIZED_STRING: TypeDescriptor = TypeDescriptor::restriction(
    XSD_NORMALIZED_STRING,
    &STRING,
    WhiteSpace::Replace,
    Lexical::Predicate(lexical::is_normalized_string),
);
/// xs:token
pub static TOKEN: TypeDescriptor = TypeDescriptor::restriction(
    XSD_TOKEN,
    &NORMALIZED_STRING,
    WhiteSpace::Collapse,
    Lexical::Predicate(lexical::is_token),
);
/// xs:language
pub static LANGUAGE: TypeDescriptor = TypeDescriptor::restriction(
    XSD_LANGUAGE,
    &TOKEN,
    WhiteSpace::Collapse,
    Lexical::Pattern(&lexical::LANGUAGE),
);
/// xs:Name
pub static NAME: TypeDescriptor = TypeDescriptor::restriction(
    XSD_NAME,
    &TOKEN,
    WhiteSpace::Collapse,
    Lexical::Predicate(lexical::is_name),
);
/// xs:NCName
pub static NCNAME: TypeDescriptor = TypeDescriptor::restriction(
    XSD_NCNAME,
    &NAME,
    WhiteSpace::Collapse,
    Lexical::Predicate(lexical::is_ncname),
);
/// xs:ID
pub static ID: TypeDescriptor =
    TypeDescriptor::restriction(XSD_ID, &NCNAME, WhiteSpace::Collapse, Lexical::Any);
/// xs:IDREF
pub static IDREF: TypeDescriptor =
    TypeDescriptor::restriction(XSD_IDREF, &NCNAME, WhiteSpace::Collapse, Lexical::Any);
/// xs:IDREFS
pub static IDREFS: TypeDescriptor = TypeDescriptor::list(XSD_IDREFS, &IDREF);
/// xs:ENTITY
pub static ENTITY: TypeDescriptor =
    TypeDescriptor::restriction(XSD_ENTITY, &NCNAME, WhiteSpace::Collapse, Lexical::Any);
/// xs:ENTITIES
pub static ENTITIES: TypeDescriptor = TypeDescriptor::list(XSD_ENTITIES, &ENTITY);
/// xs:NMTOKEN
pub static NMTOKEN: TypeDescriptor = TypeDescriptor::restriction(
    XSD_NMTOKEN,
    &TOKEN,
    WhiteSpace::Collapse,
    Lexical::Predicate(lexical::is_nmtoken),
);
/// xs:NMTOKENS
pub static NMTOKENS: TypeDescriptor = TypeDescriptor::list(XSD_NMTOKENS, &NMTOKEN);

/// xs:boolean
pub static BOOLEAN: TypeDescriptor = TypeDescriptor::restriction(
    XSD_BOOLEAN,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Pattern(&lexical::BOOLEAN),
);

/// xs:decimal
pub static DECIMAL: TypeDescriptor = TypeDescriptor::restriction(
    XSD_DECIMAL,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Pattern(&lexical::DECIMAL),
);
/// xs:integer
pub static INTEGER: TypeDescriptor = TypeDescriptor::restriction(
    XSD_INTEGER,
    &DECIMAL,
    WhiteSpace::Collapse,
    Lexical::Pattern(&lexical::INTEGER),
);
/// xs:nonPositiveInteger
pub static NON_POSITIVE_INTEGER: TypeDescriptor = TypeDescriptor::restriction(
    XSD_NON_POSITIVE_INTEGER,
    &INTEGER,
    WhiteSpace::Collapse,
    Lexical::IntegerRange { min: None, max: Some("0") },
);
/// xs:negativeInteger
pub static NEGATIVE_INTEGER: TypeDescriptor = TypeDescriptor::restriction(
    XSD_NEGATIVE_INTEGER,
    &NON_POSITIVE_INTEGER,
    WhiteSpace::Collapse,
    Lexical::IntegerRange { min: None, max: Some("-1") },
);
/// xs:long
pub static LONG: TypeDescriptor = TypeDescriptor::restriction(
    XSD_LONG,
    &INTEGER,
    WhiteSpace::Collapse,
    Lexical::IntegerRange {
        min: Some("-9223372036854775808"),
        max: Some("9223372036854775807"),
    },
);
/// xs:int
pub static INT: TypeDescriptor = TypeDescriptor::restriction(
    XSD_INT,
    &LONG,
    WhiteSpace::Collapse,
    Lexical::IntegerRange {
        min: Some("-2147483648"),
        max: Some("2147483647"),
    },
);
/// xs:short
pub static SHORT: TypeDescriptor = TypeDescriptor::restriction(
    XSD_SHORT,
    &INT,
    WhiteSpace::Collapse,
    Lexical::IntegerRange {
        min: Some("-32768"),
        max: Some("32767"),
    },
);
/// xs:byte
pub static BYTE: TypeDescriptor = TypeDescriptor::restriction(
    XSD_BYTE,
    &SHORT,
    WhiteSpace::Collapse,
    Lexical::IntegerRange {
        min: Some("-128"),
        max: Some("127"),
    },
);
/// xs:nonNegativeInteger
pub static NON_NEGATIVE_INTEGER: TypeDescriptor = TypeDescriptor::restriction(
    XSD_NON_NEGATIVE_INTEGER,
    &INTEGER,
    WhiteSpace::Collapse,
    Lexical::IntegerRange { min: Some("0"), max: None },
);
/// xs:unsignedLong
pub static UNSIGNED_LONG: TypeDescriptor = TypeDescriptor::restriction(
    XSD_UNSIGNED_LONG,
    &NON_NEGATIVE_INTEGER,
    WhiteSpace::Collapse,
    Lexical::IntegerRange {
        min: Some("0"),
        max: Some("18446744073709551615"),
    },
);
/// xs:unsignedInt
pub static UNSIGNED_INT: TypeDescriptor = TypeDescriptor::restriction(
    XSD_UNSIGNED_INT,
    &UNSIGNED_LONG,
    WhiteSpace::Collapse,
    Lexical::IntegerRange {
        min: Some("0"),
        max: Some("4294967295"),
    },
);
/// xs:unsignedShort
pub static UNSIGNED_SHORT: TypeDescriptor = TypeDescriptor::restriction(
    XSD_UNSIGNED_SHORT,
    &UNSIGNED_INT,
    WhiteSpace::Collapse,
    Lexical::IntegerRange {
        min: Some("0"),
        max: Some("65535"),
    },
);
/// xs:unsignedByte
pub static UNSIGNED_BYTE: TypeDescriptor = TypeDescriptor::restriction(
    XSD_UNSIGNED_BYTE,
    &UNSIGNED_SHORT,
    WhiteSpace::Collapse,
    Lexical::IntegerRange {
        min: Some("0"),
        max: Some("255"),
    },
);
/// xs:positiveInteger
pub static POSITIVE_INTEGER: TypeDescriptor = TypeDescriptor::restriction(
    XSD_POSITIVE_INTEGER,
    &NON_NEGATIVE_INTEGER,
    WhiteSpace::Collapse,
    Lexical::IntegerRange { min: Some("1"), max: None },
);

/// xs:float
pub static FLOAT: TypeDescriptor = TypeDescriptor::restriction(
    XSD_FLOAT,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Pattern(&lexical::FLOATING),
);
/// xs:double
pub static DOUBLE: TypeDescriptor = TypeDescriptor::restriction(
    XSD_DOUBLE,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Pattern(&lexical::FLOATING),
);

/// xs:duration
pub static DURATION: TypeDescriptor = TypeDescriptor::restriction(
    XSD_DURATION,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Predicate(lexical::is_duration),
);
/// xs:dateTime
pub static DATETIME: TypeDescriptor = TypeDescriptor::restriction(
    XSD_DATETIME,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Predicate(lexical::is_date_time),
);
/// xs:dateTimeStamp
pub static DATETIME_STAMP: TypeDescriptor = TypeDescriptor::restriction(
    XSD_DATETIME_STAMP,
    &DATETIME,
    WhiteSpace::Collapse,
    Lexical::Pattern(&lexical::EXPLICIT_TIMEZONE),
);
/// xs:time
pub static TIME: TypeDescriptor = TypeDescriptor::restriction(
    XSD_TIME,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Pattern(&lexical::TIME_OF_DAY),
);
/// xs:date
pub static DATE: TypeDescriptor = TypeDescriptor::restriction(
    XSD_DATE,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Predicate(lexical::is_date),
);
/// xs:gYearMonth
pub static GYEAR_MONTH: TypeDescriptor = TypeDescriptor::restriction(
    XSD_GYEAR_MONTH,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Pattern(&lexical::G_YEAR_MONTH),
);
/// xs:gYear
pub static GYEAR: TypeDescriptor = TypeDescriptor::restriction(
    XSD_GYEAR,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Pattern(&lexical::G_YEAR),
);
/// xs:gMonthDay
pub static GMONTH_DAY: TypeDescriptor = TypeDescriptor::restriction(
    XSD_GMONTH_DAY,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Predicate(lexical::is_g_month_day),
);
/// xs:gDay
pub static GDAY: TypeDescriptor = TypeDescriptor::restriction(
    XSD_GDAY,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Pattern(&lexical::G_DAY),
);
/// xs:gMonth
pub static GMONTH: TypeDescriptor = TypeDescriptor::restriction(
    XSD_GMONTH,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Pattern(&lexical::G_MONTH),
);

/// xs:hexBinary
pub static HEX_BINARY: TypeDescriptor = TypeDescriptor::restriction(
    XSD_HEX_BINARY,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Pattern(&lexical::HEX_BINARY),
);
/// xs:base64Binary
pub static BASE64_BINARY: TypeDescriptor = TypeDescriptor::restriction(
    XSD_BASE64_BINARY,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Predicate(lexical::is_base64),
);

/// xs:anyURI
pub static ANY_URI: TypeDescriptor = TypeDescriptor::restriction(
    XSD_ANY_URI,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Predicate(lexical::is_any_uri),
);
/// xs:QName
pub static QNAME: TypeDescriptor = TypeDescriptor::restriction(
    XSD_QNAME,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Predicate(lexical::is_qname),
);
/// xs:NOTATION
pub static NOTATION: TypeDescriptor = TypeDescriptor::restriction(
    XSD_NOTATION,
    &ANY_SIMPLE_TYPE,
    WhiteSpace::Collapse,
    Lexical::Predicate(lexical::is_qname),
);

/// Every builtin type, roots before the types derived from them
pub static BUILTIN_TYPES: [&TypeDescriptor; 46] = [
    &ANY_SIMPLE_TYPE,
    &STRING,
    &NORMALIZED_STRING,
    &TOKEN,
    &LANGUAGE,
    &NAME,
    &NCNAME,
    &ID,
    &IDREF,
    &IDREFS,
    &ENTITY,
    &ENTITIES,
    &NMTOKEN,
    &NMTOKENS,
    &BOOLEAN,
    &DECIMAL,
    &INTEGER,
    &NON_POSITIVE_INTEGER,
    &NEGATIVE_INTEGER,
    &LONG,
    &INT,
    &SHORT,
    &BYTE,
    &NON_NEGATIVE_INTEGER,
    &UNSIGNED_LONG,
    &UNSIGNED_INT,
    &UNSIGNED_SHORT,
    &UNSIGNED_BYTE,
    &POSITIVE_INTEGER,
    &FLOAT,
    &DOUBLE,
    &DURATION,
    &DATETIME,
    &DATETIME_STAMP,
    &TIME,
    &DATE,
    &GYEAR_MONTH,
    &GYEAR,
    &GMONTH_DAY,
    &GDAY,
    &GMONTH,
    &HEX_BINARY,
    &BASE64_BINARY,
    &ANY_URI,
    &QNAME,
    &NOTATION,
];

lazy_static::lazy_static! {
    /// Builtin types keyed by XSD type name
    static ref BUILTIN_TYPES_BY_NAME: HashMap<&'static str, &'static TypeDescriptor> = {
        let mut m = HashMap::new();
        for t in BUILTIN_TYPES.iter() {
            m.insert(t.name, *t);
        }
        m
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert!(std::ptr::eq(TypeDescriptor::lookup("byte").unwrap(), &BYTE));
        assert!(TypeDescriptor::lookup("bytes").is_none());
        assert!(matches!(
            TypeDescriptor::require("nope"),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_ancestry() {
        let chain: Vec<_> = BYTE.ancestry().map(|t| t.name).collect();
        assert_eq!(
            chain,
            vec!["byte", "short", "int", "long", "integer", "decimal", "anySimpleType"]
        );
        assert!(UNSIGNED_BYTE.is_derived_from(&NON_NEGATIVE_INTEGER));
        assert!(!UNSIGNED_BYTE.is_derived_from(&LONG));
    }

    #[test]
    fn test_every_type_reaches_the_root() {
        for t in BUILTIN_TYPES.iter() {
            assert!(t.is_derived_from(&ANY_SIMPLE_TYPE), "{} is detached", t);
            if let Some(base) = t.base {
                assert!(
                    base.white_space <= t.white_space,
                    "{} relaxes the whiteSpace facet of {}",
                    t,
                    base
                );
            }
        }
    }

    #[test]
    fn test_derived_types_enforce_ancestors() {
        // lexically outside integer, would pass the range check alone
        assert!(!NON_NEGATIVE_INTEGER.is_valid("1.5"));
        assert!(!BYTE.is_valid("1e2"));
        assert!(!ID.is_valid("a:b"));
        assert!(!ID.is_valid("1abc"));
        assert!(!DATETIME_STAMP.is_valid("2024-13-01T00:00:00Z"));
    }

    #[test]
    fn test_ancestor_failure_is_reported_under_derived_name() {
        let err = UNSIGNED_BYTE.check("x").unwrap_err();
        match err {
            Error::SchemaViolation(v) => {
                assert_eq!(v.type_name.as_deref(), Some("unsignedByte"));
                assert!(v.reason.unwrap().contains("inherited from xs:decimal"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a  b\tc\n"), vec!["a", "b", "c"]);
        assert!(split_list("   ").is_empty());
    }

    #[test]
    fn test_split_list_is_bounded() {
        let value = vec!["x"; MAX_LIST_TOKENS + 5].join(" ");
        let tokens = split_list(&value);
        assert_eq!(tokens.len(), MAX_LIST_TOKENS);
        assert!(tokens.last().unwrap().contains(' '));
        assert!(!NMTOKENS.is_valid(&value));
    }

    #[test]
    fn test_list_validation() {
        assert!(IDREFS.is_valid(" a b  c "));
        assert!(!IDREFS.is_valid(""));
        assert!(!IDREFS.is_valid("a 1b"));
        assert!(NMTOKENS.is_valid("1b -c"));
    }
}
