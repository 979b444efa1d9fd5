//! Immutable typed values
//!
//! A [`Value<T>`] keeps the string it was built from. Construction is the only
//! place validation happens: `from_string` sanitizes the raw text with the
//! type's whiteSpace facet, validates the result against the type and all of
//! its ancestors, and refuses to build a value on failure. Nothing is coerced.

use crate::error::Result;
use crate::types::builtins::{self, TypeDescriptor};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

/// A marker type naming an XSD simple type
pub trait XsdType: fmt::Debug + Clone + Copy + PartialEq + Eq + Hash + Send + Sync + 'static {
    /// The descriptor this marker stands for
    fn descriptor() -> &'static TypeDescriptor;
}

/// Declare a marker type for a [`TypeDescriptor`] together with its value alias
///
/// ```rust,ignore
/// static COLOR: TypeDescriptor = TypeDescriptor::restriction(
///     "color", &xml_common::types::TOKEN, WhiteSpace::Collapse, Lexical::Pattern(&COLOR_RE));
/// xml_common::xsd_type!(
///     /// A color token
///     pub ColorType => ColorValue = COLOR
/// );
/// ```
#[macro_export]
macro_rules! xsd_type {
    ($(#[$meta:meta])* $vis:vis $marker:ident => $alias:ident = $descriptor:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis struct $marker;

        impl $crate::types::XsdType for $marker {
            fn descriptor() -> &'static $crate::types::TypeDescriptor {
                &$descriptor
            }
        }

        #[doc = concat!("A validated value of [`", stringify!($marker), "`]")]
        $vis type $alias = $crate::types::Value<$marker>;
    };
}

/// An immutable, validated value of the XSD type `T`
pub struct Value<T: XsdType> {
    raw: String,
    _type: PhantomData<T>,
}

impl<T: XsdType> Value<T> {
    /// Build a value, failing with a schema violation when the sanitized
    /// text is outside the type's lexical space
    pub fn from_string(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        T::descriptor().validate(&T::descriptor().sanitize(&raw))?;
        Ok(Self {
            raw,
            _type: PhantomData,
        })
    }

    /// The canonical (sanitized) lexical form
    pub fn value(&self) -> String {
        T::descriptor().sanitize(&self.raw)
    }

    /// The text the value was built from, verbatim
    pub fn raw_value(&self) -> &str {
        &self.raw
    }

    /// The descriptor of `T`
    pub fn descriptor(&self) -> &'static TypeDescriptor {
        T::descriptor()
    }

    /// XSD name of `T`
    pub fn type_name(&self) -> &'static str {
        T::descriptor().name
    }

    /// Check a string without building a value
    pub fn is_valid(raw: &str) -> bool {
        T::descriptor().is_valid(raw)
    }

    /// Forget the static type
    pub fn into_any(self) -> AnyValue {
        AnyValue {
            descriptor: T::descriptor(),
            raw: self.raw,
        }
    }
}

impl<T: XsdType> Clone for Value<T> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            _type: PhantomData,
        }
    }
}

impl<T: XsdType> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &T::descriptor().name)
            .field("raw", &self.raw)
            .finish()
    }
}

impl<T: XsdType> fmt::Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}

// Equality is on the canonical form, so " a " and "a" are the same token.
impl<T: XsdType> PartialEq for Value<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl<T: XsdType> Eq for Value<T> {}

impl<T: XsdType> Hash for Value<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value().hash(state);
    }
}

impl<T: XsdType> FromStr for Value<T> {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}

impl<T: XsdType> TryFrom<&str> for Value<T> {
    type Error = crate::error::Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}

impl<T: XsdType> TryFrom<String> for Value<T> {
    type Error = crate::error::Error;

    fn try_from(s: String) -> Result<Self> {
        Self::from_string(s)
    }
}

/// A validated value whose type is only known at runtime
#[derive(Debug, Clone)]
pub struct AnyValue {
    descriptor: &'static TypeDescriptor,
    raw: String,
}

impl AnyValue {
    /// Build a value of the given descriptor
    pub fn new(descriptor: &'static TypeDescriptor, raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        descriptor.validate(&descriptor.sanitize(&raw))?;
        Ok(Self { descriptor, raw })
    }

    /// Build a value of a builtin type named by its XSD local name
    ///
    /// Unknown type names are an invalid configuration, not a schema
    /// violation: the caller asked for a type that does not exist.
    pub fn from_type_name(type_name: &str, raw: impl Into<String>) -> Result<Self> {
        Self::new(TypeDescriptor::require(type_name)?, raw)
    }

    /// The canonical (sanitized) lexical form
    pub fn value(&self) -> String {
        self.descriptor.sanitize(&self.raw)
    }

    /// The text the value was built from, verbatim
    pub fn raw_value(&self) -> &str {
        &self.raw
    }

    /// The value's type
    pub fn descriptor(&self) -> &'static TypeDescriptor {
        self.descriptor
    }

    /// XSD name of the value's type
    pub fn type_name(&self) -> &'static str {
        self.descriptor.name
    }

    /// Recover a statically typed value when the types match exactly
    pub fn downcast<T: XsdType>(&self) -> Option<Value<T>> {
        std::ptr::eq(self.descriptor, T::descriptor()).then(|| Value {
            raw: self.raw.clone(),
            _type: PhantomData,
        })
    }
}

impl fmt::Display for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.descriptor, other.descriptor) && self.value() == other.value()
    }
}

impl Eq for AnyValue {}

// =============================================================================
// Builtin markers
// =============================================================================

xsd_type!(
    /// xs:anySimpleType
    pub AnySimpleType => AnySimpleValue = builtins::ANY_SIMPLE_TYPE
);
xsd_type!(
    /// xs:string
    pub StringType => StringValue = builtins::STRING
);
xsd_type!(
    /// xs:normalizedString
    pub NormalizedStringType => NormalizedStringValue = builtins::NORMALIZED_STRING
);
xsd_type!(
    /// xs:token
    pub TokenType => TokenValue = builtins::TOKEN
);
xsd_type!(
    /// xs:language
    pub LanguageType => LanguageValue = builtins::LANGUAGE
);
xsd_type!(
    /// xs:Name
    pub NameType => NameValue = builtins::NAME
);
xsd_type!(
    /// xs:NCName
    pub NcNameType => NcNameValue = builtins::NCNAME
);
xsd_type!(
    /// xs:ID
    pub IdType => IdValue = builtins::ID
);
xsd_type!(
    /// xs:IDREF
    pub IdRefType => IdRefValue = builtins::IDREF
);
xsd_type!(
    /// xs:IDREFS
    pub IdRefsType => IdRefsValue = builtins::IDREFS
);
xsd_type!(
    /// xs:ENTITY
    pub EntityType => EntityValue = builtins::ENTITY
);
xsd_type!(
    /// xs:ENTITIES
    pub EntitiesType => EntitiesValue = builtins::ENTITIES
);
xsd_type!(
    /// xs:NMTOKEN
    pub NmTokenType => NmTokenValue = builtins::NMTOKEN
);
xsd_type!(
    /// xs:NMTOKENS
    pub NmTokensType => NmTokensValue = builtins::NMTOKENS
);
xsd_type!(
    /// xs:boolean
    pub BooleanType => BooleanValue = builtins::BOOLEAN
);
xsd_type!(
    /// xs:decimal
    pub DecimalType => DecimalValue = builtins::DECIMAL
);
xsd_type!(
    /// xs:integer
    pub IntegerType => IntegerValue = builtins::INTEGER
);
xsd_type!(
    /// xs:nonPositiveInteger
    pub NonPositiveIntegerType => NonPositiveIntegerValue = builtins::NON_POSITIVE_INTEGER
);
xsd_type!(
    /// xs:negativeInteger
    pub NegativeIntegerType => NegativeIntegerValue = builtins::NEGATIVE_INTEGER
);
xsd_type!(
    /// xs:long
    pub LongType => LongValue = builtins::LONG
);
xsd_type!(
    /// xs:int
    pub IntType => IntValue = builtins::INT
);
xsd_type!(
    /// xs:short
    pub ShortType => ShortValue = builtins::SHORT
);
xsd_type!(
    /// xs:byte
    pub ByteType => ByteValue = builtins::BYTE
);
xsd_type!(
    /// xs:nonNegativeInteger
    pub NonNegativeIntegerType => NonNegativeIntegerValue = builtins::NON_NEGATIVE_INTEGER
);
xsd_type!(
    /// xs:unsignedLong
    pub UnsignedLongType => UnsignedLongValue = builtins::UNSIGNED_LONG
);
xsd_type!(
    /// xs:unsignedInt
    pub UnsignedIntType => UnsignedIntValue = builtins::UNSIGNED_INT
);
xsd_type!(
    /// xs:unsignedShort
    pub UnsignedShortType => UnsignedShortValue = builtins::UNSIGNED_SHORT
);
xsd_type!(
    /// xs:unsignedByte
    pub UnsignedByteType => UnsignedByteValue = builtins::UNSIGNED_BYTE
);
xsd_type!(
    /// xs:positiveInteger
    pub PositiveIntegerType => PositiveIntegerValue = builtins::POSITIVE_INTEGER
);
xsd_type!(
    /// xs:float
    pub FloatType => FloatValue = builtins::FLOAT
);
xsd_type!(
    /// xs:double
    pub DoubleType => DoubleValue = builtins::DOUBLE
);
xsd_type!(
    /// xs:duration
    pub DurationType => DurationValue = builtins::DURATION
);
xsd_type!(
    /// xs:dateTime
    pub DateTimeType => DateTimeValue = builtins::DATETIME
);
xsd_type!(
    /// xs:dateTimeStamp
    pub DateTimeStampType => DateTimeStampValue = builtins::DATETIME_STAMP
);
xsd_type!(
    /// xs:time
    pub TimeType => TimeValue = builtins::TIME
);
xsd_type!(
    /// xs:date
    pub DateType => DateValue = builtins::DATE
);
xsd_type!(
    /// xs:gYearMonth
    pub GYearMonthType => GYearMonthValue = builtins::GYEAR_MONTH
);
xsd_type!(
    /// xs:gYear
    pub GYearType => GYearValue = builtins::GYEAR
);
xsd_type!(
    /// xs:gMonthDay
    pub GMonthDayType => GMonthDayValue = builtins::GMONTH_DAY
);
xsd_type!(
    /// xs:gDay
    pub GDayType => GDayValue = builtins::GDAY
);
xsd_type!(
    /// xs:gMonth
    pub GMonthType => GMonthValue = builtins::GMONTH
);
xsd_type!(
    /// xs:hexBinary
    pub HexBinaryType => HexBinaryValue = builtins::HEX_BINARY
);
xsd_type!(
    /// xs:base64Binary
    pub Base64BinaryType => Base64BinaryValue = builtins::BASE64_BINARY
);
xsd_type!(
    /// xs:anyURI
    pub AnyUriType => AnyUriValue = builtins::ANY_URI
);
xsd_type!(
    /// xs:NOTATION
    pub NotationType => NotationValue = builtins::NOTATION
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_from_string_keeps_raw() {
        let token = TokenValue::from_string("  hello \n world ").unwrap();
        assert_eq!(token.raw_value(), "  hello \n world ");
        assert_eq!(token.value(), "hello world");
        assert_eq!(token.to_string(), "hello world");
    }

    #[test]
    fn test_from_string_rejects() {
        let err = IntegerValue::from_string("12a").unwrap_err();
        assert!(err.is_schema_violation());
        assert!(ByteValue::from_string("128").is_err());
        assert!(ByteValue::from_string(" -128 ").is_ok());
    }

    #[test]
    fn test_equality_uses_canonical_form() {
        let a = TokenValue::from_string(" a  b ").unwrap();
        let b = TokenValue::from_string("a b").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse() {
        let v: IntValue = "42".parse().unwrap();
        assert_eq!(v.value(), "42");
        assert!("x".parse::<IntValue>().is_err());
    }

    #[test]
    fn test_any_value() {
        let v = AnyValue::from_type_name("unsignedShort", "65535").unwrap();
        assert_eq!(v.type_name(), "unsignedShort");
        assert!(v.downcast::<UnsignedShortType>().is_some());
        assert!(v.downcast::<IntType>().is_none());

        assert!(AnyValue::from_type_name("unsignedShort", "65536").is_err());
        assert!(matches!(
            AnyValue::from_type_name("unsignedWord", "1"),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_into_any() {
        let v = LanguageValue::from_string("en-GB").unwrap().into_any();
        assert_eq!(v.type_name(), "language");
        assert_eq!(v.value(), "en-GB");
    }
}
