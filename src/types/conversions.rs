//! Conversions from validated values to native Rust types
//!
//! Lexical validity never depends on these conversions. They are a second
//! step with their own failure mode: a value that is valid XSD but cannot be
//! represented by the host type fails with [`Error::Runtime`], it is never
//! clamped or truncated.

use crate::error::{Error, Result};
use crate::types::value::*;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use url::Url;

/// Types in the decimal family
pub trait DecimalKind: XsdType {}

/// Types derived from xs:integer
pub trait IntegerKind: DecimalKind {}

/// xs:float and xs:double
pub trait FloatKind: XsdType {}

/// Binary types and their encodings
pub trait BinaryKind: XsdType {
    /// Decode the canonical lexical form
    fn decode(value: &str) -> Result<Vec<u8>>;
    /// Encode bytes into the lexical form
    fn encode(bytes: &[u8]) -> String;
}

/// xs:dateTime and xs:dateTimeStamp
pub trait DateTimeKind: XsdType {}

impl DecimalKind for DecimalType {}
macro_rules! integer_kinds {
    ($($marker:ty),*) => {
        $(
            impl DecimalKind for $marker {}
            impl IntegerKind for $marker {}
        )*
    };
}
integer_kinds!(
    IntegerType,
    NonPositiveIntegerType,
    NegativeIntegerType,
    LongType,
    IntType,
    ShortType,
    ByteType,
    NonNegativeIntegerType,
    UnsignedLongType,
    UnsignedIntType,
    UnsignedShortType,
    UnsignedByteType,
    PositiveIntegerType
);

impl FloatKind for FloatType {}
impl FloatKind for DoubleType {}

impl DateTimeKind for DateTimeType {}
impl DateTimeKind for DateTimeStampType {}

impl BinaryKind for HexBinaryType {
    fn decode(value: &str) -> Result<Vec<u8>> {
        (0..value.len())
            .step_by(2)
            .map(|i| {
                value
                    .get(i..i + 2)
                    .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                    .ok_or_else(|| Error::Runtime(format!("'{}' is not hex encoded", value)))
            })
            .collect()
    }

    fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02X}", b)).collect()
    }
}

impl BinaryKind for Base64BinaryType {
    fn decode(value: &str) -> Result<Vec<u8>> {
        let compact: String = value.chars().filter(|c| *c != ' ').collect();
        STANDARD
            .decode(compact)
            .map_err(|e| Error::Runtime(format!("Cannot decode base64 '{}': {}", value, e)))
    }

    fn encode(bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }
}

impl<T: DecimalKind> Value<T> {
    /// Convert to an arbitrary precision decimal
    pub fn to_decimal(&self) -> Result<Decimal> {
        let value = self.value();
        let digits = value.strip_prefix('+').unwrap_or(&value);
        let normalized = if let Some(rest) = digits.strip_prefix("-.") {
            format!("-0.{}", rest)
        } else if let Some(rest) = digits.strip_prefix('.') {
            format!("0.{}", rest)
        } else if let Some(int) = digits.strip_suffix('.') {
            int.to_string()
        } else {
            digits.to_string()
        };
        Decimal::from_str(&normalized).map_err(|e| {
            Error::Runtime(format!(
                "xs:{} value '{}' does not fit a decimal: {}",
                self.type_name(),
                value,
                e
            ))
        })
    }
}

impl<T: IntegerKind> Value<T> {
    /// Convert to `i64`, failing when the value is out of range
    pub fn to_integer(&self) -> Result<i64> {
        let value = self.value();
        value
            .strip_prefix('+')
            .unwrap_or(&value)
            .parse::<i64>()
            .map_err(|_| {
                Error::Runtime(format!(
                    "xs:{} value '{}' does not fit a 64-bit integer",
                    self.type_name(),
                    value
                ))
            })
    }

    /// Build a value from an `i64`, validated against the type's range
    pub fn from_integer(value: i64) -> Result<Self> {
        Self::from_string(value.to_string())
    }
}

impl<T: FloatKind> Value<T> {
    /// Convert to `f64`; `INF`, `-INF` and `NaN` map to their IEEE values
    pub fn to_float(&self) -> Result<f64> {
        let value = self.value();
        match value.as_str() {
            "INF" | "+INF" => return Ok(f64::INFINITY),
            "-INF" => return Ok(f64::NEG_INFINITY),
            "NaN" => return Ok(f64::NAN),
            _ => {}
        }
        let parsed = value
            .parse::<f64>()
            .map_err(|e| Error::Runtime(format!("Cannot convert '{}' to a float: {}", value, e)))?;
        if parsed.is_infinite() {
            return Err(Error::Runtime(format!(
                "xs:{} value '{}' overflows a 64-bit float",
                self.type_name(),
                value
            )));
        }
        Ok(parsed)
    }
}

impl Value<BooleanType> {
    /// Convert to `bool`
    pub fn to_boolean(&self) -> bool {
        matches!(self.value().as_str(), "true" | "1")
    }

    /// Build a value from a `bool`
    pub fn from_boolean(value: bool) -> Self {
        Self::from_string(if value { "true" } else { "false" })
            .unwrap_or_else(|_| unreachable!("boolean literals are always valid"))
    }
}

impl<T: BinaryKind> Value<T> {
    /// Decode the binary content
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        T::decode(&self.value())
    }

    /// Encode bytes as a value
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_string(T::encode(bytes))
    }
}

impl<T: DateTimeKind> Value<T> {
    /// Convert to a timezone-aware timestamp
    ///
    /// A value without a timezone is read as UTC. `24:00:00` is the first
    /// instant of the next day.
    pub fn to_date_time(&self) -> Result<DateTime<FixedOffset>> {
        let value = self.value();
        let runtime = |reason: &str| {
            Error::Runtime(format!(
                "xs:{} value '{}' cannot be represented: {}",
                self.type_name(),
                value,
                reason
            ))
        };

        let (local, offset) = split_timezone(&value);
        let offset = match offset {
            Some(tz) => parse_offset(tz).ok_or_else(|| runtime("bad timezone"))?,
            None => FixedOffset::east_opt(0).ok_or_else(|| runtime("bad timezone"))?,
        };

        let (date, time) = local.split_once('T').ok_or_else(|| runtime("missing time"))?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| runtime(&e.to_string()))?;

        let naive = if time.starts_with("24:") {
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| runtime("bad date"))?;
            midnight
                .checked_add_signed(Duration::days(1))
                .ok_or_else(|| runtime("date out of range"))?
        } else {
            let time = NaiveTime::parse_from_str(time, "%H:%M:%S%.f")
                .map_err(|e| runtime(&e.to_string()))?;
            NaiveDateTime::new(date, time)
        };

        naive
            .and_local_timezone(offset)
            .single()
            .ok_or_else(|| runtime("ambiguous local time"))
    }
}

impl Value<AnyUriType> {
    /// Parse as an absolute URL
    pub fn to_url(&self) -> Result<Url> {
        let value = self.value();
        Url::parse(&value)
            .map_err(|e| Error::Runtime(format!("'{}' is not an absolute URL: {}", value, e)))
    }
}

/// Split `...Z`, `...+hh:mm` or `...-hh:mm` off a date/time literal
fn split_timezone(value: &str) -> (&str, Option<&str>) {
    if let Some(local) = value.strip_suffix('Z') {
        return (local, Some("Z"));
    }
    if value.len() > 6 {
        let split = value.len() - 6;
        let tail = &value[split..];
        if (tail.starts_with('+') || tail.starts_with('-')) && tail.as_bytes()[3] == b':' {
            return (&value[..split], Some(tail));
        }
    }
    (value, None)
}

fn parse_offset(tz: &str) -> Option<FixedOffset> {
    if tz == "Z" {
        return FixedOffset::east_opt(0);
    }
    let sign = if tz.starts_with('-') { -1 } else { 1 };
    let hours: i32 = tz.get(1..3)?.parse().ok()?;
    let minutes: i32 = tz.get(4..6)?.parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
