//! Typed XSD values
//!
//! Every builtin simple type is a [`TypeDescriptor`] in a single derivation
//! tree rooted at xs:anySimpleType. Values are built through
//! [`Value::from_string`], which sanitizes with the whiteSpace facet and
//! validates against the type and every ancestor before anything is stored.
//!
//! ```rust
//! use xml_common::types::{IntegerValue, TokenValue};
//!
//! let token = TokenValue::from_string("  a   b ").unwrap();
//! assert_eq!(token.value(), "a b");
//! assert!(IntegerValue::from_string("4.2").is_err());
//! ```

pub mod builtins;
pub mod conversions;
pub mod lexical;
pub mod list;
pub mod qname;
pub mod value;
pub mod whitespace;

pub use builtins::*;
pub use conversions::{BinaryKind, DateTimeKind, DecimalKind, FloatKind, IntegerKind};
pub use lexical::Lexical;
pub use list::ListKind;
pub use qname::{QNameType, QNameValue};
pub use value::*;
pub use whitespace::WhiteSpace;
