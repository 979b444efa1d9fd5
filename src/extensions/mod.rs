//! Extensible content
//!
//! Support for `xs:any` and `xs:anyAttribute`: namespace constraints, the
//! wildcard dispatcher that reads foreign content through the
//! [`ElementRegistry`](crate::registry::ElementRegistry), and the containers
//! that guard it on assignment.

mod attribute;
mod chunk;
mod constraint;
mod elements;
mod text;
mod wildcard;

pub use attribute::XmlAttribute;
pub use chunk::Chunk;
pub use constraint::{ExplicitNamespace, NamespaceConstraint};
pub use elements::{ExtendableAttributes, ExtendableElements};
pub use text::{TextElement, TextElementHandler};
pub use wildcard::Wildcard;
