//! # xml-common
//!
//! Building blocks for XML protocol libraries whose messages are described
//! by XML Schema.
//!
//! ## Features
//!
//! - Typed XSD values with a sanitize / validate / round-trip contract
//! - A registry resolving namespace-qualified element names to handlers
//! - `xs:any` / `xs:anyAttribute` dispatch with namespace constraints and
//!   exclusion lists
//! - An allow-list filter for untrusted XPath expressions
//!
//! ## Example
//!
//! ```rust
//! use xml_common::documents::Document;
//! use xml_common::extensions::{NamespaceConstraint, Wildcard};
//! use xml_common::limits::Limits;
//! use xml_common::registry::ElementRegistry;
//!
//! let doc = Document::from_string(
//!     r#"<o:Owner xmlns:o="urn:owner" xmlns:x="urn:x"><x:Ext/><o:Own/></o:Owner>"#,
//! )?;
//! let wildcard = Wildcard::new(NamespaceConstraint::Other, Some("urn:owner"));
//! let items = wildcard.elements_from_xml(doc.root(), &ElementRegistry::new(), &Limits::default())?;
//! assert_eq!(items.len(), 1);
//! # Ok::<(), xml_common::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Names and documents
pub mod namespaces;
pub mod names;
pub mod documents;

// Typed values
pub mod types;

// Extensible content
pub mod registry;
pub mod extensions;

// XPath filtering
pub mod xpath;

// Re-exports for convenience
pub use error::{Error, Result, SchemaViolation};

/// Version of the xml-common library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// XMLNS namespace
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";
