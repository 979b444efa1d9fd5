//! xs:QName values
//!
//! A QName is lexically `prefix:local` or `local`, but its meaning depends on
//! the namespace the prefix is bound to. [`QNameValue`] carries both the text
//! and, when known, the resolved namespace URI.

use crate::documents::Element;
use crate::error::{Error, Result};
use crate::names;
use crate::types::builtins::{TypeDescriptor, QNAME};
use crate::types::value::XsdType;
use std::fmt;
use std::str::FromStr;

/// Marker for xs:QName
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QNameType;

impl XsdType for QNameType {
    fn descriptor() -> &'static TypeDescriptor {
        &QNAME
    }
}

/// An xs:QName with its (optional) resolved namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QNameValue {
    raw: String,
    namespace: Option<String>,
}

impl QNameValue {
    /// Validate the lexical form without resolving the prefix
    pub fn from_string(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        QNAME.validate(&QNAME.sanitize(&raw))?;
        Ok(Self {
            raw,
            namespace: None,
        })
    }

    /// Resolve the prefix through the in-scope declarations of `element`
    ///
    /// An unprefixed name takes the element's default namespace.
    pub fn from_document(raw: impl Into<String>, element: &Element) -> Result<Self> {
        let mut value = Self::from_string(raw)?;
        let text = value.value();
        let (prefix, _) = names::split_qname(&text);
        value.namespace = match prefix {
            Some(prefix) => Some(
                element
                    .lookup_namespace_uri(Some(prefix))
                    .ok_or_else(|| {
                        Error::violation(format!(
                            "Prefix '{}' of QName '{}' is not declared in scope of <{}>",
                            prefix,
                            text,
                            element.qualified_name()
                        ))
                    })?
                    .to_string(),
            ),
            None => element.lookup_namespace_uri(None).map(String::from),
        };
        Ok(value)
    }

    /// Build from already resolved parts
    ///
    /// A prefix is only meaningful together with a namespace.
    pub fn from_parts(
        namespace: Option<&str>,
        prefix: Option<&str>,
        local_name: &str,
    ) -> Result<Self> {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        if prefix.is_some() && namespace.is_none() {
            return Err(Error::violation(format!(
                "QName '{}:{}' has a prefix but no namespace",
                prefix.unwrap_or_default(),
                local_name
            )));
        }
        if let Some(prefix) = prefix {
            names::validate_ncname(prefix)?;
        }
        names::validate_ncname(local_name)?;
        let raw = match prefix {
            Some(prefix) => format!("{}:{}", prefix, local_name),
            None => local_name.to_string(),
        };
        let mut value = Self::from_string(raw)?;
        value.namespace = namespace.map(String::from);
        Ok(value)
    }

    /// Parse Clark notation: `{namespace}prefix:local`, `{namespace}local`
    /// or a bare `local`
    pub fn from_clark(text: &str) -> Result<Self> {
        match text.strip_prefix('{') {
            Some(rest) => {
                let (namespace, name) = rest.split_once('}').ok_or_else(|| {
                    Error::violation(format!("Unterminated namespace in '{}'", text))
                })?;
                let (prefix, local) = names::split_qname(name);
                Self::from_parts(Some(namespace), prefix, local)
            }
            None => Self::from_string(text),
        }
    }

    /// The canonical lexical form
    pub fn value(&self) -> String {
        QNAME.sanitize(&self.raw)
    }

    /// The text the value was built from
    pub fn raw_value(&self) -> &str {
        &self.raw
    }

    /// Resolved namespace URI, if any
    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Prefix, if any
    pub fn prefix(&self) -> Option<String> {
        let value = self.value();
        names::split_qname(&value).0.map(String::from)
    }

    /// Local part
    pub fn local_name(&self) -> String {
        let value = self.value();
        names::split_qname(&value).1.to_string()
    }

    /// Render as `{namespaceURI}prefix:localName`, omitting absent parts
    pub fn to_clark(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{{{}}}{}", ns, self.value()),
            None => self.value(),
        }
    }
}

impl fmt::Display for QNameValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_clark())
    }
}

impl FromStr for QNameValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_clark(s)
    }
}
