//! Wildcard attribute slots

use crate::documents::{Attribute, Element};
use crate::error::Result;
use crate::names;
use crate::namespaces::ExpandedName;
use crate::types::StringValue;

/// An attribute admitted by an `xs:anyAttribute` wildcard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    namespace: Option<String>,
    prefix: Option<String>,
    local_name: String,
    value: StringValue,
}

impl XmlAttribute {
    /// Create an attribute from a namespace and a qualified name
    ///
    /// A prefix is only kept when a namespace is given.
    pub fn new(namespace: Option<&str>, qualified_name: &str, value: &str) -> Result<Self> {
        names::validate_qname(qualified_name)?;
        let namespace = namespace.filter(|ns| !ns.is_empty());
        let (prefix, local_name) = names::split_qname(qualified_name);
        Ok(Self {
            namespace: namespace.map(String::from),
            prefix: prefix.filter(|_| namespace.is_some()).map(String::from),
            local_name: local_name.to_string(),
            value: StringValue::from_string(value)?,
        })
    }

    /// Read an attribute of a parsed element
    pub fn from_xml(attribute: &Attribute) -> Result<Self> {
        names::validate_ncname(&attribute.local_name)?;
        Ok(Self {
            namespace: attribute.namespace.clone(),
            prefix: attribute.prefix.clone(),
            local_name: attribute.local_name.clone(),
            value: StringValue::from_string(attribute.value.as_str())?,
        })
    }

    /// Write the attribute onto an element
    pub fn to_xml(&self, element: &mut Element) {
        element.set_attribute_ns(
            self.namespace.as_deref(),
            &self.qualified_name(),
            self.value.value(),
        );
    }

    /// Namespace URI, if any
    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Prefix, if any
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Local name
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Qualified name (`prefix:local` or `local`)
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }

    /// Expanded name
    pub fn expanded_name(&self) -> ExpandedName {
        ExpandedName::new(self.namespace.clone(), self.local_name.clone())
    }

    /// The typed value
    pub fn value(&self) -> &StringValue {
        &self.value
    }
}
