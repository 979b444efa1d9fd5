//! XML namespace handling
//!
//! This module provides utilities for working with XML namespaces,
//! expanded names, and namespace prefix mappings.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// Expanded name - combination of an optional namespace and a local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpandedName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl ExpandedName {
    /// Create a new expanded name
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a name without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a name with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Check whether this name equals the given namespace and local name
    pub fn matches(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.namespace.as_deref() == namespace && self.local_name == local_name
    }
}

impl fmt::Display for ExpandedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Namespace context for resolving prefixes
///
/// The reserved `xml` prefix is always bound and cannot be redeclared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI
    prefixes: IndexMap<Prefix, NamespaceUri>,
    /// Default namespace (no prefix)
    default_namespace: Option<NamespaceUri>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context inheriting every declaration of `parent`
    pub fn inherit(parent: &NamespaceContext) -> Self {
        parent.clone()
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        let prefix = prefix.into();
        if prefix == "xml" {
            return;
        }
        self.prefixes.insert(prefix, namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: Option<impl Into<String>>) {
        self.default_namespace = namespace.map(|ns| ns.into()).filter(|ns| !ns.is_empty());
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(crate::XML_NAMESPACE);
        }
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Look up a namespace by optional prefix; `None` looks up the default
    pub fn lookup(&self, prefix: Option<&str>) -> Option<&str> {
        match prefix {
            Some(prefix) => self.get_namespace(prefix),
            None => self.get_default_namespace(),
        }
    }

    /// Find a prefix bound to the namespace, if any
    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        if namespace == crate::XML_NAMESPACE {
            return Some("xml");
        }
        self.prefixes
            .iter()
            .find(|(_, uri)| uri.as_str() == namespace)
            .map(|(prefix, _)| prefix.as_str())
    }

    /// Iterate over the prefixed declarations in declaration order
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    /// Number of prefixed declarations
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether the context declares nothing
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.default_namespace.is_none()
    }

    /// Resolve a prefixed name to an expanded name
    pub fn resolve(&self, prefixed_name: &str) -> Result<ExpandedName> {
        if let Some((prefix, local)) = prefixed_name.split_once(':') {
            let namespace = self.get_namespace(prefix).ok_or_else(|| {
                Error::violation(format!(
                    "Prefix '{}' of '{}' is not bound to a namespace",
                    prefix, prefixed_name
                ))
            })?;
            Ok(ExpandedName::namespaced(namespace, local))
        } else {
            Ok(ExpandedName::new(
                self.default_namespace.clone(),
                prefixed_name,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expanded_name_creation() {
        let name = ExpandedName::namespaced("http://example.com", "element");
        assert_eq!(name.namespace, Some("http://example.com".to_string()));
        assert_eq!(name.local_name, "element");
        assert!(name.matches(Some("http://example.com"), "element"));
        assert!(!name.matches(None, "element"));
    }

    #[test]
    fn test_expanded_name_display() {
        let name = ExpandedName::namespaced("http://example.com", "element");
        assert_eq!(name.to_string(), "{http://example.com}element");

        let local = ExpandedName::local("element");
        assert_eq!(local.to_string(), "element");
    }

    #[test]
    fn test_namespace_context() {
        let mut ctx = NamespaceContext::new();
        ctx.add_prefix("xs", "http://www.w3.org/2001/XMLSchema");
        ctx.set_default_namespace(Some("http://example.com"));

        assert_eq!(
            ctx.get_namespace("xs"),
            Some("http://www.w3.org/2001/XMLSchema")
        );
        assert_eq!(ctx.get_default_namespace(), Some("http://example.com"));
        assert_eq!(ctx.lookup(None), Some("http://example.com"));
        assert_eq!(ctx.prefix_for("http://www.w3.org/2001/XMLSchema"), Some("xs"));
    }

    #[test]
    fn test_xml_prefix_is_reserved() {
        let mut ctx = NamespaceContext::new();
        ctx.add_prefix("xml", "urn:not-allowed");
        assert_eq!(ctx.get_namespace("xml"), Some(crate::XML_NAMESPACE));
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_empty_default_namespace_undeclares() {
        let mut ctx = NamespaceContext::new();
        ctx.set_default_namespace(Some("urn:a"));
        ctx.set_default_namespace(Some(""));
        assert_eq!(ctx.get_default_namespace(), None);
    }

    #[test]
    fn test_resolve_prefixed_name() {
        let mut ctx = NamespaceContext::new();
        ctx.add_prefix("xs", "http://www.w3.org/2001/XMLSchema");

        let name = ctx.resolve("xs:element").unwrap();
        assert_eq!(
            name.namespace,
            Some("http://www.w3.org/2001/XMLSchema".to_string())
        );
        assert_eq!(name.local_name, "element");

        assert!(ctx.resolve("nope:element").is_err());
    }
}
