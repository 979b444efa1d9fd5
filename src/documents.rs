//! XML document handling
//!
//! A small owned element tree. It covers what the value system and the
//! dispatcher need from a DOM: names and namespaces, attributes, child
//! iteration, in-scope prefix lookup, node creation and import, and
//! string serialization.
//!
//! Parsing goes through `roxmltree` (DTDs are rejected), writing through
//! `quick-xml`. Comments and processing instructions are not kept.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::namespaces::{ExpandedName, NamespaceContext};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// An attribute of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Namespace URI (None for unqualified attributes)
    pub namespace: Option<String>,
    /// Prefix used when the attribute was read or created
    pub prefix: Option<String>,
    /// Local name
    pub local_name: String,
    /// Attribute value
    pub value: String,
}

impl Attribute {
    /// Create an attribute from a namespace and a qualified name
    pub fn new(
        namespace: Option<&str>,
        qualified_name: &str,
        value: impl Into<String>,
    ) -> Self {
        let (prefix, local_name) = split_prefix(namespace, qualified_name);
        Self {
            namespace: namespace.map(String::from),
            prefix,
            local_name,
            value: value.into(),
        }
    }

    /// Get the qualified name (`prefix:local` or `local`)
    pub fn qualified_name(&self) -> String {
        qualify(self.prefix.as_deref(), &self.local_name)
    }

    /// Get the expanded name
    pub fn expanded_name(&self) -> ExpandedName {
        ExpandedName::new(self.namespace.clone(), self.local_name.clone())
    }
}

/// A node in the element tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element
    Element(Element),
    /// Character data
    Text(String),
}

impl Node {
    /// Get the element if this node is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// Check if this node is an element
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Check if this node is character data
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }
}

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<String>,
    /// Prefix of the element name
    pub prefix: Option<String>,
    /// Local name
    pub local_name: String,
    /// Attributes in document order
    pub attributes: Vec<Attribute>,
    /// Child nodes in document order
    pub children: Vec<Node>,
    /// In-scope namespace declarations
    pub namespaces: NamespaceContext,
}

impl Element {
    /// Create a new element from a namespace and a qualified name
    ///
    /// A prefix is only kept when a namespace is given; the binding is added
    /// to the element's namespace context.
    pub fn new(namespace: Option<&str>, qualified_name: &str) -> Self {
        let (prefix, local_name) = split_prefix(namespace, qualified_name);
        let mut namespaces = NamespaceContext::new();
        match (&prefix, namespace) {
            (Some(p), Some(ns)) => namespaces.add_prefix(p.as_str(), ns),
            (None, Some(ns)) => namespaces.set_default_namespace(Some(ns)),
            _ => {}
        }

        Self {
            namespace: namespace.map(String::from),
            prefix,
            local_name,
            attributes: Vec::new(),
            children: Vec::new(),
            namespaces,
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Get the prefix of the element
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Get the qualified name (`prefix:local` or `local`)
    pub fn qualified_name(&self) -> String {
        qualify(self.prefix.as_deref(), &self.local_name)
    }

    /// Get the expanded name
    pub fn expanded_name(&self) -> ExpandedName {
        ExpandedName::new(self.namespace.clone(), self.local_name.clone())
    }

    /// Get an unqualified attribute value by local name
    pub fn get_attribute(&self, local_name: &str) -> Option<&str> {
        self.get_attribute_ns(None, local_name)
    }

    /// Get an attribute value by namespace and local name
    pub fn get_attribute_ns(&self, namespace: Option<&str>, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == namespace && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// Check if an unqualified attribute is present
    pub fn has_attribute(&self, local_name: &str) -> bool {
        self.get_attribute(local_name).is_some()
    }

    /// Check if a namespaced attribute is present
    pub fn has_attribute_ns(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.get_attribute_ns(namespace, local_name).is_some()
    }

    /// Set an unqualified attribute
    pub fn set_attribute(&mut self, local_name: &str, value: impl Into<String>) {
        self.set_attribute_ns(None, local_name, value);
    }

    /// Set an attribute by namespace and qualified name, replacing any
    /// attribute with the same expanded name
    pub fn set_attribute_ns(
        &mut self,
        namespace: Option<&str>,
        qualified_name: &str,
        value: impl Into<String>,
    ) {
        let attribute = Attribute::new(namespace, qualified_name, value);
        if let (Some(p), Some(ns)) = (&attribute.prefix, namespace) {
            if self.namespaces.get_namespace(p).is_none() {
                self.namespaces.add_prefix(p.as_str(), ns);
            }
        }

        match self.attributes.iter_mut().find(|a| {
            a.namespace == attribute.namespace && a.local_name == attribute.local_name
        }) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    /// Iterate over the child elements
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Find child elements by namespace and local name
    pub fn find_children<'a>(
        &'a self,
        namespace: Option<&'a str>,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.child_elements()
            .filter(move |e| e.namespace() == namespace && e.local_name() == local_name)
    }

    /// Append (import) a child element
    pub fn append_child(&mut self, child: Element) -> &mut Element {
        self.children.push(Node::Element(child));
        match self.children.last_mut() {
            Some(Node::Element(e)) => e,
            _ => unreachable!("an element was just pushed"),
        }
    }

    /// Append character data
    pub fn append_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Concatenated character data of this element and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// An element is empty when it has neither attributes nor child nodes
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }

    /// Look up the namespace bound to a prefix (None = default namespace)
    pub fn lookup_namespace_uri(&self, prefix: Option<&str>) -> Option<&str> {
        self.namespaces.lookup(prefix)
    }

    /// Serialize the element and its descendants
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, self, &NamespaceContext::new())?;
        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::Xml(format!("Serialized XML is not UTF-8: {}", e)))
    }
}

/// XML Document representation
#[derive(Debug, Clone)]
pub struct Document {
    /// Root element of the document
    pub root: Element,
}

impl Document {
    /// Create a document around a root element
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parse an XML document from a string using default limits
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml, &Limits::default())
    }

    /// Parse an XML document from a string
    pub fn parse(xml: &str, limits: &Limits) -> Result<Self> {
        limits.check_xml_size(xml.len())?;

        let options = roxmltree::ParsingOptions {
            allow_dtd: false,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(xml, options)
            .map_err(|e| Error::Xml(format!("Error parsing XML: {}", e)))?;

        let root = convert_element(doc.root_element(), limits, 1)?;
        Ok(Self { root })
    }

    /// Get the root element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Take the root element
    pub fn into_root(self) -> Element {
        self.root
    }

    /// Serialize the document
    pub fn to_xml_string(&self) -> Result<String> {
        self.root.to_xml_string()
    }
}

fn qualify(prefix: Option<&str>, local_name: &str) -> String {
    match prefix {
        Some(p) => format!("{}:{}", p, local_name),
        None => local_name.to_string(),
    }
}

fn split_prefix(namespace: Option<&str>, qualified_name: &str) -> (Option<String>, String) {
    match qualified_name.split_once(':') {
        Some((prefix, local)) if namespace.is_some() => {
            (Some(prefix.to_string()), local.to_string())
        }
        Some((_, local)) => (None, local.to_string()),
        None => (None, qualified_name.to_string()),
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(e, out),
        }
    }
}

fn prefix_of(node: roxmltree::Node<'_, '_>, namespace: &str, allow_default: bool) -> Option<String> {
    if namespace == crate::XML_NAMESPACE {
        return Some("xml".to_string());
    }
    let mut fallback = None;
    for ns in node.namespaces() {
        if ns.uri() != namespace {
            continue;
        }
        match ns.name() {
            None if allow_default => return None,
            Some(p) if fallback.is_none() => fallback = Some(p.to_string()),
            _ => {}
        }
    }
    fallback
}

fn convert_element(node: roxmltree::Node<'_, '_>, limits: &Limits, depth: usize) -> Result<Element> {
    limits.check_xml_depth(depth)?;

    let mut namespaces = NamespaceContext::new();
    for ns in node.namespaces() {
        match ns.name() {
            Some(prefix) => namespaces.add_prefix(prefix, ns.uri()),
            None => namespaces.set_default_namespace(Some(ns.uri())),
        }
    }

    let tag = node.tag_name();
    let namespace = tag.namespace().map(String::from);
    let prefix = namespace
        .as_deref()
        .and_then(|ns| prefix_of(node, ns, true));

    let mut attributes = Vec::new();
    let mut count = 0;
    for attr in node.attributes() {
        count += 1;
        limits.check_attributes(count)?;
        let attr_ns = attr.namespace().map(String::from);
        let attr_prefix = attr_ns.as_deref().and_then(|ns| prefix_of(node, ns, false));
        attributes.push(Attribute {
            namespace: attr_ns,
            prefix: attr_prefix,
            local_name: attr.name().to_string(),
            value: attr.value().to_string(),
        });
    }

    let mut children = Vec::new();
    for child in node.children() {
        if child.is_element() {
            children.push(Node::Element(convert_element(child, limits, depth + 1)?));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                children.push(Node::Text(text.to_string()));
            }
        }
    }

    Ok(Element {
        namespace,
        prefix,
        local_name: tag.name().to_string(),
        attributes,
        children,
        namespaces,
    })
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &Element,
    scope: &NamespaceContext,
) -> Result<()> {
    let mut declared = NamespaceContext::inherit(scope);
    let mut declarations: Vec<(String, String)> = Vec::new();

    let mut declare = |declared: &mut NamespaceContext, prefix: Option<&str>, uri: &str| {
        match prefix {
            Some(p) => {
                declared.add_prefix(p, uri);
                declarations.push((format!("xmlns:{}", p), uri.to_string()));
            }
            None => {
                declared.set_default_namespace(Some(uri));
                declarations.push(("xmlns".to_string(), uri.to_string()));
            }
        }
    };

    for (prefix, uri) in element.namespaces.prefixes() {
        if declared.get_namespace(prefix) != Some(uri) {
            declare(&mut declared, Some(prefix), uri);
        }
    }

    match (element.prefix.as_deref(), element.namespace.as_deref()) {
        (Some(p), Some(ns)) => {
            if declared.get_namespace(p) != Some(ns) {
                declare(&mut declared, Some(p), ns);
            }
        }
        (_, Some(ns)) => {
            if declared.get_default_namespace() != Some(ns) {
                declare(&mut declared, None, ns);
            }
        }
        (_, None) => {
            if declared.get_default_namespace().is_some() {
                declare(&mut declared, None, "");
            }
        }
    }

    let mut attributes: Vec<(String, &str)> = Vec::with_capacity(element.attributes.len());
    let mut generated = 0;
    for attr in &element.attributes {
        let name = match attr.namespace.as_deref() {
            None => attr.local_name.clone(),
            Some(ns) => {
                let prefix = match attr.prefix.as_deref() {
                    Some(p) if declared.get_namespace(p).map_or(true, |bound| bound == ns) => {
                        p.to_string()
                    }
                    _ => match declared.prefix_for(ns) {
                        Some(p) => p.to_string(),
                        None => {
                            generated += 1;
                            format!("ns{}", generated)
                        }
                    },
                };
                if declared.get_namespace(&prefix) != Some(ns) {
                    declare(&mut declared, Some(&prefix), ns);
                }
                qualify(Some(&prefix), &attr.local_name)
            }
        };
        attributes.push((name, attr.value.as_str()));
    }

    let qname = element.qualified_name();
    let mut start = BytesStart::new(qname.as_str());
    for (name, uri) in &declarations {
        start.push_attribute((name.as_str(), uri.as_str()));
    }
    for (name, value) in &attributes {
        start.push_attribute((name.as_str(), *value));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| Error::Xml(format!("Failed to write element: {}", e)));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| Error::Xml(format!("Failed to write element: {}", e)))?;
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(writer, e, &declared)?,
            Node::Text(t) => writer
                .write_event(Event::Text(BytesText::new(t)))
                .map_err(|e| Error::Xml(format!("Failed to write text: {}", e)))?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(qname.as_str())))
        .map_err(|e| Error::Xml(format!("Failed to write element: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_xml() {
        let xml = r#"<root><child>text</child></root>"#;
        let doc = Document::from_string(xml).unwrap();

        let root = doc.root();
        assert_eq!(root.local_name(), "root");
        assert_eq!(root.child_elements().count(), 1);
        let child = root.child_elements().next().unwrap();
        assert_eq!(child.local_name(), "child");
        assert_eq!(child.text_content(), "text");
    }

    #[test]
    fn test_parse_with_attributes() {
        let xml = r#"<root attr1="value1" xmlns:x="urn:x" x:attr2="value2"><child/></root>"#;
        let root = Document::from_string(xml).unwrap().into_root();

        assert_eq!(root.get_attribute("attr1"), Some("value1"));
        assert_eq!(root.get_attribute_ns(Some("urn:x"), "attr2"), Some("value2"));
        assert!(!root.has_attribute("attr2"));
        assert_eq!(root.attributes[1].prefix.as_deref(), Some("x"));
    }

    #[test]
    fn test_parse_with_namespaces() {
        let xml = r#"<root xmlns="http://example.com" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><child/></root>"#;
        let root = Document::from_string(xml).unwrap().into_root();

        assert_eq!(root.namespace(), Some("http://example.com"));
        assert_eq!(root.prefix(), None);
        assert_eq!(
            root.lookup_namespace_uri(Some("xsi")),
            Some("http://www.w3.org/2001/XMLSchema-instance")
        );

        // declarations are inherited by descendants
        let child = root.child_elements().next().unwrap();
        assert_eq!(child.namespace(), Some("http://example.com"));
        assert_eq!(
            child.lookup_namespace_uri(Some("xsi")),
            Some("http://www.w3.org/2001/XMLSchema-instance")
        );
    }

    #[test]
    fn test_dtd_is_rejected() {
        let xml = r#"<!DOCTYPE root [<!ENTITY e "boom">]><root>&e;</root>"#;
        assert!(matches!(Document::from_string(xml), Err(Error::Xml(_))));
    }

    #[test]
    fn test_depth_limit() {
        let xml = "<a><b><c><d/></c></b></a>";
        let limits = Limits {
            max_xml_depth: 3,
            ..Limits::default()
        };
        assert!(matches!(
            Document::parse(xml, &limits),
            Err(Error::LimitExceeded(_))
        ));
    }

    #[test]
    fn test_element_creation() {
        let mut elem = Element::new(Some("urn:example"), "ex:test");
        elem.append_text("content");

        assert_eq!(elem.local_name(), "test");
        assert_eq!(elem.prefix(), Some("ex"));
        assert_eq!(elem.qualified_name(), "ex:test");
        assert_eq!(elem.text_content(), "content");
        assert_eq!(elem.lookup_namespace_uri(Some("ex")), Some("urn:example"));
    }

    #[test]
    fn test_prefix_without_namespace_is_dropped() {
        let elem = Element::new(None, "ex:test");
        assert_eq!(elem.prefix(), None);
        assert_eq!(elem.local_name(), "test");
    }

    #[test]
    fn test_is_empty() {
        let mut elem = Element::new(None, "e");
        assert!(elem.is_empty());
        elem.set_attribute("a", "1");
        assert!(!elem.is_empty());
    }

    #[test]
    fn test_serialize_declares_namespaces_once() {
        let mut root = Element::new(Some("urn:a"), "a:root");
        let mut child = Element::new(Some("urn:a"), "a:child");
        child.set_attribute_ns(Some("urn:b"), "b:flag", "x<y");
        child.append_text("1 & 2");
        root.append_child(child);

        assert_eq!(
            root.to_xml_string().unwrap(),
            r#"<a:root xmlns:a="urn:a"><a:child xmlns:b="urn:b" b:flag="x&lt;y">1 &amp; 2</a:child></a:root>"#
        );
    }

    #[test]
    fn test_serialize_undeclares_default_namespace() {
        let mut root = Element::new(Some("urn:a"), "root");
        root.append_child(Element::new(None, "plain"));

        assert_eq!(
            root.to_xml_string().unwrap(),
            r#"<root xmlns="urn:a"><plain xmlns=""/></root>"#
        );
    }

    #[test]
    fn test_round_trip() {
        let xml = r#"<ssp:root xmlns:ssp="urn:ssp" xmlns:o="urn:other" o:attr="1"><o:child>text</o:child><plain/></ssp:root>"#;
        let root = Document::from_string(xml).unwrap().into_root();
        let written = root.to_xml_string().unwrap();
        let reparsed = Document::from_string(&written).unwrap().into_root();

        assert_eq!(reparsed.expanded_name(), root.expanded_name());
        assert_eq!(reparsed.get_attribute_ns(Some("urn:other"), "attr"), Some("1"));
        let names: Vec<_> = reparsed.child_elements().map(|e| e.expanded_name()).collect();
        assert_eq!(
            names,
            vec![
                ExpandedName::namespaced("urn:other", "child"),
                ExpandedName::local("plain"),
            ]
        );
    }
}
