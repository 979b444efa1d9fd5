//! Containers for wildcard content
//!
//! Every assignment is checked against the container's [`Wildcard`], so a
//! container never holds content its wildcard would not have admitted when
//! reading.

use crate::documents::Element;
use crate::error::Result;
use crate::extensions::{Wildcard, XmlAttribute};
use crate::limits::Limits;
use crate::registry::{ElementRegistry, ExtensionElement};

/// Elements held by an `xs:any` particle
#[derive(Debug, Clone, Default)]
pub struct ExtendableElements {
    wildcard: Wildcard,
    items: Vec<Box<dyn ExtensionElement>>,
}

impl ExtendableElements {
    /// Create an empty container
    pub fn new(wildcard: Wildcard) -> Self {
        Self {
            wildcard,
            items: Vec::new(),
        }
    }

    /// Read the admitted children of `element`
    pub fn from_xml(
        wildcard: Wildcard,
        element: &Element,
        registry: &ElementRegistry,
        limits: &Limits,
    ) -> Result<Self> {
        let items = wildcard.elements_from_xml(element, registry, limits)?;
        Ok(Self { wildcard, items })
    }

    /// Replace the content; nothing changes when any item is rejected
    pub fn set(&mut self, items: Vec<Box<dyn ExtensionElement>>) -> Result<()> {
        self.wildcard.check_elements(&items)?;
        self.items = items;
        Ok(())
    }

    /// Append one element
    pub fn push(&mut self, item: Box<dyn ExtensionElement>) -> Result<()> {
        self.wildcard.check_elements(std::slice::from_ref(&item))?;
        self.items.push(item);
        Ok(())
    }

    /// Append every held element to `parent`
    pub fn to_xml(&self, parent: &mut Element) -> Result<()> {
        for item in &self.items {
            parent.append_child(item.to_xml()?);
        }
        Ok(())
    }

    /// Elements with the given name
    pub fn find<'a>(
        &'a self,
        namespace: Option<&'a str>,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a dyn ExtensionElement> + 'a {
        self.items
            .iter()
            .map(|item| item.as_ref())
            .filter(move |item| item.namespace_uri() == namespace && item.local_name() == local_name)
    }

    /// The held elements
    pub fn items(&self) -> &[Box<dyn ExtensionElement>] {
        &self.items
    }

    /// The wildcard guarding the container
    pub fn wildcard(&self) -> &Wildcard {
        &self.wildcard
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the container holds nothing
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every element
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Attributes held by an `xs:anyAttribute` wildcard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendableAttributes {
    wildcard: Wildcard,
    attributes: Vec<XmlAttribute>,
}

impl ExtendableAttributes {
    /// Create an empty container
    pub fn new(wildcard: Wildcard) -> Self {
        Self {
            wildcard,
            attributes: Vec::new(),
        }
    }

    /// Read the admitted attributes of `element`
    pub fn from_xml(wildcard: Wildcard, element: &Element, limits: &Limits) -> Result<Self> {
        let attributes = wildcard.attributes_from_xml(element, limits)?;
        Ok(Self {
            wildcard,
            attributes,
        })
    }

    /// Replace the content; nothing changes when any attribute is rejected
    pub fn set(&mut self, attributes: Vec<XmlAttribute>) -> Result<()> {
        self.wildcard.check_attributes(&attributes)?;
        self.attributes = attributes;
        Ok(())
    }

    /// Add an attribute, replacing one with the same expanded name
    pub fn insert(&mut self, attribute: XmlAttribute) -> Result<()> {
        self.wildcard
            .check_attributes(std::slice::from_ref(&attribute))?;
        match self
            .attributes
            .iter_mut()
            .find(|a| a.expanded_name() == attribute.expanded_name())
        {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
        Ok(())
    }

    /// Value of the attribute with the given name
    pub fn get(&self, namespace: Option<&str>, local_name: &str) -> Option<&XmlAttribute> {
        self.attributes
            .iter()
            .find(|a| a.namespace_uri() == namespace && a.local_name() == local_name)
    }

    /// Write every held attribute onto `element`
    pub fn to_xml(&self, element: &mut Element) {
        for attribute in &self.attributes {
            attribute.to_xml(element);
        }
    }

    /// The held attributes
    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    /// The wildcard guarding the container
    pub fn wildcard(&self) -> &Wildcard {
        &self.wildcard
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the container holds nothing
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;
    use crate::extensions::{Chunk, NamespaceConstraint};

    fn other() -> Wildcard {
        Wildcard::new(NamespaceConstraint::Other, Some("urn:owner"))
    }

    #[test]
    fn test_set_rejects_and_keeps_content() {
        let mut elements = ExtendableElements::new(other());
        elements
            .push(Box::new(Chunk::from(Element::new(Some("urn:x"), "x:a"))))
            .unwrap();

        let err = elements
            .set(vec![
                Box::new(Chunk::from(Element::new(Some("urn:x"), "x:b"))),
                Box::new(Chunk::from(Element::new(Some("urn:owner"), "o:c"))),
            ])
            .unwrap_err();
        assert!(err.is_schema_violation());
        assert!(err.to_string().contains("urn:owner"));
        assert_eq!(elements.len(), 1);
        assert_eq!(elements.items()[0].local_name(), "a");
    }

    #[test]
    fn test_push_unqualified_rejected_by_other() {
        let mut elements = ExtendableElements::new(other());
        assert!(elements
            .push(Box::new(Chunk::from(Element::new(None, "plain"))))
            .is_err());
        assert!(elements.is_empty());
    }

    #[test]
    fn test_elements_round_trip() {
        let doc = Document::from_string(
            r#"<o:Owner xmlns:o="urn:owner" xmlns:x="urn:x"><o:Own/><x:Ext a="1"><x:in/></x:Ext></o:Owner>"#,
        )
        .unwrap();
        let elements = ExtendableElements::from_xml(
            other(),
            doc.root(),
            &ElementRegistry::new(),
            &Limits::default(),
        )
        .unwrap();
        assert_eq!(elements.find(Some("urn:x"), "Ext").count(), 1);

        let mut owner = Element::new(Some("urn:owner"), "o:Owner");
        elements.to_xml(&mut owner).unwrap();
        assert_eq!(
            owner.to_xml_string().unwrap(),
            r#"<o:Owner xmlns:o="urn:owner"><x:Ext xmlns:x="urn:x" a="1"><x:in/></x:Ext></o:Owner>"#
        );
    }

    #[test]
    fn test_attributes_insert_and_replace() {
        let mut attrs = ExtendableAttributes::new(other());
        attrs
            .insert(XmlAttribute::new(Some("urn:x"), "x:a", "1").unwrap())
            .unwrap();
        attrs
            .insert(XmlAttribute::new(Some("urn:x"), "x:a", "2").unwrap())
            .unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get(Some("urn:x"), "a").unwrap().value().value(), "2");

        assert!(attrs
            .insert(XmlAttribute::new(None, "plain", "3").unwrap())
            .is_err());
    }

    #[test]
    fn test_attributes_round_trip() {
        let doc = Document::from_string(
            r#"<o:Owner xmlns:o="urn:owner" xmlns:x="urn:x" x:a="1" id="k"/>"#,
        )
        .unwrap();
        let attrs = ExtendableAttributes::from_xml(other(), doc.root(), &Limits::default()).unwrap();
        assert_eq!(attrs.len(), 1);

        let mut owner = Element::new(Some("urn:owner"), "o:Owner");
        attrs.to_xml(&mut owner);
        let reparsed = ExtendableAttributes::from_xml(
            other(),
            &Document::from_string(&owner.to_xml_string().unwrap())
                .unwrap()
                .into_root(),
            &Limits::default(),
        )
        .unwrap();
        assert_eq!(reparsed, attrs);
    }
}
