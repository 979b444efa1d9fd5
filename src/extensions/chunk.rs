//! Opaque pass-through of unregistered elements

use crate::documents::Element;
use crate::error::Result;
use crate::registry::ExtensionElement;
use std::any::Any;

/// An element admitted by a wildcard that no handler is registered for
///
/// The subtree is kept as read and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    element: Element,
}

impl Chunk {
    /// Import an element (deep copy)
    pub fn from_xml(element: &Element) -> Self {
        Self {
            element: element.clone(),
        }
    }

    /// The wrapped element
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Take the wrapped element
    pub fn into_element(self) -> Element {
        self.element
    }
}

impl From<Element> for Chunk {
    fn from(element: Element) -> Self {
        Self { element }
    }
}

impl ExtensionElement for Chunk {
    fn namespace_uri(&self) -> Option<&str> {
        self.element.namespace()
    }

    fn prefix(&self) -> Option<&str> {
        self.element.prefix()
    }

    fn local_name(&self) -> &str {
        self.element.local_name()
    }

    fn is_empty_element(&self) -> bool {
        self.element.is_empty()
    }

    fn to_xml(&self) -> Result<Element> {
        Ok(self.element.clone())
    }

    fn clone_box(&self) -> Box<dyn ExtensionElement> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;

    #[test]
    fn test_chunk_names() {
        let doc = Document::from_string(r#"<x:Ext xmlns:x="urn:x" a="1"><b/></x:Ext>"#).unwrap();
        let chunk = Chunk::from_xml(doc.root());
        assert_eq!(chunk.namespace_uri(), Some("urn:x"));
        assert_eq!(chunk.prefix(), Some("x"));
        assert_eq!(chunk.local_name(), "Ext");
        assert_eq!(chunk.qualified_name(), "x:Ext");
        assert!(!chunk.is_empty_element());
        assert_eq!(&chunk.to_xml().unwrap(), doc.root());
    }

    #[test]
    fn test_chunk_is_empty() {
        assert!(Chunk::from(Element::new(Some("urn:x"), "x:e")).is_empty_element());

        let mut with_text = Element::new(None, "e");
        with_text.append_text("t");
        assert!(!Chunk::from(with_text).is_empty_element());
    }
}
