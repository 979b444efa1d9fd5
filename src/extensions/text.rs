//! Elements with typed text content
//!
//! The handler behind every `xs:<type>` name in a provider file.

use crate::documents::Element;
use crate::error::{Error, Result};
use crate::extensions::XmlAttribute;
use crate::registry::{ElementHandler, ExtensionElement};
use crate::types::{AnyValue, TypeDescriptor};
use std::any::Any;

/// An element whose content is a single typed value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextElement {
    namespace: Option<String>,
    prefix: Option<String>,
    local_name: String,
    attributes: Vec<XmlAttribute>,
    value: AnyValue,
}

impl TextElement {
    /// Create an element from a namespace, a qualified name and a value
    pub fn new(namespace: Option<&str>, qualified_name: &str, value: AnyValue) -> Self {
        let element = Element::new(namespace, qualified_name);
        Self {
            namespace: element.namespace,
            prefix: element.prefix,
            local_name: element.local_name,
            attributes: Vec::new(),
            value,
        }
    }

    /// Read an element whose text must be a valid `descriptor` value
    pub fn from_xml(element: &Element, descriptor: &'static TypeDescriptor) -> Result<Self> {
        if element.child_elements().next().is_some() {
            return Err(Error::violation(format!(
                "<{}> must have simple content of type xs:{}",
                element.qualified_name(),
                descriptor.name
            )));
        }
        let attributes = element
            .attributes
            .iter()
            .map(XmlAttribute::from_xml)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            namespace: element.namespace.clone(),
            prefix: element.prefix.clone(),
            local_name: element.local_name.clone(),
            attributes,
            value: AnyValue::new(descriptor, element.text_content())?,
        })
    }

    /// Add an attribute
    pub fn with_attribute(mut self, attribute: XmlAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// The typed content
    pub fn value(&self) -> &AnyValue {
        &self.value
    }

    /// Attributes carried by the element
    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }
}

impl ExtensionElement for TextElement {
    fn namespace_uri(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn local_name(&self) -> &str {
        &self.local_name
    }

    fn is_empty_element(&self) -> bool {
        self.attributes.is_empty() && self.value.value().is_empty()
    }

    fn to_xml(&self) -> Result<Element> {
        let mut element = Element::new(self.namespace.as_deref(), &self.qualified_name());
        for attribute in &self.attributes {
            attribute.to_xml(&mut element);
        }
        let text = self.value.value();
        if !text.is_empty() {
            element.append_text(text);
        }
        Ok(element)
    }

    fn clone_box(&self) -> Box<dyn ExtensionElement> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Handler reading [`TextElement`]s of one builtin type
#[derive(Debug, Clone)]
pub struct TextElementHandler {
    namespace: Option<String>,
    local_name: String,
    descriptor: &'static TypeDescriptor,
}

impl TextElementHandler {
    /// Create a handler for the given element name and content type
    pub fn new(
        namespace: Option<&str>,
        local_name: &str,
        descriptor: &'static TypeDescriptor,
    ) -> Self {
        Self {
            namespace: namespace.filter(|ns| !ns.is_empty()).map(String::from),
            local_name: local_name.to_string(),
            descriptor,
        }
    }

    /// Content type
    pub fn descriptor(&self) -> &'static TypeDescriptor {
        self.descriptor
    }
}

impl ElementHandler for TextElementHandler {
    fn namespace_uri(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn local_name(&self) -> &str {
        &self.local_name
    }

    fn from_xml(&self, element: &Element) -> Result<Box<dyn ExtensionElement>> {
        if !self.expanded_name().matches(element.namespace(), element.local_name()) {
            return Err(Error::violation(format!(
                "Handler for {} cannot read {}",
                self.expanded_name(),
                element.expanded_name()
            )));
        }
        Ok(Box::new(TextElement::from_xml(element, self.descriptor)?))
    }
}
