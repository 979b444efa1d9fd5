//! `xs:any` / `xs:anyAttribute` dispatch
//!
//! A [`Wildcard`] decides which children or attributes of an owner element
//! it admits. The decision applies the exclusion list first and the
//! namespace constraint second; both the read path and the write path go
//! through the same check.

use crate::documents::Element;
use crate::error::{Error, Result, SchemaViolation};
use crate::extensions::{Chunk, NamespaceConstraint, XmlAttribute};
use crate::limits::Limits;
use crate::namespaces::ExpandedName;
use crate::registry::{ElementRegistry, ExtensionElement};

/// A wildcard particle bound to its owner's namespace
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Wildcard {
    /// Namespace constraint
    pub constraint: NamespaceConstraint,
    /// Names never admitted, whatever the constraint says
    pub exclusions: Vec<ExpandedName>,
    /// Namespace of the owning element
    pub owner_namespace: Option<String>,
}

impl Wildcard {
    /// Create a wildcard without exclusions
    pub fn new(constraint: NamespaceConstraint, owner_namespace: Option<&str>) -> Self {
        Self {
            constraint,
            exclusions: Vec::new(),
            owner_namespace: owner_namespace.filter(|ns| !ns.is_empty()).map(String::from),
        }
    }

    /// Exclude a name
    pub fn exclude(mut self, namespace: Option<&str>, local_name: &str) -> Self {
        self.exclusions.push(ExpandedName::new(namespace, local_name));
        self
    }

    /// Exclude several names
    pub fn with_exclusions(mut self, names: impl IntoIterator<Item = ExpandedName>) -> Self {
        self.exclusions.extend(names);
        self
    }

    /// Check if a name is on the exclusion list
    pub fn is_excluded(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.exclusions
            .iter()
            .any(|name| name.matches(namespace, local_name))
    }

    /// Check if a name is admitted
    pub fn admits(&self, namespace: Option<&str>, local_name: &str) -> bool {
        !self.is_excluded(namespace, local_name)
            && self
                .constraint
                .admits(namespace, self.owner_namespace.as_deref())
    }

    /// Read the admitted child elements of `element`
    ///
    /// Admitted elements with a registered handler are built by it; the rest
    /// are kept as [`Chunk`]s. Text between elements is ignored.
    pub fn elements_from_xml(
        &self,
        element: &Element,
        registry: &ElementRegistry,
        limits: &Limits,
    ) -> Result<Vec<Box<dyn ExtensionElement>>> {
        let mut items: Vec<Box<dyn ExtensionElement>> = Vec::new();
        for (index, child) in element.child_elements().enumerate() {
            limits.check_children(index + 1)?;
            if !self.admits(child.namespace(), child.local_name()) {
                continue;
            }
            match registry.resolve(child.namespace(), child.local_name()) {
                Some(handler) => items.push(handler.from_xml(child)?),
                None => {
                    log::trace!(
                        "No handler for {}, keeping it as an opaque chunk",
                        child.expanded_name()
                    );
                    items.push(Box::new(Chunk::from_xml(child)));
                }
            }
        }
        Ok(items)
    }

    /// Read the admitted attributes of `element`
    pub fn attributes_from_xml(
        &self,
        element: &Element,
        limits: &Limits,
    ) -> Result<Vec<XmlAttribute>> {
        limits.check_attributes(element.attributes.len())?;
        element
            .attributes
            .iter()
            .filter(|a| self.admits(a.namespace.as_deref(), &a.local_name))
            .map(XmlAttribute::from_xml)
            .collect()
    }

    /// Check that every element is admitted
    pub fn check_elements(&self, items: &[Box<dyn ExtensionElement>]) -> Result<()> {
        self.check_names(items.iter().map(|item| item.expanded_name()), "element")
    }

    /// Check that every attribute is admitted
    pub fn check_attributes(&self, attributes: &[XmlAttribute]) -> Result<()> {
        self.check_names(attributes.iter().map(XmlAttribute::expanded_name), "attribute")
    }

    fn check_names(&self, names: impl Iterator<Item = ExpandedName>, kind: &str) -> Result<()> {
        let mut excluded = Vec::new();
        let mut namespaces: Vec<String> = Vec::new();
        for name in names {
            if self.is_excluded(name.namespace.as_deref(), &name.local_name) {
                excluded.push(name.to_string());
            } else if !self
                .constraint
                .admits(name.namespace.as_deref(), self.owner_namespace.as_deref())
            {
                let ns = name
                    .namespace
                    .clone()
                    .unwrap_or_else(|| "(no namespace)".to_string());
                if !namespaces.contains(&ns) {
                    namespaces.push(ns);
                }
            }
        }

        if excluded.is_empty() && namespaces.is_empty() {
            return Ok(());
        }

        let mut reasons = Vec::new();
        if !namespaces.is_empty() {
            reasons.push(format!(
                "namespace(s) {} not allowed by '{}'",
                namespaces.join(", "),
                self.constraint
            ));
        }
        if !excluded.is_empty() {
            reasons.push(format!("excluded name(s) {}", excluded.join(", ")));
        }
        Err(Error::SchemaViolation(
            SchemaViolation::new(format!("Wildcard rejects {} content", kind))
                .with_reason(reasons.join("; ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;
    use crate::extensions::{TextElement, TextElementHandler};
    use crate::types::INT;
    use std::sync::Arc;

    const DOC: &str = r#"<o:Owner xmlns:o="urn:owner" xmlns:x="urn:x" x:a="1" o:b="2" c="3">
        <o:Own/>
        <x:Foreign/>
        <x:Count>7</x:Count>
        <Plain/>
    </o:Owner>"#;

    fn names(items: &[Box<dyn ExtensionElement>]) -> Vec<String> {
        items.iter().map(|i| i.local_name().to_string()).collect()
    }

    #[test]
    fn test_other_mode() {
        let doc = Document::from_string(DOC).unwrap();
        let wildcard = Wildcard::new(NamespaceConstraint::Other, Some("urn:owner"));
        let items = wildcard
            .elements_from_xml(doc.root(), &ElementRegistry::new(), &Limits::default())
            .unwrap();
        assert_eq!(names(&items), vec!["Foreign", "Count"]);

        let attrs = wildcard.attributes_from_xml(doc.root(), &Limits::default()).unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].local_name(), "a");
    }

    #[test]
    fn test_target_namespace_mode() {
        let doc = Document::from_string(DOC).unwrap();
        let wildcard = Wildcard::new(NamespaceConstraint::TargetNamespace, Some("urn:owner"));
        let items = wildcard
            .elements_from_xml(doc.root(), &ElementRegistry::new(), &Limits::default())
            .unwrap();
        assert_eq!(names(&items), vec!["Own"]);
    }

    #[test]
    fn test_registered_handler_is_used() {
        let doc = Document::from_string(DOC).unwrap();
        let registry = ElementRegistry::new();
        registry
            .register_handler(Arc::new(TextElementHandler::new(Some("urn:x"), "Count", &INT)))
            .unwrap();

        let wildcard = Wildcard::new(NamespaceConstraint::Any, Some("urn:owner"));
        let items = wildcard
            .elements_from_xml(doc.root(), &registry, &Limits::default())
            .unwrap();
        assert_eq!(items.len(), 4);
        assert!(items[1].downcast_ref::<Chunk>().is_some());
        let count = items[2].downcast_ref::<TextElement>().unwrap();
        assert_eq!(count.value().value(), "7");
    }

    #[test]
    fn test_exclusions_apply_in_every_mode() {
        let doc = Document::from_string(DOC).unwrap();
        let modes = [
            NamespaceConstraint::Any,
            NamespaceConstraint::Other,
            NamespaceConstraint::from_namespace_attr("urn:x").unwrap(),
        ];
        for mode in modes {
            let wildcard = Wildcard::new(mode, Some("urn:owner")).exclude(Some("urn:x"), "Foreign");
            let items = wildcard
                .elements_from_xml(doc.root(), &ElementRegistry::new(), &Limits::default())
                .unwrap();
            assert!(!names(&items).contains(&"Foreign".to_string()));
            assert!(names(&items).contains(&"Count".to_string()));
        }
    }

    #[test]
    fn test_zero_matches_is_valid() {
        let doc = Document::from_string("<o:Owner xmlns:o='urn:owner'><o:a/></o:Owner>").unwrap();
        let wildcard = Wildcard::new(NamespaceConstraint::Local, Some("urn:owner"));
        let items = wildcard
            .elements_from_xml(doc.root(), &ElementRegistry::new(), &Limits::default())
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_child_limit() {
        let doc = Document::from_string(DOC).unwrap();
        let wildcard = Wildcard::new(NamespaceConstraint::Any, None);
        let err = wildcard
            .elements_from_xml(
                doc.root(),
                &ElementRegistry::new(),
                &Limits::default().with_max_children(2),
            )
            .err()
            .unwrap();
        assert!(matches!(err, Error::LimitExceeded(_)));
    }

    #[test]
    fn test_handler_failure_propagates() {
        let doc = Document::from_string(
            "<o:Owner xmlns:o='urn:owner' xmlns:x='urn:x'><x:Count>seven</x:Count></o:Owner>",
        )
        .unwrap();
        let registry = ElementRegistry::new();
        registry
            .register_handler(Arc::new(TextElementHandler::new(Some("urn:x"), "Count", &INT)))
            .unwrap();
        let wildcard = Wildcard::new(NamespaceConstraint::Other, Some("urn:owner"));
        assert!(wildcard
            .elements_from_xml(doc.root(), &registry, &Limits::default())
            .is_err());
    }

    #[test]
    fn test_check_names_reports_namespaces() {
        let wildcard = Wildcard::new(NamespaceConstraint::Other, Some("urn:owner"))
            .exclude(Some("urn:x"), "no");
        let attrs = vec![
            XmlAttribute::new(Some("urn:owner"), "o:a", "1").unwrap(),
            XmlAttribute::new(None, "b", "2").unwrap(),
            XmlAttribute::new(Some("urn:x"), "x:no", "3").unwrap(),
        ];
        let err = wildcard.check_attributes(&attrs).unwrap_err().to_string();
        assert!(err.contains("urn:owner"));
        assert!(err.contains("(no namespace)"));
        assert!(err.contains("{urn:x}no"));
    }
}
