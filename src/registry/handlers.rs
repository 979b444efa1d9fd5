//! Element handler traits and the handler catalog
//!
//! A handler knows the one element name it is registered under and turns
//! such an element into a typed [`ExtensionElement`]. Provider files refer to
//! handlers by name; the [`HandlerCatalog`] turns those names into handler
//! instances.

use crate::documents::Element;
use crate::error::{Error, Result};
use crate::extensions::TextElementHandler;
use crate::namespaces::ExpandedName;
use crate::types::TypeDescriptor;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Trait for element handlers
///
/// Handlers are resolved through the registry by the expanded name of the
/// element they were registered for. The name a handler reports must equal
/// that registration key.
pub trait ElementHandler: Send + Sync {
    /// Namespace of the handled element (None for unqualified elements)
    fn namespace_uri(&self) -> Option<&str>;

    /// Local name of the handled element
    fn local_name(&self) -> &str;

    /// Build the typed value for an element
    fn from_xml(&self, element: &Element) -> Result<Box<dyn ExtensionElement>>;

    /// Expanded name of the handled element
    fn expanded_name(&self) -> ExpandedName {
        ExpandedName::new(self.namespace_uri(), self.local_name())
    }
}

/// A typed element produced by the dispatcher
///
/// Registered handlers produce their own implementations; content without a
/// handler is kept as an opaque [`Chunk`](crate::extensions::Chunk).
pub trait ExtensionElement: fmt::Debug + Send + Sync {
    /// Namespace URI, if any
    fn namespace_uri(&self) -> Option<&str>;

    /// Prefix used for the element name, if any
    fn prefix(&self) -> Option<&str>;

    /// Local name
    fn local_name(&self) -> &str;

    /// Whether the element carries neither attributes nor content
    fn is_empty_element(&self) -> bool;

    /// Render back to an element
    fn to_xml(&self) -> Result<Element>;

    /// Clone behind the trait object
    fn clone_box(&self) -> Box<dyn ExtensionElement>;

    /// Access the concrete type
    fn as_any(&self) -> &dyn Any;

    /// Qualified name (`prefix:local` or `local`)
    fn qualified_name(&self) -> String {
        match self.prefix() {
            Some(prefix) => format!("{}:{}", prefix, self.local_name()),
            None => self.local_name().to_string(),
        }
    }

    /// Expanded name
    fn expanded_name(&self) -> ExpandedName {
        ExpandedName::new(self.namespace_uri(), self.local_name())
    }
}

impl Clone for Box<dyn ExtensionElement> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl dyn ExtensionElement {
    /// Downcast to a concrete element type
    pub fn downcast_ref<T: ExtensionElement + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Builds a handler bound to a registration key
pub type HandlerFactory =
    Arc<dyn Fn(Option<&str>, &str) -> Arc<dyn ElementHandler> + Send + Sync>;

/// Prefix selecting a typed text handler for a builtin type
pub const BUILTIN_HANDLER_PREFIX: &str = "xs:";

/// Names handler types for provider files
///
/// Names are either registered explicitly or of the form `xs:<type>`, which
/// binds a [`TextElementHandler`] for that builtin type to the key.
#[derive(Clone, Default)]
pub struct HandlerCatalog {
    factories: HashMap<String, HandlerFactory>,
}

impl HandlerCatalog {
    /// Create a catalog that knows only the builtin `xs:` names
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixed handler under a name
    pub fn add_handler(&mut self, name: impl Into<String>, handler: Arc<dyn ElementHandler>) {
        self.factories
            .insert(name.into(), Arc::new(move |_: Option<&str>, _: &str| handler.clone()));
    }

    /// Register a factory that builds a handler for whatever key it is
    /// registered under
    pub fn add_factory<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(Option<&str>, &str) -> Arc<dyn ElementHandler> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Check if a handler name is known
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name) || builtin_descriptor(name).is_some()
    }

    /// Build the handler a provider file names for a key
    pub fn instantiate(
        &self,
        name: &str,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Result<Arc<dyn ElementHandler>> {
        if let Some(factory) = self.factories.get(name) {
            return Ok(factory(namespace, local_name));
        }
        if let Some(descriptor) = builtin_descriptor(name) {
            return Ok(Arc::new(TextElementHandler::new(
                namespace,
                local_name,
                descriptor,
            )));
        }
        Err(Error::InvalidConfiguration(format!(
            "Unknown handler type '{}' for {}",
            name,
            ExpandedName::new(namespace, local_name)
        )))
    }
}

impl fmt::Debug for HandlerCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("HandlerCatalog").field("names", &names).finish()
    }
}

fn builtin_descriptor(name: &str) -> Option<&'static TypeDescriptor> {
    name.strip_prefix(BUILTIN_HANDLER_PREFIX)
        .and_then(TypeDescriptor::lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extensions::TextElement;

    #[test]
    fn test_builtin_names() {
        let catalog = HandlerCatalog::new();
        assert!(catalog.contains("xs:token"));
        assert!(!catalog.contains("xs:nope"));
        assert!(!catalog.contains("token"));

        let handler = catalog.instantiate("xs:int", Some("urn:a"), "Count").unwrap();
        assert_eq!(handler.namespace_uri(), Some("urn:a"));
        assert_eq!(handler.local_name(), "Count");
    }

    #[test]
    fn test_unknown_name() {
        let err = HandlerCatalog::new()
            .instantiate("Missing", None, "x")
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_factory() {
        let mut catalog = HandlerCatalog::new();
        catalog.add_factory("Text", |ns, local| {
            Arc::new(TextElementHandler::new(ns, local, &crate::types::STRING))
        });
        let handler = catalog.instantiate("Text", None, "note").unwrap();

        let mut element = Element::new(None, "note");
        element.append_text("hi");
        let value = handler.from_xml(&element).unwrap();
        let text = value.downcast_ref::<TextElement>().unwrap();
        assert_eq!(text.value().value(), "hi");
    }
}
