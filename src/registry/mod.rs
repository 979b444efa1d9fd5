//! Element registry
//!
//! Maps `(namespace, local name)` to the handler that builds a typed value
//! for that element. The dispatcher asks the registry for every wildcard
//! element it admits; names without a handler are kept as opaque chunks.
//!
//! A process-wide registry is available through [`ElementRegistry::global`].
//! It is populated once, on first use, from the provider files listed in
//! `XML_COMMON_REGISTRY_PATH`. Explicit registries built with
//! [`ElementRegistry::new`] can be passed wherever the global one is used.

mod handlers;
mod loader;

pub use handlers::{
    ElementHandler, ExtensionElement, HandlerCatalog, HandlerFactory, BUILTIN_HANDLER_PREFIX,
};
pub use loader::{ProviderEntry, ProviderLoader, PROVIDER_SUFFIX};

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::namespaces::ExpandedName;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Environment variable listing provider directories or files
pub const REGISTRY_PATH_ENV: &str = "XML_COMMON_REGISTRY_PATH";

type HandlerMap = HashMap<ExpandedName, Arc<dyn ElementHandler>>;

/// Where the registry looks for provider files
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Provider directories or files, visited in order
    pub paths: Vec<PathBuf>,
    /// Limits applied when reading provider files
    pub limits: Limits,
}

impl RegistryConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider directory or file
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Read provider paths from `XML_COMMON_REGISTRY_PATH`
    ///
    /// The variable uses the platform's path list syntax. An unset variable
    /// yields an empty configuration.
    pub fn from_env() -> Self {
        let paths = std::env::var_os(REGISTRY_PATH_ENV)
            .map(|value| {
                std::env::split_paths(&value)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            paths,
            limits: Limits::default(),
        }
    }
}

/// Registry mapping expanded element names to handlers
///
/// Writers are serialized and publish a fresh snapshot; readers only clone
/// the current snapshot, so a lookup never blocks on a registration in
/// progress for longer than the pointer swap.
pub struct ElementRegistry {
    snapshot: RwLock<Arc<HandlerMap>>,
    writer: Mutex<()>,
}

static GLOBAL: OnceCell<ElementRegistry> = OnceCell::new();

impl ElementRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(HashMap::new())),
            writer: Mutex::new(()),
        }
    }

    /// Create a registry populated from provider files
    pub fn from_config(config: &RegistryConfig, catalog: &HandlerCatalog) -> Result<Self> {
        let registry = Self::new();
        registry.load(config, catalog)?;
        Ok(registry)
    }

    /// The process-wide registry
    ///
    /// Populated from [`RegistryConfig::from_env`] the first time it is
    /// requested. A failed population is reported and retried on the next
    /// call.
    pub fn global() -> Result<&'static ElementRegistry> {
        GLOBAL.get_or_try_init(|| {
            let registry = Self::from_config(&RegistryConfig::from_env(), &HandlerCatalog::new())?;
            log::debug!("Global element registry populated with {} handlers", registry.len());
            Ok(registry)
        })
    }

    /// Restore the global registry to its provider-file state, dropping
    /// every registration made since
    pub fn reset_global() -> Result<()> {
        match GLOBAL.get() {
            Some(registry) => {
                let fresh = Self::from_config(&RegistryConfig::from_env(), &HandlerCatalog::new())?;
                registry.replace(fresh.current());
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Register a handler under a key
    ///
    /// The handler must report the same name it is registered under. An
    /// existing registration for the key is replaced.
    pub fn register(
        &self,
        namespace: Option<&str>,
        local_name: &str,
        handler: Arc<dyn ElementHandler>,
    ) -> Result<()> {
        let key = registry_key(namespace, local_name);
        let reported = registry_key(handler.namespace_uri(), handler.local_name());
        if reported != key {
            return Err(Error::InvalidConfiguration(format!(
                "Handler for {} cannot be registered as {}",
                reported, key
            )));
        }
        self.update(|map| {
            map.insert(key, handler);
        });
        Ok(())
    }

    /// Register a handler under the name it reports
    pub fn register_handler(&self, handler: Arc<dyn ElementHandler>) -> Result<()> {
        let key = registry_key(handler.namespace_uri(), handler.local_name());
        self.register(key.namespace.as_deref(), &key.local_name, handler)
    }

    /// Remove the registration for a key
    pub fn unregister(&self, namespace: Option<&str>, local_name: &str) -> bool {
        let key = registry_key(namespace, local_name);
        let mut removed = false;
        self.update(|map| removed = map.remove(&key).is_some());
        removed
    }

    /// Look up the handler for a key
    pub fn resolve(
        &self,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Option<Arc<dyn ElementHandler>> {
        self.current()
            .get(&registry_key(namespace, local_name))
            .cloned()
    }

    /// Check if a key has a handler
    pub fn contains(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.resolve(namespace, local_name).is_some()
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<ExpandedName> {
        let mut keys: Vec<_> = self.current().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.current().len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    /// Remove every registration
    pub fn clear(&self) {
        self.replace(Arc::new(HashMap::new()));
    }

    /// Register every entry of the configured provider files
    ///
    /// Entries are applied in file order, so the last registration of a key
    /// wins. Returns the number of entries applied.
    pub fn load(&self, config: &RegistryConfig, catalog: &HandlerCatalog) -> Result<usize> {
        let loader = ProviderLoader::new().with_limits(config.limits.clone());
        let entries = loader.load_all(&config.paths)?;

        // Build everything before publishing so a bad entry leaves the
        // registry untouched.
        let mut handlers = Vec::with_capacity(entries.len());
        for entry in &entries {
            let handler = catalog
                .instantiate(&entry.handler, entry.namespace.as_deref(), &entry.local_name)
                .map_err(|e| match e {
                    Error::InvalidConfiguration(msg) => Error::InvalidConfiguration(format!(
                        "{} (in {})",
                        msg,
                        entry.source.display()
                    )),
                    other => other,
                })?;
            if registry_key(handler.namespace_uri(), handler.local_name())
                != registry_key(entry.namespace.as_deref(), &entry.local_name)
            {
                return Err(Error::InvalidConfiguration(format!(
                    "Handler '{}' handles {}, not {}",
                    entry.handler,
                    handler.expanded_name(),
                    ExpandedName::new(entry.namespace.as_deref(), entry.local_name.as_str())
                )));
            }
            handlers.push(handler);
        }

        self.update(|map| {
            for (entry, handler) in entries.iter().zip(handlers) {
                let key = ExpandedName::new(entry.namespace.clone(), entry.local_name.clone());
                if map.insert(key, handler).is_some() {
                    log::debug!(
                        "{} overrides an earlier registration of {{{}}}{}",
                        entry.source.display(),
                        entry.namespace.as_deref().unwrap_or(""),
                        entry.local_name
                    );
                }
            }
        });
        Ok(entries.len())
    }

    fn current(&self) -> Arc<HandlerMap> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, map: Arc<HandlerMap>) {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = map;
    }

    fn update(&self, f: impl FnOnce(&mut HandlerMap)) {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = (*self.current()).clone();
        f(&mut next);
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
    }
}

// An empty namespace is no namespace.
fn registry_key(namespace: Option<&str>, local_name: &str) -> ExpandedName {
    ExpandedName::new(namespace.filter(|ns| !ns.is_empty()), local_name)
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
