//! Namespace constraints of `xs:any` and `xs:anyAttribute`

use crate::error::{Error, Result};
use std::fmt;

/// One namespace of an explicit constraint list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExplicitNamespace {
    /// A namespace URI
    Uri(String),
    /// No namespace (##local)
    Local,
    /// The owning element's namespace (##targetNamespace)
    TargetNamespace,
}

impl ExplicitNamespace {
    /// Resolve to a concrete namespace given the owner's namespace
    fn resolve<'a>(&'a self, owner_namespace: Option<&'a str>) -> Option<&'a str> {
        match self {
            Self::Uri(uri) => Some(uri.as_str()),
            Self::Local => None,
            Self::TargetNamespace => owner_namespace,
        }
    }
}

impl fmt::Display for ExplicitNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uri(uri) => f.write_str(uri),
            Self::Local => f.write_str("##local"),
            Self::TargetNamespace => f.write_str("##targetNamespace"),
        }
    }
}

/// Namespace constraint for wildcards
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NamespaceConstraint {
    /// Any namespace, including no namespace (##any)
    #[default]
    Any,
    /// Any namespace except the owner's and except no namespace (##other)
    Other,
    /// Only unqualified content (##local)
    Local,
    /// Only the owner's namespace (##targetNamespace)
    TargetNamespace,
    /// Only the listed namespaces; never empty
    Explicit(Vec<ExplicitNamespace>),
}

impl NamespaceConstraint {
    /// Create an explicit constraint, rejecting an empty list
    pub fn explicit(namespaces: Vec<ExplicitNamespace>) -> Result<Self> {
        if namespaces.is_empty() {
            return Err(Error::InvalidConfiguration(
                "An explicit namespace constraint needs at least one namespace".to_string(),
            ));
        }
        Ok(Self::Explicit(namespaces))
    }

    /// Create from the value of a wildcard's `namespace` attribute
    pub fn from_namespace_attr(value: &str) -> Result<Self> {
        let value = value.trim();

        match value {
            "##any" => Ok(Self::Any),
            "##other" => Ok(Self::Other),
            "##local" => Ok(Self::Local),
            "##targetNamespace" => Ok(Self::TargetNamespace),
            _ => {
                let mut namespaces = Vec::new();
                for ns in value.split_whitespace() {
                    let item = match ns {
                        "##local" => ExplicitNamespace::Local,
                        "##targetNamespace" => ExplicitNamespace::TargetNamespace,
                        s if s.starts_with("##") => {
                            return Err(Error::InvalidConfiguration(format!(
                                "wrong value '{}' in 'namespace' attribute",
                                s
                            )));
                        }
                        uri => ExplicitNamespace::Uri(uri.to_string()),
                    };
                    if !namespaces.contains(&item) {
                        namespaces.push(item);
                    }
                }
                Self::explicit(namespaces)
            }
        }
    }

    /// Check if content in `namespace` is admitted under an owner in
    /// `owner_namespace`
    pub fn admits(&self, namespace: Option<&str>, owner_namespace: Option<&str>) -> bool {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        let owner_namespace = owner_namespace.filter(|ns| !ns.is_empty());
        match self {
            Self::Any => true,
            Self::Other => namespace.is_some() && namespace != owner_namespace,
            Self::Local => namespace.is_none(),
            Self::TargetNamespace => namespace == owner_namespace,
            Self::Explicit(list) => list
                .iter()
                .any(|item| item.resolve(owner_namespace) == namespace),
        }
    }
}

impl fmt::Display for NamespaceConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("##any"),
            Self::Other => f.write_str("##other"),
            Self::Local => f.write_str("##local"),
            Self::TargetNamespace => f.write_str("##targetNamespace"),
            Self::Explicit(list) => {
                let items: Vec<String> = list.iter().map(|i| i.to_string()).collect();
                f.write_str(&items.join(" "))
            }
        }
    }
}
