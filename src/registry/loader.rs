//! Registry provider files
//!
//! A provider file is a JSON document named `*.registry.json`:
//!
//! ```json
//! { "urn:example": { "Extension": "xs:token" }, "": { "note": "xs:string" } }
//! ```
//!
//! Keys are namespace URIs (`""` for no namespace), then local names, then
//! handler type names understood by the [`HandlerCatalog`](super::HandlerCatalog).

use crate::error::{Error, Result};
use crate::limits::Limits;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name suffix of provider files
pub const PROVIDER_SUFFIX: &str = ".registry.json";

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct ProviderFile(BTreeMap<String, BTreeMap<String, String>>);

/// One registration read from a provider file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEntry {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<String>,
    /// Local name
    pub local_name: String,
    /// Handler type name
    pub handler: String,
    /// File the entry came from
    pub source: PathBuf,
}

/// Reads provider files from disk
#[derive(Debug, Default)]
pub struct ProviderLoader {
    /// Resource limits
    limits: Limits,
}

impl ProviderLoader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Provider files under a path, sorted
    ///
    /// A path naming a file is returned as is; a directory contributes its
    /// `*.registry.json` entries (not recursive).
    pub fn discover(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }
        let entries = fs::read_dir(path).map_err(|e| {
            Error::Runtime(format!(
                "Failed to read provider directory '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                Error::Runtime(format!(
                    "Failed to read provider directory '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            let file = entry.path();
            let is_provider = file
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.ends_with(PROVIDER_SUFFIX));
            if is_provider && file.is_file() {
                files.push(file);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Read one provider file
    pub fn load_file(&self, path: &Path) -> Result<Vec<ProviderEntry>> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Runtime(format!(
                "Failed to read provider file '{}': {}",
                path.display(),
                e
            ))
        })?;

        self.limits.check_xml_size(content.len())?;

        let parsed: ProviderFile = serde_json::from_str(&content).map_err(|e| {
            Error::Runtime(format!(
                "Malformed provider file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut entries = Vec::new();
        for (namespace, names) in parsed.0 {
            let namespace = (!namespace.is_empty()).then_some(namespace);
            for (local_name, handler) in names {
                entries.push(ProviderEntry {
                    namespace: namespace.clone(),
                    local_name,
                    handler,
                    source: path.to_path_buf(),
                });
            }
        }
        Ok(entries)
    }

    /// Read every provider file under the given paths, in order
    ///
    /// Paths are visited in the order given, files within a directory in
    /// sorted order. Later entries override earlier ones once registered.
    pub fn load_all(&self, paths: &[PathBuf]) -> Result<Vec<ProviderEntry>> {
        let mut entries = Vec::new();
        for path in paths {
            for file in self.discover(path)? {
                let loaded = self.load_file(&file)?;
                log::debug!(
                    "Read {} registry entries from {}",
                    loaded.len(),
                    file.display()
                );
                entries.extend(loaded);
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"urn:a": {{"X": "xs:token", "Y": "xs:int"}}, "": {{"z": "xs:string"}}}}"#
        )
        .unwrap();

        let entries = ProviderLoader::new().load_file(file.path()).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].namespace, None);
        assert_eq!(entries[0].local_name, "z");
        assert_eq!(entries[1].namespace.as_deref(), Some("urn:a"));
        assert_eq!(entries[2].handler, "xs:int");
    }

    #[test]
    fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"urn:a": ["X"]}}"#).unwrap();
        let err = ProviderLoader::new().load_file(file.path()).unwrap_err();
        assert!(err.is_runtime());
    }

    #[test]
    fn test_missing_directory() {
        let err = ProviderLoader::new()
            .discover(Path::new("/definitely/not/here"))
            .unwrap_err();
        assert!(err.is_runtime());
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        for name in ["b.registry.json", "a.registry.json", "c.json"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        let files = ProviderLoader::new().discover(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.registry.json", "b.registry.json"]);
    }

    #[test]
    fn test_size_limit() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"urn:a": {{"X": "xs:token"}}}}"#).unwrap();

        let mut limits = Limits::default();
        limits.max_xml_size = 4;
        let err = ProviderLoader::new()
            .with_limits(limits)
            .load_file(file.path())
            .unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));
    }
}
