//! # Catalog Registry
//!
//! Catalog definitions loaded from a directory:
//!
//! ```text
//! schemas/
//!   catalogs.yaml              manifest: name, namespace, schema file, render
//!   automobile.schema.json
//!   gas-log.schema.json
//!   ...
//! ```
//!
//! Every schema named by the manifest is read and compiled at load time so
//! a broken schema file is reported when the registry is built rather
//! than on the first note that uses it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use hmm_core::NoteCatalog;

use crate::validate::{CompiledSchema, SchemaValidationError};

/// File name of the manifest inside a catalog directory.
pub const MANIFEST_FILE: &str = "catalogs.yaml";

/// Error loading a catalog directory.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The manifest could not be read or parsed.
    #[error("catalog manifest error for '{path}': {reason}")]
    ManifestLoad {
        /// Path to the manifest.
        path: String,
        /// Reason the manifest could not be loaded.
        reason: String,
    },

    /// A schema file named by the manifest could not be read.
    #[error("schema file '{path}' for catalog '{catalog}' could not be read: {reason}")]
    SchemaFile {
        /// Catalog naming the file.
        catalog: String,
        /// Path to the schema file.
        path: String,
        /// Reason the file could not be read.
        reason: String,
    },

    /// A schema file does not compile.
    #[error("catalog '{catalog}': {source}")]
    InvalidSchema {
        /// Catalog whose schema failed.
        catalog: String,
        /// The compile failure.
        #[source]
        source: SchemaValidationError,
    },

    /// Two manifest entries share a name.
    #[error("catalog '{0}' is defined more than once")]
    Duplicate(String),
}

#[derive(Debug, Deserialize)]
struct Manifest {
    catalogs: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    name: String,
    namespace: String,
    #[serde(default)]
    schema: Option<String>,
    #[serde(default)]
    render: String,
}

/// Catalogs keyed by name.
#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    catalogs: BTreeMap<String, NoteCatalog>,
}

impl CatalogRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `catalogs.yaml` and the schema files it names from `dir`.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the manifest or any schema file cannot
    /// be read, a schema does not compile, or a name repeats.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let manifest_path = dir.join(MANIFEST_FILE);
        let text = std::fs::read_to_string(&manifest_path).map_err(|e| {
            CatalogError::ManifestLoad {
                path: manifest_path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        let manifest: Manifest =
            serde_yaml::from_str(&text).map_err(|e| CatalogError::ManifestLoad {
                path: manifest_path.display().to_string(),
                reason: format!("invalid YAML: {e}"),
            })?;

        let mut registry = Self::new();
        for entry in manifest.catalogs {
            let schema = match &entry.schema {
                Some(file) => read_schema(dir, &entry.name, file)?,
                None => String::new(),
            };
            if !schema.trim().is_empty() {
                CompiledSchema::compile(&entry.name, &schema).map_err(|source| {
                    CatalogError::InvalidSchema {
                        catalog: entry.name.clone(),
                        source,
                    }
                })?;
            }
            let catalog = NoteCatalog::new(&entry.name, entry.namespace)
                .with_schema(schema)
                .with_render(entry.render);
            if registry.catalogs.contains_key(&entry.name) {
                return Err(CatalogError::Duplicate(entry.name));
            }
            registry.catalogs.insert(entry.name, catalog);
        }

        tracing::info!(
            dir = %dir.display(),
            catalogs = registry.len(),
            "catalog registry loaded"
        );
        Ok(registry)
    }

    /// Add or replace a catalog.
    pub fn insert(&mut self, catalog: NoteCatalog) {
        self.catalogs.insert(catalog.name.clone(), catalog);
    }

    /// Catalog by name.
    pub fn get(&self, name: &str) -> Option<&NoteCatalog> {
        self.catalogs.get(name)
    }

    /// All catalogs, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &NoteCatalog> {
        self.catalogs.values()
    }

    /// Catalog names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.catalogs.keys().map(String::as_str).collect()
    }

    /// Number of catalogs.
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    /// Returns true if no catalogs are registered.
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}

impl FromIterator<NoteCatalog> for CatalogRegistry {
    fn from_iter<I: IntoIterator<Item = NoteCatalog>>(iter: I) -> Self {
        let mut registry = Self::new();
        for catalog in iter {
            registry.insert(catalog);
        }
        registry
    }
}

fn read_schema(dir: &Path, catalog: &str, file: &str) -> Result<String, CatalogError> {
    let path: PathBuf = dir.join(file);
    std::fs::read_to_string(&path).map_err(|e| CatalogError::SchemaFile {
        catalog: catalog.to_string(),
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
