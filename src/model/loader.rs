//! Registry loading functionality
//!
//! Builds a [`TypeRegistry`] from a descriptor document. Documents are YAML
//! or JSON with three optional lists:
//!
//! ```yaml
//! types:
//!   - namespace: org.acme
//!     name: Car
//!     kind: asset
//!     fields:
//!       - { name: vin, type: String, marker: data, primary: true }
//! enums:
//!   - { namespace: org.acme, name: Color, constants: [RED, GREEN] }
//! queries:
//!   - { description: all cars, statement: SELECT org.acme.Car }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{EnumDescriptor, QueryDefinition, TypeDescriptor, TypeRegistry};
use crate::validation::input::{validate_field_name, validate_namespace, validate_type_name};
use crate::validation::{InheritanceValidator, ValidationError};

/// Errors that can occur while loading a descriptor document
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("YAML parsing error: {0}")]
    Yaml(String),

    #[error("JSON parsing error: {0}")]
    Json(String),

    #[error("IO error: {0}")]
    Io(String),

    /// A declared name is not a usable identifier
    #[error("invalid declaration {item}: {source}")]
    Invalid {
        item: String,
        #[source]
        source: ValidationError,
    },
}

impl From<serde_yaml::Error> for LoaderError {
    fn from(e: serde_yaml::Error) -> Self {
        LoaderError::Yaml(e.to_string())
    }
}

impl From<serde_json::Error> for LoaderError {
    fn from(e: serde_json::Error) -> Self {
        LoaderError::Json(e.to_string())
    }
}

impl From<std::io::Error> for LoaderError {
    fn from(e: std::io::Error) -> Self {
        LoaderError::Io(e.to_string())
    }
}

/// Top-level shape of a descriptor document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryDocument {
    pub types: Vec<TypeDescriptor>,
    pub enums: Vec<EnumDescriptor>,
    pub queries: Vec<QueryDefinition>,
}

/// Loads type registries from descriptor documents
pub struct RegistryLoader;

impl RegistryLoader {
    /// Load a registry from YAML text.
    ///
    /// # Example
    ///
    /// ```rust
    /// use composer_sdk::model::RegistryLoader;
    ///
    /// let registry = RegistryLoader::from_yaml_str(r#"
    /// types:
    ///   - namespace: org.acme
    ///     name: Car
    ///     kind: asset
    ///     fields:
    ///       - { name: vin, type: String, marker: data, primary: true }
    /// "#).unwrap();
    /// assert!(registry.get("org.acme.Car").is_some());
    /// ```
    pub fn from_yaml_str(text: &str) -> Result<TypeRegistry, LoaderError> {
        let document: RegistryDocument = serde_yaml::from_str(text)?;
        Self::load_document(document)
    }

    /// Load a registry from JSON text
    pub fn from_json_str(text: &str) -> Result<TypeRegistry, LoaderError> {
        let document: RegistryDocument = serde_json::from_str(text)?;
        Self::load_document(document)
    }

    /// Load a registry from a file; `.json` files are read as JSON, anything
    /// else as YAML
    pub fn from_path(path: impl AsRef<Path>) -> Result<TypeRegistry, LoaderError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        info!("Loading type descriptors from {}", path.display());
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Validate every declaration and register it on top of the built-in types
    pub fn load_document(document: RegistryDocument) -> Result<TypeRegistry, LoaderError> {
        for descriptor in &document.types {
            let item = descriptor.qualified_name();
            check(&item, validate_namespace(&descriptor.namespace))?;
            check(&item, validate_type_name(&descriptor.name))?;
            for field in &descriptor.fields {
                check(&format!("{}.{}", item, field.name), validate_field_name(&field.name))?;
            }
        }
        for descriptor in &document.enums {
            let item = descriptor.qualified_name();
            check(&item, validate_namespace(&descriptor.namespace))?;
            check(&item, validate_type_name(&descriptor.name))?;
        }

        let mut registry = TypeRegistry::new();
        let (types, enums, queries) = (
            document.types.len(),
            document.enums.len(),
            document.queries.len(),
        );
        for descriptor in document.types {
            registry.register(descriptor);
        }
        for descriptor in document.enums {
            registry.register_enum(descriptor);
        }
        for query in document.queries {
            registry.register_query(query);
        }

        for missing in InheritanceValidator::new().validate(&registry).missing_parents {
            warn!(
                "Type {} extends unregistered type {}",
                missing.type_name, missing.parent
            );
        }

        info!(
            "Loaded {} types, {} enums and {} queries",
            types, enums, queries
        );
        Ok(registry)
    }
}

fn check(item: &str, result: Result<(), ValidationError>) -> Result<(), LoaderError> {
    result.map_err(|source| LoaderError::Invalid {
        item: item.to_string(),
        source,
    })
}
