//! Configuration for archive generation

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SYSTEM_NAMESPACE;

/// Errors that can occur while loading a generator configuration
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Parse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

/// Configuration for business network archive generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct BnaConfig {
    /// Package name written to the manifest
    pub name: String,

    /// Package version written to the manifest
    pub version: String,

    /// Package description written to the manifest
    pub description: String,

    /// Namespaces whose types are never reflected into schema files
    pub excluded_namespaces: Vec<String>,
}

impl Default for BnaConfig {
    fn default() -> Self {
        Self {
            name: "business-network".to_string(),
            version: "0.0.1".to_string(),
            description: String::new(),
            excluded_namespaces: vec![SYSTEM_NAMESPACE.to_string()],
        }
    }
}

impl BnaConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> BnaConfigBuilder {
        BnaConfigBuilder::default()
    }

    /// Parse a configuration from TOML; missing keys keep their defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use composer_sdk::export::BnaConfig;
    ///
    /// let config = BnaConfig::from_toml_str(r#"
    /// name = "car-network"
    /// version = "1.2.0"
    /// "#).unwrap();
    /// assert_eq!(config.name, "car-network");
    /// assert_eq!(config.excluded_namespaces, vec!["org.hyperledger.composer.system"]);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Builder for BnaConfig
#[derive(Debug, Default)]
pub struct BnaConfigBuilder {
    config: BnaConfig,
}

impl BnaConfigBuilder {
    /// Set the package name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the package version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Set the package description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = description.into();
        self
    }

    /// Add a namespace to skip during reflection
    pub fn exclude_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        if !self.config.excluded_namespaces.contains(&namespace) {
            self.config.excluded_namespaces.push(namespace);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> BnaConfig {
        self.config
    }
}
