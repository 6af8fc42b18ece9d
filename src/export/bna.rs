//! Business network archive assembly

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use tracing::info;

use crate::models::TypeRegistry;
use crate::schema::SchemaReflector;

use super::GenerationError;
use super::archive::ArchiveWriter;
use super::config::BnaConfig;
use super::parts::{AclPart, ArchivePart, CtoPart, PackageJsonPart, QueryPart};

/// Assembles a `.bna` archive from a type registry.
///
/// Entries are written as: one `models/<namespace>.cto` per reflected
/// namespace, `queries.qry` when queries are declared, `package.json`, then
/// `permissions.acl`.
///
/// # Example
///
/// ```rust
/// use std::io::Cursor;
/// use composer_sdk::export::{BnaConfig, BnaGenerator};
/// use composer_sdk::models::{FieldDescriptor, FieldType, TypeDescriptor, TypeRegistry};
///
/// let mut registry = TypeRegistry::new();
/// registry.register(
///     TypeDescriptor::asset("org.acme", "Car")
///         .field(FieldDescriptor::data("vin", FieldType::string()).primary()),
/// );
///
/// let generator = BnaGenerator::new(&registry, BnaConfig::default());
/// let entries = generator.generate(Cursor::new(Vec::new())).unwrap();
/// assert_eq!(entries, vec!["models/org.acme.cto", "package.json", "permissions.acl"]);
/// ```
pub struct BnaGenerator<'a> {
    registry: &'a TypeRegistry,
    config: BnaConfig,
}

impl<'a> BnaGenerator<'a> {
    pub fn new(registry: &'a TypeRegistry, config: BnaConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &BnaConfig {
        &self.config
    }

    /// Build every part in archive order without writing anything
    pub fn parts(&self) -> Result<Vec<Box<dyn ArchivePart>>, GenerationError> {
        let reflector = SchemaReflector::new(self.registry)
            .with_excluded_namespaces(self.config.excluded_namespaces.iter().cloned());

        let mut parts: Vec<Box<dyn ArchivePart>> = Vec::new();
        for part in reflector.reflect()? {
            parts.push(Box::new(CtoPart::new(part)));
        }
        let queries = QueryPart::new(reflector.reflect_queries()?);
        if !queries.is_empty() {
            parts.push(Box::new(queries));
        }
        parts.push(Box::new(PackageJsonPart::new(
            &self.config.name,
            &self.config.version,
            &self.config.description,
        )));
        parts.push(Box::new(AclPart));
        Ok(parts)
    }

    /// Write the archive and return the entry names in write order.
    ///
    /// Reflection runs to completion before the first entry is written, so a
    /// schema error never leaves a partial archive behind.
    pub fn generate<W: Write + Seek>(&self, writer: W) -> Result<Vec<String>, GenerationError> {
        let parts = self.parts()?;
        let mut archive = ArchiveWriter::new(writer);
        for part in &parts {
            let content = part.render()?;
            info!("add bna part {}: {}", part.entry_name(), content);
            archive.add_entry(&part.entry_name(), content.as_bytes())?;
        }
        let entries = archive.entries().to_vec();
        archive.finish()?;
        info!("Generated business network archive with {} entries", entries.len());
        Ok(entries)
    }

    /// Create (or truncate) the file and write the archive into it
    pub fn generate_to_file(&self, path: impl AsRef<Path>) -> Result<Vec<String>, GenerationError> {
        let path = path.as_ref();
        info!("Writing business network archive to {}", path.display());
        let file = File::create(path)?;
        self.generate(file)
    }
}
