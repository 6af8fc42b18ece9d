//! Archive parts
//!
//! Every entry of a business network archive is an [`ArchivePart`]: a path
//! inside the archive plus the text written there.

use serde::Serialize;

use crate::models::QueryDefinition;
use crate::schema::NamespacePart;

use super::GenerationError;
use super::cto::CtoExporter;

/// Bundled access control rules copied into every archive
pub const DEFAULT_ACL: &str = include_str!("../../resources/default.acl");

/// A named unit written into the archive
pub trait ArchivePart {
    /// Path of the entry inside the archive
    fn entry_name(&self) -> String;

    /// Text content of the entry
    fn render(&self) -> Result<String, GenerationError>;
}

/// One `models/<namespace>.cto` entry
#[derive(Debug, Clone)]
pub struct CtoPart {
    part: NamespacePart,
}

impl CtoPart {
    pub fn new(part: NamespacePart) -> Self {
        Self { part }
    }

    pub fn namespace_part(&self) -> &NamespacePart {
        &self.part
    }
}

impl ArchivePart for CtoPart {
    fn entry_name(&self) -> String {
        self.part.entry_name()
    }

    fn render(&self) -> Result<String, GenerationError> {
        Ok(CtoExporter::export_part(&self.part)?)
    }
}

/// The `queries.qry` entry
#[derive(Debug, Clone, Default)]
pub struct QueryPart {
    queries: Vec<QueryDefinition>,
}

impl QueryPart {
    pub fn new(queries: Vec<QueryDefinition>) -> Self {
        Self { queries }
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn queries(&self) -> &[QueryDefinition] {
        &self.queries
    }
}

impl ArchivePart for QueryPart {
    fn entry_name(&self) -> String {
        "queries.qry".to_string()
    }

    fn render(&self) -> Result<String, GenerationError> {
        Ok(CtoExporter::export_queries(&self.queries))
    }
}

/// The `package.json` manifest
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PackageJsonPart {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl PackageJsonPart {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
        }
    }
}

impl ArchivePart for PackageJsonPart {
    fn entry_name(&self) -> String {
        "package.json".to_string()
    }

    fn render(&self) -> Result<String, GenerationError> {
        serde_json::to_string_pretty(self).map_err(|e| GenerationError::Manifest(e.to_string()))
    }
}

/// The `permissions.acl` entry, always the bundled default rules
#[derive(Debug, Clone, Copy, Default)]
pub struct AclPart;

impl ArchivePart for AclPart {
    fn entry_name(&self) -> String {
        "permissions.acl".to_string()
    }

    fn render(&self) -> Result<String, GenerationError> {
        Ok(DEFAULT_ACL.to_string())
    }
}
