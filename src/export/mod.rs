//! Export functionality
//!
//! Renders reflected schema parts and packages them:
//! - `.cto` schema text and `.qry` query text
//! - Archive parts (schema, queries, manifest, permissions)
//! - Zip-based business network archives (`.bna`)

pub mod archive;
pub mod bna;
pub mod config;
pub mod cto;
pub mod parts;

use crate::schema::SchemaError;

/// Error during archive generation.
///
/// Schema problems and storage problems are kept apart so callers can tell
/// a bad model from a bad filesystem.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("Manifest error: {0}")]
    Manifest(String),
}

// Re-export for convenience
pub use archive::ArchiveWriter;
pub use bna::BnaGenerator;
pub use config::{BnaConfig, BnaConfigBuilder, ConfigError};
pub use cto::CtoExporter;
pub use parts::{AclPart, ArchivePart, CtoPart, DEFAULT_ACL, PackageJsonPart, QueryPart};
