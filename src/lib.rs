//! Composer SDK - schema generation and resource serialization for
//! Hyperledger Composer business networks
//!
//! Provides unified interfaces for:
//! - Statically declared type metadata (the type registry)
//! - Loading type descriptors from YAML or JSON documents
//! - Reflecting registered types into `.cto` schema namespaces
//! - Packaging schema, queries, manifest and permissions into `.bna` archives
//! - Converting resource graphs to and from the ledger's JSON wire format
//! - Validation logic

pub mod export;
pub mod model;
pub mod models;
pub mod schema;
pub mod serializer;
pub mod validation;

// Re-export commonly used types
pub use export::{BnaConfig, BnaGenerator, CtoExporter, GenerationError};
pub use model::{LoaderError, RegistryLoader};
pub use models::{
    EnumDescriptor, FieldDescriptor, FieldType, QueryDefinition, ResourceKind, TypeDescriptor,
    TypeRegistry,
};
pub use schema::{NamespacePart, SchemaError, SchemaReflector};
pub use serializer::{Resource, ResourceSerializer, SerializationError, Value};
