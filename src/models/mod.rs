//! Models module for the SDK
//!
//! Declares the statically registered schema metadata: resource kinds,
//! field descriptors, type and enum descriptors, queries, and the registry
//! that holds them.

pub mod enums;
pub mod field;
pub mod registry;
pub mod type_descriptor;

pub use enums::{CollectionKind, PrimitiveType, ResourceKind};
pub use field::{FieldDescriptor, FieldMarker, FieldOptions, FieldType};
pub use registry::{ENTRY_CLASS, ENTRY_NAMESPACE, SYSTEM_NAMESPACE, TypeLookup, TypeRegistry};
pub use type_descriptor::{
    EnumDescriptor, QueryDefinition, TypeDescriptor, qualified_name, split_qualified_name,
};
