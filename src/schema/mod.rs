//! Reflected schema graph
//!
//! Turns the registered type descriptors into per-namespace schema parts:
//! - [`ModelEntity`] and [`EnumModel`] for each declared type
//! - [`FieldEntity`] for each marked field
//! - [`NamespacePart`] grouping entities with their imports

pub mod error;
pub mod field;
pub mod model;
pub mod part;
pub mod reflector;

pub use error::SchemaError;
pub use field::{FieldEntity, primitive_type_name};
pub use model::{EnumModel, ModelEntity, ParentRef, TRANSACTION_ID_FIELD};
pub use part::{NamespacePart, SchemaEntity};
pub use reflector::SchemaReflector;
