//! Error types for resource serialization

use thiserror::Error;

/// Errors raised while converting between values and wire JSON.
///
/// These indicate bad type declarations or corrupt data; retrying the same
/// call never helps.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Value is neither primitive, collection, map nor a registered resource
    #[error("field is not a primitive or resource type:{0}")]
    UnsupportedType(String),

    #[error("only string-typed value in map is supported, got type '{value_type}' for key {key}")]
    NonStringMapValue { key: String, value_type: String },

    #[error("no $class found in node: {0}")]
    MissingClass(String),

    #[error("no such class:{0}")]
    UnknownClass(String),

    /// A `resource:<class>#<id>` reference naming an unregistered class
    #[error("unable to parse '{reference}': no such class {class}")]
    UnresolvedReference { reference: String, class: String },

    #[error("unable to parse json:{0}")]
    MalformedJson(String),

    /// JSON node does not have the shape the target type needs
    #[error("{0}")]
    ShapeMismatch(String),

    #[error(
        "resourceClass must be one of specify Set, List, or concrete implementation for Collection, got: {0}"
    )]
    UnsupportedCollection(String),

    /// Type declares no primary field
    #[error("no id field specified:{0}")]
    MissingIdField(String),

    #[error("null id field:{0}")]
    NullId(String),

    #[error("id is null")]
    EmptyId,

    #[error("unable to create an instance for {0}")]
    NoDefaultConstructor(String),
}

impl From<serde_json::Error> for SerializationError {
    fn from(e: serde_json::Error) -> Self {
        SerializationError::MalformedJson(e.to_string())
    }
}
