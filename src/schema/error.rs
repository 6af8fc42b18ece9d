//! Error types for schema construction

use thiserror::Error;

/// Errors raised while turning registered types into schema entities.
///
/// Every variant is fatal for the affected entity and aborts the whole
/// generation run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Parent is unregistered or carries a different resource kind
    #[error("parent of '{class}' is '{parent}', not annotated with @{kind}")]
    IllegalParent {
        class: String,
        parent: String,
        kind: String,
    },

    #[error("genericType is required for collection type:{field}")]
    MissingGenericType { field: String },

    #[error("unable to specify array as generic type for collection type:{field}")]
    ArrayGenericType { field: String },

    /// Field type is neither primitive, enum, map nor a recognized resource
    #[error("illegal non-primitive type of DataField:{field}")]
    IllegalFieldType { field: String },

    #[error("Duplicate primary key: {existing}, {duplicate}")]
    DuplicatePrimaryKey { existing: String, duplicate: String },

    #[error("No primary key for transaction type:{transaction}")]
    TransactionPrimaryKey { transaction: String },

    #[error("No field named 'transactionId' for transaction type:{transaction}")]
    TransactionReservedField { transaction: String },

    #[error("primary key of String type must be given for {model}")]
    MissingPrimaryKey { model: String },

    #[error("inheritance cycle detected: {}", path.join(" -> "))]
    InheritanceCycle { path: Vec<String> },

    #[error("fail to build query '{description}': {reason}")]
    InvalidQuery { description: String, reason: String },
}
