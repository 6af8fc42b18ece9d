//! Validation functionality
//!
//! Provides validation logic for:
//! - Identifiers (namespaces, type names, field names)
//! - Inheritance graphs (cycles, unregistered parents)

pub mod inheritance;
pub mod input;

pub use inheritance::{InheritanceValidationResult, InheritanceValidator, MissingParent};
pub use input::{ValidationError, ValidationResult};
