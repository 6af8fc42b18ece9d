//! Input validation utilities.
//!
//! Identifier checks applied to descriptor documents before their types are
//! registered. Names end up verbatim in `.cto` files and in `$class`
//! properties, so they have to be valid schema identifiers.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Maximum length for any identifier
pub const MAX_IDENTIFIER_LENGTH: usize = 255;

static IDENTIFIER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"));

/// Keywords of the schema language that cannot name a type or field
const RESERVED_WORDS: &[&str] = &[
    "abstract",
    "asset",
    "concept",
    "enum",
    "event",
    "extends",
    "identified",
    "import",
    "namespace",
    "participant",
    "transaction",
];

/// Errors that can occur during input validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Input is empty when a value is required
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// Input exceeds maximum allowed length
    #[error("{field} exceeds maximum length (max: {max}, got: {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// Input has invalid format
    #[error("{0}: {1}")]
    InvalidFormat(&'static str, String),

    /// Input is a reserved word
    #[error("{field} cannot be a reserved word: {word}")]
    ReservedWord { field: &'static str, word: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a namespace.
///
/// # Rules
///
/// - Must not be empty or exceed 255 characters
/// - Dot-separated segments, each a valid identifier
///
/// # Examples
///
/// ```
/// use composer_sdk::validation::input::validate_namespace;
///
/// assert!(validate_namespace("org.acme.vehicles").is_ok());
/// assert!(validate_namespace("org..acme").is_err());
/// assert!(validate_namespace("").is_err());
/// ```
pub fn validate_namespace(namespace: &str) -> ValidationResult<()> {
    check_length("namespace", namespace)?;
    for segment in namespace.split('.') {
        if !IDENTIFIER_REGEX.is_match(segment) {
            return Err(ValidationError::InvalidFormat(
                "namespace",
                format!("invalid segment '{}' in {}", segment, namespace),
            ));
        }
    }
    Ok(())
}

/// Validate a simple type name.
///
/// # Examples
///
/// ```
/// use composer_sdk::validation::input::validate_type_name;
///
/// assert!(validate_type_name("Vehicle").is_ok());
/// assert!(validate_type_name("org.acme.Vehicle").is_err());
/// assert!(validate_type_name("asset").is_err());
/// ```
pub fn validate_type_name(name: &str) -> ValidationResult<()> {
    validate_identifier("type name", name)
}

/// Validate a field name.
///
/// # Examples
///
/// ```
/// use composer_sdk::validation::input::validate_field_name;
///
/// assert!(validate_field_name("vin").is_ok());
/// assert!(validate_field_name("1st").is_err());
/// ```
pub fn validate_field_name(name: &str) -> ValidationResult<()> {
    validate_identifier("field name", name)
}

fn validate_identifier(field: &'static str, name: &str) -> ValidationResult<()> {
    check_length(field, name)?;
    if !IDENTIFIER_REGEX.is_match(name) {
        return Err(ValidationError::InvalidFormat(
            field,
            format!("'{}' must start with a letter, '_' or '$' and contain only letters, digits, '_' or '$'", name),
        ));
    }
    if RESERVED_WORDS.contains(&name) {
        return Err(ValidationError::ReservedWord {
            field,
            word: name.to_string(),
        });
    }
    Ok(())
}

fn check_length(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if value.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_IDENTIFIER_LENGTH,
            actual: value.len(),
        });
    }
    Ok(())
}
