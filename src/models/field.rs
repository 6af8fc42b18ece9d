//! Field descriptors for declared resource types

use serde::{Deserialize, Serialize};

use super::enums::{CollectionKind, PrimitiveType};

/// Declared type of a field.
///
/// The compact string form is used in descriptor documents:
/// `String`, `Long[]`, `List`, `Set`, `Collection:Queue`, `Map`,
/// `org.acme.Car`, `org.acme.Car[]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    /// A scalar from the fixed primitive table
    Primitive(PrimitiveType),
    /// A native array of the inner type
    Array(Box<FieldType>),
    /// A collection whose element type is given by the field's generic hint
    Collection(CollectionKind),
    /// A string-keyed, string-valued mapping
    Map,
    /// A registered resource, concept or enum type, by fully-qualified name
    Named(String),
}

impl FieldType {
    pub fn string() -> Self {
        Self::Primitive(PrimitiveType::String)
    }

    pub fn long() -> Self {
        Self::Primitive(PrimitiveType::Long)
    }

    pub fn integer() -> Self {
        Self::Primitive(PrimitiveType::Integer)
    }

    pub fn double() -> Self {
        Self::Primitive(PrimitiveType::Double)
    }

    pub fn date_time() -> Self {
        Self::Primitive(PrimitiveType::DateTime)
    }

    pub fn boolean() -> Self {
        Self::Primitive(PrimitiveType::Boolean)
    }

    pub fn list() -> Self {
        Self::Collection(CollectionKind::List)
    }

    pub fn set() -> Self {
        Self::Collection(CollectionKind::Set)
    }

    pub fn named(fqn: impl Into<String>) -> Self {
        Self::Named(fqn.into())
    }

    pub fn array_of(inner: FieldType) -> Self {
        Self::Array(Box::new(inner))
    }

    /// Whether the type belongs to the primitive set: a primitive scalar or
    /// a native array of one.
    pub fn is_primitive(&self) -> bool {
        match self {
            Self::Primitive(_) => true,
            Self::Array(inner) => matches!(**inner, Self::Primitive(_)),
            _ => false,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// The type with one level of array stripped
    pub fn component(&self) -> &FieldType {
        match self {
            Self::Array(inner) => inner,
            other => other,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Primitive(p) => write!(f, "{}", p.label()),
            FieldType::Array(inner) => write!(f, "{}[]", inner),
            FieldType::Collection(CollectionKind::Other(name)) => write!(f, "Collection:{}", name),
            FieldType::Collection(kind) => write!(f, "{}", kind.name()),
            FieldType::Map => write!(f, "Map"),
            FieldType::Named(fqn) => write!(f, "{}", fqn),
        }
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty field type".to_string());
        }
        if let Some(inner) = s.strip_suffix("[]") {
            return Ok(Self::array_of(inner.parse()?));
        }
        if let Some(primitive) = PrimitiveType::from_label(s) {
            return Ok(Self::Primitive(primitive));
        }
        match s {
            "List" => Ok(Self::list()),
            "Set" => Ok(Self::set()),
            "Map" => Ok(Self::Map),
            _ => {
                if let Some(name) = s.strip_prefix("Collection:") {
                    if name.is_empty() {
                        return Err(format!("Missing collection name in field type: {}", s));
                    }
                    return Ok(Self::Collection(CollectionKind::Other(name.to_string())));
                }
                if s
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '$')
                {
                    Ok(Self::Named(s.to_string()))
                } else {
                    Err(format!("Invalid field type: {}", s))
                }
            }
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.to_string()
    }
}

/// Which schema marker a field carries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldMarker {
    /// A data field: embedded by default, may be primary, may carry modifiers
    Data,
    /// A reference-by-identity field: never embedded, no modifiers
    Pointer,
}

/// Parameters attached to a field marker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldOptions {
    pub primary: bool,
    pub optional: bool,
    pub embedded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    /// Numeric range, for Double, Long or Integer fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Element type of a collection field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_type: Option<FieldType>,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            primary: false,
            optional: false,
            embedded: true,
            regex: None,
            range: None,
            default_value: None,
            generic_type: None,
        }
    }
}

/// One declared field of a type.
///
/// # Example
///
/// ```rust
/// use composer_sdk::models::{FieldDescriptor, FieldType};
///
/// let id = FieldDescriptor::data("id", FieldType::string()).primary();
/// let owner = FieldDescriptor::pointer("owner", FieldType::named("org.acme.Person"));
/// assert!(id.is_primary());
/// assert!(!owner.is_embedded());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<FieldMarker>,
    #[serde(flatten)]
    pub options: FieldOptions,
}

impl FieldDescriptor {
    /// A field carrying the data marker
    pub fn data(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            marker: Some(FieldMarker::Data),
            options: FieldOptions::default(),
        }
    }

    /// A field carrying the pointer marker
    pub fn pointer(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            marker: Some(FieldMarker::Pointer),
            options: FieldOptions {
                embedded: false,
                ..FieldOptions::default()
            },
        }
    }

    /// A field with no marker; skipped by reflection and serialization
    pub fn plain(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            marker: None,
            options: FieldOptions::default(),
        }
    }

    pub fn primary(mut self) -> Self {
        self.options.primary = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.options.optional = true;
        self
    }

    pub fn embedded(mut self, embedded: bool) -> Self {
        self.options.embedded = embedded;
        self
    }

    pub fn regex(mut self, regex: impl Into<String>) -> Self {
        self.options.regex = Some(regex.into());
        self
    }

    pub fn range(mut self, range: impl Into<String>) -> Self {
        self.options.range = Some(range.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.options.default_value = Some(value.into());
        self
    }

    /// Element type hint, required for collection fields
    pub fn generic_type(mut self, element: FieldType) -> Self {
        self.options.generic_type = Some(element);
        self
    }

    pub fn is_marked(&self) -> bool {
        self.marker.is_some()
    }

    pub fn is_pointer(&self) -> bool {
        self.marker == Some(FieldMarker::Pointer)
    }

    pub fn is_data(&self) -> bool {
        self.marker == Some(FieldMarker::Data)
    }

    /// Only data fields can be primary
    pub fn is_primary(&self) -> bool {
        self.is_data() && self.options.primary
    }

    pub fn is_optional(&self) -> bool {
        self.is_marked() && self.options.optional
    }

    /// Data fields follow their declared mode; pointers are never embedded
    pub fn is_embedded(&self) -> bool {
        self.is_data() && self.options.embedded
    }

    pub fn regex_value(&self) -> Option<&str> {
        self.data_option(&self.options.regex)
    }

    pub fn range_value(&self) -> Option<&str> {
        self.data_option(&self.options.range)
    }

    pub fn default_value_str(&self) -> Option<&str> {
        self.data_option(&self.options.default_value)
    }

    pub fn generic_type_hint(&self) -> Option<&FieldType> {
        self.options.generic_type.as_ref()
    }

    fn data_option<'a>(&self, value: &'a Option<String>) -> Option<&'a str> {
        if !self.is_data() {
            return None;
        }
        value.as_deref().filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_types() {
        assert_eq!("String".parse::<FieldType>().unwrap(), FieldType::string());
        assert_eq!(
            "Long[]".parse::<FieldType>().unwrap(),
            FieldType::array_of(FieldType::long())
        );
        assert_eq!("List".parse::<FieldType>().unwrap(), FieldType::list());
        assert_eq!(
            "Collection:Queue".parse::<FieldType>().unwrap(),
            FieldType::Collection(CollectionKind::Other("Queue".to_string()))
        );
        assert_eq!(
            "org.acme.Car[]".parse::<FieldType>().unwrap(),
            FieldType::array_of(FieldType::named("org.acme.Car"))
        );
        assert!("".parse::<FieldType>().is_err());
        assert!("Map<String,String>".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        for text in ["Double[]", "Set", "Map", "Collection:Deque", "org.acme.Car"] {
            assert_eq!(text.parse::<FieldType>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_primitive_set() {
        assert!(FieldType::boolean().is_primitive());
        assert!(FieldType::array_of(FieldType::date_time()).is_primitive());
        assert!(!FieldType::array_of(FieldType::named("a.B")).is_primitive());
        assert!(!FieldType::Map.is_primitive());
    }

    #[test]
    fn test_pointer_ignores_data_options() {
        let field = FieldDescriptor::pointer("owner", FieldType::named("a.B"))
            .primary()
            .regex("x")
            .embedded(true);
        assert!(!field.is_primary());
        assert!(!field.is_embedded());
        assert_eq!(field.regex_value(), None);
    }

    #[test]
    fn test_empty_modifiers_are_absent() {
        let field = FieldDescriptor::data("name", FieldType::string()).regex("");
        assert_eq!(field.regex_value(), None);
        assert!(field.is_embedded());
    }
}
