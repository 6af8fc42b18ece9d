//! Type, enum and query descriptors

use serde::{Deserialize, Serialize};

use super::enums::ResourceKind;
use super::field::FieldDescriptor;

/// Build a fully-qualified name from a namespace and a simple name
pub fn qualified_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

/// Split a fully-qualified name into namespace and simple name
pub fn split_qualified_name(fqn: &str) -> (&str, &str) {
    match fqn.rfind('.') {
        Some(idx) => (&fqn[..idx], &fqn[idx + 1..]),
        None => ("", fqn),
    }
}

/// Statically declared schema of one type.
///
/// A type with `kind: None` is a plain type: it can be a parent of nothing
/// and is rejected wherever a resource is expected.
///
/// # Example
///
/// ```rust
/// use composer_sdk::models::{FieldDescriptor, FieldType, TypeDescriptor};
///
/// let car = TypeDescriptor::asset("org.acme", "Car")
///     .field(FieldDescriptor::data("vin", FieldType::string()).primary())
///     .field(FieldDescriptor::pointer("owner", FieldType::named("org.acme.Person")));
/// assert_eq!(car.qualified_name(), "org.acme.Car");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    pub namespace: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ResourceKind>,
    /// Fully-qualified name of the parent type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    /// Whether an empty instance can be created during deserialization
    #[serde(default = "default_true")]
    pub constructible: bool,
}

fn default_true() -> bool {
    true
}

impl TypeDescriptor {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        kind: Option<ResourceKind>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind,
            parent: None,
            fields: Vec::new(),
            constructible: true,
        }
    }

    pub fn asset(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, Some(ResourceKind::Asset))
    }

    pub fn participant(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, Some(ResourceKind::Participant))
    }

    pub fn transaction(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, Some(ResourceKind::Transaction))
    }

    pub fn concept(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, Some(ResourceKind::Concept))
    }

    pub fn event(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, Some(ResourceKind::Event))
    }

    /// A type without any resource marker
    pub fn plain(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, None)
    }

    /// Set the parent by fully-qualified name
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Mark the type as having no usable no-argument constructor
    pub fn without_default_constructor(mut self) -> Self {
        self.constructible = false;
        self
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(&self.namespace, &self.name)
    }

    /// Fields carrying a data or pointer marker, in declaration order
    pub fn marked_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_marked())
    }
}

/// Statically declared enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnumDescriptor {
    pub namespace: String,
    pub name: String,
    /// Constants in declaration order
    pub constants: Vec<String>,
}

impl EnumDescriptor {
    pub fn new<I, S>(namespace: impl Into<String>, name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(&self.namespace, &self.name)
    }
}

/// A named query produced by the query builder
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QueryDefinition {
    pub description: String,
    pub statement: String,
}

impl QueryDefinition {
    pub fn new(description: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            statement: statement.into(),
        }
    }
}
