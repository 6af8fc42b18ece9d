//! Dynamic object graph handled by the resource serializer

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

static NULL: Value = Value::Null;

/// A runtime value of a declared field
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    String(String),
    Long(i64),
    Integer(i32),
    Double(f64),
    DateTime(DateTime<Utc>),
    Boolean(bool),
    /// A constant of a registered enum
    Enum(String),
    List(Vec<Value>),
    Set(ValueSet),
    /// A native array
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Resource(Resource),
}

impl Value {
    pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn set<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Set(items.into_iter().collect())
    }

    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Array(items.into_iter().collect())
    }

    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Value::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    /// Runtime type name used in diagnostics
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::String(_) => "String",
            Value::Long(_) => "Long",
            Value::Integer(_) => "Integer",
            Value::Double(_) => "Double",
            Value::DateTime(_) => "DateTime",
            Value::Boolean(_) => "Boolean",
            Value::Enum(_) => "Enum",
            Value::List(_) => "List",
            Value::Set(_) => "Set",
            Value::Array(_) => "Array",
            Value::Map(_) => "Map",
            Value::Resource(resource) => resource.class(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl From<Resource> for Value {
    fn from(value: Resource) -> Self {
        Value::Resource(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Unordered collection of distinct values.
///
/// Iteration follows insertion order; equality ignores it.
#[derive(Debug, Clone, Default)]
pub struct ValueSet {
    items: Vec<Value>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value unless an equal one is present; returns whether it was added
    pub fn insert(&mut self, value: Value) -> bool {
        if self.items.contains(&value) {
            return false;
        }
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|v| other.contains(v))
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// An instance of a registered type.
///
/// Fields that were never set read as [`Value::Null`], and an explicit null
/// compares equal to an absent field.
///
/// # Example
///
/// ```rust
/// use composer_sdk::serializer::{Resource, Value};
///
/// let car = Resource::new("org.acme.Car")
///     .with("vin", "V-1")
///     .with("doors", 4);
/// assert_eq!(car.get("vin"), &Value::String("V-1".to_string()));
/// assert!(car.get("owner").is_null());
/// ```
#[derive(Debug, Clone)]
pub struct Resource {
    class: String,
    fields: BTreeMap<String, Value>,
}

impl Resource {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> &Value {
        self.fields.get(name).unwrap_or(&NULL)
    }

    /// Fully-qualified name of the instance's type
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Fields holding a non-null value
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class && self.fields().eq(other.fields())
    }
}
