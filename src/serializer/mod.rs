//! Resource serialization
//!
//! Converts between [`Value`] graphs and the JSON wire format used on the
//! ledger:
//! - resources are objects carrying a `$class` property
//! - references are strings of the form `resource:<class>#<id>`
//! - maps are arrays of `{key, value}` entry objects

pub mod error;
pub mod value;

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map as JsonMap, Number, Value as Json};
use tracing::debug;

use crate::models::{
    CollectionKind, ENTRY_CLASS, FieldDescriptor, FieldType, PrimitiveType, TypeLookup,
    TypeRegistry,
};

pub use error::SerializationError;
pub use value::{Resource, Value, ValueSet};

/// Result type for serialization operations.
pub type SerializationResult<T> = Result<T, SerializationError>;

static RESOURCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^resource:([^#]+)#(.+)$").expect("valid resource pattern"));

/// Property naming the originating type of a serialized resource
pub const CLASS_PROPERTY: &str = "$class";

const ROOT: &str = "<root>";

/// Converts values to and from wire JSON using registered type metadata.
///
/// The serializer only reads the registry, so one instance can be shared
/// across threads.
///
/// # Example
///
/// ```rust
/// use composer_sdk::models::{FieldDescriptor, FieldType, TypeDescriptor, TypeRegistry};
/// use composer_sdk::serializer::{Resource, ResourceSerializer, Value};
///
/// let mut registry = TypeRegistry::new();
/// registry.register(
///     TypeDescriptor::asset("org.acme", "Car")
///         .field(FieldDescriptor::data("vin", FieldType::string()).primary()),
/// );
/// let serializer = ResourceSerializer::new(&registry);
///
/// let car = Value::from(Resource::new("org.acme.Car").with("vin", "V-1"));
/// let json = serializer.to_json_string(&car).unwrap();
/// assert_eq!(serializer.from_json_as(&json, "org.acme.Car").unwrap(), car);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ResourceSerializer<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> ResourceSerializer<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Whether the type maps directly onto a JSON scalar or scalar array
    pub fn is_primitive_type(field_type: &FieldType) -> bool {
        field_type.is_primitive()
    }

    /// Serialize a value; a top-level resource is always written inline
    pub fn to_json(&self, value: &Value) -> SerializationResult<Json> {
        self.serialize(value, true, ROOT)
    }

    pub fn to_json_string(&self, value: &Value) -> SerializationResult<String> {
        Ok(self.to_json(value)?.to_string())
    }

    /// Parse JSON text and deserialize it as the given type
    pub fn from_json(&self, text: &str, target: &FieldType) -> SerializationResult<Value> {
        let node: Json = serde_json::from_str(text)
            .map_err(|_| SerializationError::MalformedJson(text.to_string()))?;
        self.from_json_value(&node, target)
    }

    /// Parse JSON text as an instance of the named class
    pub fn from_json_as(&self, text: &str, class: &str) -> SerializationResult<Value> {
        self.from_json(text, &FieldType::named(class))
    }

    /// Parse a JSON array of instances of the named class
    pub fn array_from_json(&self, text: &str, class: &str) -> SerializationResult<Vec<Value>> {
        match self.from_json(text, &FieldType::array_of(FieldType::named(class)))? {
            Value::Array(items) => Ok(items),
            other => Err(SerializationError::ShapeMismatch(format!(
                "expected a json array of {}, got {}",
                class,
                other.type_name()
            ))),
        }
    }

    /// Deserialize a parsed JSON node as the given type
    pub fn from_json_value(&self, node: &Json, target: &FieldType) -> SerializationResult<Value> {
        self.deserialize(node, target, None)
    }

    /// Build an instance of `class` with only its primary field set.
    ///
    /// # Example
    ///
    /// ```rust
    /// use composer_sdk::models::{FieldDescriptor, FieldType, TypeDescriptor, TypeRegistry};
    /// use composer_sdk::serializer::{ResourceSerializer, SerializationError};
    ///
    /// let mut registry = TypeRegistry::new();
    /// registry.register(
    ///     TypeDescriptor::participant("org.acme", "Person")
    ///         .field(FieldDescriptor::data("email", FieldType::string()).primary()),
    /// );
    /// let serializer = ResourceSerializer::new(&registry);
    ///
    /// let person = serializer.from_id("a@b.c", "org.acme.Person").unwrap();
    /// assert_eq!(person.get("email").as_str(), Some("a@b.c"));
    /// assert_eq!(serializer.from_id(" ", "org.acme.Person"), Err(SerializationError::EmptyId));
    /// ```
    pub fn from_id(&self, id: &str, class: &str) -> SerializationResult<Resource> {
        if id.trim().is_empty() {
            return Err(SerializationError::EmptyId);
        }
        let descriptor = self
            .registry
            .get(class)
            .ok_or_else(|| SerializationError::UnknownClass(class.to_string()))?;
        if !descriptor.constructible {
            return Err(SerializationError::NoDefaultConstructor(class.to_string()));
        }
        let primary = self
            .registry
            .primary_field(class)
            .ok_or_else(|| SerializationError::MissingIdField(class.to_string()))?;
        let id = match &primary.field_type {
            FieldType::Primitive(primitive) => primitive_from_text(id, *primitive)?,
            _ => Value::String(id.to_string()),
        };
        Ok(Resource::new(class).with(primary.name.clone(), id))
    }

    /// The `resource:<class>#<id>` reference of a populated instance
    pub fn resource_id(&self, resource: &Resource) -> SerializationResult<String> {
        let class = resource.class();
        let primary = self
            .registry
            .primary_field(class)
            .ok_or_else(|| SerializationError::MissingIdField(class.to_string()))?;
        let id = match resource.get(&primary.name) {
            Value::Null => {
                return Err(SerializationError::NullId(format!(
                    "{}.{}",
                    class, primary.name
                )));
            }
            Value::String(s) | Value::Enum(s) => s.clone(),
            Value::Long(n) => n.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Double(n) => Number::from_f64(*n)
                .map(|n| n.to_string())
                .unwrap_or_else(|| n.to_string()),
            Value::Boolean(b) => b.to_string(),
            Value::DateTime(dt) => format_date_time(dt),
            other => {
                return Err(SerializationError::UnsupportedType(
                    other.type_name().to_string(),
                ));
            }
        };
        Ok(format!("resource:{}#{}", class, id))
    }

    fn serialize(&self, value: &Value, force_embedded: bool, parent: &str) -> SerializationResult<Json> {
        match value {
            Value::Null => Ok(Json::Null),
            Value::String(s) | Value::Enum(s) => Ok(Json::String(s.clone())),
            Value::Long(n) => Ok(Json::from(*n)),
            Value::Integer(n) => Ok(Json::from(*n)),
            Value::Double(n) => Number::from_f64(*n)
                .map(Json::Number)
                .ok_or_else(|| SerializationError::UnsupportedType(format!("Double({})", n))),
            Value::DateTime(dt) => Ok(Json::String(format_date_time(dt))),
            Value::Boolean(b) => Ok(Json::Bool(*b)),
            Value::List(items) | Value::Array(items) => items
                .iter()
                .map(|item| self.serialize(item, force_embedded, parent))
                .collect::<SerializationResult<Vec<_>>>()
                .map(Json::Array),
            Value::Set(items) => items
                .iter()
                .map(|item| self.serialize(item, force_embedded, parent))
                .collect::<SerializationResult<Vec<_>>>()
                .map(Json::Array),
            Value::Map(entries) => {
                let mut list = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    let Value::String(text) = value else {
                        return Err(SerializationError::NonStringMapValue {
                            key: key.clone(),
                            value_type: value.type_name().to_string(),
                        });
                    };
                    let mut entry = JsonMap::new();
                    entry.insert("key".to_string(), Json::String(key.clone()));
                    entry.insert("value".to_string(), Json::String(text.clone()));
                    entry.insert(CLASS_PROPERTY.to_string(), Json::String(ENTRY_CLASS.to_string()));
                    list.push(Json::Object(entry));
                }
                Ok(Json::Array(list))
            }
            Value::Resource(resource) => self.serialize_resource(resource, force_embedded, parent),
        }
    }

    fn serialize_resource(
        &self,
        resource: &Resource,
        force_embedded: bool,
        parent: &str,
    ) -> SerializationResult<Json> {
        let class = resource.class();
        let kind = match self.registry.lookup(class) {
            TypeLookup::Resource(descriptor) => descriptor.kind,
            _ => None,
        };
        let Some(kind) = kind else {
            debug!("Unsupported value of type {} under {}", class, parent);
            return Err(SerializationError::UnsupportedType(class.to_string()));
        };

        if !(force_embedded || kind.is_always_embedded()) {
            return Ok(Json::String(self.resource_id(resource)?));
        }

        let mut object = JsonMap::new();
        for (declaring, descriptor) in self.registry.ancestors(class) {
            for field in descriptor.marked_fields() {
                if object.contains_key(&field.name) {
                    continue;
                }
                let field_path = format!("{}.{}", declaring, field.name);
                let json = self.serialize(
                    resource.get(&field.name),
                    field.is_embedded(),
                    &field_path,
                )?;
                object.insert(field.name.clone(), json);
            }
        }
        object.insert(CLASS_PROPERTY.to_string(), Json::String(class.to_string()));
        Ok(Json::Object(object))
    }

    fn deserialize(
        &self,
        node: &Json,
        target: &FieldType,
        element_hint: Option<&FieldType>,
    ) -> SerializationResult<Value> {
        if node.is_null() {
            return Ok(Value::Null);
        }
        match target {
            FieldType::Primitive(primitive) => primitive_from_json(node, *primitive),
            FieldType::Collection(kind) => self.collection_from_json(node, kind, element_hint),
            FieldType::Array(component) => {
                let Json::Array(items) = node else {
                    return Err(SerializationError::ShapeMismatch(format!(
                        "resourceClass {} is array-typed but json '{}' is not",
                        target, node
                    )));
                };
                items
                    .iter()
                    .map(|item| self.deserialize(item, component, None))
                    .collect::<SerializationResult<Vec<_>>>()
                    .map(Value::Array)
            }
            FieldType::Map => map_from_json(node),
            FieldType::Named(class) => self.named_from_json(node, class),
        }
    }

    fn collection_from_json(
        &self,
        node: &Json,
        kind: &CollectionKind,
        element_hint: Option<&FieldType>,
    ) -> SerializationResult<Value> {
        let Json::Array(items) = node else {
            return Err(SerializationError::ShapeMismatch(format!(
                "{} is Collection but json '{}' is not array-typed",
                kind, node
            )));
        };
        if let CollectionKind::Other(name) = kind {
            return Err(SerializationError::UnsupportedCollection(name.clone()));
        }

        let mut elements = Vec::with_capacity(items.len());
        for item in items {
            let element = match element_hint {
                Some(hint @ FieldType::Primitive(_)) => self.deserialize(item, hint, None)?,
                Some(hint @ FieldType::Named(class))
                    if matches!(self.registry.lookup(class), TypeLookup::Enum(_)) =>
                {
                    self.deserialize(item, hint, None)?
                }
                _ => self.untyped_from_json(item)?,
            };
            elements.push(element);
        }
        Ok(match kind {
            CollectionKind::Set => Value::set(elements),
            _ => Value::List(elements),
        })
    }

    /// Collection element with no declared type: scalars map directly,
    /// objects need a `$class`.
    fn untyped_from_json(&self, node: &Json) -> SerializationResult<Value> {
        match node {
            Json::Null => Ok(Value::Null),
            Json::Bool(b) => Ok(Value::Boolean(*b)),
            Json::Number(n) => Ok(number_value(n)),
            Json::String(text) => Ok(self
                .parse_reference(text)?
                .map(Value::Resource)
                .unwrap_or_else(|| Value::String(text.clone()))),
            Json::Object(object) => {
                let Some(class) = object.get(CLASS_PROPERTY) else {
                    return Err(SerializationError::MissingClass(node.to_string()));
                };
                let class = class.as_str().unwrap_or_default();
                match self.registry.lookup(class) {
                    TypeLookup::Resource(_) => self.named_from_json(node, class),
                    _ => Err(SerializationError::UnknownClass(format!(
                        "{} for {}",
                        class, node
                    ))),
                }
            }
            Json::Array(_) => Err(SerializationError::ShapeMismatch(format!(
                "nested array is not supported as collection element: {}",
                node
            ))),
        }
    }

    fn named_from_json(&self, node: &Json, class: &str) -> SerializationResult<Value> {
        if let TypeLookup::Enum(descriptor) = self.registry.lookup(class) {
            return match node.as_str() {
                Some(constant) if descriptor.constants.iter().any(|c| c == constant) => {
                    Ok(Value::Enum(constant.to_string()))
                }
                _ => Err(SerializationError::ShapeMismatch(format!(
                    "'{}' is not a constant of {}",
                    node, class
                ))),
            };
        }

        let object = match node {
            Json::String(text) => {
                return match self.parse_reference(text)? {
                    Some(resource) => Ok(Value::Resource(resource)),
                    None => Err(SerializationError::ShapeMismatch(format!(
                        "expected a resource reference or object for {}, got '{}'",
                        class, text
                    ))),
                };
            }
            Json::Object(object) => object,
            other => {
                return Err(SerializationError::ShapeMismatch(format!(
                    "expected an object for {}, got '{}'",
                    class, other
                )));
            }
        };

        let mut concrete = class;
        if let Some(tagged) = object.get(CLASS_PROPERTY).and_then(Json::as_str) {
            if self.registry.get(tagged).is_some() && self.registry.is_assignable(class, tagged) {
                concrete = tagged;
            }
        }
        let descriptor = self
            .registry
            .get(concrete)
            .ok_or_else(|| SerializationError::UnknownClass(concrete.to_string()))?;
        if !descriptor.constructible {
            return Err(SerializationError::NoDefaultConstructor(concrete.to_string()));
        }

        let mut resource = Resource::new(concrete);
        let mut seen = HashSet::new();
        for field in self.registry.marked_fields(concrete) {
            if !seen.insert(field.name.as_str()) {
                continue;
            }
            let value = self.field_from_json(object.get(&field.name), field)?;
            resource.set(field.name.clone(), value);
        }
        Ok(Value::Resource(resource))
    }

    fn field_from_json(
        &self,
        node: Option<&Json>,
        field: &FieldDescriptor,
    ) -> SerializationResult<Value> {
        match node {
            None => Ok(Value::Null),
            Some(node) => self.deserialize(node, &field.field_type, field.generic_type_hint()),
        }
    }

    /// Resolve a `resource:<class>#<id>` string; other text yields `None`
    fn parse_reference(&self, text: &str) -> SerializationResult<Option<Resource>> {
        let Some(captures) = RESOURCE_PATTERN.captures(text) else {
            return Ok(None);
        };
        let class = &captures[1];
        let id = &captures[2];
        if self.registry.get(class).is_none() {
            return Err(SerializationError::UnresolvedReference {
                reference: text.to_string(),
                class: class.to_string(),
            });
        }
        self.from_id(id, class).map(Some)
    }
}

fn format_date_time(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Narrowest numeric value holding the number
fn number_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        match i32::try_from(i) {
            Ok(small) => Value::Integer(small),
            Err(_) => Value::Long(i),
        }
    } else {
        Value::Double(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn primitive_from_json(node: &Json, primitive: PrimitiveType) -> SerializationResult<Value> {
    let mismatch = || {
        SerializationError::ShapeMismatch(format!(
            "cannot convert '{}' to {}",
            node,
            primitive.label()
        ))
    };
    match primitive {
        PrimitiveType::String => match node {
            Json::String(s) => Ok(Value::String(s.clone())),
            Json::Number(n) => Ok(Value::String(n.to_string())),
            Json::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err(mismatch()),
        },
        PrimitiveType::Long => node.as_i64().map(Value::Long).ok_or_else(mismatch),
        PrimitiveType::Integer => node
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Value::Integer)
            .ok_or_else(mismatch),
        PrimitiveType::Double => node.as_f64().map(Value::Double).ok_or_else(mismatch),
        PrimitiveType::Boolean => node.as_bool().map(Value::Boolean).ok_or_else(mismatch),
        PrimitiveType::DateTime => match node {
            Json::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
                .map_err(|_| mismatch()),
            Json::Number(n) => n
                .as_i64()
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
                .map(Value::DateTime)
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
    }
}

/// Primary key text from a `resource:` reference, read as its declared type
fn primitive_from_text(text: &str, primitive: PrimitiveType) -> SerializationResult<Value> {
    let mismatch = || {
        SerializationError::ShapeMismatch(format!(
            "id '{}' is not a valid {}",
            text,
            primitive.label()
        ))
    };
    match primitive {
        PrimitiveType::String => Ok(Value::String(text.to_string())),
        PrimitiveType::Long => text.parse().map(Value::Long).map_err(|_| mismatch()),
        PrimitiveType::Integer => text.parse().map(Value::Integer).map_err(|_| mismatch()),
        PrimitiveType::Double => text.parse().map(Value::Double).map_err(|_| mismatch()),
        PrimitiveType::Boolean => text.parse().map(Value::Boolean).map_err(|_| mismatch()),
        PrimitiveType::DateTime => match text.parse::<i64>() {
            Ok(millis) => primitive_from_json(&Json::from(millis), primitive),
            Err(_) => primitive_from_json(&Json::String(text.to_string()), primitive),
        },
    }
}

fn map_from_json(node: &Json) -> SerializationResult<Value> {
    let Json::Array(entries) = node else {
        return Err(SerializationError::ShapeMismatch(format!(
            "error parsing type Map<String, String>: expect jsonArray, got {}",
            node
        )));
    };
    let mut map = BTreeMap::new();
    for entry in entries {
        let key = entry_text(entry, "key")?;
        let value = entry_text(entry, "value")?;
        map.insert(key, Value::String(value));
    }
    Ok(Value::Map(map))
}

fn entry_text(entry: &Json, name: &str) -> SerializationResult<String> {
    match entry.get(name) {
        Some(Json::String(s)) => Ok(s.clone()),
        Some(Json::Number(n)) => Ok(n.to_string()),
        Some(Json::Bool(b)) => Ok(b.to_string()),
        _ => Err(SerializationError::ShapeMismatch(format!(
            "error parsing type Map<String, String>: missing '{}' in {}",
            name, entry
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TypeDescriptor;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register(
            TypeDescriptor::asset("org.acme", "Car")
                .field(FieldDescriptor::data("vin", FieldType::string()).primary())
                .field(FieldDescriptor::data("built", FieldType::date_time())),
        );
        registry
    }

    #[test]
    fn test_date_time_millis() {
        let registry = registry();
        let serializer = ResourceSerializer::new(&registry);
        let dt = Utc.timestamp_millis_opt(1_500_000_000_123).unwrap();
        let json = serializer.to_json(&Value::DateTime(dt)).unwrap();
        assert_eq!(json, Json::String("2017-07-14T02:40:00.123Z".to_string()));
        assert_eq!(
            serializer
                .from_json("1500000000123", &FieldType::date_time())
                .unwrap(),
            Value::DateTime(dt)
        );
    }

    #[test]
    fn test_untyped_numbers_narrowed() {
        let registry = registry();
        let serializer = ResourceSerializer::new(&registry);
        let value = serializer
            .from_json("[1, 5000000000, 1.5, null]", &FieldType::list())
            .unwrap();
        assert_eq!(
            value,
            Value::list([
                Value::Integer(1),
                Value::Long(5_000_000_000),
                Value::Double(1.5),
                Value::Null
            ])
        );
    }

    #[test]
    fn test_nested_array_element_rejected() {
        let registry = registry();
        let serializer = ResourceSerializer::new(&registry);
        assert!(matches!(
            serializer.from_json("[[1]]", &FieldType::list()),
            Err(SerializationError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let registry = registry();
        let serializer = ResourceSerializer::new(&registry);
        assert_eq!(
            serializer.from_json("{", &FieldType::string()),
            Err(SerializationError::MalformedJson("{".to_string()))
        );
    }

    #[test]
    fn test_unregistered_value_type() {
        let registry = registry();
        let serializer = ResourceSerializer::new(&registry);
        let err = serializer
            .to_json(&Value::Resource(Resource::new("java.math.BigDecimal")))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "field is not a primitive or resource type:java.math.BigDecimal"
        );
    }

    #[test]
    fn test_plain_text_for_resource_target() {
        let registry = registry();
        let serializer = ResourceSerializer::new(&registry);
        assert!(matches!(
            serializer.from_json_as("\"V-1\"", "org.acme.Car"),
            Err(SerializationError::ShapeMismatch(_))
        ));
    }
}
