//! Registration table for declared types
//!
//! The registry is the single source of type metadata for both the schema
//! reflector and the resource serializer. It is built once, then only read,
//! so a shared reference can be used from any number of threads.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::warn;

use super::enums::ResourceKind;
use super::field::{FieldDescriptor, FieldType};
use super::type_descriptor::{EnumDescriptor, QueryDefinition, TypeDescriptor};

/// Namespace of the built-in infrastructure types; never reflected
pub const SYSTEM_NAMESPACE: &str = "org.hyperledger.composer.system";

/// Namespace of the shared map entry concept
pub const ENTRY_NAMESPACE: &str = "org.hyperledger.composer.model";

/// Fully-qualified name of the map entry concept
pub const ENTRY_CLASS: &str = "org.hyperledger.composer.model.Entry";

/// Result of resolving a fully-qualified name
#[derive(Debug, Clone, Copy)]
pub enum TypeLookup<'a> {
    Resource(&'a TypeDescriptor),
    Enum(&'a EnumDescriptor),
    Unknown,
}

/// Registry of declared types, enums and queries
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeDescriptor>,
    enums: IndexMap<String, EnumDescriptor>,
    queries: Vec<QueryDefinition>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a registry holding the built-in map entry concept
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Self::entry_descriptor());
        registry
    }

    /// Create a registry without any built-in types
    pub fn empty() -> Self {
        Self {
            types: IndexMap::new(),
            enums: IndexMap::new(),
            queries: Vec::new(),
        }
    }

    /// Descriptor of the `{key, value}` concept maps are carried as
    pub fn entry_descriptor() -> TypeDescriptor {
        TypeDescriptor::concept(ENTRY_NAMESPACE, "Entry")
            .field(FieldDescriptor::data("key", FieldType::string()))
            .field(FieldDescriptor::data("value", FieldType::string()))
    }

    /// Register a type, replacing any previous registration under the same name
    pub fn register(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        let fqn = descriptor.qualified_name();
        if self.types.insert(fqn.clone(), descriptor).is_some() {
            warn!("Replaced existing registration for type {}", fqn);
        }
        self
    }

    pub fn register_enum(&mut self, descriptor: EnumDescriptor) -> &mut Self {
        let fqn = descriptor.qualified_name();
        if self.enums.insert(fqn.clone(), descriptor).is_some() {
            warn!("Replaced existing registration for enum {}", fqn);
        }
        self
    }

    pub fn register_query(&mut self, query: QueryDefinition) -> &mut Self {
        self.queries.push(query);
        self
    }

    pub fn get(&self, fqn: &str) -> Option<&TypeDescriptor> {
        self.types.get(fqn)
    }

    pub fn get_enum(&self, fqn: &str) -> Option<&EnumDescriptor> {
        self.enums.get(fqn)
    }

    pub fn lookup(&self, fqn: &str) -> TypeLookup<'_> {
        if let Some(descriptor) = self.types.get(fqn) {
            TypeLookup::Resource(descriptor)
        } else if let Some(descriptor) = self.enums.get(fqn) {
            TypeLookup::Enum(descriptor)
        } else {
            TypeLookup::Unknown
        }
    }

    /// Whether the name resolves to a type or enum
    pub fn contains(&self, fqn: &str) -> bool {
        !matches!(self.lookup(fqn), TypeLookup::Unknown)
    }

    /// All registered types in registration order
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumDescriptor> {
        self.enums.values()
    }

    pub fn queries(&self) -> &[QueryDefinition] {
        &self.queries
    }

    pub fn len(&self) -> usize {
        self.types.len() + self.enums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.enums.is_empty()
    }

    /// Types registered with the given kind, in registration order
    pub fn types_of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values().filter(move |d| d.kind == Some(kind))
    }

    /// Whether the type is supplied by the SDK rather than the user
    pub fn is_builtin(fqn: &str) -> bool {
        fqn == ENTRY_CLASS
    }

    /// The type followed by its registered ancestors, nearest first.
    ///
    /// The walk stops at the first parent that is not registered and never
    /// visits a type twice.
    pub fn ancestors(&self, fqn: &str) -> Vec<(&str, &TypeDescriptor)> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.types.get_key_value(fqn);
        while let Some((name, descriptor)) = current {
            if !seen.insert(name.as_str()) {
                break;
            }
            chain.push((name.as_str(), descriptor));
            current = descriptor
                .parent
                .as_deref()
                .and_then(|p| self.types.get_key_value(p));
        }
        chain
    }

    /// Every field of the type and its ancestors, own fields first
    pub fn declared_fields(&self, fqn: &str) -> Vec<&FieldDescriptor> {
        self.ancestors(fqn)
            .into_iter()
            .flat_map(|(_, d)| d.fields.iter())
            .collect()
    }

    /// Fields carrying a data or pointer marker, own fields first
    pub fn marked_fields(&self, fqn: &str) -> Vec<&FieldDescriptor> {
        self.declared_fields(fqn)
            .into_iter()
            .filter(|f| f.is_marked())
            .collect()
    }

    /// The primary-marked field, searching up the inheritance chain
    pub fn primary_field(&self, fqn: &str) -> Option<&FieldDescriptor> {
        self.declared_fields(fqn)
            .into_iter()
            .find(|f| f.is_primary())
    }

    /// Whether `candidate` is `target` or one of its descendants
    pub fn is_assignable(&self, target: &str, candidate: &str) -> bool {
        self.ancestors(candidate)
            .iter()
            .any(|(name, _)| *name == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle_registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                TypeDescriptor::asset("org.acme", "Vehicle")
                    .field(FieldDescriptor::data("vin", FieldType::string()).primary()),
            )
            .register(
                TypeDescriptor::asset("org.acme", "Car")
                    .extends("org.acme.Vehicle")
                    .field(FieldDescriptor::data("doors", FieldType::integer()))
                    .field(FieldDescriptor::plain("cache", FieldType::string())),
            );
        registry
    }

    #[test]
    fn test_builtin_entry_registered() {
        let registry = TypeRegistry::new();
        assert!(registry.get(ENTRY_CLASS).is_some());
        assert!(TypeRegistry::empty().get(ENTRY_CLASS).is_none());
    }

    #[test]
    fn test_declared_fields_walk_parents() {
        let registry = vehicle_registry();
        let names: Vec<&str> = registry
            .declared_fields("org.acme.Car")
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["doors", "cache", "vin"]);
        assert_eq!(registry.marked_fields("org.acme.Car").len(), 2);
        assert_eq!(
            registry.primary_field("org.acme.Car").map(|f| f.name.as_str()),
            Some("vin")
        );
    }

    #[test]
    fn test_assignability() {
        let registry = vehicle_registry();
        assert!(registry.is_assignable("org.acme.Vehicle", "org.acme.Car"));
        assert!(registry.is_assignable("org.acme.Car", "org.acme.Car"));
        assert!(!registry.is_assignable("org.acme.Car", "org.acme.Vehicle"));
    }

    #[test]
    fn test_ancestors_terminate_on_cycle() {
        let mut registry = TypeRegistry::empty();
        registry
            .register(TypeDescriptor::asset("a", "A").extends("a.B"))
            .register(TypeDescriptor::asset("a", "B").extends("a.A"));
        assert_eq!(registry.ancestors("a.A").len(), 2);
    }

    #[test]
    fn test_lookup() {
        let mut registry = vehicle_registry();
        registry.register_enum(EnumDescriptor::new("org.acme", "Color", ["RED"]));
        assert!(matches!(registry.lookup("org.acme.Color"), TypeLookup::Enum(_)));
        assert!(matches!(registry.lookup("org.acme.Car"), TypeLookup::Resource(_)));
        assert!(matches!(registry.lookup("java.math.BigDecimal"), TypeLookup::Unknown));
    }
}
