//! Schema reflection
//!
//! Walks the registered types and builds one [`NamespacePart`] per namespace.
//! The build runs in two phases: every entity is first collected into an
//! insertion-ordered arena keyed by namespace, and the finished parts are
//! handed to the renderer afterwards.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::models::{
    ENTRY_CLASS, ENTRY_NAMESPACE, QueryDefinition, ResourceKind, SYSTEM_NAMESPACE,
    TypeDescriptor, TypeRegistry, split_qualified_name,
};
use crate::validation::InheritanceValidator;

use super::error::SchemaError;
use super::field::FieldEntity;
use super::model::{EnumModel, ModelEntity};
use super::part::NamespacePart;

/// Builds schema parts from a [`TypeRegistry`].
///
/// # Example
///
/// ```rust
/// use composer_sdk::models::{FieldDescriptor, FieldType, TypeDescriptor, TypeRegistry};
/// use composer_sdk::schema::SchemaReflector;
///
/// let mut registry = TypeRegistry::new();
/// registry.register(
///     TypeDescriptor::asset("org.acme", "Car")
///         .field(FieldDescriptor::data("vin", FieldType::string()).primary()),
/// );
///
/// let parts = SchemaReflector::new(&registry).reflect().unwrap();
/// assert_eq!(parts.len(), 1);
/// assert_eq!(parts[0].namespace(), "org.acme");
/// ```
#[derive(Debug, Clone)]
pub struct SchemaReflector<'a> {
    registry: &'a TypeRegistry,
    excluded_namespaces: Vec<String>,
}

impl<'a> SchemaReflector<'a> {
    /// Create a reflector that skips the system namespace
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            excluded_namespaces: vec![SYSTEM_NAMESPACE.to_string()],
        }
    }

    /// Replace the set of namespaces whose types are never reflected
    pub fn with_excluded_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_excluded(&self, namespace: &str) -> bool {
        self.excluded_namespaces.iter().any(|ns| ns == namespace)
    }

    /// Reflect every asset, participant, transaction and concept.
    ///
    /// Kinds are walked in that order, types within a kind in registration
    /// order. Parts come back in the order their namespace was first seen.
    pub fn reflect(&self) -> Result<Vec<NamespacePart>, SchemaError> {
        InheritanceValidator::new().check_cycles(self.registry)?;

        let mut arena: IndexMap<String, NamespacePart> = IndexMap::new();
        for kind in ResourceKind::MODEL_KINDS {
            for descriptor in self.registry.types_of_kind(kind) {
                let fqn = descriptor.qualified_name();
                if self.is_excluded(&descriptor.namespace) || TypeRegistry::is_builtin(&fqn) {
                    debug!("Skipping {} {}", kind, fqn);
                    continue;
                }
                self.reflect_type(descriptor, kind, &mut arena)?;
            }
        }

        let parts: Vec<NamespacePart> = arena.into_values().collect();
        info!(
            "Reflected {} namespace part(s) from {} registered type(s)",
            parts.len(),
            self.registry.len()
        );
        Ok(parts)
    }

    /// Check the declared queries and return them in declaration order
    pub fn reflect_queries(&self) -> Result<Vec<QueryDefinition>, SchemaError> {
        let mut queries = Vec::with_capacity(self.registry.queries().len());
        for query in self.registry.queries() {
            if query.statement.trim().is_empty() {
                return Err(SchemaError::InvalidQuery {
                    description: query.description.clone(),
                    reason: "statement is empty".to_string(),
                });
            }
            debug!("Reflected query '{}'", query.description);
            queries.push(query.clone());
        }
        Ok(queries)
    }

    fn reflect_type(
        &self,
        descriptor: &TypeDescriptor,
        kind: ResourceKind,
        arena: &mut IndexMap<String, NamespacePart>,
    ) -> Result<(), SchemaError> {
        let fqn = descriptor.qualified_name();
        debug!("Reflecting {} {}", kind, fqn);
        arena
            .entry(descriptor.namespace.clone())
            .or_insert_with(|| NamespacePart::new(descriptor.namespace.clone()));

        let mut model = ModelEntity::new(&descriptor.namespace, &descriptor.name, kind);
        if let Some(parent) = descriptor.parent.as_deref() {
            match self.registry.get(parent) {
                Some(parent_descriptor) if parent_descriptor.kind == Some(kind) => {
                    model = model.with_parent(&parent_descriptor.namespace, &parent_descriptor.name);
                }
                _ => {
                    return Err(SchemaError::IllegalParent {
                        class: fqn,
                        parent: parent.to_string(),
                        kind: kind.to_string(),
                    });
                }
            }
        }

        for field in descriptor.marked_fields() {
            let entity = FieldEntity::from_descriptor(&fqn, field, self.registry)?;
            debug!("  {} {}: {}", fqn, entity.name(), entity.type_name());
            if entity.is_enum() {
                self.materialize_enum(entity.dependency(), arena);
            } else if entity.dependency() == Some(ENTRY_CLASS) {
                self.materialize_entry(arena)?;
            }
            model.add_field(entity, field.is_primary())?;
        }
        model.validate()?;

        arena
            .entry(descriptor.namespace.clone())
            .or_insert_with(|| NamespacePart::new(descriptor.namespace.clone()))
            .add_model(model);
        Ok(())
    }

    /// Declare a referenced enum in its own namespace, once per name
    fn materialize_enum(&self, fqn: Option<&str>, arena: &mut IndexMap<String, NamespacePart>) {
        let Some(descriptor) = fqn.and_then(|name| self.registry.get_enum(name)) else {
            return;
        };
        let part = arena
            .entry(descriptor.namespace.clone())
            .or_insert_with(|| NamespacePart::new(descriptor.namespace.clone()));
        if part.add_enum(EnumModel::from(descriptor)) {
            debug!("Materialized enum {}", descriptor.qualified_name());
        }
    }

    /// Declare the shared map entry concept the first time a map is seen
    fn materialize_entry(
        &self,
        arena: &mut IndexMap<String, NamespacePart>,
    ) -> Result<(), SchemaError> {
        let (_, entry_name) = split_qualified_name(ENTRY_CLASS);
        if arena
            .get(ENTRY_NAMESPACE)
            .is_some_and(|part| part.contains(entry_name))
        {
            return Ok(());
        }
        // Built-in shape regardless of what is registered under ENTRY_CLASS
        self.reflect_type(&TypeRegistry::entry_descriptor(), ResourceKind::Concept, arena)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnumDescriptor, FieldDescriptor, FieldType};

    #[test]
    fn test_system_namespace_skipped() {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                TypeDescriptor::participant(SYSTEM_NAMESPACE, "NetworkAdmin")
                    .field(FieldDescriptor::data("id", FieldType::string()).primary()),
            )
            .register(
                TypeDescriptor::asset("org.acme", "Car")
                    .field(FieldDescriptor::data("vin", FieldType::string()).primary()),
            );
        let parts = SchemaReflector::new(&registry).reflect().unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].namespace(), "org.acme");
    }

    #[test]
    fn test_illegal_parent_kind() {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                TypeDescriptor::asset("org.acme", "Base")
                    .field(FieldDescriptor::data("id", FieldType::string()).primary()),
            )
            .register(TypeDescriptor::participant("org.acme", "Person").extends("org.acme.Base"));
        let err = SchemaReflector::new(&registry).reflect().unwrap_err();
        assert_eq!(
            err,
            SchemaError::IllegalParent {
                class: "org.acme.Person".to_string(),
                parent: "org.acme.Base".to_string(),
                kind: "Participant".to_string(),
            }
        );
    }

    #[test]
    fn test_unregistered_parent_is_illegal() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeDescriptor::asset("org.acme", "Car").extends("java.util.ArrayList"));
        assert!(matches!(
            SchemaReflector::new(&registry).reflect(),
            Err(SchemaError::IllegalParent { .. })
        ));
    }

    #[test]
    fn test_enum_materialized_once() {
        let mut registry = TypeRegistry::new();
        registry
            .register_enum(EnumDescriptor::new("org.acme", "Color", ["RED", "GREEN"]))
            .register(
                TypeDescriptor::asset("org.acme", "Car")
                    .field(FieldDescriptor::data("vin", FieldType::string()).primary())
                    .field(FieldDescriptor::data("body", FieldType::named("org.acme.Color")))
                    .field(FieldDescriptor::data("roof", FieldType::named("org.acme.Color"))),
            );
        let parts = SchemaReflector::new(&registry).reflect().unwrap();
        assert_eq!(parts[0].enums().count(), 1);
        assert_eq!(parts[0].models().count(), 1);
    }

    #[test]
    fn test_map_field_materializes_entry_part() {
        let mut registry = TypeRegistry::new();
        registry.register(
            TypeDescriptor::asset("org.acme", "Car")
                .field(FieldDescriptor::data("vin", FieldType::string()).primary())
                .field(FieldDescriptor::data("labels", FieldType::Map))
                .field(FieldDescriptor::data("notes", FieldType::Map)),
        );
        let parts = SchemaReflector::new(&registry).reflect().unwrap();
        let namespaces: Vec<&str> = parts.iter().map(|p| p.namespace()).collect();
        assert_eq!(namespaces, vec!["org.acme", ENTRY_NAMESPACE]);
        assert_eq!(parts[1].models().count(), 1);
        let imports: Vec<&str> = parts[0].imports().collect();
        assert_eq!(imports, vec![ENTRY_CLASS]);
    }

    #[test]
    fn test_reregistered_entry_with_map_field() {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                TypeDescriptor::concept(ENTRY_NAMESPACE, "Entry")
                    .field(FieldDescriptor::data("nested", FieldType::Map)),
            )
            .register(
                TypeDescriptor::concept("org.acme", "Tags")
                    .field(FieldDescriptor::data("labels", FieldType::Map)),
            );
        let parts = SchemaReflector::new(&registry).reflect().unwrap();
        assert_eq!(parts.len(), 2);
        let entry = parts[1].models().next().unwrap();
        let names: Vec<&str> = entry.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["key", "value"]);
    }

    #[test]
    fn test_blank_query_statement() {
        let mut registry = TypeRegistry::new();
        registry
            .register_query(QueryDefinition::new("all cars", "SELECT org.acme.Car"))
            .register_query(QueryDefinition::new("broken", "  "));
        let err = SchemaReflector::new(&registry).reflect_queries().unwrap_err();
        assert!(matches!(err, SchemaError::InvalidQuery { ref description, .. } if description == "broken"));
    }

    #[test]
    fn test_excluded_namespaces_configurable() {
        let mut registry = TypeRegistry::new();
        registry.register(
            TypeDescriptor::concept("org.internal", "Audit")
                .field(FieldDescriptor::data("note", FieldType::string())),
        );
        let parts = SchemaReflector::new(&registry)
            .with_excluded_namespaces(["org.internal"])
            .reflect()
            .unwrap();
        assert!(parts.is_empty());
    }
}
