//! Reflected schema fields

use crate::models::{
    ENTRY_CLASS, ENTRY_NAMESPACE, FieldDescriptor, FieldType, ResourceKind, TypeLookup,
    TypeRegistry, split_qualified_name,
};

use super::error::SchemaError;

/// Schema label of a type from the fixed primitive table.
///
/// Covers each primitive in scalar and array form; anything else is `None`.
pub fn primitive_type_name(field_type: &FieldType) -> Option<String> {
    match field_type {
        FieldType::Primitive(p) => Some(p.label().to_string()),
        FieldType::Array(inner) => match inner.as_ref() {
            FieldType::Primitive(p) => Some(format!("{}[]", p.label())),
            _ => None,
        },
        _ => None,
    }
}

/// One field of a reflected schema entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntity {
    name: String,
    type_name: String,
    namespace: Option<String>,
    dependency: Option<String>,
    is_enum: bool,
    is_concept: bool,
    is_embedded: bool,
    optional: bool,
    default_value: Option<String>,
    range: Option<String>,
    regex: Option<String>,
}

/// What a named field type resolved to
struct ResolvedType {
    fqn: String,
    is_enum: bool,
    is_concept: bool,
}

impl FieldEntity {
    /// Build the schema field for a marked field of `owner`.
    ///
    /// `owner` is the fully-qualified name of the declaring type and only
    /// appears in diagnostics.
    pub fn from_descriptor(
        owner: &str,
        field: &FieldDescriptor,
        registry: &TypeRegistry,
    ) -> Result<Self, SchemaError> {
        let field_id = format!("{}.{}", owner, field.name);
        let mut entity = Self {
            name: field.name.clone(),
            type_name: String::new(),
            namespace: None,
            dependency: None,
            is_enum: false,
            is_concept: false,
            is_embedded: field.is_embedded(),
            optional: field.is_optional(),
            default_value: field.default_value_str().map(str::to_string),
            range: field.range_value().map(str::to_string),
            regex: field.regex_value().map(str::to_string),
        };

        if let Some(type_name) = primitive_type_name(&field.field_type) {
            entity.type_name = type_name;
            return Ok(entity);
        }

        let resolved = match &field.field_type {
            FieldType::Collection(_) => {
                let element = field
                    .generic_type_hint()
                    .ok_or_else(|| SchemaError::MissingGenericType {
                        field: field_id.clone(),
                    })?;
                if element.is_array() {
                    return Err(SchemaError::ArrayGenericType { field: field_id });
                }
                if let Some(type_name) = primitive_type_name(element) {
                    entity.type_name = format!("{}[]", type_name);
                    return Ok(entity);
                }
                let FieldType::Named(fqn) = element else {
                    return Err(SchemaError::IllegalFieldType { field: field_id });
                };
                let resolved = resolve_named(fqn, registry, &field_id)?;
                entity.type_name = format!("{}[]", split_qualified_name(fqn).1);
                resolved
            }
            FieldType::Map => {
                entity.type_name = "Entry[]".to_string();
                ResolvedType {
                    fqn: ENTRY_CLASS.to_string(),
                    is_enum: false,
                    is_concept: true,
                }
            }
            FieldType::Named(fqn) => {
                let resolved = resolve_named(fqn, registry, &field_id)?;
                entity.type_name = split_qualified_name(fqn).1.to_string();
                resolved
            }
            FieldType::Array(inner) => {
                let FieldType::Named(fqn) = inner.as_ref() else {
                    return Err(SchemaError::IllegalFieldType { field: field_id });
                };
                let resolved = resolve_named(fqn, registry, &field_id)?;
                entity.type_name = format!("{}[]", split_qualified_name(fqn).1);
                resolved
            }
            FieldType::Primitive(p) => {
                entity.type_name = p.label().to_string();
                return Ok(entity);
            }
        };

        let namespace = if resolved.fqn == ENTRY_CLASS {
            ENTRY_NAMESPACE
        } else {
            split_qualified_name(&resolved.fqn).0
        };
        entity.namespace = Some(namespace.to_string());
        entity.is_enum = resolved.is_enum;
        entity.is_concept = resolved.is_concept;
        entity.dependency = Some(resolved.fqn);
        Ok(entity)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type label as written in the schema, e.g. `String`, `Car[]`, `Entry[]`
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Namespace of the referenced type, if the field references one
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Fully-qualified name the owning namespace may need to import
    pub fn dependency(&self) -> Option<&str> {
        self.dependency.as_deref()
    }

    pub fn is_enum(&self) -> bool {
        self.is_enum
    }

    pub fn is_concept(&self) -> bool {
        self.is_concept
    }

    pub fn is_embedded(&self) -> bool {
        self.is_embedded
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }

    pub fn regex(&self) -> Option<&str> {
        self.regex.as_deref()
    }

    /// Whether the field is written with the `-->` reference marker
    pub fn is_reference(&self) -> bool {
        !(self.is_enum || self.is_concept || self.dependency.is_none() || self.is_embedded)
    }
}

fn resolve_named(
    fqn: &str,
    registry: &TypeRegistry,
    field_id: &str,
) -> Result<ResolvedType, SchemaError> {
    match registry.lookup(fqn) {
        TypeLookup::Enum(_) => Ok(ResolvedType {
            fqn: fqn.to_string(),
            is_enum: true,
            is_concept: false,
        }),
        TypeLookup::Resource(descriptor)
            if descriptor
                .kind
                .is_some_and(|k| ResourceKind::MODEL_KINDS.contains(&k)) =>
        {
            Ok(ResolvedType {
                fqn: fqn.to_string(),
                is_enum: false,
                is_concept: descriptor.kind == Some(ResourceKind::Concept),
            })
        }
        _ => Err(SchemaError::IllegalFieldType {
            field: field_id.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnumDescriptor, TypeDescriptor};

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                TypeDescriptor::asset("org.acme.assets", "AnAsset")
                    .field(FieldDescriptor::data("id", FieldType::string()).primary()),
            )
            .register(TypeDescriptor::plain("java.math", "BigDecimal"))
            .register_enum(EnumDescriptor::new("org.acme", "Color", ["RED", "GREEN"]));
        registry
    }

    #[test]
    fn test_primitive_table() {
        assert_eq!(primitive_type_name(&FieldType::long()).as_deref(), Some("Long"));
        assert_eq!(
            primitive_type_name(&FieldType::array_of(FieldType::date_time())).as_deref(),
            Some("DateTime[]")
        );
        assert_eq!(primitive_type_name(&FieldType::Map), None);
    }

    #[test]
    fn test_collection_of_resources() {
        let field = FieldDescriptor::data("assets", FieldType::list())
            .embedded(false)
            .generic_type(FieldType::named("org.acme.assets.AnAsset"));
        let entity = FieldEntity::from_descriptor("org.acme.Test", &field, &registry()).unwrap();
        assert_eq!(entity.type_name(), "AnAsset[]");
        assert_eq!(entity.namespace(), Some("org.acme.assets"));
        assert_eq!(entity.dependency(), Some("org.acme.assets.AnAsset"));
        assert!(entity.is_reference());
    }

    #[test]
    fn test_collection_of_primitives_has_no_dependency() {
        let field = FieldDescriptor::data("ints", FieldType::list())
            .generic_type(FieldType::integer());
        let entity = FieldEntity::from_descriptor("org.acme.Test", &field, &registry()).unwrap();
        assert_eq!(entity.type_name(), "Integer[]");
        assert_eq!(entity.namespace(), None);
        assert_eq!(entity.dependency(), None);
        assert!(!entity.is_reference());
    }

    #[test]
    fn test_map_field_depends_on_entry() {
        let field = FieldDescriptor::data("mapField", FieldType::Map);
        let entity = FieldEntity::from_descriptor("org.acme.Test", &field, &registry()).unwrap();
        assert_eq!(entity.type_name(), "Entry[]");
        assert_eq!(entity.namespace(), Some(ENTRY_NAMESPACE));
        assert_eq!(entity.dependency(), Some(ENTRY_CLASS));
    }

    #[test]
    fn test_collection_without_generic_type_fails() {
        let field = FieldDescriptor::data("assets", FieldType::list());
        let err = FieldEntity::from_descriptor("org.acme.Test", &field, &registry()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingGenericType {
                field: "org.acme.Test.assets".to_string()
            }
        );
    }

    #[test]
    fn test_array_generic_type_fails() {
        let field = FieldDescriptor::data("intsList", FieldType::list())
            .generic_type(FieldType::array_of(FieldType::integer()));
        let err = FieldEntity::from_descriptor("org.acme.Test", &field, &registry()).unwrap_err();
        assert!(matches!(err, SchemaError::ArrayGenericType { .. }));
        assert!(err.to_string().ends_with("intsList"));
    }

    #[test]
    fn test_unmarked_type_is_illegal() {
        let field = FieldDescriptor::data("decimal", FieldType::named("java.math.BigDecimal"));
        let err = FieldEntity::from_descriptor("org.acme.Test", &field, &registry()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "illegal non-primitive type of DataField:org.acme.Test.decimal"
        );
    }

    #[test]
    fn test_enum_field() {
        let field = FieldDescriptor::data("color", FieldType::named("org.acme.Color"))
            .embedded(false);
        let entity = FieldEntity::from_descriptor("org.acme.Test", &field, &registry()).unwrap();
        assert!(entity.is_enum());
        assert!(!entity.is_reference());
        assert_eq!(entity.type_name(), "Color");
    }
}
