//! Namespace-scoped schema units

use std::collections::BTreeSet;

use super::model::{EnumModel, ModelEntity};

/// An entity declared in a namespace file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaEntity {
    Model(ModelEntity),
    Enum(EnumModel),
}

impl SchemaEntity {
    pub fn name(&self) -> &str {
        match self {
            SchemaEntity::Model(model) => model.name(),
            SchemaEntity::Enum(model) => model.name(),
        }
    }
}

/// All entities of one namespace plus the names it imports.
///
/// Entities keep insertion order. Imports are a sorted set, so the
/// rendered file is identical across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacePart {
    namespace: String,
    entities: Vec<SchemaEntity>,
    imports: BTreeSet<String>,
}

impl NamespacePart {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entities: Vec::new(),
            imports: BTreeSet::new(),
        }
    }

    /// Archive path of the namespace file
    pub fn entry_name(&self) -> String {
        format!("models/{}.cto", self.namespace)
    }

    /// Add a model and record its cross-namespace dependencies
    pub fn add_model(&mut self, model: ModelEntity) {
        for dependency in model.dependencies() {
            self.add_import(dependency);
        }
        self.entities.push(SchemaEntity::Model(model));
    }

    /// Add an enum unless one with the same name is already declared.
    ///
    /// Returns whether the enum was added.
    pub fn add_enum(&mut self, model: EnumModel) -> bool {
        if self.contains(model.name()) {
            return false;
        }
        self.entities.push(SchemaEntity::Enum(model));
        true
    }

    /// Record an import; dependencies inside this namespace are ignored
    pub fn add_import(&mut self, dependency: impl Into<String>) {
        let dependency = dependency.into();
        let in_namespace = dependency
            .rsplit_once('.')
            .is_some_and(|(ns, _)| ns == self.namespace);
        if !in_namespace {
            self.imports.insert(dependency);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.iter().any(|e| e.name() == name)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn entities(&self) -> &[SchemaEntity] {
        &self.entities
    }

    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelEntity> {
        self.entities.iter().filter_map(|e| match e {
            SchemaEntity::Model(model) => Some(model),
            SchemaEntity::Enum(_) => None,
        })
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumModel> {
        self.entities.iter().filter_map(|e| match e {
            SchemaEntity::Enum(model) => Some(model),
            SchemaEntity::Model(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceKind;

    #[test]
    fn test_enum_deduplicated_by_name() {
        let mut part = NamespacePart::new("org.acme");
        assert!(part.add_enum(EnumModel::new("org.acme", "Color", vec!["RED".into()])));
        assert!(!part.add_enum(EnumModel::new("org.acme", "Color", vec!["RED".into()])));
        assert_eq!(part.enums().count(), 1);
    }

    #[test]
    fn test_imports_sorted_and_filtered() {
        let mut part = NamespacePart::new("org.acme");
        part.add_import("org.b.Z");
        part.add_import("org.a.Y");
        part.add_import("org.acme.Local");
        part.add_model(
            ModelEntity::new("org.acme", "Car", ResourceKind::Asset).with_parent("org.base", "V"),
        );
        let imports: Vec<&str> = part.imports().collect();
        assert_eq!(imports, vec!["org.a.Y", "org.b.Z", "org.base.V"]);
        assert_eq!(part.entry_name(), "models/org.acme.cto");
    }
}
