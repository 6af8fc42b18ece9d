//! Reflected schema entities

use crate::models::{EnumDescriptor, ResourceKind, qualified_name};

use super::error::SchemaError;
use super::field::FieldEntity;

/// Name reserved for the runtime-assigned identity of transactions
pub const TRANSACTION_ID_FIELD: &str = "transactionId";

/// Parent reference of a schema entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub namespace: String,
    pub name: String,
}

impl ParentRef {
    pub fn qualified_name(&self) -> String {
        qualified_name(&self.namespace, &self.name)
    }
}

/// One asset, participant, transaction or concept of a namespace.
///
/// Enumerations are a separate type, [`EnumModel`], which has no way to carry
/// fields, a parent or a resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntity {
    namespace: String,
    name: String,
    kind: ResourceKind,
    fields: Vec<FieldEntity>,
    primary_key: Option<usize>,
    parent: Option<ParentRef>,
}

impl ModelEntity {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind,
            fields: Vec::new(),
            primary_key: None,
            parent: None,
        }
    }

    pub fn with_parent(mut self, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        self.parent = Some(ParentRef {
            namespace: namespace.into(),
            name: name.into(),
        });
        self
    }

    /// Append a field, enforcing the identity rules of the entity's kind
    pub fn add_field(&mut self, field: FieldEntity, is_primary: bool) -> Result<(), SchemaError> {
        if self.kind == ResourceKind::Transaction {
            if is_primary {
                return Err(SchemaError::TransactionPrimaryKey {
                    transaction: self.qualified_name(),
                });
            }
            if field.name() == TRANSACTION_ID_FIELD {
                return Err(SchemaError::TransactionReservedField {
                    transaction: self.qualified_name(),
                });
            }
        }
        if is_primary {
            if let Some(existing) = self.primary_key() {
                return Err(SchemaError::DuplicatePrimaryKey {
                    existing: existing.name().to_string(),
                    duplicate: field.name().to_string(),
                });
            }
            self.primary_key = Some(self.fields.len());
        }
        self.fields.push(field);
        Ok(())
    }

    /// Check that the entity can be written out.
    ///
    /// Assets and participants need their own primary key or a parent to
    /// inherit one from.
    pub fn validate(&self) -> Result<(), SchemaError> {
        match self.kind {
            ResourceKind::Transaction | ResourceKind::Concept | ResourceKind::Event => Ok(()),
            ResourceKind::Asset | ResourceKind::Participant => {
                if self.primary_key.is_none() && self.parent.is_none() {
                    Err(SchemaError::MissingPrimaryKey {
                        model: self.qualified_name(),
                    })
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Fully-qualified names this entity needs imported into its namespace
    pub fn dependencies(&self) -> Vec<String> {
        let mut result = Vec::new();
        if let Some(parent) = &self.parent {
            if parent.namespace != self.namespace {
                result.push(parent.qualified_name());
            }
        }
        for field in &self.fields {
            if let Some(dependency) = field.dependency() {
                if field.namespace() != Some(self.namespace.as_str()) {
                    result.push(dependency.to_string());
                }
            }
        }
        result
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(&self.namespace, &self.name)
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn fields(&self) -> &[FieldEntity] {
        &self.fields
    }

    pub fn primary_key(&self) -> Option<&FieldEntity> {
        self.primary_key.and_then(|idx| self.fields.get(idx))
    }

    pub fn parent(&self) -> Option<&ParentRef> {
        self.parent.as_ref()
    }
}

/// A reflected enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumModel {
    namespace: String,
    name: String,
    constants: Vec<String>,
}

impl EnumModel {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        constants: Vec<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            constants,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(&self.namespace, &self.name)
    }

    /// Constants in declaration order
    pub fn constants(&self) -> &[String] {
        &self.constants
    }
}

impl From<&EnumDescriptor> for EnumModel {
    fn from(descriptor: &EnumDescriptor) -> Self {
        Self::new(
            descriptor.namespace.clone(),
            descriptor.name.clone(),
            descriptor.constants.clone(),
        )
    }
}
