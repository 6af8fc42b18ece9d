//! Schema text renderer.
//!
//! Produces the `.cto` modelling language from reflected schema parts and the
//! `.qry` query file from declared queries.

use crate::models::{QueryDefinition, ResourceKind};
use crate::schema::{EnumModel, FieldEntity, ModelEntity, NamespacePart, SchemaEntity, SchemaError};

/// Exporter for the Composer modelling language.
pub struct CtoExporter;

impl CtoExporter {
    /// Render one field line, including its leading tab and trailing newline.
    ///
    /// # Example
    ///
    /// ```rust
    /// use composer_sdk::export::cto::CtoExporter;
    /// use composer_sdk::models::{FieldDescriptor, FieldType, TypeRegistry};
    /// use composer_sdk::schema::FieldEntity;
    ///
    /// let field = FieldDescriptor::data("doors", FieldType::integer())
    ///     .optional()
    ///     .range("[1,5]");
    /// let entity = FieldEntity::from_descriptor("org.acme.Car", &field, &TypeRegistry::new()).unwrap();
    ///
    /// assert_eq!(
    ///     CtoExporter::export_field(&entity),
    ///     "\to Integer doors optional range=[1,5] \n"
    /// );
    /// ```
    pub fn export_field(field: &FieldEntity) -> String {
        let mut line = String::from("\t");
        line.push_str(if field.is_reference() { "--> " } else { "o " });
        line.push_str(field.type_name());
        line.push(' ');
        line.push_str(field.name());
        line.push(' ');
        if field.is_optional() {
            line.push_str("optional ");
        }
        if let Some(value) = field.default_value() {
            line.push_str(&format!("default={} ", value));
        }
        if let Some(value) = field.range() {
            line.push_str(&format!("range={} ", value));
        }
        if let Some(value) = field.regex() {
            line.push_str(&format!("regex={} ", value));
        }
        line.push('\n');
        line
    }

    /// Render a model block.
    ///
    /// Transactions and concepts only ever use `extends`. Assets and
    /// participants use `identified by` when they declare a primary key and
    /// fall back to `extends`; having neither is rejected here as well as at
    /// reflection time.
    pub fn export_model(model: &ModelEntity) -> Result<String, SchemaError> {
        let mut block = String::new();
        block.push_str(model.kind().keyword());
        block.push(' ');
        block.push_str(model.name());

        match model.kind() {
            ResourceKind::Transaction | ResourceKind::Concept | ResourceKind::Event => {
                if let Some(parent) = model.parent() {
                    block.push_str(&format!(" extends {}", parent.name));
                }
            }
            ResourceKind::Asset | ResourceKind::Participant => {
                match (model.primary_key(), model.parent()) {
                    (Some(key), _) => block.push_str(&format!(" identified by {}", key.name())),
                    (None, Some(parent)) => block.push_str(&format!(" extends {}", parent.name)),
                    (None, None) => {
                        return Err(SchemaError::MissingPrimaryKey {
                            model: model.qualified_name(),
                        });
                    }
                }
            }
        }

        block.push_str(" {\n");
        for field in model.fields() {
            block.push_str(&Self::export_field(field));
        }
        block.push_str("}\n");
        Ok(block)
    }

    /// Render an enum block with one constant per line
    pub fn export_enum(model: &EnumModel) -> String {
        let mut block = format!("enum {} {{\n", model.name());
        for constant in model.constants() {
            block.push_str(&format!("\to {}\n", constant));
        }
        block.push_str("}\n");
        block
    }

    /// Render a whole namespace file: header, imports, then each entity
    /// preceded by a blank line.
    pub fn export_part(part: &NamespacePart) -> Result<String, SchemaError> {
        let mut cto = format!("namespace {}\n", part.namespace());
        for import in part.imports() {
            cto.push_str(&format!("import {}\n", import));
        }
        for entity in part.entities() {
            cto.push('\n');
            match entity {
                SchemaEntity::Model(model) => cto.push_str(&Self::export_model(model)?),
                SchemaEntity::Enum(model) => cto.push_str(&Self::export_enum(model)),
            }
        }
        Ok(cto)
    }

    /// Render the query file; queries are numbered `Q0`, `Q1`, ... in order
    pub fn export_queries(queries: &[QueryDefinition]) -> String {
        let mut qry = String::new();
        for (idx, query) in queries.iter().enumerate() {
            qry.push_str(&format!("query Q{} {{\n", idx));
            qry.push_str(&format!("\tdescription: \"{}\"\n", query.description));
            qry.push_str(&format!("\tstatement: {}\n}}\n\n", query.statement));
        }
        qry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldDescriptor, FieldType, TypeRegistry};

    fn entity(field: FieldDescriptor) -> FieldEntity {
        FieldEntity::from_descriptor("org.acme.Test", &field, &TypeRegistry::new()).unwrap()
    }

    #[test]
    fn test_modifier_order() {
        let field = FieldDescriptor::data("code", FieldType::string())
            .optional()
            .default_value("\"A1\"")
            .regex("/[A-Z][0-9]/");
        assert_eq!(
            CtoExporter::export_field(&entity(field)),
            "\to String code optional default=\"A1\" regex=/[A-Z][0-9]/ \n"
        );
    }

    #[test]
    fn test_asset_identified_by() {
        let mut model = ModelEntity::new("org.acme", "Car", ResourceKind::Asset);
        model
            .add_field(entity(FieldDescriptor::data("id", FieldType::string())), true)
            .unwrap();
        assert_eq!(
            CtoExporter::export_model(&model).unwrap(),
            "asset Car identified by id {\n\to String id \n}\n"
        );
    }

    #[test]
    fn test_asset_extends_parent() {
        let model = ModelEntity::new("org.acme", "Car", ResourceKind::Asset)
            .with_parent("org.base", "Vehicle");
        assert_eq!(
            CtoExporter::export_model(&model).unwrap(),
            "asset Car extends Vehicle {\n}\n"
        );
    }

    #[test]
    fn test_asset_without_identity_rejected() {
        let model = ModelEntity::new("org.acme", "Car", ResourceKind::Participant);
        assert!(matches!(
            CtoExporter::export_model(&model),
            Err(SchemaError::MissingPrimaryKey { .. })
        ));
    }

    #[test]
    fn test_transaction_without_parent() {
        let model = ModelEntity::new("org.acme", "Sell", ResourceKind::Transaction);
        assert_eq!(
            CtoExporter::export_model(&model).unwrap(),
            "transaction Sell {\n}\n"
        );
    }

    #[test]
    fn test_enum_block() {
        let model = EnumModel::new(
            "org.acme",
            "TestEnum",
            vec!["C1".into(), "C2".into(), "C3".into()],
        );
        assert_eq!(
            CtoExporter::export_enum(&model),
            "enum TestEnum {\n\to C1\n\to C2\n\to C3\n}\n"
        );
    }

    #[test]
    fn test_queries_numbered() {
        let queries = vec![
            QueryDefinition::new("first", "SELECT org.acme.Car"),
            QueryDefinition::new("second", "SELECT org.acme.Person"),
        ];
        assert_eq!(
            CtoExporter::export_queries(&queries),
            "query Q0 {\n\tdescription: \"first\"\n\tstatement: SELECT org.acme.Car\n}\n\n\
             query Q1 {\n\tdescription: \"second\"\n\tstatement: SELECT org.acme.Person\n}\n\n"
        );
    }
}
