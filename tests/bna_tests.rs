//! Business network archive tests

use std::io::{Cursor, Read};

use composer_sdk::export::{BnaConfig, BnaGenerator, GenerationError};
use composer_sdk::model::RegistryLoader;
use composer_sdk::models::TypeRegistry;
use tempfile::TempDir;

const DESCRIPTORS: &str = r#"
types:
  - namespace: org.acme.people
    name: Person
    kind: participant
    fields:
      - { name: email, type: String, marker: data, primary: true }
  - namespace: org.acme.cars
    name: Car
    kind: asset
    fields:
      - { name: vin, type: String, marker: data, primary: true }
      - { name: owner, type: org.acme.people.Person, marker: pointer }
      - { name: color, type: org.acme.cars.Color, marker: data, optional: true }
  - namespace: org.hyperledger.composer.system
    name: NetworkAdmin
    kind: participant
    fields:
      - { name: id, type: String, marker: data, primary: true }
enums:
  - { namespace: org.acme.cars, name: Color, constants: [RED, BLUE] }
queries:
  - { description: all cars, statement: SELECT org.acme.cars.Car }
"#;

fn read_entry<R: Read + std::io::Seek>(archive: &mut zip::ZipArchive<R>, name: &str) -> String {
    let mut text = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    text
}

fn entry_names<R: Read + std::io::Seek>(archive: &mut zip::ZipArchive<R>) -> Vec<String> {
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

mod generation_tests {
    use super::*;

    #[test]
    fn test_archive_layout_and_order() {
        let registry = RegistryLoader::from_yaml_str(DESCRIPTORS).unwrap();
        let config = BnaConfig::builder()
            .name("car-network")
            .version("1.0.0")
            .description("Cars and their owners")
            .build();
        let mut buffer = Cursor::new(Vec::new());
        let entries = BnaGenerator::new(&registry, config)
            .generate(&mut buffer)
            .unwrap();
        assert_eq!(
            entries,
            vec![
                "models/org.acme.cars.cto",
                "models/org.acme.people.cto",
                "queries.qry",
                "package.json",
                "permissions.acl",
            ]
        );

        let mut archive = zip::ZipArchive::new(buffer).unwrap();
        assert_eq!(entry_names(&mut archive), entries);

        assert_eq!(
            read_entry(&mut archive, "models/org.acme.cars.cto"),
            "namespace org.acme.cars\n\
             import org.acme.people.Person\n\
             \n\
             enum Color {\n\to RED\n\to BLUE\n}\n\
             \n\
             asset Car identified by vin {\n\
             \to String vin \n\
             \t--> Person owner \n\
             \to Color color optional \n\
             }\n"
        );
        assert_eq!(
            read_entry(&mut archive, "queries.qry"),
            "query Q0 {\n\tdescription: \"all cars\"\n\tstatement: SELECT org.acme.cars.Car\n}\n\n"
        );

        let manifest: serde_json::Value =
            serde_json::from_str(&read_entry(&mut archive, "package.json")).unwrap();
        assert_eq!(
            manifest,
            serde_json::json!({
                "name": "car-network",
                "version": "1.0.0",
                "description": "Cars and their owners"
            })
        );
        assert!(read_entry(&mut archive, "permissions.acl").contains("rule NetworkAdminSystem"));
    }

    #[test]
    fn test_queries_entry_omitted_without_queries() {
        let registry = RegistryLoader::from_yaml_str(
            "types:\n  - namespace: org.acme\n    name: Note\n    kind: concept\n",
        )
        .unwrap();
        let entries = BnaGenerator::new(&registry, BnaConfig::default())
            .generate(Cursor::new(Vec::new()))
            .unwrap();
        assert_eq!(
            entries,
            vec!["models/org.acme.cto", "package.json", "permissions.acl"]
        );
    }

    #[test]
    fn test_empty_registry_still_has_static_parts() {
        let registry = TypeRegistry::new();
        let entries = BnaGenerator::new(&registry, BnaConfig::default())
            .generate(Cursor::new(Vec::new()))
            .unwrap();
        assert_eq!(entries, vec!["package.json", "permissions.acl"]);
    }

    #[test]
    fn test_generate_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("network.bna");
        let registry = RegistryLoader::from_yaml_str(DESCRIPTORS).unwrap();
        BnaGenerator::new(&registry, BnaConfig::default())
            .generate_to_file(&path)
            .unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        assert_eq!(archive.len(), 5);
        assert!(read_entry(&mut archive, "package.json").contains("\"business-network\""));
    }

    #[test]
    fn test_configured_exclusion() {
        let registry = RegistryLoader::from_yaml_str(DESCRIPTORS).unwrap();
        let config = BnaConfig::builder().exclude_namespace("org.acme.cars").build();
        let entries = BnaGenerator::new(&registry, config)
            .generate(Cursor::new(Vec::new()))
            .unwrap();
        assert_eq!(entries[0], "models/org.acme.people.cto");
        assert!(!entries.iter().any(|e| e.contains("org.hyperledger.composer.system")));
    }

    #[test]
    fn test_config_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bna.toml");
        std::fs::write(&path, "name = \"from-file\"\nversion = \"2.0.0\"\n").unwrap();
        let config = BnaConfig::from_file(&path).unwrap();
        assert_eq!(config.name, "from-file");
        assert_eq!(config.version, "2.0.0");
    }

    #[test]
    fn test_registry_from_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("types.json");
        std::fs::write(
            &path,
            r#"{"types": [{"namespace": "org.acme", "name": "Person", "kind": "participant",
                "fields": [{"name": "id", "type": "String", "marker": "data", "primary": true}]}]}"#,
        )
        .unwrap();
        let registry = RegistryLoader::from_path(&path).unwrap();
        let entries = BnaGenerator::new(&registry, BnaConfig::default())
            .generate(Cursor::new(Vec::new()))
            .unwrap();
        assert_eq!(entries[0], "models/org.acme.cto");
    }
}

mod failure_tests {
    use super::*;

    #[test]
    fn test_schema_error_is_distinct_from_io() {
        let registry = RegistryLoader::from_yaml_str(
            "types:\n  - namespace: org.acme\n    name: Car\n    kind: asset\n",
        )
        .unwrap();
        let err = BnaGenerator::new(&registry, BnaConfig::default())
            .generate(Cursor::new(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, GenerationError::Schema(_)));
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("network.bna");
        let registry = TypeRegistry::new();
        let err = BnaGenerator::new(&registry, BnaConfig::default())
            .generate_to_file(&path)
            .unwrap_err();
        assert!(matches!(err, GenerationError::Io(_)));
    }

    #[test]
    fn test_blank_query_fails_generation() {
        let registry = RegistryLoader::from_yaml_str(
            "queries:\n  - { description: broken, statement: '' }\n",
        )
        .unwrap();
        let err = BnaGenerator::new(&registry, BnaConfig::default())
            .generate(Cursor::new(Vec::new()))
            .unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}
