//! CLI integration tests for the odata-openapi binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("odata-openapi"))
}

// Helper to create a temp model file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const CATALOG: &str = r#"{
    "namespace": "Store",
    "entity_types": [{
        "name": "Product",
        "key": ["ID"],
        "properties": [
            { "name": "ID", "type": "Edm.Int64" },
            { "name": "Name", "type": "Edm.String", "nullable": true }
        ]
    }],
    "containers": [{
        "name": "Default",
        "entity_sets": [{ "name": "Products", "entity_type": "Store.Product" }]
    }]
}"#;

mod convert_command {
    use super::*;

    #[test]
    fn basic_convert() {
        let dir = TempDir::new().unwrap();
        let model = write_temp_file(&dir, "model.json", CATALOG);

        cmd()
            .args(["convert", model.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""openapi":"3.0.1""#))
            .stdout(predicate::str::contains("/Products({ID})"));
    }

    #[test]
    fn convert_with_pretty() {
        let dir = TempDir::new().unwrap();
        let model = write_temp_file(&dir, "model.json", CATALOG);

        cmd()
            .args(["convert", model.to_str().unwrap(), "--pretty"])
            .assert()
            .success()
            // Pretty output has newlines and indentation
            .stdout(predicate::str::contains("{\n"));
    }

    #[test]
    fn convert_with_output_file() {
        let dir = TempDir::new().unwrap();
        let model = write_temp_file(&dir, "model.json", CATALOG);
        let output = dir.path().join("openapi.json");

        cmd()
            .args([
                "convert",
                model.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains(r#""Store.Product""#));
    }

    #[test]
    fn convert_to_swagger_2() {
        let dir = TempDir::new().unwrap();
        let model = write_temp_file(&dir, "model.json", CATALOG);

        cmd()
            .args([
                "convert",
                model.to_str().unwrap(),
                "--openapi-version",
                "2.0",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""swagger":"2.0""#))
            .stdout(predicate::str::contains(r#""definitions""#));
    }

    #[test]
    fn convert_with_service_root_and_key_as_segment() {
        let dir = TempDir::new().unwrap();
        let model = write_temp_file(&dir, "model.json", CATALOG);

        cmd()
            .args([
                "convert",
                model.to_str().unwrap(),
                "--service-root",
                "https://api.example.com/v1",
                "--key-as-segment",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("https://api.example.com/v1"))
            .stdout(predicate::str::contains("/Products/{ID}"));
    }

    #[test]
    fn missing_model_file_exits_3() {
        cmd()
            .args(["convert", "no-such-model.json"])
            .assert()
            .failure()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn malformed_model_exits_2() {
        let dir = TempDir::new().unwrap();
        let model = write_temp_file(&dir, "model.json", "{ not json");

        cmd()
            .args(["convert", model.to_str().unwrap()])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("invalid model JSON"));
    }

    #[test]
    fn bad_annotation_exits_2_and_names_the_term() {
        let dir = TempDir::new().unwrap();
        let model = write_temp_file(
            &dir,
            "model.json",
            r#"{
                "namespace": "Store",
                "entity_types": [{
                    "name": "Product",
                    "key": ["ID"],
                    "properties": [{ "name": "ID", "type": "Edm.Int64" }]
                }],
                "containers": [{
                    "name": "Default",
                    "entity_sets": [{
                        "name": "Products",
                        "entity_type": "Store.Product",
                        "annotations": [{
                            "term": "Org.OData.Capabilities.V1.TopSupported",
                            "value": { "literal": { "kind": "Edm.Boolean", "value": "yes" } }
                        }]
                    }]
                }]
            }"#,
        );

        cmd()
            .args(["convert", model.to_str().unwrap()])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("TopSupported"));
    }

    #[test]
    fn unknown_version_is_a_usage_error() {
        let dir = TempDir::new().unwrap();
        let model = write_temp_file(&dir, "model.json", CATALOG);

        cmd()
            .args([
                "convert",
                model.to_str().unwrap(),
                "--openapi-version",
                "4.0",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown OpenAPI version"));
    }
}

mod check_command {
    use super::*;

    #[test]
    fn valid_model_reports_element_count() {
        let dir = TempDir::new().unwrap();
        let model = write_temp_file(&dir, "model.json", CATALOG);

        cmd()
            .args(["check", model.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("elements checked"));
    }

    #[test]
    fn check_with_json_output() {
        let dir = TempDir::new().unwrap();
        let model = write_temp_file(&dir, "model.json", CATALOG);

        cmd()
            .args(["check", model.to_str().unwrap(), "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""valid":true"#));
    }

    #[test]
    fn check_failure_as_json() {
        let dir = TempDir::new().unwrap();
        let model = write_temp_file(
            &dir,
            "model.json",
            r#"{
                "namespace": "Store",
                "containers": [{
                    "name": "Default",
                    "entity_sets": [{ "name": "Products", "entity_type": "Store.Missing" }]
                }]
            }"#,
        );

        cmd()
            .args(["check", model.to_str().unwrap(), "--json"])
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::contains(r#""valid":false"#))
            .stdout(predicate::str::contains("Store.Missing"));
    }
}
