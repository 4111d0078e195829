//! Record documents parsed from the formats they are authored in.

use oasf_core::{CanonicalJson, Record};

const JSON_RECORD: &str = r#"{
  "name": "directory.agntcy.org/example/summarizer",
  "version": "v0.2.0",
  "authors": ["AGNTCY Contributors"],
  "created_at": "2025-03-19T17:06:37Z",
  "schema_version": "0.6.0",
  "skills": [{ "name": "natural_language_processing/summarization", "id": 10202 }],
  "locators": [{ "type": "docker_image", "url": "ghcr.io/agntcy/summarizer:v0.2.0" }],
  "extensions": [
    { "name": "schema.oasf.agntcy.org/features/runtime/framework", "data": { "framework": "crewai", "workers": 4 } }
  ]
}"#;

const YAML_RECORD: &str = r#"
name: directory.agntcy.org/example/summarizer
version: v0.2.0
authors:
  - AGNTCY Contributors
created_at: "2025-03-19T17:06:37Z"
schema_version: 0.6.0
skills:
  - name: natural_language_processing/summarization
    id: 10202
locators:
  - type: docker_image
    url: ghcr.io/agntcy/summarizer:v0.2.0
extensions:
  - name: schema.oasf.agntcy.org/features/runtime/framework
    data:
      framework: crewai
      workers: 4
"#;

#[test]
fn json_and_yaml_describe_the_same_record() {
    let from_json = Record::from_json_str(JSON_RECORD).unwrap();
    let from_yaml = Record::from_yaml_str(YAML_RECORD).unwrap();
    assert_eq!(from_json, from_yaml);
}

#[test]
fn projection_keeps_wire_names_and_drops_unpopulated_fields() {
    let record = Record::from_json_str(JSON_RECORD).unwrap();
    let projection = CanonicalJson::project(&record).unwrap();
    let value = projection.as_value();

    assert_eq!(value["schema_version"], "0.6.0");
    assert_eq!(value["locators"][0]["type"], "docker_image");
    assert_eq!(value["extensions"][0]["data"]["workers"], 4);
    for absent in ["description", "domains", "annotations", "signature", "previous_record_cid"] {
        assert!(value.get(absent).is_none(), "{absent} should be omitted");
    }
}

#[test]
fn projection_of_parsed_record_parses_back() {
    let record = Record::from_json_str(JSON_RECORD).unwrap();
    let projection = CanonicalJson::project(&record).unwrap().into_value();
    let reparsed: Record = serde_json::from_value(projection).unwrap();
    assert_eq!(reparsed, record);
}

#[test]
fn display_names_are_rejected() {
    let err = Record::from_json_str(r#"{"schemaVersion": "0.6.0"}"#).unwrap_err();
    assert!(err.to_string().contains("schemaVersion"), "got: {err}");
}
