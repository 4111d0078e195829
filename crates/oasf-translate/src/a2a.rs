//! # A2A Agent Card
//!
//! Decodes the record's A2A runtime extension into an agent card. Fields
//! absent from the extension data take their empty defaults.

use std::collections::BTreeMap;

use oasf_core::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TranslationError;

/// Name of the A2A runtime extension block.
pub const A2A_EXTENSION: &str = "schema.oasf.agntcy.org/features/runtime/a2a";

const KIND: &str = "A2A";

/// An A2A agent card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct A2aCard {
    pub name: String,
    pub description: String,
    pub url: String,
    pub capabilities: BTreeMap<String, bool>,
    pub default_input_modes: Vec<String>,
    pub default_output_modes: Vec<String>,
    pub skills: Vec<A2aSkill>,
}

/// A skill advertised on an agent card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct A2aSkill {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Decode the A2A agent card carried by a record.
pub fn build_a2a_card(record: &Record) -> Result<A2aCard, TranslationError> {
    let ext = record
        .extension(A2A_EXTENSION)
        .ok_or(TranslationError::ExtensionNotFound { kind: KIND })?;

    let data = ext.data.as_ref().ok_or_else(|| TranslationError::MissingField {
        kind: KIND,
        field: "data".into(),
    })?;

    serde_json::from_value(Value::Object(data.clone())).map_err(|e| {
        TranslationError::InvalidField {
            kind: KIND,
            field: "data".into(),
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use oasf_core::Extension;
    use serde_json::json;

    fn record_with(data: Option<Value>) -> Record {
        Record {
            extensions: vec![Extension {
                name: A2A_EXTENSION.into(),
                version: "v1.0.0".into(),
                data: data.and_then(|d| d.as_object().cloned()),
            }],
            ..Record::default()
        }
    }

    #[test]
    fn decodes_full_card() {
        let record = record_with(Some(json!({
            "name": "browser-agent",
            "description": "Performs web searches",
            "url": "http://localhost:8000",
            "capabilities": {"streaming": true, "pushNotifications": false},
            "defaultInputModes": ["text"],
            "defaultOutputModes": ["text"],
            "skills": [{"id": "browser", "name": "browser automation", "description": "drives a browser"}]
        })));
        let card = build_a2a_card(&record).unwrap();

        assert_eq!(card.url, "http://localhost:8000");
        assert_eq!(card.capabilities.get("streaming"), Some(&true));
        assert_eq!(card.default_input_modes, vec!["text"]);
        assert_eq!(card.skills.len(), 1);
        assert_eq!(card.skills[0].id, "browser");
    }

    #[test]
    fn absent_fields_default_to_empty() {
        let card = build_a2a_card(&record_with(Some(json!({"name": "bare"})))).unwrap();
        assert_eq!(card.name, "bare");
        assert!(card.skills.is_empty());
        assert!(card.capabilities.is_empty());
    }

    #[test]
    fn serializes_camel_case_modes() {
        let card = A2aCard {
            default_input_modes: vec!["text".into()],
            ..A2aCard::default()
        };
        let value = serde_json::to_value(card).unwrap();
        assert_eq!(value["defaultInputModes"], json!(["text"]));
        assert!(value.get("default_input_modes").is_none());
    }

    #[test]
    fn missing_extension() {
        let err = build_a2a_card(&Record::default()).unwrap_err();
        assert_eq!(err.to_string(), "A2A extension not found in record");
    }

    #[test]
    fn missing_data() {
        let err = build_a2a_card(&record_with(None)).unwrap_err();
        assert!(
            matches!(err, TranslationError::MissingField { ref field, .. } if field == "data"),
            "got: {err}"
        );
    }

    #[test]
    fn wrongly_typed_field_is_invalid() {
        let err = build_a2a_card(&record_with(Some(json!({"skills": "browser"})))).unwrap_err();
        assert!(matches!(err, TranslationError::InvalidField { .. }), "got: {err}");
    }
}
