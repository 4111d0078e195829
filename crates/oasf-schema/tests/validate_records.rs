//! Validation of fixture records against the bundled schema registry.
//!
//! Every fixture under `tests/fixtures/` is a real record document. Valid
//! fixtures must pass their declared version with no violations; the invalid
//! fixture carries exactly three schema breaches.

use std::path::PathBuf;
use std::sync::Arc;

use oasf_core::{Record, Signature};
use oasf_schema::{
    HttpSchemaFetcher, SchemaRegistry, ValidationEngine, ValidationError, DEFAULT_FETCH_TIMEOUT,
};

fn fixture(name: &str) -> Record {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    Record::from_path(&path).unwrap()
}

fn engine() -> ValidationEngine {
    let registry = SchemaRegistry::bundled().unwrap();
    let fetcher = HttpSchemaFetcher::new(DEFAULT_FETCH_TIMEOUT).unwrap();
    ValidationEngine::new(Arc::new(registry), Arc::new(fetcher))
}

#[tokio::test]
async fn every_bundled_version_accepts_its_valid_fixture() {
    let engine = engine();
    for version in engine.registry().versions() {
        let record = fixture(&format!("valid_v{version}_record.json"));
        assert_eq!(record.schema_version, version);

        let outcome = engine.validate(Some(&record), None).await.unwrap();
        assert!(
            outcome.is_valid(),
            "fixture for {version} should be valid, got: {:?}",
            outcome.violations()
        );
        assert!(outcome.violations().is_empty());
    }
}

#[tokio::test]
async fn timestamps_must_be_rfc3339() {
    let engine = engine();
    for version in engine.registry().versions() {
        let mut record = fixture(&format!("valid_v{version}_record.json"));
        record.created_at = "yesterday".to_string();

        let outcome = engine.validate(Some(&record), None).await.unwrap();
        assert_eq!(outcome.violations().len(), 1, "{version}: {:?}", outcome.violations());
        assert!(outcome.violations()[0].contains("/created_at"));
    }

    let mut signed = fixture("valid_v0.6.0_record.json");
    signed.signature = Some(Signature {
        algorithm: "ECDSA".to_string(),
        signed_at: "last tuesday".to_string(),
        ..Signature::default()
    });
    let outcome = engine.validate(Some(&signed), None).await.unwrap();
    assert_eq!(outcome.violations().len(), 1, "got: {:?}", outcome.violations());
    assert!(outcome.violations()[0].contains("/signature/signed_at"));
}

#[tokio::test]
async fn invalid_fixture_reports_each_breach() {
    let engine = engine();
    let record = fixture("invalid_v0.6.0_record.json");

    let outcome = engine.validate(Some(&record), None).await.unwrap();
    assert!(!outcome.is_valid());

    let violations = outcome.violations();
    assert_eq!(violations.len(), 3, "got: {violations:?}");
    assert!(violations.iter().all(|v| v.starts_with("JSON Schema: ")));
    assert!(violations.iter().any(|v| v.contains("\"name\"")));
    assert!(violations.iter().any(|v| v.contains("floppy_disk")));
    assert!(violations.iter().any(|v| v.contains("/extensions/0")));
}

#[tokio::test]
async fn version_specific_rules_apply() {
    let engine = engine();
    // 0.5.0 requires a version on every extension; 0.6.0 does not.
    let mut record = fixture("valid_v0.6.0_record.json");
    assert!(engine.validate(Some(&record), None).await.unwrap().is_valid());

    record.schema_version = "0.5.0".into();
    let outcome = engine.validate(Some(&record), None).await.unwrap();
    assert!(!outcome.is_valid());
}

#[tokio::test]
async fn unknown_version_is_a_request_error() {
    let engine = engine();
    let record = fixture("unknown_version_record.json");

    let err = engine.validate(Some(&record), None).await.unwrap_err();
    match &err {
        ValidationError::UnknownVersion { version, available } => {
            assert_eq!(version, "9.9.9");
            assert_eq!(available, &vec!["0.5.0".to_string(), "0.6.0".to_string()]);
        }
        other => panic!("expected UnknownVersion, got: {other}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("0.5.0") && msg.contains("0.6.0"), "got: {msg}");
}

#[tokio::test]
async fn validation_is_idempotent() {
    let engine = engine();
    for name in ["valid_v0.6.0_record.json", "invalid_v0.6.0_record.json"] {
        let record = fixture(name);
        let first = engine.validate(Some(&record), None).await.unwrap();
        let second = engine.validate(Some(&record), None).await.unwrap();
        assert_eq!(first, second, "outcomes differ for {name}");
    }
}

#[tokio::test]
async fn concurrent_validations_share_the_registry() {
    let engine = engine();
    let record = Arc::new(fixture("valid_v0.6.0_record.json"));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let engine = engine.clone();
        let record = Arc::clone(&record);
        handles.push(tokio::spawn(async move {
            engine.validate(Some(&*record), None).await.map(|o| o.is_valid())
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().unwrap());
    }
}
