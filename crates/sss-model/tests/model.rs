//! Tests for sss-model types.

use sss_model::{Datafile, Metadata, Record, RecordFormat, Variable, VariableType};

fn sample_metadata() -> Metadata {
    let mut datafile = Datafile::new();
    datafile.set("title", "Customer satisfaction");
    let mut gender = Variable::new(Some("1".to_string()), Some(VariableType::Single));
    gender.name = Some("Q1".to_string());
    gender.insert_value("1", "Male".to_string(), None);
    gender.insert_value("2", "Female".to_string(), None);
    let mut brands = Variable::new(Some("2".to_string()), Some(VariableType::Multiple));
    brands.name = Some("Q2".to_string());
    Metadata {
        datafile,
        record: Record {
            ident: Some("A".to_string()),
            format: RecordFormat::Csv,
            skip: Some(1),
            href: None,
        },
        variables: vec![gender, brands],
    }
}

#[test]
fn metadata_serializes() {
    let metadata = sample_metadata();
    let json = serde_json::to_string(&metadata).expect("serialize metadata");
    let round: Metadata = serde_json::from_str(&json).expect("deserialize metadata");
    assert_eq!(round, metadata);
}

#[test]
fn enums_serialize_lowercase() {
    let metadata = sample_metadata();
    let value = serde_json::to_value(&metadata).expect("serialize metadata");
    assert_eq!(value["record"]["format"], "csv");
    assert_eq!(value["variables"][0]["var_type"], "single");
}

#[test]
fn counts_multiple_sets() {
    assert_eq!(sample_metadata().multiple_sets(), 1);
}
