use std::collections::BTreeMap;

use bincode::Options;
use sdt_core::{Ratio, SdtError};
use sdt_design::{design_from_bytes, design_to_bytes, load_design, save_design, Design};
use tempfile::tempdir;

fn sample_design() -> Design {
    let mut design = Design::new();
    for (attribute, levels) in [
        ("Party", vec!["Dem", "Rep"]),
        ("Age", vec!["35", "55", "75"]),
        ("Job", vec!["Doctor", "Nurse"]),
    ] {
        design.add_attribute(attribute).unwrap();
        for level in levels {
            design.add_level(attribute, level).unwrap();
        }
    }
    let restriction = design.new_restriction();
    design.set_restriction_level(restriction, "Party", "Dem").unwrap();
    design.set_restriction_level(restriction, "Age", "75").unwrap();
    let group = design.new_constraint();
    design.add_to_constraint(group, "Age").unwrap();
    design.add_to_constraint(group, "Job").unwrap();
    let mut editor = design.weight_editor();
    editor.set_weights("Age", &["0.5", "0.25", "0.25"]).unwrap();
    design.commit_weights(&editor).unwrap();
    design.set_tasks(3).unwrap();
    design.set_profiles(4).unwrap();
    design
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
}

#[test]
fn design_file_roundtrip() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("survey.sdt");
    let design = sample_design();
    save_design(&design, &path).expect("save");
    let restored = load_design(&path).expect("load");
    assert_eq!(restored, design);
}

#[test]
fn flags_are_not_persisted() {
    let mut design = sample_design();
    design.set_weighted(true);
    design.set_randomize_order(false);
    let restored = design_from_bytes(&design_to_bytes(&design).unwrap()).unwrap();
    assert!(restored.settings().randomize_order);
    assert!(!restored.settings().weighted);
    assert_eq!(restored.settings().tasks, 3);
}

#[test]
fn encoding_is_deterministic() {
    let design = sample_design();
    assert_eq!(
        design_to_bytes(&design).unwrap(),
        design_to_bytes(&design.clone()).unwrap()
    );
}

#[test]
fn truncated_stream_is_rejected() {
    let bytes = design_to_bytes(&sample_design()).unwrap();
    let err = design_from_bytes(&bytes[..bytes.len() - 1]).unwrap_err();
    assert!(matches!(err, SdtError::Serde(_)));
}

#[test]
fn trailing_record_is_rejected() {
    let mut bytes = design_to_bytes(&sample_design()).unwrap();
    codec()
        .serialize_into(&mut bytes, &"extra".to_string())
        .unwrap();
    let err = design_from_bytes(&bytes).unwrap_err();
    assert_eq!(err.info().code, "design-trailing-data");
}

fn encode_records(design: &Design, tasks: &str, profiles: &str) -> Vec<u8> {
    encode_records_with(design, &[], tasks, profiles)
}

fn encode_records_with(
    design: &Design,
    restrictions: &[Vec<(String, String)>],
    tasks: &str,
    profiles: &str,
) -> Vec<u8> {
    let attributes: Vec<String> = design.attributes().map(str::to_string).collect();
    let levels: BTreeMap<String, Vec<String>> = design
        .level_table()
        .iter()
        .map(|(name, levels)| (name.clone(), levels.clone()))
        .collect();
    let weights: BTreeMap<String, Vec<Ratio>> = design
        .weights()
        .iter()
        .map(|(name, weights)| (name.clone(), weights.clone()))
        .collect();
    let mut bytes = Vec::new();
    codec().serialize_into(&mut bytes, &attributes).unwrap();
    codec().serialize_into(&mut bytes, &levels).unwrap();
    codec()
        .serialize_into(&mut bytes, &restrictions.to_vec())
        .unwrap();
    codec()
        .serialize_into(&mut bytes, &Vec::<Vec<String>>::new())
        .unwrap();
    codec().serialize_into(&mut bytes, &weights).unwrap();
    codec().serialize_into(&mut bytes, &tasks.to_string()).unwrap();
    codec().serialize_into(&mut bytes, &profiles.to_string()).unwrap();
    bytes
}

#[test]
fn hand_encoded_records_load() {
    let design = sample_design();
    let restored = design_from_bytes(&encode_records(&design, "3", "4")).unwrap();
    assert_eq!(restored.settings().tasks, 3);
    assert!(restored.restrictions().is_empty());
}

#[test]
fn non_numeric_counts_are_rejected() {
    let design = sample_design();
    let err = design_from_bytes(&encode_records(&design, "five", "2")).unwrap_err();
    assert_eq!(err.info().code, "design-count");
    let err = design_from_bytes(&encode_records(&design, "5", "0")).unwrap_err();
    assert_eq!(err.info().code, "design-count");
}

#[test]
fn mismatched_level_keys_are_rejected() {
    let mut bytes = Vec::new();
    let attributes = vec!["Party".to_string()];
    let mut levels = BTreeMap::new();
    levels.insert("Age".to_string(), vec!["35".to_string()]);
    let restrictions: Vec<Vec<(String, String)>> = Vec::new();
    codec().serialize_into(&mut bytes, &attributes).unwrap();
    codec().serialize_into(&mut bytes, &levels).unwrap();
    codec()
        .serialize_into(&mut bytes, &restrictions.to_vec())
        .unwrap();
    codec()
        .serialize_into(&mut bytes, &Vec::<Vec<String>>::new())
        .unwrap();
    codec()
        .serialize_into(&mut bytes, &BTreeMap::<String, Vec<Ratio>>::new())
        .unwrap();
    codec().serialize_into(&mut bytes, &"5".to_string()).unwrap();
    codec().serialize_into(&mut bytes, &"2".to_string()).unwrap();
    let err = design_from_bytes(&bytes).unwrap_err();
    assert_eq!(err.info().code, "design-level-keys");
}

#[test]
fn missing_file_is_a_resource_error() {
    let dir = tempdir().expect("tempdir");
    let err = load_design(&dir.path().join("absent.sdt")).unwrap_err();
    assert!(matches!(err, SdtError::Resource(_)));
    assert_eq!(err.info().code, "design-read");
}

#[test]
fn restriction_naming_an_attribute_twice_is_rejected() {
    let design = sample_design();
    let restrictions = vec![vec![
        ("Party".to_string(), "Dem".to_string()),
        ("Party".to_string(), "Rep".to_string()),
    ]];
    let err = design_from_bytes(&encode_records_with(&design, &restrictions, "3", "4"))
        .unwrap_err();
    assert!(matches!(err, SdtError::Serde(_)));
    assert_eq!(err.info().code, "design-duplicate-restriction-attribute");
    assert_eq!(err.info().context["attribute"], "Party");
    assert_eq!(err.info().context["restriction"], "1");
}

#[test]
fn hand_encoded_restrictions_load_unchanged() {
    let design = sample_design();
    let restrictions = vec![vec![
        ("Age".to_string(), "75".to_string()),
        ("Party".to_string(), "Dem".to_string()),
    ]];
    let restored =
        design_from_bytes(&encode_records_with(&design, &restrictions, "3", "4")).unwrap();
    assert_eq!(restored.restrictions().len(), 1);
    assert_eq!(restored.restrictions()[0].pairs(), &restrictions[0][..]);
}
