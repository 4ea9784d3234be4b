use std::fs;

use sdt_design::{Design, DesignDocument};
use sdt_export::{export, ArtifactKind, ExportRequest};
use sdt_gen::GeneratorConfig;
use sha2::{Digest, Sha256};
use tempfile::tempdir;

fn sample_design() -> Design {
    DesignDocument::from_yaml(
        r#"
attributes:
  - name: Party
    levels: [Dem, Rep]
  - name: Age
    levels: ["35", "55", "75"]
restrictions:
  - [[Party, Rep], [Age, "35"]]
tasks: 3
profiles: 2
"#,
    )
    .unwrap()
    .to_design()
    .unwrap()
}

#[test]
fn export_writes_every_artifact_with_digests() {
    let dir = tempdir().unwrap();
    let request = ExportRequest {
        php: Some(dir.path().join("design.php")),
        summary: Some(dir.path().join("design.dat")),
        templates: Some(dir.path().join("question.html")),
    };
    let report = export(&sample_design(), &request, &GeneratorConfig::default()).unwrap();

    assert_eq!(report.artifacts.len(), 5);
    assert_eq!(report.artifacts[0].kind, ArtifactKind::Php);
    assert_eq!(report.artifacts[1].kind, ArtifactKind::Summary);
    assert_eq!(report.artifacts[4].kind, ArtifactKind::Template { task: 3 });
    assert!(dir.path().join("question_task3.html").exists());

    for artifact in &report.artifacts {
        let bytes = fs::read(&artifact.path).unwrap();
        assert_eq!(artifact.bytes, bytes.len() as u64);
        assert_eq!(artifact.sha256, format!("{:x}", Sha256::digest(&bytes)));
    }

    let json = report.to_json().unwrap();
    assert!(json.contains("\"kind\": \"template\""));
    assert!(json.contains("\"task\": 3"));
}

#[test]
fn repeated_exports_are_byte_identical() {
    let dir = tempdir().unwrap();
    let request = ExportRequest {
        php: Some(dir.path().join("design.php")),
        summary: Some(dir.path().join("design.dat")),
        templates: None,
    };
    let design = sample_design();
    let config = GeneratorConfig::default();

    let first = export(&design, &request, &config).unwrap();
    let php_first = fs::read(dir.path().join("design.php")).unwrap();
    let second = export(&design, &request, &config).unwrap();
    let php_second = fs::read(dir.path().join("design.php")).unwrap();

    assert_eq!(php_first, php_second);
    assert_eq!(first, second);
    assert_eq!(first.digest().unwrap(), second.digest().unwrap());
}

#[test]
fn empty_attribute_aborts_before_any_write() {
    let dir = tempdir().unwrap();
    let mut design = sample_design();
    design.add_attribute("Region").unwrap();
    let request = ExportRequest {
        php: Some(dir.path().join("design.php")),
        summary: Some(dir.path().join("design.dat")),
        templates: Some(dir.path().join("question.html")),
    };

    let err = export(&design, &request, &GeneratorConfig::default()).unwrap_err();
    assert_eq!(err.info().code, "empty-attributes");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn bad_extension_aborts_before_any_write() {
    let dir = tempdir().unwrap();
    let request = ExportRequest {
        php: Some(dir.path().join("design.dat")),
        summary: Some(dir.path().join("design.dat")),
        templates: None,
    };
    let err = export(&sample_design(), &request, &GeneratorConfig::default()).unwrap_err();
    assert_eq!(err.info().code, "invalid-extension");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn unwritable_destination_is_a_resource_error() {
    let dir = tempdir().unwrap();
    let request = ExportRequest {
        php: None,
        summary: Some(dir.path().join("missing").join("design.dat")),
        templates: None,
    };
    let err = export(&sample_design(), &request, &GeneratorConfig::default()).unwrap_err();
    assert_eq!(err.info().code, "artifact-write");
}
