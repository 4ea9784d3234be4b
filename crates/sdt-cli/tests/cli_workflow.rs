use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

fn sdt(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sdt"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run sdt")
}

fn sdt_ok(args: &[&str]) -> String {
    let output = sdt(args);
    assert!(
        output.status.success(),
        "sdt {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf8")
}

fn build_design(path: &Path) -> String {
    let design = path.to_str().unwrap().to_string();
    sdt_ok(&["new", &design]);
    sdt_ok(&["attribute", "add", &design, "Party"]);
    sdt_ok(&["attribute", "add", &design, "Age"]);
    for level in ["Dem", "Rep"] {
        sdt_ok(&["level", "add", &design, "Party", level]);
    }
    for level in ["35", "55", "75"] {
        sdt_ok(&["level", "add", &design, "Age", level]);
    }
    sdt_ok(&["settings", &design, "--tasks", "2", "--profiles", "2"]);
    design
}

#[test]
fn edit_show_and_export_round_trip() {
    let dir = tempdir().unwrap();
    let design = build_design(&dir.path().join("survey.sdt"));

    sdt_ok(&["restriction", "new", &design, "--pair", "Party=Rep", "--pair", "Age=35"]);
    sdt_ok(&["weights", "set", &design, "Age", "1/2", "0.25", ".25"]);

    let shown = sdt_ok(&["show", &design, "--format", "json"]);
    let value: Value = serde_json::from_str(&shown).unwrap();
    assert_eq!(value["tasks"], 2);
    assert_eq!(value["attributes"][1]["weights"][0], "1/2");
    assert_eq!(value["restrictions"][0][1][1], "35");

    let out_dir = dir.path().join("out");
    let report = sdt_ok(&[
        "export",
        "all",
        &design,
        out_dir.to_str().unwrap(),
        "--randomize-order",
        "false",
    ]);
    let report: Value = serde_json::from_str(&report).unwrap();
    assert_eq!(report["artifacts"].as_array().unwrap().len(), 4);

    let php = fs::read_to_string(out_dir.join("design.php")).unwrap();
    assert!(php.contains("$randomize = 0;"));
    assert!(php.contains("'Age' => array(0.5, 0.25, 0.25)"));
    let summary = fs::read_to_string(out_dir.join("design.dat")).unwrap();
    assert!(summary.ends_with("Restrictions\nParty:Rep;Age:35\n"));
    assert!(out_dir.join("design_task2.html").exists());
}

#[test]
fn failed_weight_commit_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("survey.sdt");
    let design = build_design(&path);
    let before = fs::read(&path).unwrap();

    let output = sdt(&["weights", "set", &design, "Age", "1/2", "1/2", "1/3"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Age"), "stderr: {stderr}");
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn export_with_empty_attribute_writes_nothing() {
    let dir = tempdir().unwrap();
    let design = build_design(&dir.path().join("survey.sdt"));
    sdt_ok(&["attribute", "add", &design, "Region"]);

    let out = dir.path().join("design.php");
    let output = sdt(&["export", "php", &design, out.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(!out.exists());
}

#[test]
fn simulate_is_seeded() {
    let dir = tempdir().unwrap();
    let design = build_design(&dir.path().join("survey.sdt"));
    let args = [
        "simulate",
        design.as_str(),
        "--respondents",
        "20",
        "--seed",
        "7",
        "--show",
        "1",
    ];
    let first: Value = serde_json::from_str(&sdt_ok(&args)).unwrap();
    let second: Value = serde_json::from_str(&sdt_ok(&args)).unwrap();
    assert_eq!(first, second);
    assert_eq!(first["summary"]["profiles"], 80);
    assert_eq!(first["respondents"].as_array().unwrap().len(), 1);
    assert_eq!(first["respondents"][0].as_object().unwrap().len(), 12);
}

#[test]
fn unseeded_simulate_reports_a_replayable_seed() {
    let dir = tempdir().unwrap();
    let design = build_design(&dir.path().join("survey.sdt"));
    let unseeded: Value =
        serde_json::from_str(&sdt_ok(&["simulate", design.as_str(), "--respondents", "10"]))
            .unwrap();
    let seed = unseeded["summary"]["seed"].as_u64().unwrap().to_string();
    let replayed: Value = serde_json::from_str(&sdt_ok(&[
        "simulate",
        design.as_str(),
        "--respondents",
        "10",
        "--seed",
        seed.as_str(),
    ]))
    .unwrap();
    assert_eq!(unseeded, replayed);
}

#[test]
fn config_file_sets_generation_flags() {
    let dir = tempdir().unwrap();
    let design = build_design(&dir.path().join("survey.sdt"));
    let config = dir.path().join("sdt.yaml");
    fs::write(
        &config,
        "generation:\n  weighted: true\n  max_attempts: 500\nlogging:\n  preset: verbose\n",
    )
    .unwrap();

    let out = dir.path().join("design.php");
    sdt_ok(&[
        "--config",
        config.to_str().unwrap(),
        "export",
        "php",
        &design,
        out.to_str().unwrap(),
    ]);
    let php = fs::read_to_string(out).unwrap();
    assert!(php.contains("$weighted = 1;"));
    assert!(php.contains("$max_attempts = 500;"));
}

#[test]
fn csv_import_replaces_design() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("attributes.csv");
    fs::write(&csv, "Party,Dem,Rep\nAge,35,55,75\n").unwrap();
    let design = dir.path().join("survey.sdt");
    let design = design.to_str().unwrap();

    sdt_ok(&["import-csv", csv.to_str().unwrap(), design]);
    let shown = sdt_ok(&["show", design]);
    assert!(shown.contains("  Party\n    Dem (1/2)\n    Rep (1/2)\n"));
    assert!(shown.contains("    75 (1/3)\n"));
    assert!(shown.contains("Tasks: 5\nProfiles: 2\n"));
}

#[test]
fn new_refuses_to_overwrite() {
    let dir = tempdir().unwrap();
    let design = build_design(&dir.path().join("survey.sdt"));
    assert!(!sdt(&["new", &design]).status.success());
    sdt_ok(&["new", &design, "--force"]);
    let shown = sdt_ok(&["show", &design, "--format", "yaml"]);
    assert!(shown.contains("attributes: []"));
}
