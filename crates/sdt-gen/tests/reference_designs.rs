use std::collections::BTreeMap;

use indexmap::IndexMap;
use sdt_core::rng::RngHandle;
use sdt_design::DesignDocument;
use sdt_gen::{generate_respondent, weighted_randomize, GenerationPlan, GeneratorConfig};

const REFERENCE: &str = include_str!("../../../fixtures/reference_designs.yaml");

fn reference_plan(name: &str) -> GenerationPlan {
    let documents: BTreeMap<String, DesignDocument> =
        serde_yaml::from_str(REFERENCE).expect("reference designs parse");
    let design = documents
        .get(name)
        .unwrap_or_else(|| panic!("missing reference design {name}"))
        .to_design()
        .expect("reference design is valid");
    GenerationPlan::from_design(&design).unwrap()
}

#[test]
fn party_age_emits_eight_levels_and_four_names() {
    let plan = reference_plan("party_age");
    let mut rng = RngHandle::from_seed(7);
    let draw = generate_respondent(&plan, &GeneratorConfig::default(), &mut rng).unwrap();
    let placeholders = draw.to_placeholders();

    let names: Vec<_> = placeholders
        .keys()
        .filter(|key| key.matches('-').count() == 2)
        .collect();
    let levels: Vec<_> = placeholders
        .keys()
        .filter(|key| key.matches('-').count() == 3)
        .collect();
    assert_eq!(names.len(), 4);
    assert_eq!(levels.len(), 8);

    assert_eq!(placeholders["F-1-1"], "Party");
    assert_eq!(placeholders["F-2-2"], "Age");
    for task in 1..=2 {
        for profile in 1..=2 {
            let party = &placeholders[&format!("F-{task}-{profile}-1")];
            let age = &placeholders[&format!("F-{task}-{profile}-2")];
            assert!(["Dem", "Rep"].contains(&party.as_str()));
            assert!(["35", "55", "75"].contains(&age.as_str()));
        }
    }
}

#[test]
fn zero_weight_level_is_never_drawn() {
    let plan = reference_plan("forced_second_level");
    let config = GeneratorConfig::default();
    let mut rng = RngHandle::from_seed(11);
    for _ in 0..1000 {
        let draw = generate_respondent(&plan, &config, &mut rng).unwrap();
        assert_eq!(draw.tasks[0].profiles[0].levels, vec!["Rep".to_string()]);
    }

    let mut table = IndexMap::new();
    table.insert("Party".to_string(), plan.attributes[0].probabilities.clone());
    for _ in 0..1000 {
        assert_eq!(weighted_randomize(&table, "Party", &mut rng), Some(2));
    }
}

#[test]
fn restricted_combination_never_appears() {
    let plan = reference_plan("restricted");
    let config = GeneratorConfig::default();
    for seed in 0..200 {
        let mut rng = RngHandle::from_seed(seed);
        let draw = generate_respondent(&plan, &config, &mut rng).unwrap();
        for task in &draw.tasks {
            for profile in &task.profiles {
                assert_ne!(profile.levels, vec!["Dem".to_string(), "75".to_string()]);
            }
        }
    }
}

#[test]
fn over_constrained_design_hits_attempt_bound() {
    let plan = reference_plan("over_constrained");
    let config = GeneratorConfig {
        max_attempts: 50,
        seed: None,
    };
    let mut rng = RngHandle::from_seed(3);
    let err = generate_respondent(&plan, &config, &mut rng).unwrap_err();
    let info = err.info();
    assert_eq!(info.code, "restrictions-unsatisfiable");
    assert_eq!(info.context["task"], "1");
    assert_eq!(info.context["profile"], "1");
    assert_eq!(info.context["attempts"], "50");
}

#[test]
fn grouped_attributes_stay_adjacent() {
    let plan = reference_plan("grouped_order");
    let config = GeneratorConfig::default();
    let mut first_positions = std::collections::BTreeSet::new();
    for seed in 0..300 {
        let mut rng = RngHandle::from_seed(seed);
        let draw = generate_respondent(&plan, &config, &mut rng).unwrap();
        let b = draw.order.iter().position(|name| name == "B").unwrap();
        assert_eq!(draw.order[b + 1], "D");
        assert_eq!(draw.order.len(), 5);
        first_positions.insert(draw.order[0].clone());

        let placeholders = draw.to_placeholders();
        for task in 1..=3 {
            for position in 1..=5 {
                assert_eq!(
                    placeholders[&format!("F-{task}-{position}")],
                    draw.order[position - 1]
                );
            }
        }
    }
    assert!(!first_positions.contains("D"));
    assert!(first_positions.len() >= 3);
}

#[test]
fn quoted_names_survive_json_output() {
    let plan = reference_plan("quoted_names");
    let mut rng = RngHandle::from_seed(5);
    let draw = generate_respondent(&plan, &GeneratorConfig::default(), &mut rng).unwrap();
    let json = draw.to_json().unwrap();
    let parsed: BTreeMap<String, String> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["F-1-1"], "Candidate's party");
    assert!(["It's \"Dem\"", "Back\\slash"].contains(&parsed["F-1-1-1"].as_str()));
}
