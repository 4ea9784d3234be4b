use criterion::{criterion_group, criterion_main, Criterion};
use sdt_core::rng::RngHandle;
use sdt_design::DesignDocument;
use sdt_gen::{generate_respondent, GenerationPlan, GeneratorConfig};

fn sample_plan() -> GenerationPlan {
    let design = DesignDocument::from_yaml(
        r#"
attributes:
  - name: Party
    levels: [Dem, Rep, Ind]
  - name: Age
    levels: ["35", "55", "75"]
  - name: Job
    levels: [Doctor, Farmer, Lawyer, Nurse]
  - name: Region
    levels: [North, South]
restrictions:
  - [[Party, Ind], [Age, "75"]]
  - [[Job, Lawyer], [Region, North]]
constraints:
  - [Age, Job]
tasks: 10
profiles: 2
weighted: false
"#,
    )
    .unwrap()
    .to_design()
    .unwrap();
    GenerationPlan::from_design(&design).unwrap()
}

fn bench_respondent(c: &mut Criterion) {
    let plan = sample_plan();
    let config = GeneratorConfig::default();
    let mut rng = RngHandle::from_seed(42);

    c.bench_function("generate_respondent", |b| {
        b.iter(|| {
            let _ = generate_respondent(&plan, &config, &mut rng).unwrap();
        })
    });
}

criterion_group!(benches, bench_respondent);
criterion_main!(benches);
