use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use sdt_gen::{simulate, GenerationPlan, PlaceholderMap, SimulationReport};
use serde::Serialize;

use super::{load, GenerationArgs};
use crate::config::CliConfig;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Design file to simulate.
    pub design: PathBuf,
    /// Number of respondents to generate.
    #[arg(long, default_value_t = 1000)]
    pub respondents: u64,
    /// Master seed; overrides the config file. Unset seeds come from
    /// operating system entropy and are reported in the summary.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Include the placeholder maps of the first N respondents.
    #[arg(long, default_value_t = 0)]
    pub show: usize,
    #[command(flatten)]
    pub generation: GenerationArgs,
}

#[derive(Debug, Serialize)]
struct SimulationOutput {
    summary: SimulationReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    respondents: Vec<PlaceholderMap>,
}

pub fn run(args: &SimulateArgs, config: &CliConfig) -> Result<(), Box<dyn Error>> {
    let mut design = load(&args.design)?;
    let generator = args.generation.apply(&mut design, config);
    let plan = GenerationPlan::from_design(&design)?;
    let seed = args.seed.unwrap_or_else(|| generator.master_seed());

    let (summary, draws) = simulate(&plan, &generator, seed, args.respondents, args.show)?;
    let output = SimulationOutput {
        summary,
        respondents: draws.iter().map(|draw| draw.to_placeholders()).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
