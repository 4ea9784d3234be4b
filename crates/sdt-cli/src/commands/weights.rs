use std::error::Error;
use std::path::PathBuf;

use clap::Subcommand;
use sdt_design::WeightSum;

use super::{edit, load};

#[derive(Subcommand, Debug)]
pub enum WeightsCommand {
    /// Print committed weights and their exact sums.
    Show { design: PathBuf },
    /// Replace every weight of one attribute, e.g. `1/2 0.25 .25`.
    Set {
        design: PathBuf,
        attribute: String,
        #[arg(required = true, allow_hyphen_values = true)]
        weights: Vec<String>,
    },
    /// Reset every attribute to uniform weights.
    Reset { design: PathBuf },
}

pub fn run(command: WeightsCommand) -> Result<(), Box<dyn Error>> {
    match command {
        WeightsCommand::Show { design } => {
            let model = load(&design)?;
            let editor = model.weight_editor();
            for (name, weights) in model.weights() {
                let shown: Vec<String> = weights.iter().map(|w| w.display_compact()).collect();
                let sum = match editor.sum(name) {
                    Some(WeightSum::Exact(total)) => total.display_compact(),
                    Some(WeightSum::Overflow) | None => "overflow".to_string(),
                };
                println!("{name}: {} (sum {sum})", shown.join(", "));
            }
        }
        WeightsCommand::Set {
            design,
            attribute,
            weights,
        } => {
            edit(&design, |model| {
                let mut editor = model.weight_editor();
                editor.set_weights(&attribute, weights.as_slice())?;
                model.commit_weights(&editor)
            })?;
            println!("updated weights of {attribute}");
        }
        WeightsCommand::Reset { design } => {
            edit(&design, |model| {
                let mut editor = model.weight_editor();
                editor.reset_uniform();
                model.commit_weights(&editor)
            })?;
            println!("weights reset to uniform");
        }
    }
    Ok(())
}
