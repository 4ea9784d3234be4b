use std::error::Error;
use std::path::PathBuf;

use clap::Subcommand;

use super::{edit, load, position, save};

#[derive(Subcommand, Debug)]
pub enum RestrictionCommand {
    /// Create a restriction from `attribute=level` pairs.
    New {
        design: PathBuf,
        /// Forbidden combination member, e.g. `Party=Dem`.
        #[arg(long = "pair", value_name = "ATTRIBUTE=LEVEL", required = true)]
        pairs: Vec<String>,
    },
    /// Set the level of one attribute inside restriction NUMBER.
    Set {
        design: PathBuf,
        number: usize,
        attribute: String,
        level: String,
    },
    /// Delete restriction NUMBER.
    Remove { design: PathBuf, number: usize },
}

fn split_pair(text: &str) -> Result<(&str, &str), Box<dyn Error>> {
    text.split_once('=')
        .ok_or_else(|| format!("expected ATTRIBUTE=LEVEL, got {text:?}").into())
}

pub fn run(command: RestrictionCommand) -> Result<(), Box<dyn Error>> {
    match command {
        RestrictionCommand::New { design, pairs } => {
            let parsed = pairs
                .iter()
                .map(|pair| split_pair(pair))
                .collect::<Result<Vec<_>, _>>()?;
            let mut model = load(&design)?;
            let index = model.new_restriction();
            for (attribute, level) in parsed {
                model.set_restriction_level(index, attribute, level)?;
            }
            save(&model, &design)?;
            println!("created restriction {}", index + 1);
        }
        RestrictionCommand::Set {
            design,
            number,
            attribute,
            level,
        } => {
            let index = position(number, "restriction")?;
            edit(&design, |model| {
                model.set_restriction_level(index, &attribute, &level)
            })?;
            println!("restriction {number}: {attribute}={level}");
        }
        RestrictionCommand::Remove { design, number } => {
            let index = position(number, "restriction")?;
            edit(&design, |model| model.remove_restriction(index).map(|_| ()))?;
            println!("removed restriction {number}");
        }
    }
    Ok(())
}
