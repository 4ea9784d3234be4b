use std::error::Error;
use std::path::PathBuf;

use clap::Subcommand;

use super::{edit, load, position, save};

#[derive(Subcommand, Debug)]
pub enum ConstraintCommand {
    /// Create an order block; the first member anchors it.
    New {
        design: PathBuf,
        members: Vec<String>,
    },
    /// Append an attribute to block NUMBER.
    Add {
        design: PathBuf,
        number: usize,
        attribute: String,
    },
    /// Delete block NUMBER.
    Remove { design: PathBuf, number: usize },
}

pub fn run(command: ConstraintCommand) -> Result<(), Box<dyn Error>> {
    match command {
        ConstraintCommand::New { design, members } => {
            let mut model = load(&design)?;
            let index = model.new_constraint();
            for member in &members {
                model.add_to_constraint(index, member)?;
            }
            save(&model, &design)?;
            println!("created constraint {}", index + 1);
        }
        ConstraintCommand::Add {
            design,
            number,
            attribute,
        } => {
            let index = position(number, "constraint")?;
            edit(&design, |model| model.add_to_constraint(index, &attribute))?;
            println!("added {attribute} to constraint {number}");
        }
        ConstraintCommand::Remove { design, number } => {
            let index = position(number, "constraint")?;
            edit(&design, |model| model.remove_constraint(index).map(|_| ()))?;
            println!("removed constraint {number}");
        }
    }
    Ok(())
}
