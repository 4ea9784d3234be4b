use std::error::Error;
use std::path::PathBuf;

use clap::Subcommand;

use super::edit;

#[derive(Subcommand, Debug)]
pub enum LevelCommand {
    /// Append a level to an attribute. Resets weights to uniform.
    Add {
        design: PathBuf,
        attribute: String,
        level: String,
    },
    /// Rename a level, updating restrictions. Resets weights to uniform.
    Rename {
        design: PathBuf,
        attribute: String,
        old: String,
        new: String,
    },
    /// Remove a level and every restriction that forbids it.
    Remove {
        design: PathBuf,
        attribute: String,
        level: String,
    },
}

pub fn run(command: LevelCommand) -> Result<(), Box<dyn Error>> {
    match command {
        LevelCommand::Add {
            design,
            attribute,
            level,
        } => {
            edit(&design, |model| model.add_level(&attribute, &level))?;
            println!("added level {level} to {attribute}");
        }
        LevelCommand::Rename {
            design,
            attribute,
            old,
            new,
        } => {
            edit(&design, |model| model.rename_level(&attribute, &old, &new))?;
            println!("renamed level {old} of {attribute} to {new}");
        }
        LevelCommand::Remove {
            design,
            attribute,
            level,
        } => {
            edit(&design, |model| model.remove_level(&attribute, &level))?;
            println!("removed level {level} from {attribute}");
        }
    }
    Ok(())
}
