use std::error::Error;
use std::path::PathBuf;

use clap::Subcommand;

use super::edit;

#[derive(Subcommand, Debug)]
pub enum AttributeCommand {
    /// Append a new attribute without levels.
    Add { design: PathBuf, name: String },
    /// Rename an attribute, updating restrictions and constraints.
    Rename {
        design: PathBuf,
        old: String,
        new: String,
    },
    /// Remove an attribute and every restriction that mentions it.
    Remove { design: PathBuf, name: String },
}

pub fn run(command: AttributeCommand) -> Result<(), Box<dyn Error>> {
    match command {
        AttributeCommand::Add { design, name } => {
            edit(&design, |model| model.add_attribute(&name))?;
            println!("added attribute {name}");
        }
        AttributeCommand::Rename { design, old, new } => {
            edit(&design, |model| model.rename_attribute(&old, &new))?;
            println!("renamed attribute {old} to {new}");
        }
        AttributeCommand::Remove { design, name } => {
            edit(&design, |model| model.remove_attribute(&name))?;
            println!("removed attribute {name}");
        }
    }
    Ok(())
}
