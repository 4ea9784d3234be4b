use std::error::Error;
use std::path::PathBuf;

use clap::Args;

use super::{load, save};

#[derive(Args, Debug)]
pub struct SettingsArgs {
    pub design: PathBuf,
    /// Choice tasks per respondent.
    #[arg(long)]
    pub tasks: Option<usize>,
    /// Profiles per task.
    #[arg(long)]
    pub profiles: Option<usize>,
}

pub fn run(args: &SettingsArgs) -> Result<(), Box<dyn Error>> {
    let mut design = load(&args.design)?;
    if let Some(tasks) = args.tasks {
        design.set_tasks(tasks)?;
    }
    if let Some(profiles) = args.profiles {
        design.set_profiles(profiles)?;
    }
    if args.tasks.is_some() || args.profiles.is_some() {
        save(&design, &args.design)?;
    }
    let settings = design.settings();
    println!("tasks: {}", settings.tasks);
    println!("profiles: {}", settings.profiles);
    Ok(())
}
