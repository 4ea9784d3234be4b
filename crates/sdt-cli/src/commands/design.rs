use std::error::Error;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use sdt_design::{import_csv as read_csv, Design, DesignDocument};

use super::{load, save};

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Design file to create.
    pub design: PathBuf,
    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ImportCsvArgs {
    /// CSV file, one attribute per row: name followed by its levels.
    pub csv: PathBuf,
    /// Design file to write.
    pub design: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ShowFormat {
    #[default]
    Text,
    Yaml,
    Json,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Design file to print.
    pub design: PathBuf,
    #[arg(long, value_enum, default_value_t = ShowFormat::Text)]
    pub format: ShowFormat,
}

pub fn new(args: &NewArgs) -> Result<(), Box<dyn Error>> {
    if args.design.exists() && !args.force {
        return Err(format!(
            "{} already exists; pass --force to overwrite",
            args.design.display()
        )
        .into());
    }
    save(&Design::new(), &args.design)?;
    println!("created {}", args.design.display());
    Ok(())
}

pub fn import_csv(args: &ImportCsvArgs) -> Result<(), Box<dyn Error>> {
    let design = read_csv(&args.csv)?;
    save(&design, &args.design)?;
    println!(
        "imported {} attributes into {}",
        design.attribute_count(),
        args.design.display()
    );
    Ok(())
}

pub fn show(args: &ShowArgs) -> Result<(), Box<dyn Error>> {
    let design = load(&args.design)?;
    match args.format {
        ShowFormat::Text => print!("{}", render_text(&design)),
        ShowFormat::Yaml => print!("{}", DesignDocument::from_design(&design).to_yaml()?),
        ShowFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&DesignDocument::from_design(&design))?
        ),
    }
    Ok(())
}

fn render_text(design: &Design) -> String {
    let mut out = String::new();
    out.push_str("Attributes\n");
    for (name, levels) in design.level_table() {
        let weights = design
            .weights()
            .get(name)
            .map(|weights| {
                weights
                    .iter()
                    .map(|weight| weight.display_compact())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        out.push_str(&format!("  {name}\n"));
        for (index, level) in levels.iter().enumerate() {
            let weight = weights.get(index).map(String::as_str).unwrap_or("-");
            out.push_str(&format!("    {level} ({weight})\n"));
        }
    }
    out.push_str("Restrictions\n");
    for (index, restriction) in design.restrictions().iter().enumerate() {
        let pairs: Vec<String> = restriction
            .pairs()
            .iter()
            .map(|(attribute, level)| format!("{attribute}={level}"))
            .collect();
        out.push_str(&format!("  {}: {}\n", index + 1, pairs.join(", ")));
    }
    out.push_str("Constraints\n");
    for (index, group) in design.constraints().iter().enumerate() {
        out.push_str(&format!("  {}: {}\n", index + 1, group.members().join(" > ")));
    }
    let settings = design.settings();
    out.push_str(&format!(
        "Tasks: {}\nProfiles: {}\n",
        settings.tasks, settings.profiles
    ));
    out
}
