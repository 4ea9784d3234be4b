use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::{
    attribute::{self, AttributeCommand},
    constraint::{self, ConstraintCommand},
    design::{self, ImportCsvArgs, NewArgs, ShowArgs},
    export::{self, ExportCommand},
    level::{self, LevelCommand},
    restriction::{self, RestrictionCommand},
    settings::{self, SettingsArgs},
    simulate::{self, SimulateArgs},
    version::{self, VersionArgs},
    weights::{self, WeightsCommand},
};
use config::CliConfig;
use logging::LoggingPreset;

mod commands;
mod config;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "sdt", about = "Conjoint survey design tool")]
struct Cli {
    /// YAML configuration with `generation` and `logging` sections.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Logging preset; overrides the config file. `RUST_LOG` overrides both.
    #[arg(long, global = true, value_enum)]
    log: Option<LoggingPreset>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty design file.
    New(NewArgs),
    /// Replace a design with one attribute per CSV row.
    ImportCsv(ImportCsvArgs),
    /// Print a design.
    Show(ShowArgs),
    /// Add, rename or remove attributes.
    #[command(subcommand)]
    Attribute(AttributeCommand),
    /// Add, rename or remove levels.
    #[command(subcommand)]
    Level(LevelCommand),
    /// Manage forbidden level combinations.
    #[command(subcommand)]
    Restriction(RestrictionCommand),
    /// Manage attribute order blocks.
    #[command(subcommand)]
    Constraint(ConstraintCommand),
    /// Set task and profile counts.
    Settings(SettingsArgs),
    /// Inspect and edit randomization weights.
    #[command(subcommand)]
    Weights(WeightsCommand),
    /// Write the PHP generator, summary or question templates.
    #[command(subcommand)]
    Export(ExportCommand),
    /// Generate many respondents locally and summarize level frequencies.
    Simulate(SimulateArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;
    logging::init(cli.log.unwrap_or(config.logging.preset));

    match cli.command {
        Command::New(args) => design::new(&args),
        Command::ImportCsv(args) => design::import_csv(&args),
        Command::Show(args) => design::show(&args),
        Command::Attribute(command) => attribute::run(command),
        Command::Level(command) => level::run(command),
        Command::Restriction(command) => restriction::run(command),
        Command::Constraint(command) => constraint::run(command),
        Command::Settings(args) => settings::run(&args),
        Command::Weights(command) => weights::run(command),
        Command::Export(command) => export::run(command, &config),
        Command::Simulate(args) => simulate::run(&args, &config),
        Command::Version(args) => version::run(&args),
    }
}
