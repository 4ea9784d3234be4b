use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use sdt_export::{export, ExportReport, ExportRequest};

use super::{load, GenerationArgs};
use crate::config::CliConfig;

#[derive(Args, Debug)]
pub struct ExportTarget {
    /// Design file to export.
    pub design: PathBuf,
    /// Output path.
    pub out: PathBuf,
    #[command(flatten)]
    pub generation: GenerationArgs,
}

#[derive(Args, Debug)]
pub struct ExportAllArgs {
    /// Design file to export.
    pub design: PathBuf,
    /// Output directory, created when missing.
    pub out_dir: PathBuf,
    /// Base name of the written files.
    #[arg(long, default_value = "design")]
    pub stem: String,
    #[command(flatten)]
    pub generation: GenerationArgs,
}

#[derive(Subcommand, Debug)]
pub enum ExportCommand {
    /// PHP script generating profiles on each page view.
    Php(ExportTarget),
    /// Plain `.dat` summary of attributes, weights and restrictions.
    Summary(ExportTarget),
    /// One HTML question template per task, `<stem>_task<k>.html`.
    Templates(ExportTarget),
    /// All of the above into one directory.
    All(ExportAllArgs),
}

fn write_report(
    design: &Path,
    request: &ExportRequest,
    generation: &GenerationArgs,
    config: &CliConfig,
) -> Result<ExportReport, Box<dyn Error>> {
    let mut model = load(design)?;
    let generator = generation.apply(&mut model, config);
    Ok(export(&model, request, &generator)?)
}

pub fn run(command: ExportCommand, config: &CliConfig) -> Result<(), Box<dyn Error>> {
    let report = match command {
        ExportCommand::Php(target) => {
            let request = ExportRequest {
                php: Some(target.out),
                ..ExportRequest::default()
            };
            write_report(&target.design, &request, &target.generation, config)?
        }
        ExportCommand::Summary(target) => {
            let request = ExportRequest {
                summary: Some(target.out),
                ..ExportRequest::default()
            };
            write_report(&target.design, &request, &target.generation, config)?
        }
        ExportCommand::Templates(target) => {
            let request = ExportRequest {
                templates: Some(target.out),
                ..ExportRequest::default()
            };
            write_report(&target.design, &request, &target.generation, config)?
        }
        ExportCommand::All(args) => {
            fs::create_dir_all(&args.out_dir)?;
            let request = ExportRequest {
                php: Some(args.out_dir.join(format!("{}.php", args.stem))),
                summary: Some(args.out_dir.join(format!("{}.dat", args.stem))),
                templates: Some(args.out_dir.join(format!("{}.html", args.stem))),
            };
            write_report(&args.design, &request, &args.generation, config)?
        }
    };
    println!("{}", report.to_json()?);
    Ok(())
}
