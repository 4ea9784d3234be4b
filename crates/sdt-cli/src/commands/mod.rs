use std::error::Error;
use std::path::Path;

use clap::Args;
use sdt_core::errors::SdtError;
use sdt_design::{load_design, save_design, Design};
use sdt_gen::GeneratorConfig;
use tracing::debug;

use crate::config::CliConfig;

pub mod attribute;
pub mod constraint;
pub mod design;
pub mod export;
pub mod level;
pub mod restriction;
pub mod settings;
pub mod simulate;
pub mod version;
pub mod weights;

/// Generation flags that are not stored in the design file.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerationArgs {
    /// Shuffle attribute order per respondent (default: on).
    #[arg(long)]
    pub randomize_order: Option<bool>,
    /// Draw levels from the committed weights (default: off).
    #[arg(long)]
    pub weighted: Option<bool>,
    /// Rejected draws allowed per profile before giving up.
    #[arg(long)]
    pub max_attempts: Option<u64>,
}

impl GenerationArgs {
    /// Applies flags to `design`: command line first, then config file.
    pub fn apply(&self, design: &mut Design, config: &CliConfig) -> GeneratorConfig {
        if let Some(enabled) = self.randomize_order.or(config.generation.randomize_order) {
            design.set_randomize_order(enabled);
        }
        if let Some(enabled) = self.weighted.or(config.generation.weighted) {
            design.set_weighted(enabled);
        }
        GeneratorConfig {
            max_attempts: self.max_attempts.unwrap_or(config.generation.max_attempts),
            seed: config.generation.seed,
        }
    }
}

pub fn load(path: &Path) -> Result<Design, Box<dyn Error>> {
    let design = load_design(path)?;
    debug!(path = %path.display(), attributes = design.attribute_count(), "design loaded");
    Ok(design)
}

pub fn save(design: &Design, path: &Path) -> Result<(), Box<dyn Error>> {
    save_design(design, path)?;
    debug!(path = %path.display(), "design saved");
    Ok(())
}

/// Loads, edits and saves a design in one step.
pub fn edit<F>(path: &Path, change: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut Design) -> Result<(), SdtError>,
{
    let mut design = load(path)?;
    change(&mut design)?;
    save(&design, path)
}

/// Converts a 1-based position from the command line.
pub fn position(value: usize, kind: &str) -> Result<usize, Box<dyn Error>> {
    value
        .checked_sub(1)
        .ok_or_else(|| format!("{kind} numbers start at 1").into())
}
