use std::error::Error;
use std::fs;
use std::path::Path;

use sdt_gen::GeneratorConfig;
use serde::{Deserialize, Serialize};

use crate::logging::LoggingPreset;

/// Optional YAML configuration passed with `--config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    #[serde(default)]
    pub generation: GenerationSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Generation flags; unset flags fall back to the design defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationSection {
    #[serde(default)]
    pub randomize_order: Option<bool>,
    #[serde(default)]
    pub weighted: Option<bool>,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_attempts() -> u64 {
    GeneratorConfig::default().max_attempts
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            randomize_order: None,
            weighted: None,
            max_attempts: default_max_attempts(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    #[serde(default)]
    pub preset: LoggingPreset,
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config {}: {err}", path.display()))?;
                Ok(serde_yaml::from_str(&text)?)
            }
            None => Ok(Self::default()),
        }
    }
}
