use rand::RngCore;
use sdt_core::rng::RngHandle;
use serde::{Deserialize, Serialize};

/// Tuning knobs for profile generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Draws allowed per profile before the restrictions are declared
    /// unsatisfiable.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u64,
    /// Master seed; `None` picks a fresh one from operating system entropy
    /// (see [`GeneratorConfig::master_seed`]).
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_attempts() -> u64 {
    100_000
}

impl GeneratorConfig {
    /// Seed to run with: the configured one, otherwise a fresh seed drawn
    /// from operating system entropy. Callers report it so the run replays.
    pub fn master_seed(&self) -> u64 {
        self.seed
            .unwrap_or_else(|| RngHandle::from_entropy().next_u64())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            seed: None,
        }
    }
}
