use std::collections::BTreeMap;

use sdt_core::errors::SdtError;
use sdt_core::rng::RngHandle;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GeneratorConfig;
use crate::plan::GenerationPlan;
use crate::profile::{generate_respondent, RespondentDraw};

/// Observed draw counts for one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeFrequencies {
    /// Level name to number of profiles showing it.
    pub counts: BTreeMap<String, u64>,
    /// Level name to observed share of all profiles.
    pub shares: BTreeMap<String, f64>,
}

/// Aggregate statistics over a seeded batch of respondents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Master seed the respondent streams were derived from.
    pub seed: u64,
    /// Number of respondents simulated.
    pub respondents: u64,
    /// Total profiles generated.
    pub profiles: u64,
    /// Candidate profiles rejected by restrictions.
    pub rejected: u64,
    /// Per-attribute level frequencies, keyed by attribute name.
    pub attributes: BTreeMap<String, AttributeFrequencies>,
    /// How often each attribute appeared at each 1-based display position.
    pub positions: BTreeMap<String, BTreeMap<usize, u64>>,
}

/// Simulates `respondents` respondents, each on its own derived RNG stream.
///
/// The returned draws are only the first `keep` respondents, so large runs
/// stay cheap while still allowing inspection.
pub fn simulate(
    plan: &GenerationPlan,
    config: &GeneratorConfig,
    seed: u64,
    respondents: u64,
    keep: usize,
) -> Result<(SimulationReport, Vec<RespondentDraw>), SdtError> {
    let mut counts: BTreeMap<String, BTreeMap<String, u64>> = plan
        .attributes
        .iter()
        .map(|attribute| {
            (
                attribute.name.clone(),
                attribute
                    .levels
                    .iter()
                    .map(|level| (level.clone(), 0))
                    .collect(),
            )
        })
        .collect();
    let mut positions: BTreeMap<String, BTreeMap<usize, u64>> = BTreeMap::new();
    let mut profiles = 0u64;
    let mut rejected = 0u64;
    let mut kept = Vec::new();

    for respondent in 0..respondents {
        let mut rng = RngHandle::for_respondent(seed, respondent);
        let draw = generate_respondent(plan, config, &mut rng)?;
        rejected += draw.rejected;
        for (position, name) in draw.order.iter().enumerate() {
            *positions
                .entry(name.clone())
                .or_default()
                .entry(position + 1)
                .or_default() += 1;
        }
        for task in &draw.tasks {
            for profile in &task.profiles {
                profiles += 1;
                for (name, level) in draw.order.iter().zip(&profile.levels) {
                    if let Some(levels) = counts.get_mut(name) {
                        *levels.entry(level.clone()).or_default() += 1;
                    }
                }
            }
        }
        if kept.len() < keep {
            kept.push(draw);
        }
    }

    let attributes = counts
        .into_iter()
        .map(|(name, counts)| {
            let shares = counts
                .iter()
                .map(|(level, &count)| {
                    let share = if profiles == 0 {
                        0.0
                    } else {
                        count as f64 / profiles as f64
                    };
                    (level.clone(), share)
                })
                .collect();
            (name, AttributeFrequencies { counts, shares })
        })
        .collect();

    info!(respondents, profiles, rejected, "simulation complete");
    Ok((
        SimulationReport {
            seed,
            respondents,
            profiles,
            rejected,
            attributes,
            positions,
        },
        kept,
    ))
}
