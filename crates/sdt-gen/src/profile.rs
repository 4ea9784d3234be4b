use rand::{Rng, RngCore};
use sdt_core::errors::{ErrorInfo, SdtError};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::GeneratorConfig;
use crate::draw::{uniform_index, weighted_index};
use crate::order::resolve_order;
use crate::plan::GenerationPlan;

/// One drawn profile; `levels[i]` belongs to the i-th attribute of the
/// respondent's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Chosen levels in display order.
    pub levels: Vec<String>,
}

/// Profiles shown side by side in one choice task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraw {
    /// Profiles in display order.
    pub profiles: Vec<Profile>,
}

/// Everything one respondent sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentDraw {
    /// Attribute order shared by every task.
    pub order: Vec<String>,
    /// Tasks in display order.
    pub tasks: Vec<TaskDraw>,
    /// Candidate profiles discarded because they matched a restriction.
    pub rejected: u64,
}

fn draw_level<R: RngCore>(probabilities: &[f64], weighted: bool, rng: &mut R) -> usize {
    if weighted {
        weighted_index(probabilities, rng.gen::<f64>())
    } else {
        uniform_index(probabilities.len(), rng)
    }
}

/// Generates the full set of tasks for one respondent.
///
/// Each profile is redrawn until it matches no restriction. After
/// `config.max_attempts` rejected draws the design is reported as
/// over-constrained instead of looping forever.
pub fn generate_respondent<R: RngCore>(
    plan: &GenerationPlan,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<RespondentDraw, SdtError> {
    if config.max_attempts == 0 {
        return Err(SdtError::validation(
            "invalid-max-attempts",
            "max_attempts must be at least 1",
        ));
    }

    let names = plan.attribute_names();
    let order = resolve_order(&names, &plan.constraints, plan.randomize_order, rng);
    let display: Vec<usize> = order
        .iter()
        .filter_map(|name| names.iter().position(|candidate| candidate == name))
        .collect();
    trace!(order = ?order, "attribute order resolved");

    let mut rejected = 0u64;
    let mut tasks = Vec::with_capacity(plan.tasks);
    for task in 1..=plan.tasks {
        let mut profiles = Vec::with_capacity(plan.profiles);
        for profile in 1..=plan.profiles {
            let mut attempts = 0u64;
            let chosen = loop {
                if attempts == config.max_attempts {
                    return Err(SdtError::Generation(
                        ErrorInfo::new(
                            "restrictions-unsatisfiable",
                            "no profile satisfying the restrictions was found",
                        )
                        .with_context("task", task.to_string())
                        .with_context("profile", profile.to_string())
                        .with_context("attempts", attempts.to_string())
                        .with_hint("remove or loosen restrictions"),
                    ));
                }
                attempts += 1;

                let mut candidate: Vec<&str> = vec![""; plan.attributes.len()];
                for &index in &display {
                    let attribute = &plan.attributes[index];
                    let level = draw_level(&attribute.probabilities, plan.weighted, rng);
                    candidate[index] = attribute.levels[level].as_str();
                }
                let forbidden = plan.is_forbidden(|name| {
                    names
                        .iter()
                        .position(|candidate_name| *candidate_name == name)
                        .map(|index| candidate[index])
                });
                if forbidden {
                    rejected += 1;
                    continue;
                }
                break candidate;
            };
            profiles.push(Profile {
                levels: display
                    .iter()
                    .map(|&index| chosen[index].to_string())
                    .collect(),
            });
        }
        tasks.push(TaskDraw { profiles });
    }
    debug!(tasks = tasks.len(), rejected, "respondent generated");

    Ok(RespondentDraw {
        order,
        tasks,
        rejected,
    })
}
