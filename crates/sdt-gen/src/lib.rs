#![deny(missing_docs)]

//! Randomized conjoint profile generation.
//!
//! A [`GenerationPlan`] is the frozen, validated view of a design that both
//! the in-process generator and the exported web script consume. Attribute
//! order is resolved once per respondent; every task then draws its profiles
//! by rejection sampling against the restrictions.

/// Generator configuration (attempt bound and seed).
pub mod config;
/// Level draws: uniform and cumulative-weight selection.
pub mod draw;
/// Attribute order resolution with order-constraint blocks.
pub mod order;
/// Placeholder naming and respondent output maps.
pub mod output;
/// Validated generation input derived from a design.
pub mod plan;
/// Task and profile generation with bounded rejection sampling.
pub mod profile;
/// Many-respondent simulation with level frequency summaries.
pub mod simulate;

pub use config::GeneratorConfig;
pub use draw::{cutpoints, uniform_index, weighted_index, weighted_randomize};
pub use order::resolve_order;
pub use output::{attribute_key, level_key, PlaceholderMap};
pub use plan::{AttributePlan, GenerationPlan};
pub use profile::{generate_respondent, Profile, RespondentDraw, TaskDraw};
pub use simulate::{simulate, AttributeFrequencies, SimulationReport};
