use sdt_core::errors::{ErrorInfo, SdtError};
use sdt_design::Design;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One attribute as the generator sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributePlan {
    /// Attribute name.
    pub name: String,
    /// Levels in declaration order.
    pub levels: Vec<String>,
    /// Committed weights as floating-point probabilities, aligned with `levels`.
    pub probabilities: Vec<f64>,
}

/// Frozen generation input.
///
/// Built only from designs whose attributes all have levels and whose
/// restrictions and constraints reference existing names. Empty restrictions
/// and empty constraint groups are dropped: an empty restriction matches
/// every profile and could never be satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationPlan {
    /// Attributes in declaration order.
    pub attributes: Vec<AttributePlan>,
    /// Forbidden level combinations as `(attribute, level)` pairs.
    pub restrictions: Vec<Vec<(String, String)>>,
    /// Order-constraint blocks; the first member anchors the block.
    pub constraints: Vec<Vec<String>>,
    /// Choice tasks per respondent.
    pub tasks: usize,
    /// Profiles per task.
    pub profiles: usize,
    /// Shuffle attribute order per respondent.
    pub randomize_order: bool,
    /// Draw levels from `probabilities` instead of uniformly.
    pub weighted: bool,
}

impl GenerationPlan {
    /// Validates `design` and freezes it for generation or export.
    pub fn from_design(design: &Design) -> Result<Self, SdtError> {
        let empty = design.empty_attributes();
        if !empty.is_empty() {
            return Err(SdtError::Generation(
                ErrorInfo::new(
                    "empty-attributes",
                    format!(
                        "the following attributes have no levels: {}",
                        empty.join(", ")
                    ),
                )
                .with_context("attributes", empty.join(","))
                .with_hint("add at least one level to every attribute"),
            ));
        }
        design.validate_references()?;

        let attributes = design
            .level_table()
            .iter()
            .map(|(name, levels)| {
                let probabilities = match design.weights().get(name) {
                    Some(weights) if weights.len() == levels.len() => {
                        weights.iter().map(|weight| weight.to_f64()).collect()
                    }
                    _ => vec![1.0 / levels.len() as f64; levels.len()],
                };
                AttributePlan {
                    name: name.clone(),
                    levels: levels.clone(),
                    probabilities,
                }
            })
            .collect();

        let mut restrictions = Vec::new();
        for (index, restriction) in design.restrictions().iter().enumerate() {
            if restriction.is_empty() {
                warn!(index, "skipping empty restriction");
                continue;
            }
            restrictions.push(restriction.pairs().to_vec());
        }
        let mut constraints = Vec::new();
        for (index, group) in design.constraints().iter().enumerate() {
            if group.is_empty() {
                warn!(index, "skipping empty order constraint");
                continue;
            }
            constraints.push(group.members().to_vec());
        }

        let settings = design.settings();
        Ok(Self {
            attributes,
            restrictions,
            constraints,
            tasks: settings.tasks,
            profiles: settings.profiles,
            randomize_order: settings.randomize_order,
            weighted: settings.weighted,
        })
    }

    /// Attribute names in declaration order.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .map(|attribute| attribute.name.as_str())
            .collect()
    }

    /// Looks up one attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributePlan> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
    }

    /// Returns true when the candidate profile, looked up through
    /// `level_of`, matches every pair of at least one restriction.
    pub fn is_forbidden<'a, F>(&self, level_of: F) -> bool
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        self.restrictions.iter().any(|restriction| {
            restriction
                .iter()
                .all(|(attribute, level)| level_of(attribute) == Some(level.as_str()))
        })
    }
}
