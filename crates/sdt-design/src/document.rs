//! Human-editable YAML description of a whole design.

use sdt_core::errors::{ErrorInfo, SdtError};
use serde::{Deserialize, Serialize};

use crate::model::{repeated_attribute, Design};

/// One attribute row of a [`DesignDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeEntry {
    pub name: String,
    #[serde(default)]
    pub levels: Vec<String>,
    /// Weights as text (`1/3`, `0.25`); uniform when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<String>>,
}

/// YAML form of a design, including the session flags the `.sdt` file omits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    #[serde(default)]
    pub attributes: Vec<AttributeEntry>,
    #[serde(default)]
    pub restrictions: Vec<Vec<(String, String)>>,
    #[serde(default)]
    pub constraints: Vec<Vec<String>>,
    #[serde(default = "DesignDocument::default_tasks")]
    pub tasks: usize,
    #[serde(default = "DesignDocument::default_profiles")]
    pub profiles: usize,
    #[serde(default = "DesignDocument::default_randomize_order")]
    pub randomize_order: bool,
    #[serde(default)]
    pub weighted: bool,
}

impl DesignDocument {
    fn default_tasks() -> usize {
        5
    }
    fn default_profiles() -> usize {
        2
    }
    fn default_randomize_order() -> bool {
        true
    }

    /// Parses a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self, SdtError> {
        serde_yaml::from_str(text)
            .map_err(|err| SdtError::Serde(ErrorInfo::new("yaml-deserialize", err.to_string())))
    }

    /// Renders the document as YAML.
    pub fn to_yaml(&self) -> Result<String, SdtError> {
        serde_yaml::to_string(self)
            .map_err(|err| SdtError::Serde(ErrorInfo::new("yaml-serialize", err.to_string())))
    }

    /// Replays the document through the design edit operations, so every
    /// invariant is checked exactly as for interactive edits.
    pub fn to_design(&self) -> Result<Design, SdtError> {
        let mut design = Design::new();
        for entry in &self.attributes {
            design.add_attribute(&entry.name)?;
            for level in &entry.levels {
                design.add_level(&entry.name, level)?;
            }
        }
        for (position, pairs) in self.restrictions.iter().enumerate() {
            if let Some(attribute) = repeated_attribute(pairs) {
                return Err(SdtError::Validation(
                    ErrorInfo::new(
                        "duplicate-restriction-attribute",
                        "restriction names an attribute more than once",
                    )
                    .with_context("restriction", (position + 1).to_string())
                    .with_context("attribute", attribute),
                ));
            }
            let index = design.new_restriction();
            for (attribute, level) in pairs {
                design.set_restriction_level(index, attribute, level)?;
            }
        }
        for members in &self.constraints {
            let index = design.new_constraint();
            for attribute in members {
                design.add_to_constraint(index, attribute)?;
            }
        }
        let mut editor = design.weight_editor();
        let mut staged = false;
        for entry in &self.attributes {
            if let Some(weights) = &entry.weights {
                editor.set_weights(&entry.name, weights.as_slice())?;
                staged = true;
            }
        }
        if staged {
            design.commit_weights(&editor)?;
        }
        design.set_tasks(self.tasks)?;
        design.set_profiles(self.profiles)?;
        design.set_randomize_order(self.randomize_order);
        design.set_weighted(self.weighted);
        Ok(design)
    }

    /// Captures a design, writing weights as exact fractions.
    pub fn from_design(design: &Design) -> Self {
        let attributes = design
            .level_table()
            .iter()
            .map(|(name, levels)| AttributeEntry {
                name: name.clone(),
                levels: levels.clone(),
                weights: design
                    .weights()
                    .get(name)
                    .map(|weights| weights.iter().map(ToString::to_string).collect()),
            })
            .collect();
        let settings = design.settings();
        Self {
            attributes,
            restrictions: design
                .restrictions()
                .iter()
                .map(|restriction| restriction.pairs().to_vec())
                .collect(),
            constraints: design
                .constraints()
                .iter()
                .map(|group| group.members().to_vec())
                .collect(),
            tasks: settings.tasks,
            profiles: settings.profiles,
            randomize_order: settings.randomize_order,
            weighted: settings.weighted,
        }
    }
}
