use indexmap::IndexMap;
use sdt_core::errors::{ErrorInfo, SdtError};
use sdt_core::Ratio;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::weights::{uniform_weights, WeightEditor};

/// Forbidden combination of levels: a profile matching every pair is rejected.
///
/// Holds at most one level per attribute; setting a second level for the same
/// attribute replaces the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Restriction {
    pairs: Vec<(String, String)>,
}

impl Restriction {
    /// Creates an empty restriction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a restriction from `(attribute, level)` pairs, later pairs
    /// replacing earlier ones for the same attribute.
    pub fn from_pairs<I, A, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, L)>,
        A: Into<String>,
        L: Into<String>,
    {
        let mut restriction = Self::new();
        for (attribute, level) in pairs {
            restriction.set(attribute, level);
        }
        restriction
    }

    /// Ordered `(attribute, level)` pairs.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// True when the restriction holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The forbidden level for `attribute`, if the restriction mentions it.
    pub fn level_for(&self, attribute: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(attr, _)| attr == attribute)
            .map(|(_, level)| level.as_str())
    }

    /// Adds or replaces the pair for `attribute`.
    pub fn set(&mut self, attribute: impl Into<String>, level: impl Into<String>) {
        let attribute = attribute.into();
        let level = level.into();
        match self.pairs.iter_mut().find(|(attr, _)| *attr == attribute) {
            Some(pair) => pair.1 = level,
            None => self.pairs.push((attribute, level)),
        }
    }

    fn mentions_attribute(&self, attribute: &str) -> bool {
        self.level_for(attribute).is_some()
    }

    fn mentions_level(&self, attribute: &str, level: &str) -> bool {
        self.level_for(attribute) == Some(level)
    }
}

/// First attribute named by more than one pair of `pairs`.
pub(crate) fn repeated_attribute(pairs: &[(String, String)]) -> Option<&str> {
    pairs.iter().enumerate().find_map(|(index, (attribute, _))| {
        pairs[..index]
            .iter()
            .any(|(earlier, _)| earlier == attribute)
            .then_some(attribute.as_str())
    })
}

/// Attributes that move as one block when attribute order is randomized.
///
/// The first member is the anchor; the remaining members always follow it
/// immediately, in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderGroup {
    members: Vec<String>,
}

impl OrderGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a group from member names, anchor first.
    pub fn from_members<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Members in declared order, anchor first.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// The anchor attribute, if any.
    pub fn anchor(&self) -> Option<&str> {
        self.members.first().map(String::as_str)
    }

    /// True when the group has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True when `attribute` belongs to this group.
    pub fn contains(&self, attribute: &str) -> bool {
        self.members.iter().any(|member| member == attribute)
    }
}

/// Survey-level settings carried alongside the attribute table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySettings {
    /// Choice tasks shown to each respondent.
    pub tasks: usize,
    /// Profiles shown in each task.
    pub profiles: usize,
    /// Randomize attribute order once per respondent.
    pub randomize_order: bool,
    /// Draw levels from the committed weights instead of uniformly.
    pub weighted: bool,
}

impl Default for SurveySettings {
    fn default() -> Self {
        Self {
            tasks: 5,
            profiles: 2,
            randomize_order: true,
            weighted: false,
        }
    }
}

/// The canonical in-memory conjoint design.
///
/// All mutation goes through the edit methods below. Every change to the set
/// of levels resets the committed weights of every attribute to uniform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Design {
    levels: IndexMap<String, Vec<String>>,
    restrictions: Vec<Restriction>,
    constraints: Vec<OrderGroup>,
    weights: IndexMap<String, Vec<Ratio>>,
    settings: SurveySettings,
}

fn require_name(kind: &str, value: &str) -> Result<(), SdtError> {
    if value.trim().is_empty() {
        return Err(SdtError::Validation(ErrorInfo::new(
            format!("blank-{kind}"),
            format!("{kind} names must not be blank"),
        )));
    }
    Ok(())
}

fn unknown_attribute(attribute: &str) -> SdtError {
    SdtError::Validation(
        ErrorInfo::new("unknown-attribute", "attribute does not exist")
            .with_context("attribute", attribute),
    )
}

fn unknown_level(attribute: &str, level: &str) -> SdtError {
    SdtError::Validation(
        ErrorInfo::new("unknown-level", "level does not exist")
            .with_context("attribute", attribute)
            .with_context("level", level),
    )
}

fn index_error(kind: &str, index: usize, len: usize) -> SdtError {
    SdtError::Validation(
        ErrorInfo::new(format!("unknown-{kind}"), format!("no {kind} at that position"))
            .with_context("index", index.to_string())
            .with_context("count", len.to_string()),
    )
}

impl Design {
    /// Creates an empty design with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute names in display order.
    pub fn attributes(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.levels.keys().map(String::as_str)
    }

    /// Number of attributes.
    pub fn attribute_count(&self) -> usize {
        self.levels.len()
    }

    /// True when `attribute` exists.
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.levels.contains_key(attribute)
    }

    /// Levels of `attribute` in display order.
    pub fn levels(&self, attribute: &str) -> Option<&[String]> {
        self.levels.get(attribute).map(Vec::as_slice)
    }

    /// The full attribute to levels table in display order.
    pub fn level_table(&self) -> &IndexMap<String, Vec<String>> {
        &self.levels
    }

    /// Declared restrictions, including empty ones still being edited.
    pub fn restrictions(&self) -> &[Restriction] {
        &self.restrictions
    }

    /// Declared order constraint groups, including empty ones.
    pub fn constraints(&self) -> &[OrderGroup] {
        &self.constraints
    }

    /// Committed weights, index aligned with each attribute's levels.
    pub fn weights(&self) -> &IndexMap<String, Vec<Ratio>> {
        &self.weights
    }

    /// Survey settings.
    pub fn settings(&self) -> &SurveySettings {
        &self.settings
    }

    /// Attributes that currently have no levels.
    pub fn empty_attributes(&self) -> Vec<&str> {
        self.levels
            .iter()
            .filter(|(_, levels)| levels.is_empty())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Appends a new attribute with no levels.
    pub fn add_attribute(&mut self, name: &str) -> Result<(), SdtError> {
        require_name("attribute", name)?;
        if self.levels.contains_key(name) {
            return Err(SdtError::Validation(
                ErrorInfo::new("duplicate-attribute", "attribute already exists")
                    .with_context("attribute", name),
            ));
        }
        self.levels.insert(name.to_string(), Vec::new());
        debug!(attribute = name, "attribute added");
        self.reset_weights();
        Ok(())
    }

    /// Renames an attribute in place, carrying its levels, restriction pairs
    /// and constraint membership over to the new name.
    pub fn rename_attribute(&mut self, old: &str, new: &str) -> Result<(), SdtError> {
        require_name("attribute", new)?;
        let index = self
            .levels
            .get_index_of(old)
            .ok_or_else(|| unknown_attribute(old))?;
        if old == new {
            return Ok(());
        }
        if self.levels.contains_key(new) {
            return Err(SdtError::Validation(
                ErrorInfo::new("duplicate-attribute", "attribute already exists")
                    .with_context("attribute", new),
            ));
        }
        let levels = self.levels.shift_remove(old).unwrap_or_default();
        self.levels.shift_insert(index, new.to_string(), levels);
        for restriction in &mut self.restrictions {
            for (attribute, _) in &mut restriction.pairs {
                if attribute == old {
                    *attribute = new.to_string();
                }
            }
        }
        for group in &mut self.constraints {
            for member in &mut group.members {
                if member == old {
                    *member = new.to_string();
                }
            }
        }
        debug!(from = old, to = new, "attribute renamed");
        self.reset_weights();
        Ok(())
    }

    /// Removes an attribute and its levels. Restrictions that mention it are
    /// deleted and it leaves any constraint group.
    pub fn remove_attribute(&mut self, name: &str) -> Result<(), SdtError> {
        self.levels
            .shift_remove(name)
            .ok_or_else(|| unknown_attribute(name))?;
        let before = self.restrictions.len();
        self.restrictions
            .retain(|restriction| !restriction.mentions_attribute(name));
        for group in &mut self.constraints {
            group.members.retain(|member| member != name);
        }
        debug!(
            attribute = name,
            dropped_restrictions = before - self.restrictions.len(),
            "attribute removed"
        );
        self.reset_weights();
        Ok(())
    }

    /// Appends a level to `attribute`.
    pub fn add_level(&mut self, attribute: &str, level: &str) -> Result<(), SdtError> {
        require_name("level", level)?;
        let levels = self
            .levels
            .get_mut(attribute)
            .ok_or_else(|| unknown_attribute(attribute))?;
        if levels.iter().any(|existing| existing == level) {
            return Err(SdtError::Validation(
                ErrorInfo::new("duplicate-level", "level already exists for attribute")
                    .with_context("attribute", attribute)
                    .with_context("level", level),
            ));
        }
        levels.push(level.to_string());
        debug!(attribute, level, "level added");
        self.reset_weights();
        Ok(())
    }

    /// Renames a level in place, updating restrictions that mention it.
    pub fn rename_level(&mut self, attribute: &str, old: &str, new: &str) -> Result<(), SdtError> {
        require_name("level", new)?;
        let levels = self
            .levels
            .get_mut(attribute)
            .ok_or_else(|| unknown_attribute(attribute))?;
        let position = levels
            .iter()
            .position(|level| level == old)
            .ok_or_else(|| unknown_level(attribute, old))?;
        if old == new {
            return Ok(());
        }
        if levels.iter().any(|level| level == new) {
            return Err(SdtError::Validation(
                ErrorInfo::new("duplicate-level", "level already exists for attribute")
                    .with_context("attribute", attribute)
                    .with_context("level", new),
            ));
        }
        levels[position] = new.to_string();
        for restriction in &mut self.restrictions {
            if restriction.mentions_level(attribute, old) {
                restriction.set(attribute, new);
            }
        }
        debug!(attribute, from = old, to = new, "level renamed");
        self.reset_weights();
        Ok(())
    }

    /// Removes a level; restrictions that forbid it are deleted.
    pub fn remove_level(&mut self, attribute: &str, level: &str) -> Result<(), SdtError> {
        let levels = self
            .levels
            .get_mut(attribute)
            .ok_or_else(|| unknown_attribute(attribute))?;
        let position = levels
            .iter()
            .position(|existing| existing == level)
            .ok_or_else(|| unknown_level(attribute, level))?;
        levels.remove(position);
        self.restrictions
            .retain(|restriction| !restriction.mentions_level(attribute, level));
        debug!(attribute, level, "level removed");
        self.reset_weights();
        Ok(())
    }

    /// Appends an empty restriction and returns its index.
    pub fn new_restriction(&mut self) -> usize {
        self.restrictions.push(Restriction::new());
        self.restrictions.len() - 1
    }

    /// Adds `(attribute, level)` to restriction `index`, replacing any level
    /// already set there for the same attribute.
    pub fn set_restriction_level(
        &mut self,
        index: usize,
        attribute: &str,
        level: &str,
    ) -> Result<(), SdtError> {
        let levels = self
            .levels
            .get(attribute)
            .ok_or_else(|| unknown_attribute(attribute))?;
        if !levels.iter().any(|existing| existing == level) {
            return Err(unknown_level(attribute, level));
        }
        let count = self.restrictions.len();
        let restriction = self
            .restrictions
            .get_mut(index)
            .ok_or_else(|| index_error("restriction", index, count))?;
        restriction.set(attribute, level);
        debug!(index, attribute, level, "restriction updated");
        Ok(())
    }

    /// Deletes restriction `index`.
    pub fn remove_restriction(&mut self, index: usize) -> Result<Restriction, SdtError> {
        if index >= self.restrictions.len() {
            return Err(index_error("restriction", index, self.restrictions.len()));
        }
        Ok(self.restrictions.remove(index))
    }

    /// Appends an empty order constraint group and returns its index.
    pub fn new_constraint(&mut self) -> usize {
        self.constraints.push(OrderGroup::new());
        self.constraints.len() - 1
    }

    /// Appends `attribute` to group `index`. An attribute may belong to at
    /// most one group.
    pub fn add_to_constraint(&mut self, index: usize, attribute: &str) -> Result<(), SdtError> {
        if !self.levels.contains_key(attribute) {
            return Err(unknown_attribute(attribute));
        }
        if self.constraints.iter().any(|group| group.contains(attribute)) {
            return Err(SdtError::Validation(
                ErrorInfo::new(
                    "attribute-already-constrained",
                    "an attribute can only be part of one order constraint",
                )
                .with_context("attribute", attribute),
            ));
        }
        let count = self.constraints.len();
        let group = self
            .constraints
            .get_mut(index)
            .ok_or_else(|| index_error("constraint", index, count))?;
        group.members.push(attribute.to_string());
        debug!(index, attribute, "constraint updated");
        Ok(())
    }

    /// Deletes constraint group `index`.
    pub fn remove_constraint(&mut self, index: usize) -> Result<OrderGroup, SdtError> {
        if index >= self.constraints.len() {
            return Err(index_error("constraint", index, self.constraints.len()));
        }
        Ok(self.constraints.remove(index))
    }

    /// Sets the number of tasks per respondent (must be positive).
    pub fn set_tasks(&mut self, tasks: usize) -> Result<(), SdtError> {
        if tasks == 0 {
            return Err(SdtError::validation(
                "invalid-task-count",
                "number of tasks must be positive",
            ));
        }
        self.settings.tasks = tasks;
        Ok(())
    }

    /// Sets the number of profiles per task (must be positive).
    pub fn set_profiles(&mut self, profiles: usize) -> Result<(), SdtError> {
        if profiles == 0 {
            return Err(SdtError::validation(
                "invalid-profile-count",
                "number of profiles must be positive",
            ));
        }
        self.settings.profiles = profiles;
        Ok(())
    }

    /// Enables or disables per-respondent attribute order randomization.
    pub fn set_randomize_order(&mut self, enabled: bool) {
        self.settings.randomize_order = enabled;
    }

    /// Enables or disables weighted level randomization.
    pub fn set_weighted(&mut self, enabled: bool) {
        self.settings.weighted = enabled;
    }

    /// Opens a staging copy of the committed weights for editing.
    pub fn weight_editor(&self) -> WeightEditor {
        WeightEditor::new(&self.levels, &self.weights)
    }

    /// Replaces the committed weights with the staged ones, atomically.
    ///
    /// Fails without touching the committed weights when the editor no longer
    /// matches the level table or any attribute does not sum to exactly one.
    pub fn commit_weights(&mut self, editor: &WeightEditor) -> Result<(), SdtError> {
        if !editor.matches_levels(&self.levels) {
            return Err(SdtError::Weights(
                ErrorInfo::new(
                    "stale-weights",
                    "levels changed since the weight editor was opened",
                )
                .with_hint("reopen the weight editor"),
            ));
        }
        editor.validate().into_result()?;
        self.weights = editor.staged().clone();
        debug!("weights committed");
        Ok(())
    }

    /// Checks that every restriction pair and constraint member refers to an
    /// existing attribute and level, and that no attribute appears in two
    /// constraint groups.
    pub fn validate_references(&self) -> Result<(), SdtError> {
        for (index, restriction) in self.restrictions.iter().enumerate() {
            for (attribute, level) in restriction.pairs() {
                let known = self
                    .levels
                    .get(attribute)
                    .is_some_and(|levels| levels.iter().any(|existing| existing == level));
                if !known {
                    return Err(dangling("restriction", index, attribute, Some(level)));
                }
            }
        }
        let mut seen = Vec::new();
        for (index, group) in self.constraints.iter().enumerate() {
            for member in group.members() {
                if !self.levels.contains_key(member) {
                    return Err(dangling("constraint", index, member, None));
                }
                if seen.contains(&member) {
                    return Err(SdtError::Validation(
                        ErrorInfo::new(
                            "attribute-already-constrained",
                            "an attribute can only be part of one order constraint",
                        )
                        .with_context("attribute", member.as_str()),
                    ));
                }
                seen.push(member);
            }
        }
        Ok(())
    }

    pub(crate) fn from_parts(
        levels: IndexMap<String, Vec<String>>,
        restrictions: Vec<Restriction>,
        constraints: Vec<OrderGroup>,
        weights: IndexMap<String, Vec<Ratio>>,
        settings: SurveySettings,
    ) -> Self {
        Self {
            levels,
            restrictions,
            constraints,
            weights,
            settings,
        }
    }

    fn reset_weights(&mut self) {
        self.weights = uniform_weights(&self.levels);
    }
}

fn dangling(kind: &str, index: usize, attribute: &str, level: Option<&str>) -> SdtError {
    let mut info = ErrorInfo::new(
        format!("dangling-{kind}"),
        format!("{kind} refers to an attribute or level that no longer exists"),
    )
    .with_context("index", index.to_string())
    .with_context("attribute", attribute);
    if let Some(level) = level {
        info = info.with_context("level", level);
    }
    SdtError::Validation(info)
}
