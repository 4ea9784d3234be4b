//! Exact-fraction validation of per-attribute randomization weights.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use sdt_core::errors::{ErrorInfo, SdtError};
use sdt_core::Ratio;
use tracing::debug;

/// Uniform `1/n` weights for every attribute; attributes without levels get
/// an empty vector.
pub(crate) fn uniform_weights(
    levels: &IndexMap<String, Vec<String>>,
) -> IndexMap<String, Vec<Ratio>> {
    levels
        .iter()
        .map(|(name, levels)| {
            let weights = match Ratio::uniform(levels.len()) {
                Some(weight) => vec![weight; levels.len()],
                None => Vec::new(),
            };
            (name.clone(), weights)
        })
        .collect()
}

/// Parses one user-entered weight, accepting only values in `[0, 1]`.
pub fn parse_weight(text: &str) -> Result<Ratio, SdtError> {
    let value: Ratio = text.parse().map_err(|err: SdtError| {
        let code = if err.info().code == "ratio-negative" {
            "weight-out-of-range"
        } else {
            "weight-invalid"
        };
        SdtError::Weights(
            ErrorInfo::new(code, "weight must be a number between 0 and 1")
                .with_context("input", text)
                .with_hint(err.info().message.clone()),
        )
    })?;
    if value > Ratio::ONE {
        return Err(SdtError::Weights(
            ErrorInfo::new("weight-out-of-range", "weight must be a number between 0 and 1")
                .with_context("input", text),
        ));
    }
    Ok(value)
}

/// Exact sum of one attribute's weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightSum {
    /// The reduced exact sum.
    Exact(Ratio),
    /// The sum does not fit the rational representation.
    Overflow,
}

impl WeightSum {
    /// True only for an exact sum of one.
    pub fn is_one(&self) -> bool {
        matches!(self, WeightSum::Exact(sum) if sum.is_one())
    }
}

impl Display for WeightSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightSum::Exact(sum) => f.write_str(&sum.display_compact()),
            WeightSum::Overflow => f.write_str("overflow"),
        }
    }
}

/// Outcome of checking every staged weight vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightValidation {
    /// Per attribute sums in display order.
    pub sums: IndexMap<String, WeightSum>,
    /// Attributes whose sum is not exactly one, in display order.
    pub offending: Vec<String>,
}

impl WeightValidation {
    /// True when every attribute sums to exactly one.
    pub fn is_valid(&self) -> bool {
        self.offending.is_empty()
    }

    /// Converts a failed validation into one error naming every offender.
    pub fn into_result(self) -> Result<(), SdtError> {
        if self.is_valid() {
            return Ok(());
        }
        let names = self.offending.join(", ");
        Err(SdtError::Weights(
            ErrorInfo::new(
                "weights-not-normalized",
                format!("the following attribute weights do not sum to 1: {names}"),
            )
            .with_context("attributes", names),
        ))
    }
}

/// Staging copy of the committed weights.
///
/// Edits land here first; [`crate::Design::commit_weights`] copies them back
/// only when every attribute validates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightEditor {
    level_counts: IndexMap<String, usize>,
    staged: IndexMap<String, Vec<Ratio>>,
}

impl WeightEditor {
    pub(crate) fn new(
        levels: &IndexMap<String, Vec<String>>,
        committed: &IndexMap<String, Vec<Ratio>>,
    ) -> Self {
        Self {
            level_counts: levels
                .iter()
                .map(|(name, levels)| (name.clone(), levels.len()))
                .collect(),
            staged: committed.clone(),
        }
    }

    /// Staged weights for `attribute`.
    pub fn weights(&self, attribute: &str) -> Option<&[Ratio]> {
        self.staged.get(attribute).map(Vec::as_slice)
    }

    /// All staged weights in display order.
    pub fn staged(&self) -> &IndexMap<String, Vec<Ratio>> {
        &self.staged
    }

    /// Replaces one weight from user text. On error the prior value stays.
    pub fn set_weight(
        &mut self,
        attribute: &str,
        level_index: usize,
        text: &str,
    ) -> Result<Ratio, SdtError> {
        let value = parse_weight(text)?;
        let weights = self
            .staged
            .get_mut(attribute)
            .ok_or_else(|| unknown_attribute(attribute))?;
        let count = weights.len();
        let slot = weights.get_mut(level_index).ok_or_else(|| {
            SdtError::Weights(
                ErrorInfo::new("unknown-level", "no level at that position")
                    .with_context("attribute", attribute)
                    .with_context("index", level_index.to_string())
                    .with_context("count", count.to_string()),
            )
        })?;
        *slot = value;
        debug!(attribute, level_index, weight = %value, "weight staged");
        Ok(value)
    }

    /// Replaces every weight of `attribute`; all entries must parse or none
    /// are applied.
    pub fn set_weights<S: AsRef<str>>(
        &mut self,
        attribute: &str,
        texts: &[S],
    ) -> Result<(), SdtError> {
        let expected = *self
            .level_counts
            .get(attribute)
            .ok_or_else(|| unknown_attribute(attribute))?;
        if texts.len() != expected {
            return Err(SdtError::Weights(
                ErrorInfo::new("weight-count-mismatch", "one weight is needed per level")
                    .with_context("attribute", attribute)
                    .with_context("expected", expected.to_string())
                    .with_context("given", texts.len().to_string()),
            ));
        }
        let parsed = texts
            .iter()
            .map(|text| parse_weight(text.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.staged.insert(attribute.to_string(), parsed);
        Ok(())
    }

    /// Resets every staged vector to uniform weights.
    pub fn reset_uniform(&mut self) {
        self.staged = self
            .level_counts
            .iter()
            .map(|(name, count)| {
                let weights = match Ratio::uniform(*count) {
                    Some(weight) => vec![weight; *count],
                    None => Vec::new(),
                };
                (name.clone(), weights)
            })
            .collect();
    }

    /// Exact sum of the staged weights for `attribute`.
    pub fn sum(&self, attribute: &str) -> Option<WeightSum> {
        self.staged.get(attribute).map(|weights| exact_sum(weights))
    }

    /// Checks that every attribute's staged weights sum to exactly one.
    pub fn validate(&self) -> WeightValidation {
        let sums: IndexMap<String, WeightSum> = self
            .staged
            .iter()
            .map(|(name, weights)| (name.clone(), exact_sum(weights)))
            .collect();
        let offending = sums
            .iter()
            .filter(|(_, sum)| !sum.is_one())
            .map(|(name, _)| name.clone())
            .collect();
        WeightValidation { sums, offending }
    }

    pub(crate) fn matches_levels(&self, levels: &IndexMap<String, Vec<String>>) -> bool {
        self.level_counts.len() == levels.len()
            && self
                .level_counts
                .iter()
                .zip(levels.iter())
                .all(|((name, count), (other, levels))| name == other && *count == levels.len())
    }
}

fn exact_sum(weights: &[Ratio]) -> WeightSum {
    match Ratio::checked_sum(weights.iter().copied()) {
        Some(sum) => WeightSum::Exact(sum),
        None => WeightSum::Overflow,
    }
}

fn unknown_attribute(attribute: &str) -> SdtError {
    SdtError::Weights(
        ErrorInfo::new("unknown-attribute", "attribute does not exist")
            .with_context("attribute", attribute),
    )
}
