//! The `.sdt` design file: seven bincode records written back to back.
//!
//! Record order is attribute list, level mapping, restriction list,
//! constraint-group list, weight mapping, task count and profile count (the
//! counts as decimal strings). Anything else is rejected on load. The two
//! randomization flags are session settings and are not stored.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Cursor;
use std::path::Path;

use bincode::Options;
use indexmap::IndexMap;
use sdt_core::errors::{ErrorInfo, SdtError};
use sdt_core::Ratio;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use crate::model::{repeated_attribute, Design, OrderGroup, Restriction, SurveySettings};

/// Upper bound on any single record, guarding against corrupt length fields.
const RECORD_LIMIT: u64 = 64 * 1024 * 1024;

fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_limit(RECORD_LIMIT)
}

fn schema_error(code: &str, message: impl Into<String>) -> SdtError {
    SdtError::Serde(ErrorInfo::new(code, message))
}

fn write_record<T: Serialize>(
    buffer: &mut Vec<u8>,
    record: &str,
    value: &T,
) -> Result<(), SdtError> {
    codec().serialize_into(&mut *buffer, value).map_err(|err| {
        SdtError::Serde(
            ErrorInfo::new("design-encode", err.to_string()).with_context("record", record),
        )
    })
}

fn read_record<T: DeserializeOwned>(
    cursor: &mut Cursor<&[u8]>,
    record: &str,
) -> Result<T, SdtError> {
    codec().deserialize_from(&mut *cursor).map_err(|err| {
        SdtError::Serde(
            ErrorInfo::new("design-decode", "design file does not match the expected schema")
                .with_context("record", record)
                .with_hint(err.to_string()),
        )
    })
}

/// Encodes the design into the seven-record stream.
pub fn design_to_bytes(design: &Design) -> Result<Vec<u8>, SdtError> {
    let attributes: Vec<String> = design.attributes().map(str::to_string).collect();
    let levels: BTreeMap<String, Vec<String>> = design
        .level_table()
        .iter()
        .map(|(name, levels)| (name.clone(), levels.clone()))
        .collect();
    let restrictions: Vec<Vec<(String, String)>> = design
        .restrictions()
        .iter()
        .map(|restriction| restriction.pairs().to_vec())
        .collect();
    let constraints: Vec<Vec<String>> = design
        .constraints()
        .iter()
        .map(|group| group.members().to_vec())
        .collect();
    let weights: BTreeMap<String, Vec<Ratio>> = design
        .weights()
        .iter()
        .map(|(name, weights)| (name.clone(), weights.clone()))
        .collect();

    let mut buffer = Vec::new();
    write_record(&mut buffer, "attributes", &attributes)?;
    write_record(&mut buffer, "levels", &levels)?;
    write_record(&mut buffer, "restrictions", &restrictions)?;
    write_record(&mut buffer, "constraints", &constraints)?;
    write_record(&mut buffer, "weights", &weights)?;
    write_record(&mut buffer, "tasks", &design.settings().tasks.to_string())?;
    write_record(&mut buffer, "profiles", &design.settings().profiles.to_string())?;
    Ok(buffer)
}

/// Decodes a seven-record stream, rejecting any drift from the schema.
pub fn design_from_bytes(bytes: &[u8]) -> Result<Design, SdtError> {
    let mut cursor = Cursor::new(bytes);
    let attributes: Vec<String> = read_record(&mut cursor, "attributes")?;
    let mut levels: BTreeMap<String, Vec<String>> = read_record(&mut cursor, "levels")?;
    let restrictions: Vec<Vec<(String, String)>> = read_record(&mut cursor, "restrictions")?;
    let constraints: Vec<Vec<String>> = read_record(&mut cursor, "constraints")?;
    let mut weights: BTreeMap<String, Vec<Ratio>> = read_record(&mut cursor, "weights")?;
    let tasks: String = read_record(&mut cursor, "tasks")?;
    let profiles: String = read_record(&mut cursor, "profiles")?;
    if cursor.position() != bytes.len() as u64 {
        return Err(schema_error(
            "design-trailing-data",
            "design file holds more than seven records",
        ));
    }

    let declared: BTreeSet<&String> = attributes.iter().collect();
    if declared.len() != attributes.len() {
        return Err(schema_error(
            "design-duplicate-attribute",
            "attribute list contains duplicates",
        ));
    }
    if !levels.keys().eq(declared.iter().copied()) {
        return Err(schema_error(
            "design-level-keys",
            "level mapping keys differ from the attribute list",
        ));
    }
    if !weights.keys().eq(declared.iter().copied()) {
        return Err(schema_error(
            "design-weight-keys",
            "weight mapping keys differ from the attribute list",
        ));
    }

    let mut level_table = IndexMap::with_capacity(attributes.len());
    let mut weight_table = IndexMap::with_capacity(attributes.len());
    for name in &attributes {
        let attr_levels = levels.remove(name).unwrap_or_default();
        let attr_weights = weights.remove(name).unwrap_or_default();
        if attr_weights.len() != attr_levels.len() {
            return Err(SdtError::Serde(
                ErrorInfo::new("design-weight-length", "weights are not aligned with levels")
                    .with_context("attribute", name.as_str()),
            ));
        }
        let sum = Ratio::checked_sum(attr_weights.iter().copied());
        if !attr_levels.is_empty() && sum != Some(Ratio::ONE) {
            return Err(SdtError::Serde(
                ErrorInfo::new("design-weight-sum", "stored weights do not sum to 1")
                    .with_context("attribute", name.as_str()),
            ));
        }
        let distinct: BTreeSet<&String> = attr_levels.iter().collect();
        if distinct.len() != attr_levels.len() {
            return Err(SdtError::Serde(
                ErrorInfo::new("design-duplicate-level", "attribute lists a level twice")
                    .with_context("attribute", name.as_str()),
            ));
        }
        level_table.insert(name.clone(), attr_levels);
        weight_table.insert(name.clone(), attr_weights);
    }

    for (index, pairs) in restrictions.iter().enumerate() {
        if let Some(attribute) = repeated_attribute(pairs) {
            return Err(SdtError::Serde(
                ErrorInfo::new(
                    "design-duplicate-restriction-attribute",
                    "restriction names an attribute more than once",
                )
                .with_context("restriction", (index + 1).to_string())
                .with_context("attribute", attribute),
            ));
        }
    }

    let settings = SurveySettings {
        tasks: parse_count("tasks", &tasks)?,
        profiles: parse_count("profiles", &profiles)?,
        ..SurveySettings::default()
    };
    let design = Design::from_parts(
        level_table,
        restrictions.into_iter().map(Restriction::from_pairs).collect(),
        constraints.into_iter().map(OrderGroup::from_members).collect(),
        weight_table,
        settings,
    );
    design.validate_references()?;
    Ok(design)
}

fn parse_count(record: &str, text: &str) -> Result<usize, SdtError> {
    match text.trim().parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(SdtError::Serde(
            ErrorInfo::new("design-count", "count must be a positive integer")
                .with_context("record", record)
                .with_context("value", text),
        )),
    }
}

/// Writes the design to `path` from a fully built buffer.
pub fn save_design(design: &Design, path: &Path) -> Result<(), SdtError> {
    let bytes = design_to_bytes(design)?;
    fs::write(path, &bytes).map_err(|err| {
        SdtError::Resource(
            ErrorInfo::new("design-write", "could not save design file")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    info!(path = %path.display(), bytes = bytes.len(), "design saved");
    Ok(())
}

/// Reads a design from `path`.
pub fn load_design(path: &Path) -> Result<Design, SdtError> {
    let bytes = fs::read(path).map_err(|err| {
        SdtError::Resource(
            ErrorInfo::new("design-read", "could not open design file")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    let design = design_from_bytes(&bytes)?;
    info!(
        path = %path.display(),
        attributes = design.attribute_count(),
        "design loaded"
    );
    Ok(design)
}
