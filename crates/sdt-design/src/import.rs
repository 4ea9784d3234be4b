//! Attribute tables imported from CSV: one attribute per row, the first cell
//! naming it and the remaining non-empty cells listing its levels.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use sdt_core::errors::{ErrorInfo, SdtError};
use tracing::info;

use crate::model::Design;

fn csv_error(code: &str, err: impl ToString) -> SdtError {
    SdtError::Resource(ErrorInfo::new(code, err.to_string()))
}

/// Builds a fresh design from CSV rows. Restrictions, constraints, weights,
/// counts and flags all start from their defaults.
pub fn import_csv_reader<R: Read>(reader: R) -> Result<Design, SdtError> {
    let mut rows = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut design = Design::new();
    for (row_index, record) in rows.records().enumerate() {
        let record = record.map_err(|err| csv_error("csv-read", err))?;
        let mut cells = record.iter();
        let Some(name) = cells.next() else {
            continue;
        };
        let name = if row_index == 0 {
            name.trim_start_matches('\u{feff}')
        } else {
            name
        };
        let row = (row_index + 1).to_string();
        design
            .add_attribute(name)
            .map_err(|err| with_row(err, &row))?;
        for level in cells.filter(|cell| !cell.is_empty()) {
            design
                .add_level(name, level)
                .map_err(|err| with_row(err, &row))?;
        }
    }
    info!(attributes = design.attribute_count(), "csv imported");
    Ok(design)
}

/// Imports the CSV file at `path`.
pub fn import_csv(path: &Path) -> Result<Design, SdtError> {
    let file = File::open(path).map_err(|err| {
        SdtError::Resource(
            ErrorInfo::new("csv-open", "could not open CSV file")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    import_csv_reader(file)
}

fn with_row(err: SdtError, row: &str) -> SdtError {
    match err {
        SdtError::Validation(info) => SdtError::Validation(info.with_context("row", row)),
        other => other,
    }
}
