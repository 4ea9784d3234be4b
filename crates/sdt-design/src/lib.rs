//! Conjoint design model: attributes, levels, restrictions, order
//! constraints and exact randomization weights, plus the design file and CSV
//! import.

pub mod document;
pub mod import;
pub mod model;
pub mod persist;
pub mod weights;

pub use document::{AttributeEntry, DesignDocument};
pub use import::{import_csv, import_csv_reader};
pub use model::{Design, OrderGroup, Restriction, SurveySettings};
pub use persist::{design_from_bytes, design_to_bytes, load_design, save_design};
pub use weights::{parse_weight, WeightEditor, WeightSum, WeightValidation};
