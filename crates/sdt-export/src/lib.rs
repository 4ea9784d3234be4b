//! Export of validated conjoint designs.
//!
//! Three artifacts are produced from a [`sdt_gen::GenerationPlan`]: a PHP
//! script that re-implements the profile generator for the survey platform,
//! a plain `.dat` summary and one HTML question template per task. Every
//! artifact is rendered in memory before anything touches the filesystem.

pub mod literal;
pub mod php;
pub mod report;
pub mod summary;
pub mod templates;
pub mod writer;

pub use php::render_php;
pub use report::{to_canonical_json_bytes, ArtifactKind, ArtifactRecord, ExportReport};
pub use summary::render_summary;
pub use templates::{render_template, template_paths};
pub use writer::{export, ExportRequest};
