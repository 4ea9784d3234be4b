use std::fs;
use std::path::{Path, PathBuf};

use sdt_core::errors::{ErrorInfo, SdtError};
use sdt_design::Design;
use sdt_gen::{GenerationPlan, GeneratorConfig};
use tracing::info;

use crate::php::render_php;
use crate::report::{ArtifactKind, ArtifactRecord, ExportReport};
use crate::summary::render_summary;
use crate::templates::{render_template, template_paths};

/// Which artifacts to write and where.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRequest {
    /// Destination of the PHP generator; must end in `.php`.
    pub php: Option<PathBuf>,
    /// Destination of the `.dat` summary.
    pub summary: Option<PathBuf>,
    /// Base `.html` path; one `<stem>_task<k>.html` file is written per task.
    pub templates: Option<PathBuf>,
}

fn require_extension(path: &Path, extension: &str) -> Result<(), SdtError> {
    if path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
        return Ok(());
    }
    Err(SdtError::Validation(
        ErrorInfo::new(
            "invalid-extension",
            format!("file must have the .{extension} extension"),
        )
        .with_context("path", path.display().to_string()),
    ))
}

/// Validates `design`, renders every requested artifact and only then writes
/// them.
///
/// A design with an empty attribute, dangling references or a bad
/// destination name fails before any file is created.
pub fn export(
    design: &Design,
    request: &ExportRequest,
    config: &GeneratorConfig,
) -> Result<ExportReport, SdtError> {
    let plan = GenerationPlan::from_design(design)?;

    let mut rendered: Vec<(ArtifactKind, PathBuf, String)> = Vec::new();
    if let Some(path) = &request.php {
        require_extension(path, "php")?;
        rendered.push((ArtifactKind::Php, path.clone(), render_php(&plan, config)));
    }
    if let Some(path) = &request.summary {
        rendered.push((ArtifactKind::Summary, path.clone(), render_summary(&plan)));
    }
    if let Some(base) = &request.templates {
        require_extension(base, "html")?;
        for (index, path) in template_paths(base, plan.tasks).into_iter().enumerate() {
            let task = index + 1;
            rendered.push((
                ArtifactKind::Template { task },
                path,
                render_template(&plan, task),
            ));
        }
    }

    let mut report = ExportReport::default();
    for (kind, path, contents) in rendered {
        fs::write(&path, contents.as_bytes()).map_err(|err| {
            SdtError::Resource(
                ErrorInfo::new("artifact-write", "failed to write export artifact")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        info!(path = %path.display(), bytes = contents.len(), "artifact written");
        report
            .artifacts
            .push(ArtifactRecord::new(kind, &path, contents.as_bytes()));
    }
    Ok(report)
}
