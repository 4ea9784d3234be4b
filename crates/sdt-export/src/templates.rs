use std::fmt::Write;
use std::path::{Path, PathBuf};

use sdt_gen::{attribute_key, level_key, GenerationPlan};

fn field(key: &str) -> String {
    format!("${{e://Field/{key}}}")
}

/// Renders the question template for 1-based `task`: a header row naming
/// each choice, then one row per attribute position.
pub fn render_template(plan: &GenerationPlan, task: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<span>Question {task}</span>");
    out.push_str("<br /><br />\n");
    out.push_str(
        "<span>Please carefully review the options detailed below, then please answer the questions.</span>\n",
    );
    out.push_str("<br />\n<br />\n");
    out.push_str("<span>Which of these choices do you prefer?</span>\n");
    out.push_str("<br />\n<div>\n<br />\n<table class=\"UserTable\">\n<tbody>\n");

    out.push_str("<tr>\n<td>&nbsp;</td>\n");
    for profile in 1..=plan.profiles {
        let _ = writeln!(
            out,
            "<td style=\"text-align: center;\"><strong>Choice {profile}</strong></td>"
        );
    }
    out.push_str("</tr>\n");

    for position in 1..=plan.attributes.len() {
        out.push_str("<tr>\n");
        let _ = writeln!(
            out,
            "<td style=\"text-align: center;\"><strong>{}</strong></td>",
            field(&attribute_key(task, position))
        );
        for profile in 1..=plan.profiles {
            let _ = writeln!(
                out,
                "<td style=\"text-align: center;\">{}</td>",
                field(&level_key(task, profile, position))
            );
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n</div>\n");
    out
}

/// Output paths `<stem>_task<k>.html` for every task, where `base` is the
/// requested `.html` path.
pub fn template_paths(base: &Path, tasks: usize) -> Vec<PathBuf> {
    let stem = match base.extension() {
        Some(extension) if extension == "html" => base.with_extension(""),
        _ => base.to_path_buf(),
    };
    let name = stem
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    (1..=tasks)
        .map(|task| stem.with_file_name(format!("{name}_task{task}.html")))
        .collect()
}
