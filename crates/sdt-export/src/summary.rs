use sdt_gen::GenerationPlan;

use crate::literal::decimal;

/// Renders the plain `.dat` summary: `Attributes`, `Weights` and
/// `Restrictions` sections, one line per entry.
pub fn render_summary(plan: &GenerationPlan) -> String {
    let mut out = String::from("Attributes\n");
    for attribute in &plan.attributes {
        out.push_str(&attribute.name);
        out.push(':');
        out.push_str(&attribute.levels.join(","));
        out.push('\n');
    }

    out.push_str("Weights\n");
    for attribute in &plan.attributes {
        let weights: Vec<String> = attribute.probabilities.iter().map(|&p| decimal(p)).collect();
        out.push_str(&attribute.name);
        out.push(':');
        out.push_str(&weights.join(","));
        out.push('\n');
    }

    out.push_str("Restrictions\n");
    for restriction in &plan.restrictions {
        let pairs: Vec<String> = restriction
            .iter()
            .map(|(attribute, level)| format!("{attribute}:{level}"))
            .collect();
        out.push_str(&pairs.join(";"));
        out.push('\n');
    }
    out
}
