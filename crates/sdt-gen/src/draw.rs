use indexmap::IndexMap;
use rand::{Rng, RngCore};

/// Running totals of `weights`; the last entry is the total mass.
pub fn cutpoints(weights: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    weights
        .iter()
        .map(|weight| {
            total += weight;
            total
        })
        .collect()
}

/// Returns the 0-based index of the first cutpoint strictly above `u`.
///
/// `u` is expected in `[0, 1)`. When rounding leaves the total slightly
/// below `u`, the last level with positive weight is chosen.
pub fn weighted_index(weights: &[f64], u: f64) -> usize {
    let points = cutpoints(weights);
    if let Some(index) = points.iter().position(|&point| u < point) {
        return index;
    }
    weights
        .iter()
        .rposition(|&weight| weight > 0.0)
        .unwrap_or_else(|| weights.len().saturating_sub(1))
}

/// Uniform 0-based draw among `count` levels.
pub fn uniform_index<R: RngCore>(count: usize, rng: &mut R) -> usize {
    rng.gen_range(0..count)
}

/// Weighted draw for `attribute`, returning a 1-based level index.
///
/// Returns `None` when the attribute has no entry or no levels.
pub fn weighted_randomize<R: RngCore>(
    probabilities: &IndexMap<String, Vec<f64>>,
    attribute: &str,
    rng: &mut R,
) -> Option<usize> {
    let weights = probabilities.get(attribute)?;
    if weights.is_empty() {
        return None;
    }
    let u: f64 = rng.gen();
    Some(weighted_index(weights, u) + 1)
}
