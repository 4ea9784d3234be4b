use rand::seq::SliceRandom;
use rand::RngCore;

/// Resolves the attribute order shown to one respondent.
///
/// Without shuffling the declared order is returned unchanged. Otherwise the
/// anchors (first member of each block) and all unconstrained attributes are
/// shuffled together, and each anchor is then replaced in place by its whole
/// block in declared order. Block members therefore always appear contiguous.
pub fn resolve_order<R: RngCore>(
    declared: &[&str],
    constraints: &[Vec<String>],
    shuffle: bool,
    rng: &mut R,
) -> Vec<String> {
    if !shuffle {
        return declared.iter().map(|name| name.to_string()).collect();
    }

    let is_trailing_member = |name: &str| {
        constraints
            .iter()
            .any(|block| block.iter().skip(1).any(|member| member == name))
    };
    let mut free: Vec<&str> = declared
        .iter()
        .copied()
        .filter(|name| !is_trailing_member(name))
        .collect();
    free.shuffle(rng);

    let mut order = Vec::with_capacity(declared.len());
    for name in free {
        match constraints
            .iter()
            .find(|block| block.first().map(String::as_str) == Some(name))
        {
            Some(block) => order.extend(block.iter().cloned()),
            None => order.push(name.to_string()),
        }
    }
    order
}
