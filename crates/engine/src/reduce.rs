use std::collections::HashSet;

/// Reduce a scenario's raw candidate list to its minimal leaf selection.
///
/// Two passes:
/// 1. Existence filter: candidates without a codebook entry are silently
///    dropped (stale selections from an older codebook revision).
/// 2. Redundancy filter: a candidate is dropped when another retained
///    candidate contains it as a literal substring, so only the most
///    specific selections survive.
///
/// Containment is deliberately plain substring matching, not a
/// delimiter-aware prefix check: `"CatA"` is swallowed by `"CatAlpha"`
/// even though the two are unrelated in the hierarchy. This matches the
/// upstream linking data, which never exercises the difference.
///
/// Exact duplicates collapse to a single entry. Survivors keep their
/// input relative order, which the occurrence summary later preserves.
pub fn reduce_code_set(candidates: &[String], known_names: &HashSet<&str>) -> Vec<String> {
    let mut filtered: Vec<&str> = Vec::with_capacity(candidates.len());
    let mut seen: HashSet<&str> = HashSet::with_capacity(candidates.len());
    for candidate in candidates {
        let candidate = candidate.as_str();
        if known_names.contains(candidate) && seen.insert(candidate) {
            filtered.push(candidate);
        }
    }

    let reduced: Vec<String> = filtered
        .iter()
        .filter(|a| {
            !filtered
                .iter()
                .any(|b| *b != **a && b.contains(**a))
        })
        .map(|a| a.to_string())
        .collect();

    log::debug!(
        "reduced {} candidates to {} leaf selections",
        candidates.len(),
        reduced.len()
    );

    reduced
}
