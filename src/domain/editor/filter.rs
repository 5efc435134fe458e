//! Suggestion filtering: case-insensitive containment, store order preserved

use crate::domain::reference::Candidate;

/// Candidates whose name contains `fragment`, ignoring case
pub fn filter(candidates: &[Candidate], fragment: &str) -> Vec<Candidate> {
    filter_limited(candidates, fragment, None)
}

/// Like [`filter`], truncated to `limit` entries after matching
pub fn filter_limited(
    candidates: &[Candidate],
    fragment: &str,
    limit: Option<usize>,
) -> Vec<Candidate> {
    let needle = fragment.to_lowercase();

    candidates
        .iter()
        .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
        .take(limit.unwrap_or(usize::MAX))
        .cloned()
        .collect()
}
