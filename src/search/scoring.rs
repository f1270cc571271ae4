//! Typo-tolerant name scoring.
//!
//! Scores are in `[0, 1]`, lower is better, and `0` is reserved for a
//! case-insensitive exact match. The query is matched against the best
//! substring of the candidate by edit distance, then weighted by where that
//! substring ends and by how much of the candidate it covers.

/// Candidates needing more edits than this fraction of the query are dropped
pub const MATCH_THRESHOLD: f64 = 0.4;

const ERROR_WEIGHT: f64 = 0.6;
const LOCATION_WEIGHT: f64 = 0.25;
const COVERAGE_WEIGHT: f64 = 0.15;

/// Scores an ASCII-folded `candidate` against an ASCII-folded `query`.
///
/// Returns `None` when the candidate does not match well enough.
pub fn score(query: &[u8], candidate: &[u8]) -> Option<f64> {
    if query.is_empty() || candidate.is_empty() {
        return None;
    }
    if query == candidate {
        return Some(0.0);
    }
    // Each byte the candidate lacks costs at least one edit
    let shortfall = query.len().saturating_sub(candidate.len());
    if shortfall as f64 / query.len() as f64 > MATCH_THRESHOLD {
        return None;
    }

    let (errors, end) = best_substring_distance(query, candidate);
    let error_ratio = errors as f64 / query.len() as f64;
    if error_ratio > MATCH_THRESHOLD {
        return None;
    }

    let start = (end + 1).saturating_sub(query.len());
    let location = start as f64 / candidate.len() as f64;
    let coverage = 1.0 - (query.len() as f64 / candidate.len() as f64).min(1.0);

    let score = ERROR_WEIGHT * error_ratio + LOCATION_WEIGHT * location + COVERAGE_WEIGHT * coverage;
    Some(score.clamp(f64::MIN_POSITIVE, 1.0))
}

/// Smallest edit distance between `query` and any substring of
/// `candidate`, with the index where the best substring ends.
fn best_substring_distance(query: &[u8], candidate: &[u8]) -> (usize, usize) {
    // Row 0 is all zeros: the match may start anywhere in the candidate
    let mut prev = vec![0usize; candidate.len() + 1];
    let mut cur = vec![0usize; candidate.len() + 1];

    for (i, &q) in query.iter().enumerate() {
        cur[0] = i + 1;
        for (j, &c) in candidate.iter().enumerate() {
            let substitution = prev[j] + usize::from(q != c);
            let deletion = prev[j + 1] + 1;
            let insertion = cur[j] + 1;
            cur[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    let mut best = (usize::MAX, 0);
    for (j, &errors) in prev.iter().enumerate().skip(1) {
        if errors < best.0 {
            best = (errors, j - 1);
        }
    }
    best
}
