//! "Did you mean '...'?" suggestions for undeclared identifiers.
//!
//! Candidates are scanned in the caller's priority order (innermost scope
//! first, earliest declaration first within a scope); the first candidate
//! to reach the lowest edit distance wins ties, so the order candidates
//! are handed in *is* the tie-breaking rule.

/// Classic Wagner-Fischer edit distance, single-row rolling buffer.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost)
                .min(prev[j + 1] + 1)
                .min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn threshold(len: usize) -> usize {
    (len / 2).min(3)
}

/// Returns the best candidate for `target` among `candidates`, if any is
/// close enough (edit distance within both `len/2` and 3).
pub fn suggest<'a, I>(target: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let max_dist = threshold(target.chars().count());
    let mut best: Option<(usize, &str)> = None;
    for candidate in candidates {
        if candidate == target {
            continue;
        }
        let dist = levenshtein(target, candidate);
        if dist > max_dist {
            continue;
        }
        if best.map(|(best_dist, _)| dist < best_dist).unwrap_or(true) {
            best = Some((dist, candidate));
        }
    }
    best.map(|(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_substitution_is_suggested() {
        assert_eq!(suggest("countr", ["counter", "total"]), Some("counter"));
    }

    #[test]
    fn too_far_is_not_suggested() {
        assert_eq!(suggest("x", ["totally_unrelated_name"]), None);
    }

    #[test]
    fn first_candidate_wins_ties() {
        // "cat" is distance 1 from both "bat" and "cag"; the first in
        // priority order should win.
        assert_eq!(suggest("cat", ["bat", "cag"]), Some("bat"));
    }

    #[test]
    fn exact_match_is_never_suggested() {
        assert_eq!(suggest("x", ["x"]), None);
    }
}
