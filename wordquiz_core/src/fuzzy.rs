//! Fuzzy string matching for "almost right" answer feedback
//!
//! Only used to describe how close a wrong answer was. Whether an answer is
//! correct is decided by exact matching against the word list.

use strsim::{jaro_winkler, levenshtein, normalized_levenshtein};

/// Default similarity at or above which a wrong answer counts as a near miss
pub const DEFAULT_NEAR_MISS_THRESHOLD: f64 = 0.8;

/// The accepted answer closest to a wrong one
#[derive(Debug, Clone, PartialEq)]
pub struct NearMiss {
    pub expected: String,
    pub similarity: f64,
    /// Edit distance in characters
    pub distance: usize,
}

fn normalize(s: &str, case_sensitive: bool) -> String {
    let trimmed = s.trim();
    if case_sensitive {
        trimmed.to_string()
    } else {
        trimmed.to_lowercase()
    }
}

/// Similarity between 0.0 and 1.0
pub fn similarity(answer: &str, expected: &str, case_sensitive: bool) -> f64 {
    let answer = normalize(answer, case_sensitive);
    let expected = normalize(expected, case_sensitive);

    if answer == expected {
        return 1.0;
    }

    // Weighted average (Jaro-Winkler is better for typos)
    normalized_levenshtein(&answer, &expected) * 0.4 + jaro_winkler(&answer, &expected) * 0.6
}

/// The candidate most similar to `answer`, if it reaches `threshold`.
pub fn closest_match<'a, I>(answer: &str, candidates: I, case_sensitive: bool, threshold: f64) -> Option<NearMiss>
where
    I: IntoIterator<Item = &'a str>,
{
    let best = candidates
        .into_iter()
        .map(|candidate| (candidate, similarity(answer, candidate, case_sensitive)))
        .fold(None::<(&str, f64)>, |best, current| match best {
            Some((_, score)) if score >= current.1 => best,
            _ => Some(current),
        })?;

    let (expected, score) = best;
    if score < threshold {
        return None;
    }

    Some(NearMiss {
        expected: expected.to_string(),
        similarity: score,
        distance: levenshtein(&normalize(answer, case_sensitive), &normalize(expected, case_sensitive)),
    })
}
