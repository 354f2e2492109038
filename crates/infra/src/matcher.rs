//! Default text relevance scorer.
//!
//! Hosts usually inject their own fuzzy scorer through the [`Matcher`]
//! port; this subsequence matcher is the fallback for hosts without one.
//! The engine only uses the score as a `> 0` filter, so the exact scale is
//! irrelevant as long as non-matches score zero.

use tally_core::Matcher;

/// Case-insensitive subsequence matcher.
///
/// Matches when every character of the needle appears in the haystack in
/// order; contiguous runs score higher than scattered ones.
pub struct SubsequenceMatcher;

impl Matcher for SubsequenceMatcher {
    fn score(&self, haystack: &str, needle: &str) -> i32 {
        let needle: Vec<char> = needle.trim().to_lowercase().chars().collect();
        if needle.is_empty() {
            return 1;
        }

        let mut matched = 0usize;
        let mut run = 0usize;
        let mut best_run = 0usize;
        let mut previous_hit = false;

        for c in haystack.to_lowercase().chars() {
            if matched < needle.len() && c == needle[matched] {
                matched += 1;
                run = if previous_hit { run + 1 } else { 1 };
                best_run = best_run.max(run);
                previous_hit = true;
            } else {
                previous_hit = false;
            }
        }

        if matched < needle.len() {
            return 0;
        }
        let score = needle.len() + best_run * 2;
        i32::try_from(score).unwrap_or(i32::MAX)
    }
}
