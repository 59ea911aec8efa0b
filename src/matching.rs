//! Fuzzy search over the pending list.

use crate::models::item::TodoItem;

/// Minimum partial score for a project to match a query
pub const PROJECT_THRESHOLD: u8 = 90;
/// Minimum partial score for a description to match a query
pub const DESCRIPTION_THRESHOLD: u8 = 70;

#[derive(Debug, Clone, Copy)]
pub struct MatchedItem<'a> {
    /// 1-based position of the item in the list that was searched
    pub index: usize,
    pub item: &'a TodoItem,
}

/// Similarity in `0..=100` between the shorter string and its best
/// matching substring of the longer one, of any length. Each candidate is
/// scored `2 * lcs / (len(shorter) + len(substring))`, so dropped, added and
/// swapped letters all cost about the same. Comparison ignores case.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (needle, haystack) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let mut best = 0.0_f64;
    for start in 0..haystack.len() {
        // a window opening on a letter the needle lacks is beaten by the one after it
        if !needle.contains(&haystack[start]) {
            continue;
        }
        best = best.max(best_window_from(&needle, &haystack[start..]));
        if best >= 1.0 {
            break;
        }
    }

    (best * 100.0).round() as u8
}

/// Best ratio over the windows `haystack[..1]`, `haystack[..2]`, ...
fn best_window_from(needle: &[char], haystack: &[char]) -> f64 {
    // lcs[k]: longest common subsequence of needle[..k] and the current window
    let mut lcs = vec![0usize; needle.len() + 1];
    let mut best = 0.0_f64;

    for (width, &c) in (1..).zip(haystack) {
        let mut diagonal = 0;
        for k in 1..=needle.len() {
            let above = lcs[k];
            lcs[k] = if needle[k - 1] == c {
                diagonal + 1
            } else {
                above.max(lcs[k - 1])
            };
            diagonal = above;
        }

        let common = lcs[needle.len()];
        let ratio = (2 * common) as f64 / (needle.len() + width) as f64;
        best = best.max(ratio);
    }

    best
}

/// Two passes over `items`: project matches first, then description
/// matches. An item that satisfies both passes is returned twice.
pub fn fuzzy_match<'a>(query: &str, items: &'a [TodoItem]) -> Vec<MatchedItem<'a>> {
    let by_project = items
        .iter()
        .enumerate()
        .filter(|(_, item)| partial_ratio(query, &item.project) >= PROJECT_THRESHOLD);

    let by_description = items
        .iter()
        .enumerate()
        .filter(|(_, item)| partial_ratio(query, &item.description) >= DESCRIPTION_THRESHOLD);

    by_project
        .chain(by_description)
        .map(|(position, item)| MatchedItem {
            index: position + 1,
            item,
        })
        .collect()
}
