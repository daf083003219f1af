//! Search keyword cleanup and query string generation.

use regex::Regex;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::LazyLock;

use crate::normalize::{remove_accents, remove_special_chars};

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+").expect("leading number pattern is valid"));

/// Keep the first occurrence of every item, preserving order.
///
/// ```
/// assert_eq!(utilkit_text::deduplicate(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
/// ```
pub fn deduplicate<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Split comma-separated keyword input into cleaned, unique terms.
///
/// The input is lower-cased and trimmed, a leading count such as `"12 "` is
/// dropped, and each term loses its special characters. Empty terms are
/// discarded.
///
/// ```
/// assert_eq!(
///     utilkit_text::clean_keyword("3 Áo thun, quần jean!, áo thun"),
///     vec!["áo thun", "quần jean"]
/// );
/// ```
pub fn clean_keyword(input: &str) -> Vec<String> {
    let lowered = input.trim().to_lowercase();
    let stripped = LEADING_NUMBER.replace(&lowered, "");

    deduplicate(
        stripped
            .split(',')
            .map(remove_special_chars)
            .filter(|term| !term.is_empty()),
    )
}

/// Build a query string matching a cleaned keyword with or without accents.
///
/// Words are split on single spaces and joined with `AND`; the accented and
/// folded groups are joined with `OR`.
///
/// ```
/// assert_eq!(
///     utilkit_text::to_dsl_query_string("hcm quận1"),
///     "(hcm AND quận1) OR (hcm AND quan1)"
/// );
/// ```
pub fn to_dsl_query_string(keyword: &str) -> String {
    let words: Vec<&str> = keyword.split(' ').collect();
    let folded: Vec<String> = words.iter().map(|word| remove_accents(word)).collect();

    format!("({}) OR ({})", words.join(" AND "), folded.join(" AND "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deduplicate_keeps_first_occurrence() {
        assert_eq!(
            deduplicate(["b", "a", "b", "c", "a"]),
            vec!["b", "a", "c"]
        );
        assert!(deduplicate(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_clean_keyword_strips_leading_count_only() {
        assert_eq!(clean_keyword("10 bàn phím"), vec!["bàn phím"]);
        assert_eq!(clean_keyword("iphone 15"), vec!["iphone 15"]);
        assert_eq!(clean_keyword("15pro"), vec!["15pro"]);
    }

    #[test]
    fn test_clean_keyword_drops_empty_terms() {
        assert_eq!(clean_keyword("a,,b, ,!!"), vec!["a", "b"]);
        assert!(clean_keyword("   ").is_empty());
    }

    #[test]
    fn test_clean_keyword_deduplicates_after_cleaning() {
        assert_eq!(clean_keyword("Hà Nội, hà nội!, HÀ NỘI"), vec!["hà nội"]);
    }

    #[test]
    fn test_dsl_query_single_word() {
        assert_eq!(to_dsl_query_string("phở"), "(phở) OR (pho)");
    }
}
