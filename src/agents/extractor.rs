//! Content Extractor
//!
//! Pure stage: keeps a bounded prefix of each search result's content.

use crate::search::SearchResult;

pub struct ContentExtractor;

impl ContentExtractor {
    /// One snippet per result, in result order, each at most `max_chars` characters.
    pub fn extract(results: &[SearchResult], max_chars: usize) -> Vec<String> {
        results
            .iter()
            .map(|r| truncate_chars(&r.content, max_chars).to_string())
            .collect()
    }
}

/// Prefix of `s` holding at most `max_chars` characters, cut on a char boundary
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::MAX_SNIPPET_CHARS;

    fn result(content: &str) -> SearchResult {
        SearchResult {
            title: "t".to_string(),
            url: "u".to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_snippets_are_bounded_prefixes() {
        let long = "a".repeat(2500);
        let results = vec![result(&long), result("short"), result("")];
        let snippets = ContentExtractor::extract(&results, MAX_SNIPPET_CHARS);

        assert_eq!(snippets.len(), results.len());
        for (snippet, source) in snippets.iter().zip(&results) {
            assert!(snippet.chars().count() <= MAX_SNIPPET_CHARS);
            assert!(source.content.starts_with(snippet.as_str()));
        }
        assert_eq!(snippets[0].len(), 1000);
        assert_eq!(snippets[1], "short");
        assert_eq!(snippets[2], "");
    }

    #[test]
    fn test_multibyte_content_cut_on_char_boundary() {
        let content = "é".repeat(1200);
        let snippets = ContentExtractor::extract(&[result(&content)], MAX_SNIPPET_CHARS);
        assert_eq!(snippets[0].chars().count(), 1000);
        assert!(content.starts_with(snippets[0].as_str()));
    }

    #[test]
    fn test_exactly_max_is_untouched() {
        let content = "b".repeat(1000);
        assert_eq!(truncate_chars(&content, 1000), content);
    }

    #[test]
    fn test_empty_results_give_empty_snippets() {
        assert!(ContentExtractor::extract(&[], MAX_SNIPPET_CHARS).is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let results = vec![result(&"x".repeat(1500)), result("Paris is the capital.")];
        let first = ContentExtractor::extract(&results, MAX_SNIPPET_CHARS);
        let second = ContentExtractor::extract(&results, MAX_SNIPPET_CHARS);
        assert_eq!(first, second);
    }
}
