//! Case-insensitive term matching shared by keyword extraction,
//! summarization and categorization.
//!
//! Terms match as plain substrings of the lowercased text, so `pc` is found
//! in `pcs` and `app` in `apps`. Occurrences are counted without overlap.

/// Occurrences of `term` in `haystack`. Both must already be lowercase.
pub fn count_term(haystack: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    haystack.matches(term).count()
}

pub fn contains_term(haystack: &str, term: &str) -> bool {
    !term.is_empty() && haystack.contains(term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_match_inside_words() {
        assert!(contains_term("new pcs and apps", "pc"));
        assert!(contains_term("new pcs and apps", "app"));
        assert_eq!(count_term("he said the ai was fine", "ai"), 2);
        assert!(contains_term("new iphone15 leaks", "iphone"));
        assert!(contains_term("生成aiの活用", "ai"));
    }

    #[test]
    fn test_counts_do_not_overlap() {
        assert_eq!(count_term("aaaa", "aa"), 2);
        assert_eq!(count_term("ai, ai; (ai)", "ai"), 3);
    }

    #[test]
    fn test_other_scripts() {
        assert_eq!(count_term("機械学習と機械学習", "機械学習"), 2);
        assert!(contains_term("最新スマホ情報", "スマホ"));
    }

    #[test]
    fn test_empty_term() {
        assert_eq!(count_term("anything", ""), 0);
        assert!(!contains_term("anything", ""));
    }
}
