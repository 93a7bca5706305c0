use sha2::{Digest, Sha256};

const SEPARATORS: &[char] = &[' ', '/', '\\', '!', '?', '.', ':', '(', ')', '[', ']'];

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c == '-'
        || ('\u{3040}'..='\u{309F}').contains(&c) // hiragana
        || ('\u{30A0}'..='\u{30FF}').contains(&c) // katakana
        || ('\u{4E00}'..='\u{9FAF}').contains(&c) // kanji
}

/// Filesystem and URL safe identifier for an article id.
///
/// Underscore runs are collapsed before disallowed characters are dropped,
/// so `a _、_ b` keeps two underscores. Slugs published by earlier runs
/// depend on this order.
pub fn create_slug(article_id: &str) -> String {
    let mut collapsed = String::with_capacity(article_id.len());
    for c in article_id.chars() {
        let c = if SEPARATORS.contains(&c) { '_' } else { c };
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }
    let slug: String = collapsed.chars().filter(|c| is_slug_char(*c)).collect();
    slug.trim_matches('_').to_string()
}

/// Stable bucket in `0..10000` derived from the article link.
pub fn link_bucket(link: &str) -> u32 {
    let digest = Sha256::digest(link.as_bytes());
    let prefix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    prefix % 10_000
}

/// Article id in the `{source}_{bucket}` form. Collisions are possible.
pub fn article_id(source_name: &str, link: &str) -> String {
    format!("{}_{}", source_name, link_bucket(link))
}

/// Hex SHA-256 of arbitrary text, used for cache keys and short ids.
pub fn hex_digest(text: &str) -> String {
    Sha256::digest(text.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_slug() {
        let cases = [
            ("CNET Japan 最新情報　総合_6484", "CNET_Japan_最新情報総合_6484"),
            ("Zennのトレンド_1234", "Zennのトレンド_1234"),
            ("Qiita - 人気の記事_9876", "Qiita_-_人気の記事_9876"),
            ("iPhone_Mania_5432", "iPhone_Mania_5432"),
            ("気になる、記になる…_1111", "気になる記になる_1111"),
            ("Yahoo!ニュース・トピックス - IT_2222", "Yahoo_ニュース・トピックス_-_IT_2222"),
            ("テスト記事/記号\\含む_3333", "テスト記事_記号_含む_3333"),
            ("BBC News: (World) [Live]_42", "BBC_News_World_Live_42"),
        ];
        for (input, expected) in cases {
            assert_eq!(create_slug(input), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_separator_runs_collapse_and_edges_are_trimmed() {
        assert_eq!(create_slug("__a  ..  b__"), "a_b");
        assert_eq!(create_slug("!!!"), "");
    }

    #[test]
    fn test_runs_collapse_before_filtering() {
        assert_eq!(create_slug("a _、_ b"), "a__b");
        assert_eq!(create_slug("、_x_、"), "x");
    }

    #[test]
    fn test_article_id_is_stable() {
        let a = article_id("BBC News", "https://bbc.co.uk/1");
        let b = article_id("BBC News", "https://bbc.co.uk/1");
        assert_eq!(a, b);
        assert!(a.starts_with("BBC News_"));
        assert!(link_bucket("https://bbc.co.uk/1") < 10_000);
    }

    #[test]
    fn test_hex_digest() {
        let digest = hex_digest("https://example.com/feed");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, hex_digest("https://example.com/feed"));
        assert_ne!(digest, hex_digest("https://example.com/other"));
    }
}
