use crate::matcher::contains_term;

/// Keyword dictionary, grouped by topic. Order within and across groups is
/// the order keywords are reported in.
pub const KEYWORD_GROUPS: &[(&str, &[&str])] = &[
    ("ai", &["AI", "ChatGPT", "OpenAI", "LLM", "機械学習", "人工知能", "生成AI", "Gemini", "Claude"]),
    ("apple", &["iPhone", "iPad", "MacBook", "AirPods", "Apple Watch", "Vision Pro", "iOS", "macOS"]),
    ("google", &["Android", "Pixel", "Google", "Chrome"]),
    ("gadget", &[
        "スマートフォン", "スマホ", "タブレット", "ノートパソコン", "PC", "Surface", "カメラ",
        "ヘッドホン", "イヤホン", "スピーカー", "スマートウォッチ", "ガジェット",
    ]),
    ("programming", &["Python", "JavaScript", "TypeScript", "React", "Rust", "プログラミング", "GitHub"]),
    ("business", &["投資", "スタートアップ", "IPO", "買収", "決算", "startup", "acquisition"]),
    ("crypto", &["Bitcoin", "ビットコイン", "Ethereum", "ブロックチェーン", "暗号資産"]),
    ("auto", &["Tesla", "電気自動車", "EV", "自動運転"]),
    ("game", &["PlayStation", "Nintendo Switch", "Steam", "ゲーム", "Xbox"]),
    ("book", &["本", "書籍", "Kindle", "book"]),
    ("software", &["アプリ", "ソフトウェア", "app", "software", "新機能"]),
];

/// Keywords hoisted to the front of the result, in this order.
pub const PRIORITY_KEYWORDS: &[&str] = &[
    "AI", "ChatGPT", "iPhone", "Tesla", "Bitcoin", "IPO", "買収", "新機能",
];

/// Dictionary keywords found in `text`: deduplicated, priority terms first,
/// at most `max` entries. Deterministic for identical input.
pub fn extract_keywords(text: &str, max: usize) -> Vec<String> {
    if text.trim().is_empty() || max == 0 {
        return Vec::new();
    }
    let lower = text.to_lowercase();

    let mut found: Vec<&str> = Vec::new();
    for (_, terms) in KEYWORD_GROUPS {
        for &term in terms.iter() {
            let seen = found.iter().any(|f| f.eq_ignore_ascii_case(term));
            if !seen && contains_term(&lower, &term.to_lowercase()) {
                found.push(term);
            }
        }
    }

    let (mut ordered, rest): (Vec<&str>, Vec<&str>) =
        found.into_iter().partition(|k| PRIORITY_KEYWORDS.contains(k));
    ordered.sort_by_key(|k| PRIORITY_KEYWORDS.iter().position(|p| p == k));
    ordered.extend(rest);

    ordered.into_iter().take(max).map(String::from).collect()
}
