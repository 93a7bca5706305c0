use fh_core::Category;

use crate::matcher::{contains_term, count_term};

pub struct CategoryRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
    pub min_score: usize,
}

/// Category rules in declaration order. On equal scores the rule declared
/// first wins.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Ai,
        keywords: &["ai", "chatgpt", "openai", "llm", "gpt", "機械学習", "人工知能", "生成ai", "ディープラーニング"],
        min_score: 1,
    },
    CategoryRule {
        category: Category::Apple,
        keywords: &["iphone", "ipad", "macbook", "airpods", "apple", "ios", "macos", "vision pro"],
        min_score: 1,
    },
    CategoryRule {
        category: Category::GoogleAndroid,
        keywords: &["android", "pixel", "google", "chrome", "gemini"],
        min_score: 1,
    },
    CategoryRule {
        category: Category::AutoEv,
        keywords: &["tesla", "電気自動車", "ev", "自動運転", "electric vehicle", "トヨタ"],
        min_score: 1,
    },
    CategoryRule {
        category: Category::Crypto,
        keywords: &["bitcoin", "ビットコイン", "ethereum", "ブロックチェーン", "暗号資産", "crypto", "仮想通貨"],
        min_score: 1,
    },
    CategoryRule {
        category: Category::Game,
        keywords: &["playstation", "nintendo", "switch", "steam", "xbox", "ゲーム", "game"],
        min_score: 1,
    },
    CategoryRule {
        category: Category::Programming,
        keywords: &["python", "javascript", "typescript", "react", "rust", "github", "プログラミング", "エンジニア"],
        min_score: 1,
    },
    CategoryRule {
        category: Category::Gadget,
        keywords: &["device", "smartphone", "gadget", "スマホ", "ガジェット", "カメラ", "ヘッドホン", "イヤホン", "スマートウォッチ"],
        min_score: 1,
    },
    CategoryRule {
        category: Category::Business,
        keywords: &["business", "economy", "market", "company", "startup", "ipo", "ビジネス", "経済", "投資", "買収", "決算"],
        min_score: 2,
    },
    CategoryRule {
        category: Category::Book,
        keywords: &["book", "author", "publish", "kindle", "本", "書籍", "読書"],
        min_score: 2,
    },
    CategoryRule {
        category: Category::Technology,
        keywords: &["technology", "tech", "software", "app", "cloud", "テクノロジー", "アプリ", "ソフト"],
        min_score: 2,
    },
];

/// Substring checks consulted when no rule reaches its threshold.
const FALLBACKS: &[(&str, Category)] = &[
    ("アプリ", Category::Technology),
    ("app", Category::Technology),
    ("tech", Category::Technology),
    ("書籍", Category::Book),
    ("経済", Category::Business),
    ("market", Category::Business),
];

/// Score of every rule for the given title and body. Title matches count
/// twice: once alone and once as part of the combined text.
pub fn category_scores(title: &str, content: &str) -> Vec<(Category, usize)> {
    let title_lower = title.to_lowercase();
    let combined = format!("{} {}", title, content).to_lowercase();
    CATEGORY_RULES
        .iter()
        .map(|rule| {
            let score = rule
                .keywords
                .iter()
                .map(|k| count_term(&combined, k) + count_term(&title_lower, k))
                .sum();
            (rule.category, score)
        })
        .collect()
}

/// Picks exactly one category. Never fails; falls back to `General`.
pub fn categorize(title: &str, content: &str) -> Category {
    let mut best: Option<(Category, usize)> = None;
    for (rule, (category, score)) in CATEGORY_RULES.iter().zip(category_scores(title, content)) {
        if score == 0 || score < rule.min_score {
            continue;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((category, score));
        }
    }
    if let Some((category, _)) = best {
        return category;
    }

    let combined = format!("{} {}", title, content).to_lowercase();
    FALLBACKS
        .iter()
        .find(|(term, _)| contains_term(&combined, term))
        .map_or(Category::General, |(_, category)| *category)
}
