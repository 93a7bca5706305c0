//! Search-link strategy: article keywords become marketplace search queries.

use fh_core::config::AffiliateConfig;
use fh_core::{AffiliateLink, Category, Platform, Result};

use crate::links::search_link;

/// At most this many candidate queries are considered per article.
pub const MAX_CANDIDATES: usize = 4;
const KEYWORDS_CONSIDERED: usize = 5;
const QUERIES_PER_KEYWORD: usize = 2;
const NO_QUERIES: &[&str] = &[];

const KEYWORD_QUERIES: &[(&str, &[&str])] = &[
    ("AI", &["AI プログラミング 本", "Python 機械学習 本", "ChatGPT 活用法"]),
    ("ChatGPT", &["ChatGPT 本", "AI 活用 ガイドブック", "プロンプト エンジニアリング"]),
    ("Python", &["Python 入門書", "データ分析 本", "プログラミング 学習本"]),
    ("JavaScript", &["JavaScript 本", "Web開発 教本", "React 入門書"]),
    ("React", &["React 開発本", "フロントエンド 開発書", "JavaScript フレームワーク"]),
    ("iPhone", &["iPhone ケース", "iPhone 充電器", "iPhone アクセサリー", "ワイヤレス充電器"]),
    ("iPad", &["iPad ケース", "Apple Pencil", "iPad キーボード", "タブレット スタンド"]),
    ("MacBook", &["MacBook ケース", "USB-C ハブ", "外付けSSD", "ワイヤレスマウス"]),
    ("AirPods", &["AirPods ケース", "ワイヤレスイヤホン", "イヤホン 収納"]),
    ("Android", &["Android ケース", "Android 充電器", "スマホ アクセサリー"]),
    ("Pixel", &["Pixel ケース", "Google Pixel アクセサリー", "Android 本"]),
    ("ヘッドホン", &["ノイズキャンセリング ヘッドホン", "ワイヤレス ヘッドホン", "ゲーミング ヘッドセット"]),
    ("カメラ", &["ミラーレス カメラ", "カメラ レンズ", "三脚", "カメラ ストラップ"]),
    ("スマートウォッチ", &["Apple Watch バンド", "スマートウォッチ 充電器", "フィットネス トラッカー"]),
    ("投資", &["投資 入門書", "株式投資 本", "資産運用 ガイド"]),
    ("スタートアップ", &["起業 本", "ビジネス書", "経営戦略 本"]),
    ("Bitcoin", &["仮想通貨 本", "ブロックチェーン 解説書", "投資 ガイド"]),
    ("Tesla", &["電気自動車 本", "Tesla グッズ", "EV 充電器"]),
    ("電気自動車", &["EV 充電ケーブル", "電気自動車 本", "カー アクセサリー"]),
    ("PlayStation", &["PS5 アクセサリー", "ゲーミング ヘッドセット", "コントローラー"]),
    ("Nintendo Switch", &["Switch ケース", "Pro コントローラー", "ゲームソフト"]),
    ("Steam", &["ゲーミング キーボード", "ゲーミング マウス", "PC ゲーム"]),
];

fn category_queries(category: Category) -> &'static [&'static str] {
    match category {
        Category::Technology | Category::Programming => &["プログラミング 本", "開発者 ツール"],
        Category::Ai => &["AI 入門書", "機械学習 実践書"],
        Category::Apple => &["Apple アクセサリー", "iPhone グッズ"],
        Category::Gadget | Category::GoogleAndroid => &["最新 ガジェット", "スマホ アクセサリー"],
        Category::Business | Category::Crypto => &["ビジネス書 ランキング", "自己啓発 本"],
        Category::Game => &["ゲーミング デバイス", "ゲーム グッズ"],
        Category::Book => &["ビジネス書 ランキング", "Kindle 本"],
        Category::AutoEv => &["カー アクセサリー", "EV 充電器"],
        Category::General => &["人気商品 ランキング", "おすすめ グッズ"],
    }
}

/// Marketplaces worth linking for a category, in preference order.
pub fn category_platforms(category: Category) -> &'static [Platform] {
    match category {
        Category::Technology
        | Category::Apple
        | Category::Gadget
        | Category::GoogleAndroid
        | Category::Game
        | Category::AutoEv => &[Platform::Amazon, Platform::Rakuten],
        _ => &[Platform::Amazon],
    }
}

/// Candidate search queries: keyword queries first, then category defaults,
/// deduplicated and capped.
pub fn candidate_queries(keywords: &[String], category: Category) -> Vec<&'static str> {
    let from_keywords = keywords.iter().take(KEYWORDS_CONSIDERED).flat_map(|keyword| {
        KEYWORD_QUERIES
            .iter()
            .find(|(k, _)| k == keyword)
            .map_or(NO_QUERIES, |(_, queries)| *queries)
            .iter()
            .take(QUERIES_PER_KEYWORD)
    });

    let mut queries: Vec<&'static str> = Vec::new();
    for query in from_keywords.chain(category_queries(category).iter()) {
        if !queries.contains(query) {
            queries.push(*query);
        }
    }
    queries.truncate(MAX_CANDIDATES);
    queries
}

fn hints<'a>(platform: Platform, config: &'a AffiliateConfig) -> &'a [String] {
    match platform {
        Platform::Amazon => &config.amazon.keywords,
        Platform::Rakuten => &config.rakuten.keywords,
    }
}

/// The first platform whose keyword hints appear in the query, else the
/// category's preferred platform.
pub fn choose_platform(query: &str, platforms: &[Platform], config: &AffiliateConfig) -> Platform {
    let query = query.to_lowercase();
    platforms
        .iter()
        .copied()
        .find(|p| hints(*p, config).iter().any(|h| query.contains(&h.to_lowercase())))
        .or_else(|| platforms.first().copied())
        .unwrap_or(Platform::Amazon)
}

pub fn keyword_links(keywords: &[String], category: Category, config: &AffiliateConfig) -> Result<Vec<AffiliateLink>> {
    let platforms = category_platforms(category);
    candidate_queries(keywords, category)
        .into_iter()
        .take(config.max_keyword_links)
        .map(|query| {
            let platform = choose_platform(query, platforms, config);
            search_link(platform, query, format!("🛒 {}", query), &config.amazon, &config.rakuten)
        })
        .collect()
}
