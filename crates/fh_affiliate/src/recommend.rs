use fh_core::config::AffiliateConfig;
use fh_core::{AffiliateLink, Category, Platform, Result};

use crate::links::search_link;

/// (display text, search query) pairs per category group.
fn recommendations(category: Category) -> &'static [(&'static str, &'static str)] {
    match category {
        Category::Technology | Category::Programming | Category::Ai => &[
            ("プログラミング学習におすすめ", "プログラミング 入門書"),
            ("開発効率を上げるツール", "プログラマー ツール"),
        ],
        Category::Gadget | Category::Apple | Category::GoogleAndroid => &[
            ("最新ガジェットをチェック", "最新 ガジェット"),
            ("スマホアクセサリー", "スマートフォン アクセサリー"),
        ],
        Category::Book => &[
            ("関連書籍を探す", "ビジネス書 ランキング"),
            ("Kindle Unlimitedで読み放題", "kindle unlimited"),
        ],
        Category::Business | Category::Crypto => &[
            ("ビジネススキル向上に", "ビジネス スキル 本"),
            ("経営・マーケティング書籍", "マーケティング 本"),
        ],
        _ => &[
            ("今週のおすすめ商品", "おすすめ商品"),
            ("人気ランキング", "人気 ランキング"),
        ],
    }
}

/// Category-level search links, independent of the article's keywords.
pub fn category_recommendations(category: Category, config: &AffiliateConfig) -> Result<Vec<AffiliateLink>> {
    recommendations(category)
        .iter()
        .take(config.max_category_links)
        .map(|(text, query)| search_link(Platform::Amazon, query, *text, &config.amazon, &config.rakuten))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_gets_recommendations() {
        let config = AffiliateConfig::default();
        for category in Category::ALL {
            let links = category_recommendations(category, &config).unwrap();
            assert!(!links.is_empty(), "{} has no recommendations", category);
            assert!(links.len() <= config.max_category_links);
            assert!(links.iter().all(|l| l.platform == Platform::Amazon && !l.url.is_empty()));
        }
    }

    #[test]
    fn test_respects_configured_cap() {
        let config = AffiliateConfig {
            max_category_links: 1,
            ..Default::default()
        };
        let links = category_recommendations(Category::Book, &config).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].display_text, "関連書籍を探す");
    }
}
