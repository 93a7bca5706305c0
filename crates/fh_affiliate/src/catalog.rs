//! Catalog strategy: articles are matched to concrete products.

use std::collections::HashMap;

use fh_core::config::AmazonConfig;
use fh_core::{AffiliateLink, Category, Platform, Result};

use crate::links::amazon_product_url;
use crate::search::MAX_CANDIDATES;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub key: String,
    pub product_id: String,
    pub title: String,
    pub price: String,
    pub image_url: String,
    pub rating: f32,
}

/// Source of product details for a semantic product key.
pub trait ProductCatalog: Send + Sync {
    fn name(&self) -> &str;

    fn lookup(&self, key: &str) -> Option<Product>;
}

// Illustrative fixture data; ids, prices and ratings are not live inventory.
const FIXTURES: &[(&str, &str, &str, &str, f32)] = &[
    ("ai_programming", "B0EXAMPLE01", "AIプログラミング入門", "¥2,980", 4.3),
    ("chatgpt_guide", "B0EXAMPLE02", "ChatGPT 活用ガイドブック", "¥1,760", 4.1),
    ("python_book", "B0EXAMPLE03", "Pythonではじめるデータ分析", "¥3,300", 4.5),
    ("javascript_book", "B0EXAMPLE04", "モダンJavaScript入門", "¥3,080", 4.2),
    ("iphone_case", "B0EXAMPLE05", "iPhone 耐衝撃クリアケース", "¥1,980", 4.4),
    ("iphone_charger", "B0EXAMPLE06", "USB-C 急速充電器 20W", "¥2,490", 4.6),
    ("ipad_pencil", "B0EXAMPLE07", "iPad 対応タッチペン", "¥3,599", 4.0),
    ("macbook_hub", "B0EXAMPLE08", "USB-C ハブ 7in1", "¥4,280", 4.3),
    ("wireless_earphones", "B0EXAMPLE09", "ワイヤレスイヤホン ノイズキャンセリング", "¥8,990", 4.2),
    ("android_charger", "B0EXAMPLE10", "Android 対応 急速充電器", "¥1,890", 4.1),
    ("noise_cancel_headphones", "B0EXAMPLE11", "ノイズキャンセリング ヘッドホン", "¥24,800", 4.7),
    ("mirrorless_camera", "B0EXAMPLE12", "ミラーレス一眼カメラ レンズキット", "¥89,800", 4.6),
    ("smartwatch_band", "B0EXAMPLE13", "スマートウォッチ 交換バンド", "¥1,299", 4.0),
    ("investing_book", "B0EXAMPLE14", "はじめての資産運用", "¥1,650", 4.2),
    ("startup_book", "B0EXAMPLE15", "スタートアップ経営の教科書", "¥2,420", 4.3),
    ("crypto_book", "B0EXAMPLE16", "ブロックチェーン解説書", "¥2,640", 3.9),
    ("ev_charger", "B0EXAMPLE17", "EV 充電ケーブル 200V", "¥19,800", 4.1),
    ("ps5_controller", "B0EXAMPLE18", "PS5 ワイヤレスコントローラー", "¥9,480", 4.6),
    ("switch_pro_controller", "B0EXAMPLE19", "Switch Pro コントローラー", "¥7,678", 4.5),
    ("gaming_keyboard", "B0EXAMPLE20", "ゲーミングキーボード メカニカル", "¥12,980", 4.4),
    ("kindle_paperwhite", "B0EXAMPLE21", "Kindle Paperwhite", "¥16,980", 4.6),
    ("business_bestseller", "B0EXAMPLE22", "ビジネス書ベストセラー", "¥1,980", 4.2),
];

/// Lowercased title substrings that point straight at a product.
const TITLE_TRIGGERS: &[(&str, &str)] = &[
    ("iphone", "iphone_case"),
    ("chatgpt", "chatgpt_guide"),
    ("ipad", "ipad_pencil"),
    ("macbook", "macbook_hub"),
    ("airpods", "wireless_earphones"),
    ("pixel", "android_charger"),
    ("tesla", "ev_charger"),
    ("bitcoin", "crypto_book"),
    ("playstation", "ps5_controller"),
    ("switch", "switch_pro_controller"),
    ("kindle", "kindle_paperwhite"),
];

const KEYWORD_KEYS: &[(&str, &[&str])] = &[
    ("AI", &["ai_programming", "chatgpt_guide"]),
    ("ChatGPT", &["chatgpt_guide"]),
    ("Python", &["python_book"]),
    ("JavaScript", &["javascript_book"]),
    ("React", &["javascript_book"]),
    ("iPhone", &["iphone_case", "iphone_charger"]),
    ("iPad", &["ipad_pencil"]),
    ("MacBook", &["macbook_hub"]),
    ("AirPods", &["wireless_earphones"]),
    ("Android", &["android_charger"]),
    ("Pixel", &["android_charger"]),
    ("ヘッドホン", &["noise_cancel_headphones"]),
    ("イヤホン", &["wireless_earphones"]),
    ("カメラ", &["mirrorless_camera"]),
    ("スマートウォッチ", &["smartwatch_band"]),
    ("投資", &["investing_book"]),
    ("スタートアップ", &["startup_book"]),
    ("Bitcoin", &["crypto_book"]),
    ("ビットコイン", &["crypto_book"]),
    ("Tesla", &["ev_charger"]),
    ("電気自動車", &["ev_charger"]),
    ("PlayStation", &["ps5_controller"]),
    ("Nintendo Switch", &["switch_pro_controller"]),
    ("Steam", &["gaming_keyboard"]),
    ("Kindle", &["kindle_paperwhite"]),
];

fn category_default_keys(category: Category) -> &'static [&'static str] {
    match category {
        Category::Ai => &["ai_programming", "python_book"],
        Category::Apple => &["iphone_charger", "wireless_earphones"],
        Category::GoogleAndroid => &["android_charger"],
        Category::Business => &["business_bestseller", "investing_book"],
        Category::Technology => &["python_book", "macbook_hub"],
        Category::Gadget => &["noise_cancel_headphones", "mirrorless_camera"],
        Category::Programming => &["python_book", "javascript_book"],
        Category::Game => &["gaming_keyboard", "ps5_controller"],
        Category::AutoEv => &["ev_charger"],
        Category::Crypto => &["crypto_book"],
        Category::Book | Category::General => &["kindle_paperwhite", "business_bestseller"],
    }
}

/// In-memory catalog over the built-in fixture table.
pub struct StaticCatalog {
    products: HashMap<String, Product>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        let products = FIXTURES
            .iter()
            .map(|(key, id, title, price, rating)| {
                let product = Product {
                    key: key.to_string(),
                    product_id: id.to_string(),
                    title: title.to_string(),
                    price: price.to_string(),
                    image_url: format!("https://images-fe.ssl-images-amazon.com/images/P/{}.09.LZZZZZZZ.jpg", id),
                    rating: *rating,
                };
                (key.to_string(), product)
            })
            .collect();
        Self { products }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductCatalog for StaticCatalog {
    fn name(&self) -> &str {
        "static"
    }

    fn lookup(&self, key: &str) -> Option<Product> {
        self.products.get(key).cloned()
    }
}

/// Product keys for an article. Title triggers outrank keyword matches,
/// which outrank category defaults; duplicates keep their first position.
pub fn select_product_keys(title: &str, keywords: &[String], category: Category) -> Vec<&'static str> {
    let title = title.to_lowercase();
    let from_title = TITLE_TRIGGERS
        .iter()
        .filter(|(trigger, _)| title.contains(trigger))
        .map(|(_, key)| *key);
    let from_keywords = keywords.iter().take(5).flat_map(|keyword| {
        KEYWORD_KEYS
            .iter()
            .filter(move |(k, _)| k == keyword)
            .flat_map(|(_, keys)| keys.iter().copied())
    });
    let from_category = category_default_keys(category).iter().copied();

    let mut keys: Vec<&'static str> = Vec::new();
    for key in from_title.chain(from_keywords).chain(from_category) {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys.truncate(MAX_CANDIDATES);
    keys
}

pub fn product_link(product: &Product, config: &AmazonConfig) -> Result<AffiliateLink> {
    Ok(AffiliateLink {
        platform: Platform::Amazon,
        url: amazon_product_url(&product.product_id, config)?,
        display_text: product.title.clone(),
        keyword: None,
        product_id: Some(product.product_id.clone()),
        price: Some(product.price.clone()),
        image_url: Some(product.image_url.clone()),
        rating: Some(product.rating),
    })
}

/// Links for the selected products. Keys the catalog does not know are skipped.
pub fn catalog_links(
    title: &str,
    keywords: &[String],
    category: Category,
    catalog: &dyn ProductCatalog,
    config: &AmazonConfig,
    limit: usize,
) -> Result<Vec<AffiliateLink>> {
    select_product_keys(title, keywords, category)
        .into_iter()
        .filter_map(|key| catalog.lookup(key))
        .take(limit)
        .map(|product| product_link(&product, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    struct EmptyCatalog;

    impl ProductCatalog for EmptyCatalog {
        fn name(&self) -> &str {
            "empty"
        }

        fn lookup(&self, _key: &str) -> Option<Product> {
            None
        }
    }

    #[test]
    fn test_every_referenced_key_exists() {
        let catalog = StaticCatalog::new();
        assert_eq!(catalog.len(), FIXTURES.len());
        let referenced = TITLE_TRIGGERS
            .iter()
            .map(|(_, key)| *key)
            .chain(KEYWORD_KEYS.iter().flat_map(|(_, keys)| keys.iter().copied()))
            .chain(Category::ALL.iter().flat_map(|c| category_default_keys(*c).iter().copied()));
        for key in referenced {
            assert!(catalog.lookup(key).is_some(), "missing fixture {}", key);
        }
    }

    #[test]
    fn test_title_outranks_keywords_and_category() {
        let keys = select_product_keys("Tesla starts deliveries", &words(&["AI"]), Category::Apple);
        assert_eq!(keys, vec!["ev_charger", "ai_programming", "chatgpt_guide", "iphone_charger"]);
    }

    #[test]
    fn test_keys_are_deduplicated_in_priority_order() {
        let keys = select_product_keys("New iPhone launch", &words(&["iPhone"]), Category::Apple);
        assert_eq!(keys, vec!["iphone_case", "iphone_charger", "wireless_earphones"]);
    }

    #[test]
    fn test_catalog_links_carry_product_metadata() {
        let catalog = StaticCatalog::new();
        let config = AmazonConfig::default();
        let links = catalog_links("", &words(&["Python"]), Category::Programming, &catalog, &config, 3).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].product_id.as_deref(), Some("B0EXAMPLE03"));
        assert_eq!(links[0].url, "https://www.amazon.co.jp/dp/B0EXAMPLE03?tag=your-amazon-tag-20");
        assert!(links[0].price.is_some());
        assert!(links[0].rating.is_some());
    }

    #[test]
    fn test_catalog_links_respect_limit() {
        let catalog = StaticCatalog::new();
        let links = catalog_links(
            "iPhone and iPad and MacBook",
            &words(&["AI"]),
            Category::Apple,
            &catalog,
            &AmazonConfig::default(),
            3,
        )
        .unwrap();
        assert_eq!(links.len(), 3);
    }

    #[test]
    fn test_unknown_products_are_skipped() {
        let links = catalog_links("iPhone", &[], Category::Apple, &EmptyCatalog, &AmazonConfig::default(), 3).unwrap();
        assert!(links.is_empty());
    }
}
