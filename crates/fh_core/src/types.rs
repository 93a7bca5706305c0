use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// A feed entry as fetched, before any cleanup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawArticle {
    pub title: String,
    pub link: String,
    pub description: String,
    pub summary: String,
    pub published: String,
    pub tags: Vec<String>,
    pub source_feed: String,
    pub source_name: String,
    pub fetched_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFeed {
    pub feed_url: String,
    pub feed_title: String,
    pub feed_description: String,
    pub articles: Vec<RawArticle>,
    pub total_articles: usize,
    /// Served from a fresh cache file without touching the network.
    pub from_cache: bool,
    /// Served from a stale cache file because the fetch failed.
    pub from_cache_fallback: bool,
}

/// Output of the fetch stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDump {
    pub fetch_timestamp: String,
    pub total_feeds: usize,
    pub total_articles: usize,
    pub feeds: Vec<RawFeed>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Amazon,
    Rakuten,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Amazon => "amazon",
            Platform::Rakuten => "rakuten",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryPlatform {
    Amazon,
    Rakuten,
    Mixed,
}

impl PrimaryPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimaryPlatform::Amazon => "amazon",
            PrimaryPlatform::Rakuten => "rakuten",
            PrimaryPlatform::Mixed => "mixed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateLink {
    pub platform: Platform,
    pub url: String,
    pub display_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffiliateLinks {
    pub keyword_based: Vec<AffiliateLink>,
    pub category_recommendations: Vec<AffiliateLink>,
    pub total_links: usize,
}

impl AffiliateLinks {
    pub fn new(keyword_based: Vec<AffiliateLink>, category_recommendations: Vec<AffiliateLink>) -> Self {
        let total_links = keyword_based.len() + category_recommendations.len();
        Self {
            keyword_based,
            category_recommendations,
            total_links,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keyword_based.is_empty() && self.category_recommendations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monetization {
    pub has_affiliate: bool,
    pub link_count: usize,
    pub primary_platform: PrimaryPlatform,
}

/// The pipeline's one record. Later stages fill in the optional fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub original_link: String,
    pub source_name: String,
    pub source_feed: String,
    pub published: String,
    pub fetched_at: String,
    pub processed_at: String,
    pub original_content: String,
    pub clean_content: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub category: Category,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_processed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_links: Option<AffiliateLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monetization: Option<Monetization>,
}

impl Article {
    pub fn affiliate_link_count(&self) -> usize {
        self.affiliate_links.as_ref().map_or(0, |links| links.total_links)
    }

    pub fn primary_platform(&self) -> PrimaryPlatform {
        self.monetization
            .as_ref()
            .map_or(PrimaryPlatform::Mixed, |m| m.primary_platform)
    }
}

/// Output of the process stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessedDump {
    pub process_timestamp: String,
    pub total_articles: usize,
    pub skipped_articles: usize,
    pub articles: Vec<Article>,
}

/// Output of the affiliate stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffiliateDump {
    pub affiliate_process_timestamp: String,
    pub total_articles: usize,
    pub total_affiliate_links: usize,
    pub platform_distribution: BTreeMap<String, usize>,
    pub articles: Vec<Article>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_defaults_from_sparse_json() {
        let article: Article = serde_json::from_str(r#"{"id": "BBC_12", "title": "Hello"}"#).unwrap();
        assert_eq!(article.id, "BBC_12");
        assert_eq!(article.category, Category::General);
        assert!(article.keywords.is_empty());
        assert_eq!(article.affiliate_link_count(), 0);
        assert_eq!(article.primary_platform(), PrimaryPlatform::Mixed);
    }

    #[test]
    fn test_optional_link_fields_are_omitted() {
        let link = AffiliateLink {
            platform: Platform::Amazon,
            url: "https://www.amazon.co.jp/s?k=x".to_string(),
            display_text: "x".to_string(),
            keyword: None,
            product_id: None,
            price: None,
            image_url: None,
            rating: None,
        };
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["platform"], "amazon");
        assert!(json.get("price").is_none());
        assert!(json.get("rating").is_none());
    }

    #[test]
    fn test_affiliate_links_total() {
        let links = AffiliateLinks::new(vec![], vec![]);
        assert!(links.is_empty());
        assert_eq!(links.total_links, 0);
    }
}
