use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const RAW_FEED_FILE: &str = "rss_raw.json";
pub const PROCESSED_ARTICLES_FILE: &str = "articles_processed.json";
pub const AFFILIATE_ARTICLES_FILE: &str = "articles_with_affiliate.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStrategy {
    /// Cut at the character budget, backing off to a word boundary.
    Truncate,
    /// Pick the highest scoring sentences.
    Sentences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffiliateStrategy {
    /// Marketplace search links built from query templates.
    Search,
    /// Concrete items from the static product catalog.
    Catalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Paginated,
    Spa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortPolicy {
    Recency,
    Importance,
    /// Newest first, importance breaks ties.
    Composite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmazonConfig {
    pub tag: String,
    pub search_base_url: String,
    pub product_base_url: String,
    pub keywords: Vec<String>,
}

impl Default for AmazonConfig {
    fn default() -> Self {
        Self {
            tag: "your-amazon-tag-20".to_string(),
            search_base_url: "https://www.amazon.co.jp/s".to_string(),
            product_base_url: "https://www.amazon.co.jp/dp/".to_string(),
            keywords: ["book", "kindle", "device", "gadget"].map(String::from).to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RakutenConfig {
    pub affiliate_id: String,
    pub search_base_url: String,
    pub redirect_base_url: String,
    pub keywords: Vec<String>,
}

impl Default for RakutenConfig {
    fn default() -> Self {
        Self {
            affiliate_id: "your-rakuten-id".to_string(),
            search_base_url: "https://search.rakuten.co.jp/search/mall/".to_string(),
            redirect_base_url: "https://hb.afl.rakuten.co.jp/hgc/".to_string(),
            keywords: ["電子書籍", "ガジェット", "スマホ", "PC"].map(String::from).to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffiliateConfig {
    pub amazon: AmazonConfig,
    pub rakuten: RakutenConfig,
    pub strategy: AffiliateStrategy,
    pub max_keyword_links: usize,
    pub max_category_links: usize,
}

impl Default for AffiliateConfig {
    fn default() -> Self {
        Self {
            amazon: AmazonConfig::default(),
            rakuten: RakutenConfig::default(),
            strategy: AffiliateStrategy::Search,
            max_keyword_links: 3,
            max_category_links: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    /// Absolute URL of the deployed site, with a trailing slash.
    pub base_url: String,
    pub publication_name: String,
    pub language: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Tech News & Affiliate Hub".to_string(),
            description: "Latest tech news with curated product recommendations".to_string(),
            base_url: "https://example.github.io/feedhub/".to_string(),
            publication_name: "Tech News & Affiliate Hub".to_string(),
            language: "ja".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub mode: RenderMode,
    pub sort: SortPolicy,
    pub articles_per_page: usize,
    pub article_pages: bool,
    pub news_sitemap_limit: usize,
    /// Source-name substrings that earn the trusted-source quality bonus.
    pub trusted_sources: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Paginated,
            sort: SortPolicy::Composite,
            articles_per_page: 20,
            article_pages: true,
            news_sitemap_limit: 50,
            trusted_sources: ["BBC", "CNN", "TechCrunch", "O'Reilly", "ITmedia", "Publickey"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Process-wide configuration, built once at start-up and passed by
/// reference into every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub feeds: Vec<String>,
    pub max_articles_per_feed: usize,
    pub fetch_timeout_secs: u64,
    pub cache_ttl_minutes: u64,
    pub summary_length: usize,
    pub summary_strategy: SummaryStrategy,
    pub summary_sentences: usize,
    pub max_keywords: usize,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub cache_dir: Option<PathBuf>,
    pub site: SiteConfig,
    pub affiliate: AffiliateConfig,
    pub render: RenderConfig,
    pub verbose: bool,
    pub debug: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feeds: vec![
                "https://rss.cnn.com/rss/edition.rss".to_string(),
                "https://feeds.bbci.co.uk/news/rss.xml".to_string(),
                "https://techcrunch.com/feed/".to_string(),
                "https://feeds.feedburner.com/oreilly/radar".to_string(),
            ],
            max_articles_per_feed: 5,
            fetch_timeout_secs: 10,
            cache_ttl_minutes: 45,
            summary_length: 200,
            summary_strategy: SummaryStrategy::Truncate,
            summary_sentences: 3,
            max_keywords: 8,
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            cache_dir: None,
            site: SiteConfig::default(),
            affiliate: AffiliateConfig::default(),
            render: RenderConfig::default(),
            verbose: true,
            debug: false,
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON config file, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                serde_json::from_str(&text)
                    .map_err(|e| Error::Config(format!("invalid {}: {}", path.display(), e)))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.render.articles_per_page == 0 {
            return Err(Error::Config("articles_per_page must be positive".to_string()));
        }
        if self.summary_length == 0 {
            return Err(Error::Config("summary_length must be positive".to_string()));
        }
        if self.max_keywords == 0 {
            return Err(Error::Config("max_keywords must be positive".to_string()));
        }
        if !self.site.base_url.ends_with('/') {
            return Err(Error::Config("site.base_url must end with '/'".to_string()));
        }
        Ok(())
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn raw_feed_path(&self) -> PathBuf {
        self.data_dir.join(RAW_FEED_FILE)
    }

    pub fn processed_path(&self) -> PathBuf {
        self.data_dir.join(PROCESSED_ARTICLES_FILE)
    }

    pub fn affiliate_path(&self) -> PathBuf {
        self.data_dir.join(AFFILIATE_ARTICLES_FILE)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("cache"))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_minutes * 60)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
