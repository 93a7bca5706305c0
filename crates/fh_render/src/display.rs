use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fh_core::config::RenderConfig;
use fh_core::slug::create_slug;
use fh_core::timestamp::parse_timestamp;
use fh_core::Article;

use crate::score::{importance_score, quality_score};

pub const DISPLAY_SUMMARY_LENGTH: usize = 300;
pub const UNKNOWN_DATE: &str = "不明";

/// An article plus everything the pages and the JSON API show about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayArticle {
    #[serde(flatten)]
    pub article: Article,
    pub slug: String,
    /// Empty when the article has no page of its own.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail_url: String,
    pub category_label: String,
    pub display_summary: String,
    pub published_formatted: String,
    pub has_affiliate_links: bool,
    pub importance_score: u32,
    pub quality_score: u32,
}

pub fn display_summary(summary: &str) -> String {
    if summary.chars().count() <= DISPLAY_SUMMARY_LENGTH {
        return summary.to_string();
    }
    let head: String = summary.chars().take(DISPLAY_SUMMARY_LENGTH - 3).collect();
    format!("{}...", head)
}

pub fn format_published(published: &str) -> String {
    let parsed = parse_timestamp(published);
    if parsed.is_parsed() {
        parsed.instant().format("%Y-%m-%d").to_string()
    } else {
        UNKNOWN_DATE.to_string()
    }
}

pub fn detail_path(slug: &str) -> String {
    format!("articles/{}.html", slug)
}

impl DisplayArticle {
    pub fn new(article: Article, config: &RenderConfig, now: DateTime<Utc>) -> Self {
        let slug = create_slug(&article.id);
        Self {
            detail_url: detail_path(&slug),
            slug,
            category_label: article.category.label().to_string(),
            display_summary: display_summary(&article.summary),
            published_formatted: format_published(&article.published),
            has_affiliate_links: article.affiliate_links.as_ref().is_some_and(|l| !l.is_empty()),
            importance_score: importance_score(&article),
            quality_score: quality_score(&article, &config.trusted_sources, now),
            article,
        }
    }

    pub fn has_detail_page(&self) -> bool {
        !self.detail_url.is_empty()
    }
}

/// Keeps a detail page only for the first article with each slug, and for
/// none when detail pages are turned off.
pub fn assign_detail_pages(articles: &mut [DisplayArticle], article_pages: bool) {
    let mut seen = HashSet::new();
    for article in articles.iter_mut() {
        if !article_pages || !seen.insert(article.slug.clone()) {
            article.detail_url.clear();
        }
    }
}

pub fn enhance_for_display(articles: Vec<Article>, config: &RenderConfig, now: DateTime<Utc>) -> Vec<DisplayArticle> {
    articles
        .into_iter()
        .map(|a| DisplayArticle::new(a, config, now))
        .collect()
}
