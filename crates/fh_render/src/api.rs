use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use fh_core::config::{PipelineConfig, SortPolicy};
use fh_core::Category;

use crate::display::DisplayArticle;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiMetadata {
    pub site_title: String,
    pub site_description: String,
    pub last_updated: String,
    pub total_articles: usize,
    pub total_affiliate_links: usize,
    pub sort_policy: SortPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMenuItem {
    pub name: String,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceMenuItem {
    pub name: String,
    pub count: usize,
}

/// The `articles.json` document the single-page site loads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticlesApi<'a> {
    pub metadata: ApiMetadata,
    pub articles: &'a [DisplayArticle],
    pub categories: Vec<CategoryMenuItem>,
    pub sources: Vec<SourceMenuItem>,
}

/// Pipeline health summary written as `stats.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteStats {
    pub generated_at: String,
    pub total_articles: usize,
    pub total_affiliate_links: usize,
    pub total_feeds: usize,
    pub categories: BTreeMap<String, usize>,
    pub platforms: BTreeMap<String, usize>,
    pub total_pages: usize,
}

/// Categories that have articles, most populated first; ties keep the
/// declaration order.
pub fn category_menu(articles: &[DisplayArticle]) -> Vec<CategoryMenuItem> {
    let mut menu: Vec<CategoryMenuItem> = Category::ALL
        .iter()
        .map(|category| CategoryMenuItem {
            name: category.slug().to_string(),
            label: category.label().to_string(),
            count: articles.iter().filter(|a| a.article.category == *category).count(),
        })
        .filter(|item| item.count > 0)
        .collect();
    menu.sort_by(|a, b| b.count.cmp(&a.count));
    menu
}

pub fn source_menu(articles: &[DisplayArticle]) -> Vec<SourceMenuItem> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for a in articles {
        *counts.entry(a.article.source_name.as_str()).or_insert(0) += 1;
    }
    let mut menu: Vec<SourceMenuItem> = counts
        .into_iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, count)| SourceMenuItem {
            name: name.to_string(),
            count,
        })
        .collect();
    menu.sort_by(|a, b| b.count.cmp(&a.count));
    menu
}

pub fn total_affiliate_links(articles: &[DisplayArticle]) -> usize {
    articles.iter().map(|a| a.article.affiliate_link_count()).sum()
}

pub fn build_api<'a>(articles: &'a [DisplayArticle], config: &PipelineConfig, generated_at: &str) -> ArticlesApi<'a> {
    ArticlesApi {
        metadata: ApiMetadata {
            site_title: config.site.title.clone(),
            site_description: config.site.description.clone(),
            last_updated: generated_at.to_string(),
            total_articles: articles.len(),
            total_affiliate_links: total_affiliate_links(articles),
            sort_policy: config.render.sort,
        },
        articles,
        categories: category_menu(articles),
        sources: source_menu(articles),
    }
}

pub fn build_stats(articles: &[DisplayArticle], total_pages: usize, generated_at: &str) -> SiteStats {
    let mut categories = BTreeMap::new();
    let mut platforms: BTreeMap<String, usize> = ["amazon", "rakuten", "mixed"]
        .iter()
        .map(|p| (p.to_string(), 0))
        .collect();
    for a in articles {
        *categories.entry(a.article.category.slug().to_string()).or_insert(0) += 1;
        *platforms
            .entry(a.article.primary_platform().as_str().to_string())
            .or_insert(0) += 1;
    }

    SiteStats {
        generated_at: generated_at.to_string(),
        total_articles: articles.len(),
        total_affiliate_links: total_affiliate_links(articles),
        total_feeds: articles
            .iter()
            .map(|a| a.article.source_name.as_str())
            .collect::<BTreeSet<_>>()
            .len(),
        categories,
        platforms,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fh_core::config::RenderConfig;
    use fh_core::Article;

    fn display(id: &str, source: &str, category: Category) -> DisplayArticle {
        let now = Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap();
        DisplayArticle::new(
            Article {
                id: id.to_string(),
                source_name: source.to_string(),
                category,
                ..Default::default()
            },
            &RenderConfig::default(),
            now,
        )
    }

    fn sample() -> Vec<DisplayArticle> {
        vec![
            display("1", "BBC", Category::Apple),
            display("2", "CNN", Category::Ai),
            display("3", "BBC", Category::Ai),
        ]
    }

    #[test]
    fn test_category_menu_counts() {
        let menu = category_menu(&sample());
        assert_eq!(menu.len(), 2);
        assert_eq!(menu[0].name, "ai");
        assert_eq!(menu[0].label, "AI・機械学習");
        assert_eq!(menu[0].count, 2);
        assert_eq!(menu[1].name, "apple");
    }

    #[test]
    fn test_source_menu_counts() {
        let menu = source_menu(&sample());
        assert_eq!(
            menu,
            vec![
                SourceMenuItem {
                    name: "BBC".to_string(),
                    count: 2
                },
                SourceMenuItem {
                    name: "CNN".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_api_document_shape() {
        let articles = sample();
        let config = PipelineConfig::default();
        let value = serde_json::to_value(build_api(&articles, &config, "2024-01-03T12:00:00Z")).unwrap();
        assert_eq!(value["metadata"]["total_articles"], 3);
        assert_eq!(value["metadata"]["sort_policy"], "composite");
        assert_eq!(value["articles"].as_array().unwrap().len(), 3);
        assert_eq!(value["categories"][0]["count"], 2);
        assert_eq!(value["sources"][0]["name"], "BBC");
    }

    #[test]
    fn test_stats() {
        let stats = build_stats(&sample(), 1, "2024-01-03T12:00:00Z");
        assert_eq!(stats.total_articles, 3);
        assert_eq!(stats.total_feeds, 2);
        assert_eq!(stats.categories.get("ai"), Some(&2));
        assert_eq!(stats.platforms.get("mixed"), Some(&3));
        assert_eq!(stats.total_pages, 1);
    }
}
