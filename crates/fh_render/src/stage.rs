use std::path::PathBuf;

use chrono::{DateTime, Utc};

use fh_core::artifact::{read_artifact, write_artifact, write_text};
use fh_core::config::RenderMode;
use fh_core::logging::StageLogger;
use fh_core::timestamp::to_rfc3339;
use fh_core::{AffiliateDump, Article, BatchReport, ItemOutcome, PipelineConfig, Result};

use crate::api::{build_api, build_stats, category_menu, source_menu};
use crate::display::{assign_detail_pages, enhance_for_display, DisplayArticle};
use crate::html::{render_article_page, render_listing_page, render_spa_shell};
use crate::paginate::{page_file_name, paginate, total_pages};
use crate::sitemap::{
    render_news_sitemap, render_sitemap, render_sitemap_index, sitemap_entries, NEWS_SITEMAP_FILE, SITEMAP_FILE,
    SITEMAP_INDEX_FILE,
};
use crate::sort::sort_articles;

pub const API_FILE: &str = "articles.json";
pub const STATS_FILE: &str = "stats.json";

/// Sorted, display-ready articles and the page count for the configured mode.
/// Pages, the API and the sitemaps all see the same detail page assignment.
pub fn prepare(articles: Vec<Article>, config: &PipelineConfig, now: DateTime<Utc>) -> (Vec<DisplayArticle>, usize) {
    let sorted = sort_articles(articles, config.render.sort);
    let mut display = enhance_for_display(sorted, &config.render, now);
    assign_detail_pages(&mut display, config.render.article_pages);
    let pages = match config.render.mode {
        RenderMode::Paginated => total_pages(display.len(), config.render.articles_per_page),
        RenderMode::Spa => 1,
    };
    (display, pages)
}

/// Writes the site (pages, `articles.json`, `stats.json`) into the output
/// directory. Articles whose slug is already taken get no detail page and are
/// reported as skipped.
pub fn render_site(articles: Vec<Article>, config: &PipelineConfig, now: DateTime<Utc>) -> Result<BatchReport> {
    let logger = StageLogger::for_stage("render");
    let out = &config.output_dir;
    let generated_at = to_rfc3339(now);
    let (display, pages) = prepare(articles, config, now);
    let stats = build_stats(&display, pages, &generated_at);

    write_artifact(&out.join(API_FILE), &build_api(&display, config, &generated_at))?;
    write_artifact(&out.join(STATS_FILE), &stats)?;

    match config.render.mode {
        RenderMode::Paginated => {
            for page in 1..=pages {
                let (items, info) = paginate(&display, page, config.render.articles_per_page);
                let html = render_listing_page(&config.site, items, &info, &stats, config.render.article_pages);
                let path = out.join(page_file_name(page));
                write_text(&path, &html)?;
                logger.debug(&format!("Generated page {}/{}: {}", page, pages, path.display()));
            }
        }
        RenderMode::Spa => {
            let html = render_spa_shell(&config.site, &category_menu(&display), &source_menu(&display), &stats);
            write_text(&out.join("index.html"), &html)?;
        }
    }

    let mut report = BatchReport::new("render");
    for article in &display {
        let outcome = if !config.render.article_pages {
            ItemOutcome::Processed(())
        } else if !article.has_detail_page() {
            ItemOutcome::skipped(article.article.id.clone(), format!("slug {} already rendered", article.slug))
        } else {
            write_text(&out.join(&article.detail_url), &render_article_page(&config.site, article))?;
            ItemOutcome::Processed(())
        };
        report.record(outcome);
    }

    logger.info(&format!(
        "Rendered {} articles over {} page(s) into {}",
        display.len(),
        pages,
        out.display()
    ));
    Ok(report)
}

/// Writes `sitemap.xml`, `sitemap-news.xml` and `sitemap_index.xml`.
pub fn write_sitemaps(articles: Vec<Article>, config: &PipelineConfig, now: DateTime<Utc>) -> Result<Vec<PathBuf>> {
    let (display, pages) = prepare(articles, config, now);
    let out = &config.output_dir;
    let entries = sitemap_entries(&display, pages, config, now);

    let files = vec![
        (out.join(SITEMAP_FILE), render_sitemap(&entries)?),
        (out.join(NEWS_SITEMAP_FILE), render_news_sitemap(&display, config, now)?),
        (out.join(SITEMAP_INDEX_FILE), render_sitemap_index(config, now)?),
    ];
    let mut written = Vec::with_capacity(files.len());
    for (path, xml) in files {
        write_text(&path, &xml)?;
        written.push(path);
    }
    Ok(written)
}

pub fn run(config: &PipelineConfig) -> Result<BatchReport> {
    let logger = StageLogger::for_stage("render");
    logger.info("=== HTML Generator ===");

    let dump: AffiliateDump = read_artifact(&config.affiliate_path())?;
    logger.info(&format!(
        "Loaded {} articles ({} affiliate links)",
        dump.total_articles, dump.total_affiliate_links
    ));
    let report = render_site(dump.articles, config, Utc::now())?;
    report.log_summary(&logger);
    Ok(report)
}

pub fn run_sitemap(config: &PipelineConfig) -> Result<BatchReport> {
    let logger = StageLogger::for_stage("sitemap");
    let dump: AffiliateDump = read_artifact(&config.affiliate_path())?;
    let count = dump.articles.len();

    let written = write_sitemaps(dump.articles, config, Utc::now())?;
    for path in &written {
        logger.info(&format!("Wrote {}", path.display()));
    }

    let mut report = BatchReport::new("sitemap");
    report.processed = count;
    report.log_summary(&logger);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fh_core::{Category, Error};
    use std::fs;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap()
    }

    fn article(id: &str, published: &str) -> Article {
        Article {
            id: id.to_string(),
            title: format!("Title {}", id),
            source_name: "BBC".to_string(),
            published: published.to_string(),
            category: Category::Technology,
            ..Default::default()
        }
    }

    fn config(dir: &std::path::Path) -> PipelineConfig {
        let mut config = PipelineConfig::default()
            .with_data_dir(dir.join("data"))
            .with_output_dir(dir.join("output"));
        config.render.articles_per_page = 2;
        config
    }

    #[test]
    fn test_paginated_site() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let articles = (1..=5).map(|i| article(&format!("BBC_{}", i), "2024-01-02T00:00:00Z")).collect();

        let report = render_site(articles, &config, now()).unwrap();
        assert_eq!(report.processed, 5);

        let out = &config.output_dir;
        for file in ["index.html", "page2.html", "page3.html", API_FILE, STATS_FILE] {
            assert!(out.join(file).exists(), "{} missing", file);
        }
        assert!(!out.join("page4.html").exists());
        assert!(out.join("articles/BBC_1.html").exists());

        let stats: serde_json::Value = serde_json::from_str(&fs::read_to_string(out.join(STATS_FILE)).unwrap()).unwrap();
        assert_eq!(stats["total_pages"], 3);
        assert_eq!(stats["total_articles"], 5);
    }

    #[test]
    fn test_spa_site() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path());
        config.render.mode = RenderMode::Spa;
        config.render.article_pages = false;

        render_site(vec![article("BBC_1", "")], &config, now()).unwrap();
        let index = fs::read_to_string(config.output_dir.join("index.html")).unwrap();
        assert!(index.contains("articles.json"));
        assert!(!config.output_dir.join("page2.html").exists());
        assert!(!config.output_dir.join("articles").exists());
    }

    #[test]
    fn test_duplicate_slugs_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let articles = vec![article("BBC 7", "2024-01-02T00:00:00Z"), article("BBC_7", "2024-01-01T00:00:00Z")];

        let report = render_site(articles, &config, now()).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.skipped[0].id, "BBC_7");
    }

    #[test]
    fn test_duplicate_slugs_appear_once_in_sitemap_and_api() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let articles = || vec![article("BBC 7", "2024-01-02T00:00:00Z"), article("BBC_7", "2024-01-01T00:00:00Z")];

        render_site(articles(), &config, now()).unwrap();
        write_sitemaps(articles(), &config, now()).unwrap();

        let sitemap = fs::read_to_string(config.output_dir.join(SITEMAP_FILE)).unwrap();
        assert_eq!(sitemap.matches("articles/BBC_7.html").count(), 1);
        let news = fs::read_to_string(config.output_dir.join(NEWS_SITEMAP_FILE)).unwrap();
        assert_eq!(news.matches("articles/BBC_7.html").count(), 1);

        let api: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(config.output_dir.join(API_FILE)).unwrap()).unwrap();
        let urls: Vec<Option<&str>> = api["articles"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["detail_url"].as_str())
            .collect();
        assert_eq!(urls, vec![Some("articles/BBC_7.html"), None]);
    }

    #[test]
    fn test_sitemaps_written() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let written = write_sitemaps(vec![article("BBC_1", "2024-01-02T00:00:00Z")], &config, now()).unwrap();
        assert_eq!(written.len(), 3);
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn test_run_requires_affiliate_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        assert!(matches!(run(&config), Err(Error::MissingInput(_))));
        assert!(matches!(run_sitemap(&config), Err(Error::MissingInput(_))));
    }
}
