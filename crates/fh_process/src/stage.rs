use std::collections::BTreeMap;

use fh_core::artifact::{read_artifact, write_artifact};
use fh_core::logging::StageLogger;
use fh_core::slug::article_id;
use fh_core::timestamp::now_rfc3339;
use fh_core::{Article, BatchReport, ItemOutcome, PipelineConfig, ProcessedDump, RawArticle, RawDump, Result};

use crate::categorize::categorize;
use crate::clean::clean_html;
use crate::keywords::extract_keywords;
use crate::summary::create_summary;

/// Turns one raw entry into a cleaned, summarized, categorized article.
pub fn process_article(raw: &RawArticle, config: &PipelineConfig, processed_at: &str) -> ItemOutcome<Article> {
    if raw.link.trim().is_empty() && raw.title.trim().is_empty() {
        return ItemOutcome::skipped(raw.source_name.clone(), "entry has neither title nor link");
    }

    let source_name = if raw.source_name.is_empty() {
        "unknown"
    } else {
        raw.source_name.as_str()
    };

    let content = if raw.description.chars().count() > raw.summary.chars().count() {
        &raw.description
    } else {
        &raw.summary
    };
    let clean_content = clean_html(content);
    let title = clean_html(&raw.title);
    let keywords = extract_keywords(&format!("{} {}", title, clean_content), config.max_keywords);
    let category = categorize(&title, &clean_content);

    ItemOutcome::Processed(Article {
        id: article_id(source_name, &raw.link),
        summary: create_summary(&clean_content, config),
        title,
        original_link: raw.link.clone(),
        source_name: raw.source_name.clone(),
        source_feed: raw.source_feed.clone(),
        published: raw.published.clone(),
        fetched_at: raw.fetched_at.clone(),
        processed_at: processed_at.to_string(),
        original_content: content.clone(),
        clean_content,
        keywords,
        category,
        tags: raw.tags.clone(),
        ..Default::default()
    })
}

pub fn process_dump(dump: &RawDump, config: &PipelineConfig) -> (ProcessedDump, BatchReport) {
    let logger = StageLogger::for_stage("process");
    let processed_at = now_rfc3339();
    let mut report = BatchReport::new("process");
    let mut articles = Vec::new();

    for feed in &dump.feeds {
        logger.debug(&format!("Processing feed: {}", feed.feed_title));
        for raw in &feed.articles {
            if let Some(article) = report.record(process_article(raw, config, &processed_at)) {
                logger.debug(&format!("  - {}", article.title.chars().take(50).collect::<String>()));
                articles.push(article);
            }
        }
    }

    let processed = ProcessedDump {
        process_timestamp: processed_at,
        total_articles: articles.len(),
        skipped_articles: report.skipped_count(),
        articles,
    };
    (processed, report)
}

pub fn category_counts(articles: &[Article]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for article in articles {
        *counts.entry(article.category.slug()).or_insert(0) += 1;
    }
    counts
}

/// Stage entry point: raw dump in, processed articles out.
pub fn run(config: &PipelineConfig) -> Result<BatchReport> {
    let logger = StageLogger::for_stage("process");
    logger.info("=== Content Processor ===");

    let dump: RawDump = read_artifact(&config.raw_feed_path())?;
    let (processed, report) = process_dump(&dump, config);

    let path = config.processed_path();
    write_artifact(&path, &processed)?;

    logger.info(&format!("Total articles processed: {}", processed.total_articles));
    logger.info(&format!("Data saved to: {}", path.display()));
    for (category, count) in category_counts(&processed.articles) {
        logger.info(&format!("  {}: {}", category, count));
    }
    if config.debug {
        if let Some(sample) = processed.articles.first() {
            logger.debug(&format!(
                "Sample: {} [{}] keywords={}",
                sample.title,
                sample.category,
                sample.keywords.join(", ")
            ));
        }
    }
    report.log_summary(&logger);
    Ok(report)
}
