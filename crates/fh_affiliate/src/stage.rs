use std::collections::BTreeMap;

use fh_core::artifact::{read_artifact, write_artifact};
use fh_core::config::{AffiliateConfig, AffiliateStrategy};
use fh_core::logging::StageLogger;
use fh_core::timestamp::now_rfc3339;
use fh_core::{
    AffiliateDump, AffiliateLinks, Article, BatchReport, ItemOutcome, Monetization, PipelineConfig, Platform,
    PrimaryPlatform, ProcessedDump, Result,
};

use crate::catalog::{catalog_links, ProductCatalog, StaticCatalog};
use crate::recommend::category_recommendations;
use crate::search::keyword_links;

pub fn monetization(links: &AffiliateLinks) -> Monetization {
    let has = |platform: Platform| links.keyword_based.iter().any(|l| l.platform == platform);
    let primary_platform = if has(Platform::Amazon) {
        PrimaryPlatform::Amazon
    } else if has(Platform::Rakuten) {
        PrimaryPlatform::Rakuten
    } else {
        PrimaryPlatform::Mixed
    };
    Monetization {
        has_affiliate: !links.is_empty(),
        link_count: links.total_links,
        primary_platform,
    }
}

/// Returns a copy of `article` with affiliate links and monetization filled in.
pub fn enhance_article(
    article: &Article,
    config: &AffiliateConfig,
    catalog: &dyn ProductCatalog,
    processed_at: &str,
) -> Result<Article> {
    let keyword_based = match config.strategy {
        AffiliateStrategy::Search => keyword_links(&article.keywords, article.category, config)?,
        AffiliateStrategy::Catalog => catalog_links(
            &article.title,
            &article.keywords,
            article.category,
            catalog,
            &config.amazon,
            config.max_keyword_links,
        )?,
    };
    let links = AffiliateLinks::new(keyword_based, category_recommendations(article.category, config)?);

    let mut enhanced = article.clone();
    enhanced.affiliate_processed_at = Some(processed_at.to_string());
    enhanced.monetization = Some(monetization(&links));
    enhanced.affiliate_links = Some(links);
    Ok(enhanced)
}

pub fn platform_distribution(articles: &[Article]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = [PrimaryPlatform::Amazon, PrimaryPlatform::Rakuten, PrimaryPlatform::Mixed]
        .iter()
        .map(|p| (p.as_str().to_string(), 0))
        .collect();
    for article in articles {
        *counts.entry(article.primary_platform().as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Enhances every article. One that fails is carried over unchanged and
/// reported as skipped.
pub fn enhance_dump(
    dump: &ProcessedDump,
    config: &AffiliateConfig,
    catalog: &dyn ProductCatalog,
) -> (AffiliateDump, BatchReport) {
    let logger = StageLogger::for_stage("affiliate");
    let processed_at = now_rfc3339();
    let mut report = BatchReport::new("affiliate");
    let mut articles = Vec::with_capacity(dump.articles.len());

    for article in &dump.articles {
        logger.debug(&format!(
            "Adding affiliate links to: {}",
            article.title.chars().take(50).collect::<String>()
        ));
        let outcome = match enhance_article(article, config, catalog, &processed_at) {
            Ok(enhanced) => ItemOutcome::Processed(enhanced),
            Err(e) => {
                logger.error(&format!("Error adding affiliate links to {}: {}", article.id, e));
                articles.push(article.clone());
                ItemOutcome::skipped(article.id.clone(), e)
            }
        };
        if let Some(enhanced) = report.record(outcome) {
            logger.debug(&format!("  - Added {} affiliate links", enhanced.affiliate_link_count()));
            articles.push(enhanced);
        }
    }

    let enhanced = AffiliateDump {
        affiliate_process_timestamp: processed_at,
        total_articles: articles.len(),
        total_affiliate_links: articles.iter().map(Article::affiliate_link_count).sum(),
        platform_distribution: platform_distribution(&articles),
        articles,
    };
    (enhanced, report)
}

pub fn run(config: &PipelineConfig) -> Result<BatchReport> {
    let logger = StageLogger::for_stage("affiliate");
    logger.info("=== Affiliate Link Processor ===");

    let dump: ProcessedDump = read_artifact(&config.processed_path())?;
    let catalog = StaticCatalog::new();
    let (enhanced, report) = enhance_dump(&dump, &config.affiliate, &catalog);

    let path = config.affiliate_path();
    write_artifact(&path, &enhanced)?;

    logger.info(&format!("Total articles processed: {}", enhanced.total_articles));
    logger.info(&format!("Total affiliate links added: {}", enhanced.total_affiliate_links));
    logger.info(&format!("Data saved to: {}", path.display()));
    logger.info("Affiliate Platform Distribution:");
    for (platform, count) in &enhanced.platform_distribution {
        logger.info(&format!("  {}: {}", platform, count));
    }
    report.log_summary(&logger);
    Ok(report)
}
