use feed_rs::model::{Entry, Feed};
use fh_core::timestamp::to_rfc3339;
use fh_core::{Error, RawArticle, Result};

/// A parsed feed, trimmed to what the pipeline carries forward.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub description: String,
    pub entries: Vec<RawArticle>,
}

pub fn parse_feed(bytes: &[u8], feed_url: &str, fetched_at: &str, max_entries: usize) -> Result<ParsedFeed> {
    let feed: Feed = feed_rs::parser::parse(bytes)
        .map_err(|e| Error::Feed(format!("Failed to parse {}: {}", feed_url, e)))?;

    let title = feed
        .title
        .as_ref()
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty());
    let source_name = title.clone().unwrap_or_else(|| feed_url.to_string());

    let entries = feed
        .entries
        .iter()
        .take(max_entries)
        .map(|entry| convert_entry(entry, feed_url, &source_name, fetched_at))
        .collect();

    Ok(ParsedFeed {
        title,
        description: feed.description.map(|d| d.content).unwrap_or_default(),
        entries,
    })
}

fn convert_entry(entry: &Entry, feed_url: &str, source_name: &str, fetched_at: &str) -> RawArticle {
    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "No title".to_string());

    // RSS <description> lands in `summary`, <content:encoded> in `content`.
    let description = entry
        .summary
        .as_ref()
        .map(|s| s.content.clone())
        .unwrap_or_default();
    let summary = entry
        .content
        .as_ref()
        .and_then(|c| c.body.clone())
        .unwrap_or_default();

    RawArticle {
        title,
        link: entry.links.first().map(|l| l.href.clone()).unwrap_or_default(),
        description,
        summary,
        published: entry
            .published
            .or(entry.updated)
            .map(to_rfc3339)
            .unwrap_or_default(),
        tags: entry.categories.iter().map(|c| c.term.clone()).collect(),
        source_feed: feed_url.to_string(),
        source_name: source_name.to_string(),
        fetched_at: fetched_at.to_string(),
    }
}
