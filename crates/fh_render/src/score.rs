use chrono::{DateTime, Utc};
use fh_core::timestamp::{epoch_floor, first_valid};
use fh_core::{Article, Category};

const HIGH_PRIORITY_KEYWORDS: &[&str] = &["AI", "ChatGPT", "iPhone", "Tesla", "Bitcoin", "IPO", "買収", "新機能"];

/// Title terms that mark an announcement.
const ANNOUNCEMENT_TERMS: &[&str] = &[
    "新機能", "発表", "リリース", "画期的", "世界初", "announce", "launch", "unveil", "release",
    "world's first", "breakthrough",
];

pub fn category_weight(category: Category) -> u32 {
    match category {
        Category::Ai => 10,
        Category::Apple => 8,
        Category::GoogleAndroid => 7,
        Category::Business | Category::AutoEv => 6,
        Category::Technology | Category::Crypto => 5,
        Category::Gadget | Category::Programming => 4,
        Category::Game => 3,
        Category::Book | Category::General => 2,
    }
}

/// Heuristic importance used to order otherwise equal articles.
pub fn importance_score(article: &Article) -> u32 {
    let keywords: u32 = article
        .keywords
        .iter()
        .map(|k| if HIGH_PRIORITY_KEYWORDS.contains(&k.as_str()) { 3 } else { 1 })
        .sum();

    let title = article.title.to_lowercase();
    let announcement = if ANNOUNCEMENT_TERMS.iter().any(|t| title.contains(t)) {
        5
    } else {
        0
    };

    keywords + category_weight(article.category) + announcement + article.affiliate_link_count() as u32
}

/// The instant an article is ordered by: published, else fetched, else the
/// epoch floor.
pub fn article_instant(article: &Article) -> DateTime<Utc> {
    first_valid([article.published.as_str(), article.fetched_at.as_str()])
}

fn length_band(len: usize, full: (usize, usize), partial: &[(usize, usize)]) -> u32 {
    if (full.0..=full.1).contains(&len) {
        10
    } else if partial.iter().any(|(lo, hi)| (*lo..=*hi).contains(&len)) {
        5
    } else {
        0
    }
}

/// Editorial quality estimate: well-sized title and summary, keyword
/// coverage, trusted source and freshness relative to `now`.
pub fn quality_score(article: &Article, trusted_sources: &[String], now: DateTime<Utc>) -> u32 {
    let mut score = length_band(article.title.chars().count(), (20, 80), &[(10, 19), (81, 120)]);
    score += length_band(article.summary.chars().count(), (80, 300), &[(30, 79)]);

    if !article.keywords.is_empty() {
        score += 5 + article.keywords.len().min(5) as u32;
    }

    if trusted_sources
        .iter()
        .any(|s| !s.is_empty() && article.source_name.contains(s.as_str()))
    {
        score += 10;
    }

    let instant = article_instant(article);
    if instant > epoch_floor() {
        let age_hours = (now - instant).num_hours().max(0);
        score += match age_hours {
            0..=6 => 20,
            7..=24 => 10,
            25..=72 => 5,
            _ => 0,
        };
    }
    score
}
