use std::io;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;

use fh_core::config::{PipelineConfig, RenderMode};
use fh_core::timestamp::{epoch_floor, to_rfc3339};
use fh_core::Result;

use crate::api::category_menu;
use crate::display::DisplayArticle;
use crate::paginate::page_file_name;
use crate::score::article_instant;

pub const SITEMAP_FILE: &str = "sitemap.xml";
pub const NEWS_SITEMAP_FILE: &str = "sitemap-news.xml";
pub const SITEMAP_INDEX_FILE: &str = "sitemap_index.xml";

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const NEWS_NS: &str = "http://www.google.com/schemas/sitemap-news/0.9";
const NEWS_TITLE_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: String,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

fn lastmod_for(article: &DisplayArticle, now: DateTime<Utc>) -> String {
    let instant = article_instant(&article.article);
    to_rfc3339(if instant > epoch_floor() { instant } else { now })
}

/// Every URL the site exposes: home, listing pages, category anchors and
/// article pages.
pub fn sitemap_entries(
    articles: &[DisplayArticle],
    total_pages: usize,
    config: &PipelineConfig,
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let base = &config.site.base_url;
    let now_str = to_rfc3339(now);
    let mut entries = vec![SitemapEntry {
        loc: base.clone(),
        lastmod: now_str.clone(),
        changefreq: "hourly",
        priority: "1.0",
    }];

    if config.render.mode == RenderMode::Paginated {
        entries.extend((2..=total_pages).map(|page| SitemapEntry {
            loc: format!("{}{}", base, page_file_name(page)),
            lastmod: now_str.clone(),
            changefreq: "daily",
            priority: "0.8",
        }));
    }

    entries.extend(category_menu(articles).into_iter().map(|c| SitemapEntry {
        loc: format!("{}#category={}", base, c.name),
        lastmod: now_str.clone(),
        changefreq: "daily",
        priority: "0.8",
    }));

    if config.render.article_pages {
        entries.extend(articles.iter().filter(|a| a.has_detail_page()).map(|a| SitemapEntry {
            loc: format!("{}{}", base, a.detail_url),
            lastmod: lastmod_for(a, now),
            changefreq: "monthly",
            priority: "0.7",
        }));
    }
    entries
}

fn text_element<W: io::Write>(writer: &mut Writer<W>, name: &str, value: &str) -> io::Result<()> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(value))?;
    Ok(())
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String> {
    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| fh_core::Error::Render(format!("sitemap is not valid UTF-8: {}", e)))?;
    xml.push('\n');
    Ok(xml)
}

fn new_writer() -> io::Result<Writer<Vec<u8>>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(writer)
}

pub fn render_sitemap(entries: &[SitemapEntry]) -> Result<String> {
    let mut writer = new_writer()?;
    writer
        .create_element("urlset")
        .with_attribute(("xmlns", SITEMAP_NS))
        .write_inner_content(|w| -> io::Result<()> {
            for entry in entries {
                w.create_element("url").write_inner_content(|w| -> io::Result<()> {
                    text_element(w, "loc", &entry.loc)?;
                    text_element(w, "lastmod", &entry.lastmod)?;
                    text_element(w, "changefreq", entry.changefreq)?;
                    text_element(w, "priority", entry.priority)
                })?;
            }
            Ok(())
        })?;
    finish(writer)
}

/// Google News flavoured sitemap over the first `news_sitemap_limit` articles.
pub fn render_news_sitemap(articles: &[DisplayArticle], config: &PipelineConfig, now: DateTime<Utc>) -> Result<String> {
    let mut writer = new_writer()?;
    writer
        .create_element("urlset")
        .with_attribute(("xmlns", SITEMAP_NS))
        .with_attribute(("xmlns:news", NEWS_NS))
        .write_inner_content(|w| -> io::Result<()> {
            for article in articles.iter().take(config.render.news_sitemap_limit) {
                let loc = if article.has_detail_page() {
                    format!("{}{}", config.site.base_url, article.detail_url)
                } else {
                    article.article.original_link.clone()
                };
                let title: String = article.article.title.chars().take(NEWS_TITLE_LIMIT).collect();
                w.create_element("url").write_inner_content(|w| -> io::Result<()> {
                    text_element(w, "loc", &loc)?;
                    w.create_element("news:news").write_inner_content(|w| -> io::Result<()> {
                        w.create_element("news:publication").write_inner_content(|w| -> io::Result<()> {
                            text_element(w, "news:name", &config.site.publication_name)?;
                            text_element(w, "news:language", &config.site.language)
                        })?;
                        text_element(w, "news:publication_date", &lastmod_for(article, now))?;
                        text_element(w, "news:title", &title)
                    })?;
                    Ok(())
                })?;
            }
            Ok(())
        })?;
    finish(writer)
}

pub fn render_sitemap_index(config: &PipelineConfig, now: DateTime<Utc>) -> Result<String> {
    let lastmod = to_rfc3339(now);
    let mut writer = new_writer()?;
    writer
        .create_element("sitemapindex")
        .with_attribute(("xmlns", SITEMAP_NS))
        .write_inner_content(|w| -> io::Result<()> {
            for file in [SITEMAP_FILE, NEWS_SITEMAP_FILE] {
                w.create_element("sitemap").write_inner_content(|w| -> io::Result<()> {
                    text_element(w, "loc", &format!("{}{}", config.site.base_url, file))?;
                    text_element(w, "lastmod", &lastmod)
                })?;
            }
            Ok(())
        })?;
    finish(writer)
}
