//! HTML pages, built with plain `format!` and escaped with `html_escape`.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use fh_core::config::SiteConfig;
use fh_core::AffiliateLink;

use crate::api::{CategoryMenuItem, SiteStats, SourceMenuItem};
use crate::display::DisplayArticle;
use crate::paginate::{page_file_name, Pagination};

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:0 auto;padding:1rem;color:#222}\
header{border-bottom:1px solid #ddd;margin-bottom:1rem}\
.article{border:1px solid #eee;border-radius:6px;padding:1rem;margin-bottom:1rem}\
.meta{color:#666;font-size:.85rem}\
.category{background:#eef;border-radius:4px;padding:0 .4rem}\
.affiliate a{display:inline-block;margin:.2rem .4rem .2rem 0}\
nav.pagination a{margin:0 .5rem}";

fn head(site: &SiteConfig, title: &str, root: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<meta name=\"description\" content=\"{description}\">\n\
         <link rel=\"alternate\" type=\"application/json\" href=\"{root}articles.json\">\n\
         <style>{style}</style>\n</head>\n",
        lang = attr(&site.language),
        title = text(title),
        description = attr(&site.description),
        root = root,
        style = STYLE,
    )
}

fn site_header(site: &SiteConfig, root: &str) -> String {
    format!(
        "<header>\n<h1><a href=\"{root}index.html\">{title}</a></h1>\n<p>{description}</p>\n</header>\n",
        root = root,
        title = text(&site.title),
        description = text(&site.description),
    )
}

fn affiliate_list(links: &[AffiliateLink]) -> String {
    let mut html = String::new();
    for link in links {
        let _ = write!(
            html,
            "<a href=\"{url}\" rel=\"sponsored noopener\" target=\"_blank\" data-platform=\"{platform}\">{label}</a>",
            url = attr(&link.url),
            platform = link.platform,
            label = text(&link.display_text),
        );
        if let Some(price) = &link.price {
            let _ = write!(html, " <span class=\"price\">{}</span>", text(price));
        }
    }
    html
}

fn affiliate_section(article: &DisplayArticle) -> String {
    let Some(links) = article.article.affiliate_links.as_ref().filter(|l| !l.is_empty()) else {
        return String::new();
    };
    format!(
        "<div class=\"affiliate\">\n<div class=\"keyword-links\">{}</div>\n<div class=\"recommendations\">{}</div>\n</div>\n",
        affiliate_list(&links.keyword_based),
        affiliate_list(&links.category_recommendations),
    )
}

fn article_card(article: &DisplayArticle, link_detail: bool) -> String {
    let a = &article.article;
    let href = if link_detail && article.has_detail_page() {
        &article.detail_url
    } else {
        &a.original_link
    };
    let keywords = a
        .keywords
        .iter()
        .map(|k| format!("<span class=\"keyword\">{}</span>", text(k)))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "<article class=\"article\" id=\"{slug}\" data-category=\"{category}\">\n\
         <h2><a href=\"{href}\">{title}</a></h2>\n\
         <div class=\"meta\"><span class=\"category\">{label}</span> {source} / {published}</div>\n\
         <p>{summary}</p>\n<div class=\"keywords\">{keywords}</div>\n{affiliate}</article>\n",
        slug = attr(&article.slug),
        category = a.category,
        href = attr(href),
        title = text(&a.title),
        label = text(&article.category_label),
        source = text(&a.source_name),
        published = text(&article.published_formatted),
        summary = text(&article.display_summary),
        keywords = keywords,
        affiliate = if article.has_affiliate_links { affiliate_section(article) } else { String::new() },
    )
}

fn pagination_nav(pagination: &Pagination) -> String {
    if pagination.total_pages <= 1 {
        return String::new();
    }
    let mut nav = String::from("<nav class=\"pagination\">");
    if let Some(prev) = pagination.prev_page {
        let _ = write!(nav, "<a href=\"{}\" rel=\"prev\">&laquo; 前へ</a>", page_file_name(prev));
    }
    let _ = write!(nav, "<span>{} / {}</span>", pagination.current_page, pagination.total_pages);
    if let Some(next) = pagination.next_page {
        let _ = write!(nav, "<a href=\"{}\" rel=\"next\">次へ &raquo;</a>", page_file_name(next));
    }
    nav.push_str("</nav>\n");
    nav
}

/// One listing page (`index.html` or `page{n}.html`).
pub fn render_listing_page(
    site: &SiteConfig,
    articles: &[DisplayArticle],
    pagination: &Pagination,
    stats: &SiteStats,
    link_detail: bool,
) -> String {
    let title = if pagination.current_page > 1 {
        format!("{} - {}ページ目", site.title, pagination.current_page)
    } else {
        site.title.clone()
    };
    let cards: String = articles.iter().map(|a| article_card(a, link_detail)).collect();
    format!(
        "{head}<body>\n{header}<p class=\"stats\">記事数: {articles} / アフィリエイトリンク: {links} / フィード: {feeds} / 更新: {updated}</p>\n\
         <main>\n{cards}</main>\n{nav}</body>\n</html>\n",
        head = head(site, &title, ""),
        header = site_header(site, ""),
        articles = stats.total_articles,
        links = stats.total_affiliate_links,
        feeds = stats.total_feeds,
        updated = text(&stats.generated_at),
        cards = cards,
        nav = pagination_nav(pagination),
    )
}

/// Single-page shell. Menus are rendered here; the article list is filled in
/// from `articles.json` by the inline script.
pub fn render_spa_shell(
    site: &SiteConfig,
    categories: &[CategoryMenuItem],
    sources: &[SourceMenuItem],
    stats: &SiteStats,
) -> String {
    let category_items: String = categories
        .iter()
        .map(|c| {
            format!(
                "<li><a href=\"#category={name}\" data-category=\"{name}\">{label} ({count})</a></li>",
                name = attr(&c.name),
                label = text(&c.label),
                count = c.count
            )
        })
        .collect();
    let source_items: String = sources
        .iter()
        .map(|s| format!("<li data-source=\"{}\">{} ({})</li>", attr(&s.name), text(&s.name), s.count))
        .collect();

    format!(
        "{head}<body>\n{header}<p class=\"stats\">記事数: {articles} / 更新: {updated}</p>\n\
         <nav class=\"categories\"><ul><li><a href=\"#\" data-category=\"\">すべて</a></li>{category_items}</ul></nav>\n\
         <aside class=\"sources\"><ul>{source_items}</ul></aside>\n\
         <main id=\"articles\"></main>\n<script>\n{script}</script>\n</body>\n</html>\n",
        head = head(site, &site.title, ""),
        header = site_header(site, ""),
        articles = stats.total_articles,
        updated = text(&stats.generated_at),
        category_items = category_items,
        source_items = source_items,
        script = SPA_SCRIPT,
    )
}

const SPA_SCRIPT: &str = r#"const esc = (s) => String(s ?? "").replace(/[&<>"']/g, (c) => ({"&":"&amp;","<":"&lt;",">":"&gt;",'"':"&quot;","'":"&#39;"}[c]));
let all = [];
function render() {
  const m = location.hash.match(/category=([^&]+)/);
  const category = m ? decodeURIComponent(m[1]) : "";
  const list = category ? all.filter((a) => a.category === category) : all;
  document.getElementById("articles").innerHTML = list.map((a) =>
    `<article class="article" id="${esc(a.slug)}"><h2><a href="${esc(a.detail_url || a.original_link)}">${esc(a.title)}</a></h2>` +
    `<div class="meta"><span class="category">${esc(a.category_label)}</span> ${esc(a.source_name)} / ${esc(a.published_formatted)}</div>` +
    `<p>${esc(a.display_summary)}</p></article>`).join("");
}
fetch("articles.json").then((r) => r.json()).then((data) => { all = data.articles; render(); });
window.addEventListener("hashchange", render);
"#;

/// Standalone page for one article, written under `articles/`.
pub fn render_article_page(site: &SiteConfig, article: &DisplayArticle) -> String {
    let a = &article.article;
    let canonical = format!("{}{}", site.base_url, article.detail_url);
    let body = if a.clean_content.is_empty() { &article.display_summary } else { &a.clean_content };
    format!(
        "{head}<body>\n{header}<main>\n<article class=\"article\">\n<h2>{title}</h2>\n\
         <div class=\"meta\"><span class=\"category\">{label}</span> {source} / {published}</div>\n\
         <p>{body}</p>\n<p><a href=\"{original}\" rel=\"noopener\" target=\"_blank\">元記事を読む</a></p>\n\
         {affiliate}</article>\n<p><a href=\"../index.html\">&laquo; 記事一覧へ戻る</a></p>\n</main>\n\
         <link rel=\"canonical\" href=\"{canonical}\">\n</body>\n</html>\n",
        head = head(site, &format!("{} | {}", a.title, site.title), "../"),
        header = site_header(site, "../"),
        title = text(&a.title),
        label = text(&article.category_label),
        source = text(&a.source_name),
        published = text(&article.published_formatted),
        body = text(body),
        original = attr(&a.original_link),
        affiliate = affiliate_section(article),
        canonical = attr(&canonical),
    )
}
