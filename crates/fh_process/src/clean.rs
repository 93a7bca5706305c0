use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Node};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("static regex");
}

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript"];

// Elements that separate words when rendered.
const BREAKING_ELEMENTS: &[&str] = &[
    "address", "article", "br", "dd", "div", "dl", "dt", "figcaption", "footer", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hr", "img", "li", "ol", "p", "pre", "section", "table",
    "td", "th", "tr", "ul",
];

/// Strips markup and collapses whitespace runs into single spaces.
pub fn clean_html(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(html);
    let mut text = String::with_capacity(html.len());
    for node in fragment.tree.root().descendants() {
        match node.value() {
            Node::Element(e) if BREAKING_ELEMENTS.contains(&e.name()) => text.push(' '),
            Node::Text(t) => {
                let hidden = node
                    .parent()
                    .and_then(|p| p.value().as_element())
                    .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()));
                if !hidden {
                    text.push_str(t);
                }
            }
            _ => {}
        }
    }

    collapse_whitespace(&text)
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}
