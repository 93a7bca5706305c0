use std::cmp::Reverse;

use fh_core::config::SortPolicy;
use fh_core::Article;

use crate::score::{article_instant, importance_score};

/// Orders articles for display. All policies are stable, so articles with
/// identical keys keep their input order.
pub fn sort_articles(articles: Vec<Article>, policy: SortPolicy) -> Vec<Article> {
    let mut keyed: Vec<_> = articles
        .into_iter()
        .map(|a| (article_instant(&a), importance_score(&a), a))
        .collect();

    match policy {
        SortPolicy::Recency => keyed.sort_by_key(|(instant, _, _)| Reverse(*instant)),
        SortPolicy::Importance => keyed.sort_by_key(|(_, importance, _)| Reverse(*importance)),
        SortPolicy::Composite => keyed.sort_by_key(|(instant, importance, _)| (Reverse(*instant), Reverse(*importance))),
    }

    keyed.into_iter().map(|(_, _, a)| a).collect()
}
