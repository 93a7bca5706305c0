use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_articles: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: Option<usize>,
    pub next_page: Option<usize>,
    pub articles_per_page: usize,
}

/// Number of pages needed. An empty listing still renders one page.
pub fn total_pages(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1)).max(1)
}

/// File name of a listing page, relative to the output root.
pub fn page_file_name(page: usize) -> String {
    if page <= 1 {
        "index.html".to_string()
    } else {
        format!("page{}.html", page)
    }
}

/// Slice of `items` shown on `page` (1-based) and the navigation around it.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> (&[T], Pagination) {
    let per_page = per_page.max(1);
    let total_pages = total_pages(items.len(), per_page);
    let page = page.clamp(1, total_pages);

    let start = ((page - 1) * per_page).min(items.len());
    let end = (start + per_page).min(items.len());

    let info = Pagination {
        current_page: page,
        total_pages,
        total_articles: items.len(),
        has_prev: page > 1,
        has_next: page < total_pages,
        prev_page: (page > 1).then(|| page - 1),
        next_page: (page < total_pages).then(|| page + 1),
        articles_per_page: per_page,
    };
    (&items[start..end], info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_cover_all_items() {
        let items: Vec<usize> = (0..45).collect();
        assert_eq!(total_pages(items.len(), 20), 3);

        let (first, info) = paginate(&items, 1, 20);
        assert_eq!(first.len(), 20);
        assert!(!info.has_prev);
        assert_eq!(info.next_page, Some(2));

        let (last, info) = paginate(&items, 3, 20);
        assert_eq!(last, &items[40..]);
        assert_eq!(info.prev_page, Some(2));
        assert!(!info.has_next);
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let items: Vec<usize> = Vec::new();
        let (page, info) = paginate(&items, 1, 20);
        assert!(page.is_empty());
        assert_eq!(info.total_pages, 1);
        assert!(!info.has_next);
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let items: Vec<usize> = (0..5).collect();
        let (page, info) = paginate(&items, 9, 2);
        assert_eq!(info.current_page, 3);
        assert_eq!(page, &[4]);
    }

    #[test]
    fn test_page_file_names() {
        assert_eq!(page_file_name(1), "index.html");
        assert_eq!(page_file_name(2), "page2.html");
    }
}
