//! Pagination utility
//!
//! Pure functions: slicing a collection into a page and producing the
//! compact page-number list a pager renders. Out-of-range requests clamp,
//! they never fail.

use serde::{Serialize, Serializer};
use std::fmt;

/// Page size used when the caller does not pick one
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Pagers with at most this many pages list every page
const FULL_PAGER_MAX: usize = 7;

/// One page of a collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-indexed, always within `1..=total_pages`
    pub page: usize,
    pub limit: usize,
    pub total_items: usize,
    /// At least 1, even for an empty collection
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slice `data` into page `page` of `limit` items.
///
/// The requested page is clamped into `[1, total_pages]`; a zero `limit`
/// is treated as 1.
pub fn paginate<T: Clone>(data: &[T], page: usize, limit: usize) -> Page<T> {
    let limit = limit.max(1);
    let total_items = data.len();
    let total_pages = total_items.div_ceil(limit).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * limit;
    let end = (start + limit).min(total_items);
    let items = data.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    Page {
        items,
        page,
        limit,
        total_items,
        total_pages,
    }
}

/// [`paginate`] with [`DEFAULT_PAGE_LIMIT`]
pub fn paginate_default<T: Clone>(data: &[T], page: usize) -> Page<T> {
    paginate(data, page, DEFAULT_PAGE_LIMIT)
}

/// Entry in a pager: a page number or a gap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageMarker::Page(n) => write!(f, "{}", n),
            PageMarker::Ellipsis => f.write_str("..."),
        }
    }
}

impl Serialize for PageMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageMarker::Page(n) => serializer.serialize_u64(*n as u64),
            PageMarker::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Compact page list for a pager.
///
/// Up to seven pages are listed in full. Beyond that the first and last
/// page are always shown, plus a three-page window around `current` that
/// slides to stay inside `[2, total - 1]`; an ellipsis marks each side of
/// the window that does not touch an endpoint.
pub fn page_numbers(current: usize, total: usize) -> Vec<PageMarker> {
    if total <= FULL_PAGER_MAX {
        return (1..=total).map(PageMarker::Page).collect();
    }

    let (start, end) = if current <= 3 {
        (2, 4)
    } else if current >= total - 2 {
        (total - 3, total - 1)
    } else {
        (current - 1, current + 1)
    };

    let mut pages = Vec::with_capacity(FULL_PAGER_MAX);
    pages.push(PageMarker::Page(1));
    if start > 2 {
        pages.push(PageMarker::Ellipsis);
    }
    pages.extend((start..=end).map(PageMarker::Page));
    if end < total - 1 {
        pages.push(PageMarker::Ellipsis);
    }
    pages.push(PageMarker::Page(total));
    pages
}

/// Render the pager for a page as a single line, current page bracketed
pub fn render_pager<T>(page: &Page<T>) -> String {
    page_numbers(page.page, page.total_pages)
        .iter()
        .map(|marker| match marker {
            PageMarker::Page(n) if *n == page.page => format!("[{}]", n),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageMarker::{Ellipsis, Page as P};

    #[test]
    fn test_first_page_length() {
        let data: Vec<u32> = (0..25).collect();
        for limit in [1, 7, 10, 25, 40] {
            let page = paginate(&data, 1, limit);
            assert_eq!(page.items.len(), limit.min(data.len()));
        }
    }

    #[test]
    fn test_last_page_partial() {
        let data: Vec<u32> = (0..25).collect();
        let page = paginate(&data, 3, 10);
        assert_eq!(page.items, (20..25).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_out_of_range_clamps() {
        let data: Vec<u32> = (0..25).collect();

        let high = paginate(&data, 99, 10);
        assert_eq!(high.page, 3);
        assert_eq!(high.items.len(), 5);

        let low = paginate(&data, 0, 10);
        assert_eq!(low.page, 1);
        assert_eq!(low.items[0], 0);
    }

    #[test]
    fn test_empty_input() {
        let page = paginate::<u32>(&[], 4, 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_items, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_zero_limit_treated_as_one() {
        let page = paginate(&[1, 2, 3], 2, 0);
        assert_eq!(page.limit, 1);
        assert_eq!(page.items, vec![2]);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_default_limit() {
        let data: Vec<u32> = (0..11).collect();
        let page = paginate_default(&data, 2);
        assert_eq!(page.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(page.items, vec![10]);
    }

    #[test]
    fn test_small_pager_lists_everything() {
        for n in 1..=7 {
            let expected: Vec<_> = (1..=n).map(P).collect();
            assert_eq!(page_numbers(n, n), expected);
        }
        assert!(page_numbers(1, 0).is_empty());
    }

    #[test]
    fn test_pager_middle_window() {
        assert_eq!(
            page_numbers(5, 10),
            vec![P(1), Ellipsis, P(4), P(5), P(6), Ellipsis, P(10)]
        );
    }

    #[test]
    fn test_pager_edges() {
        assert_eq!(
            page_numbers(1, 10),
            vec![P(1), P(2), P(3), P(4), Ellipsis, P(10)]
        );
        assert_eq!(
            page_numbers(3, 10),
            vec![P(1), P(2), P(3), P(4), Ellipsis, P(10)]
        );
        assert_eq!(
            page_numbers(10, 10),
            vec![P(1), Ellipsis, P(7), P(8), P(9), P(10)]
        );
        assert_eq!(
            page_numbers(8, 10),
            vec![P(1), Ellipsis, P(7), P(8), P(9), P(10)]
        );
    }

    #[test]
    fn test_pager_has_no_duplicates() {
        for total in 8..30 {
            for current in 1..=total {
                let pages: Vec<usize> = page_numbers(current, total)
                    .into_iter()
                    .filter_map(|m| match m {
                        P(n) => Some(n),
                        Ellipsis => None,
                    })
                    .collect();
                let mut sorted = pages.clone();
                sorted.dedup();
                assert_eq!(pages, sorted, "current={} total={}", current, total);
                assert!(pages.windows(2).all(|w| w[0] < w[1]));
                assert!(pages.contains(&current));
            }
        }
    }

    #[test]
    fn test_render_and_serialize() {
        let data: Vec<u32> = (0..100).collect();
        let page = paginate(&data, 5, 10);
        assert_eq!(render_pager(&page), "1 ... 4 [5] 6 ... 10");

        let json = serde_json::to_string(&page_numbers(1, 10)).unwrap();
        assert_eq!(json, "[1,2,3,4,\"...\",10]");
    }
}
