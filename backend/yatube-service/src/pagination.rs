//! Page-number pagination for post listings.
//!
//! Lookup is forgiving: a missing or malformed page number means the first
//! page, a number past either end means the last page. An empty listing
//! still has one (empty) page.

use serde::{Deserialize, Serialize};

/// Query string of every paginated listing (`?page=N`).
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Splits `total_count` items into pages of `per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: usize,
    total_count: usize,
}

impl Paginator {
    pub fn new(per_page: usize, total_count: usize) -> Self {
        Self {
            per_page: per_page.max(1),
            total_count,
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn num_pages(&self) -> usize {
        if self.total_count == 0 {
            1
        } else {
            self.total_count.div_ceil(self.per_page)
        }
    }

    /// Resolve a raw `page` query value to a valid page number.
    pub fn page_number(&self, raw: Option<&str>) -> usize {
        let requested = match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => return 1,
            Some(value) => match value.parse::<i64>() {
                Ok(n) => n,
                Err(_) => return 1,
            },
        };

        let last = self.num_pages();
        if requested < 1 || requested as u64 > last as u64 {
            last
        } else {
            requested as usize
        }
    }

    /// Row offset of the first item of page `number`.
    pub fn offset(&self, number: usize) -> usize {
        (number.max(1) - 1) * self.per_page
    }

    /// Wrap the items fetched for page `number`.
    pub fn page<T>(&self, number: usize, items: Vec<T>) -> Page<T> {
        let num_pages = self.num_pages();
        Page {
            items,
            number,
            num_pages,
            total_count: self.total_count,
            has_previous: number > 1,
            has_next: number < num_pages,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub total_count: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous.then(|| self.number - 1)
    }

    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next.then(|| self.number + 1)
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_pages() {
        assert_eq!(Paginator::new(10, 0).num_pages(), 1);
        assert_eq!(Paginator::new(10, 10).num_pages(), 1);
        assert_eq!(Paginator::new(10, 11).num_pages(), 2);
        assert_eq!(Paginator::new(10, 14).num_pages(), 2);
    }

    #[test]
    fn missing_or_garbage_page_is_first() {
        let paginator = Paginator::new(10, 35);
        assert_eq!(paginator.page_number(None), 1);
        assert_eq!(paginator.page_number(Some("")), 1);
        assert_eq!(paginator.page_number(Some("abc")), 1);
    }

    #[test]
    fn out_of_range_page_is_last() {
        let paginator = Paginator::new(10, 35);
        assert_eq!(paginator.page_number(Some("0")), 4);
        assert_eq!(paginator.page_number(Some("-3")), 4);
        assert_eq!(paginator.page_number(Some("999")), 4);
        assert_eq!(paginator.page_number(Some("2")), 2);
    }

    #[test]
    fn offsets_follow_page_size() {
        let paginator = Paginator::new(10, 35);
        assert_eq!(paginator.offset(1), 0);
        assert_eq!(paginator.offset(4), 30);
    }

    #[test]
    fn page_navigation_flags() {
        let paginator = Paginator::new(10, 14);
        let first = paginator.page(1, (0..10).collect::<Vec<_>>());
        assert!(!first.has_previous);
        assert!(first.has_next);
        assert_eq!(first.next_page_number(), Some(2));

        let last = paginator.page(2, (10..14).collect::<Vec<_>>());
        assert_eq!(last.len(), 4);
        assert!(last.has_previous);
        assert!(!last.has_next);
        assert_eq!(last.previous_page_number(), Some(1));
    }

    #[test]
    fn zero_page_size_is_clamped() {
        assert_eq!(Paginator::new(0, 3).per_page(), 1);
    }
}
