//! Pagination models

use serde::{Deserialize, Serialize};

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on items per page
pub const MAX_PAGE_SIZE: u32 = 100;

/// Requested page of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based)
    pub page: u32,
    /// Number of items per page
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request, clamping page to >= 1 and limit to 1..=MAX_PAGE_SIZE
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Build a request from optional query values
    pub fn from_optional(page: Option<u32>, limit: Option<u32>) -> Self {
        Self::new(page.unwrap_or(1), limit.unwrap_or(DEFAULT_PAGE_SIZE))
    }

    /// Number of items preceding this page
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.limit as usize
    }

    /// Query-string pairs for this request
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![("page", self.page.to_string()), ("limit", self.limit.to_string())]
    }
}

/// One page of a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub current_page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Empty result used when a listing cannot be loaded
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            current_page: 1,
            total_pages: 1,
        }
    }

    /// Number of pages needed for `total` items, never less than one
    pub fn page_count(total: u64, limit: u32) -> u32 {
        let limit = u64::from(limit.max(1));
        total.div_ceil(limit).max(1) as u32
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

impl<T: Clone> Page<T> {
    /// Cut the requested page out of an in-memory collection
    pub fn slice(all: &[T], request: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .iter()
            .skip(request.offset())
            .take(request.limit as usize)
            .cloned()
            .collect();

        Self {
            items,
            total,
            current_page: request.page,
            total_pages: Self::page_count(total, request.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_page_of_twenty_five_items() {
        let all: Vec<u32> = (1..=25).collect();
        let page = Page::slice(&all, PageRequest::new(2, 10));

        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn last_page_is_partial_and_past_the_end_is_empty() {
        let all: Vec<u32> = (1..=25).collect();
        assert_eq!(Page::slice(&all, PageRequest::new(3, 10)).items, vec![21, 22, 23, 24, 25]);
        assert!(Page::slice(&all, PageRequest::new(4, 10)).items.is_empty());
    }

    #[test]
    fn request_is_clamped() {
        let request = PageRequest::new(0, 1_000);
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, MAX_PAGE_SIZE);
        assert_eq!(Page::<u32>::page_count(0, 10), 1);
    }
}
