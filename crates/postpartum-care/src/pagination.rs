use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: usize = 10;

/// One-based page selector shared by the history endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn first() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }

    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Query string accepted by paginated routes (`?page=2`).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<usize>,
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        PageRequest::new(query.page.unwrap_or(1), DEFAULT_PER_PAGE)
    }
}

/// A window over an ordered result set. Pages past the end are empty rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Slices an already ordered collection.
    pub fn from_ordered(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len();
        let total_pages = total.div_ceil(request.per_page);
        let items: Vec<T> = items
            .into_iter()
            .skip(request.offset())
            .take(request.per_page)
            .collect();

        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
            total_pages,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_middle_page() {
        let page = Page::from_ordered((1..=25).collect::<Vec<_>>(), PageRequest::new(2, 10));
        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn page_past_end_is_empty() {
        let page = Page::from_ordered(vec![1, 2, 3], PageRequest::new(5, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn zero_page_clamps_to_first() {
        let request = PageRequest::from(PageQuery { page: Some(0) });
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, DEFAULT_PER_PAGE);

        let page = Page::from_ordered(Vec::<u8>::new(), request);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }
}
