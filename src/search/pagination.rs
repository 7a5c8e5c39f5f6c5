//! Page planning for a requested result total.

/// Maximum number of items the search API returns per page.
pub const PAGE_CAPACITY: usize = 10;

/// How a requested result total splits into fixed-capacity pages.
///
/// ```
/// use imgsearch_core::search::PagePlan;
///
/// let plan = PagePlan::new(35);
/// assert_eq!(plan.page_count(), 4);
/// assert_eq!(plan.page_sizes(), vec![10, 10, 10, 5]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    result_total: usize,
    page_count: usize,
    last_page_size: usize,
}

impl PagePlan {
    /// Plans pages for `result_total` items.
    #[must_use]
    pub fn new(result_total: usize) -> Self {
        Self {
            result_total,
            page_count: result_total.div_ceil(PAGE_CAPACITY),
            last_page_size: result_total % PAGE_CAPACITY,
        }
    }

    /// Returns the requested result total.
    #[must_use]
    pub fn result_total(&self) -> usize {
        self.result_total
    }

    /// Returns the number of pages needed, including a final partial page.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Returns the remainder on the final page; 0 means the final page is full.
    #[must_use]
    pub fn last_page_size(&self) -> usize {
        self.last_page_size
    }

    /// Returns the item count to request for the 0-based page `index`,
    /// or `None` when the index is past the final page.
    #[must_use]
    pub fn page_size(&self, index: usize) -> Option<usize> {
        if index >= self.page_count {
            return None;
        }
        if index + 1 == self.page_count && self.last_page_size > 0 {
            Some(self.last_page_size)
        } else {
            Some(PAGE_CAPACITY)
        }
    }

    /// Returns every page size in request order.
    #[must_use]
    pub fn page_sizes(&self) -> Vec<usize> {
        (0..self.page_count)
            .filter_map(|index| self.page_size(index))
            .collect()
    }
}
