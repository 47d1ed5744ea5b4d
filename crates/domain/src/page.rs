//! Pagination over a counted, already-filtered sequence.

use serde::{Deserialize, Serialize};

/// A bounded slice of a larger filtered and sorted collection, plus counters
/// describing its position within the whole.
///
/// Page indexes are 1-based. The index reported in the result is always
/// within `[1, total_pages]`, and `total_pages` is at least 1 even when the
/// collection is empty, so an empty result is "page 1 of 1" rather than an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page, at most `page_size` of them.
    pub items: Vec<T>,
    /// 1-based index of this page.
    pub page_index: usize,
    /// Total number of pages after filtering.
    pub total_pages: usize,
    /// Total number of items after filtering.
    pub total_items: usize,
    /// Requested page size.
    pub page_size: usize,
}

impl<T> Page<T> {
    /// Returns the number of pages needed for `total_items` at `page_size`
    /// items per page. Always at least 1; a page size below 1 counts as 1.
    #[must_use]
    pub fn total_pages_for(total_items: usize, page_size: usize) -> usize {
        total_items.div_ceil(page_size.max(1)).max(1)
    }

    /// Clamps a requested 1-based page index into `[1, total_pages]`.
    #[must_use]
    pub fn clamp_index(requested: usize, total_pages: usize) -> usize {
        requested.clamp(1, total_pages.max(1))
    }

    /// Returns the number of items to skip for the clamped page.
    #[must_use]
    pub fn offset_for(requested: usize, total_items: usize, page_size: usize) -> usize {
        let total_pages = Self::total_pages_for(total_items, page_size);
        (Self::clamp_index(requested, total_pages) - 1) * page_size.max(1)
    }

    /// Assembles a page from an already-sliced item list and the post-filter
    /// total reported by the source.
    #[must_use]
    pub fn assemble(
        items: Vec<T>,
        total_items: usize,
        requested_page: usize,
        page_size: usize,
    ) -> Self {
        let page_size = page_size.max(1);
        let total_pages = Self::total_pages_for(total_items, page_size);

        Self {
            items,
            page_index: Self::clamp_index(requested_page, total_pages),
            total_pages,
            total_items,
            page_size,
        }
    }

    /// Computes a page directly from a full in-memory sequence.
    #[must_use]
    pub fn from_vec(all: Vec<T>, requested_page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_items = all.len();
        let total_pages = Self::total_pages_for(total_items, page_size);
        let page_index = Self::clamp_index(requested_page, total_pages);

        let items = all
            .into_iter()
            .skip((page_index - 1) * page_size)
            .take(page_size)
            .collect();

        Self {
            items,
            page_index,
            total_pages,
            total_items,
            page_size,
        }
    }

    /// Maps page items into another type, keeping the counters.
    #[must_use]
    pub fn map<U>(self, mapper: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(mapper).collect(),
            page_index: self.page_index,
            total_pages: self.total_pages,
            total_items: self.total_items,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::Page;

    #[test]
    fn empty_collection_yields_single_empty_page() {
        let page = Page::<i32>::from_vec(Vec::new(), 1, 10);
        assert_eq!(page.page_index, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_items, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn out_of_range_page_clamps_to_last() {
        let page = Page::from_vec((1..=25).collect::<Vec<i32>>(), 9, 10);
        assert_eq!(page.page_index, 3);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn zero_page_clamps_to_first() {
        let page = Page::from_vec((1..=25).collect::<Vec<i32>>(), 0, 10);
        assert_eq!(page.page_index, 1);
        assert_eq!(page.items, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        assert_eq!(Page::<i32>::total_pages_for(20, 10), 2);
        assert_eq!(Page::<i32>::total_pages_for(21, 10), 3);
    }

    #[test]
    fn offset_tracks_clamped_page() {
        assert_eq!(Page::<i32>::offset_for(2, 25, 10), 10);
        assert_eq!(Page::<i32>::offset_for(99, 25, 10), 20);
        assert_eq!(Page::<i32>::offset_for(1, 0, 10), 0);
    }

    proptest! {
        #[test]
        fn total_pages_is_ceiling_division(total in 0usize..10_000, size in 1usize..100) {
            let pages = Page::<u8>::total_pages_for(total, size);
            prop_assert_eq!(pages, total.div_ceil(size).max(1));
        }

        #[test]
        fn page_index_is_always_in_range(
            total in 0usize..1_000,
            size in 1usize..50,
            requested in 0usize..5_000,
        ) {
            let all: Vec<usize> = (0..total).collect();
            let page = Page::from_vec(all, requested, size);
            prop_assert!(page.page_index >= 1);
            prop_assert!(page.page_index <= page.total_pages);
            prop_assert!(page.items.len() <= size);
        }

        #[test]
        fn pages_partition_the_sequence(total in 0usize..500, size in 1usize..40) {
            let all: Vec<usize> = (0..total).collect();
            let total_pages = Page::<usize>::total_pages_for(total, size);

            let mut reassembled = Vec::new();
            for index in 1..=total_pages {
                reassembled.extend(Page::from_vec(all.clone(), index, size).items);
            }

            prop_assert_eq!(reassembled, all);
        }
    }
}
