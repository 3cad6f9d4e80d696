//! Paged results handed to the presenter.
//!
//! A [`PagedResult`] carries one page of items with the counters the
//! presenter turns into `page` state and first, last, prev and next links.

use serde::{Deserialize, Serialize};

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub page_number: u64,
    pub page_size: u64,
    pub total_records: u64,
    pub total_pages: u64,
}

impl<T> PagedResult<T> {
    pub fn new(
        items: Vec<T>,
        page_number: u64,
        page_size: u64,
        total_records: u64,
        total_pages: u64,
    ) -> Self {
        Self {
            items,
            page_number,
            page_size,
            total_records,
            total_pages,
        }
    }

    /// A page with no items and all counters zero.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 0, 0, 0)
    }

    /// Cut page `page_number` (1-based) of `page_size` items out of `source`.
    ///
    /// Pages past the end are empty; a zero page size yields no pages.
    pub fn paginate<I>(source: I, page_number: u64, page_size: u64) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let all: Vec<T> = source.into_iter().collect();
        let total_records = all.len() as u64;
        let total_pages = if page_size == 0 {
            0
        } else {
            total_records.div_ceil(page_size)
        };
        let skip = page_number.saturating_sub(1).saturating_mul(page_size);
        let items = all
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(page_size).unwrap_or(usize::MAX))
            .collect();
        Self::new(items, page_number, page_size, total_records, total_pages)
    }

    /// Map items while keeping the paging counters.
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_records: self.total_records,
            total_pages: self.total_pages,
        }
    }

    /// Like [`map_items`](Self::map_items), stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_map_items<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<PagedResult<U>, E> {
        Ok(PagedResult {
            items: self.items.into_iter().map(f).collect::<Result<_, E>>()?,
            page_number: self.page_number,
            page_size: self.page_size,
            total_records: self.total_records,
            total_pages: self.total_pages,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for PagedResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PagedResult<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
