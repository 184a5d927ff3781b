use super::queryset::Slice;
use crate::errors::{Result, VistaError};

/// Page size used when an endpoint does not configure one.
pub const DEFAULT_PER_PAGE: usize = 100;

/// Fixed-size page arithmetic over a counted result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: usize,
}

impl Paginator {
    /// A page size of 0 is treated as 1.
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Number of pages for `count` items. An empty result still has one page.
    pub fn num_pages(&self, count: usize) -> usize {
        count.div_ceil(self.per_page).max(1)
    }

    /// Resolve page `number` (1-based) of a result set of `count` items.
    ///
    /// # Errors
    /// `EmptyPage` if `number` is below 1 or past the last page.
    pub fn page(&self, number: i64, count: usize) -> Result<PageWindow> {
        let num_pages = self.num_pages(count);
        if number < 1 || number as u64 > num_pages as u64 {
            return Err(VistaError::EmptyPage {
                page: number,
                num_pages,
            });
        }
        Ok(PageWindow {
            number: number as usize,
            per_page: self.per_page,
            count,
            num_pages,
        })
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

/// One validated page of a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: usize,
    pub per_page: usize,
    /// Size of the whole, unpaginated result set
    pub count: usize,
    pub num_pages: usize,
}

impl PageWindow {
    pub fn offset(&self) -> usize {
        (self.number - 1) * self.per_page
    }

    /// Rows to request from the data source for this page.
    pub fn slice(&self) -> Slice {
        Slice {
            offset: self.offset(),
            limit: self.per_page,
        }
    }

    /// 1-based index of the first item, or 0 for an empty result.
    pub fn start_index(&self) -> usize {
        if self.count == 0 {
            0
        } else {
            self.offset() + 1
        }
    }

    /// 1-based index of the last item on this page, relative to the whole result.
    pub fn end_index(&self) -> usize {
        if self.number == self.num_pages {
            self.count
        } else {
            self.number * self.per_page
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}
