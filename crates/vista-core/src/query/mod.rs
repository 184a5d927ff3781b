//! Request parameters, sort keys, pagination and the query set handed to a
//! [`Repository`](crate::repository::Repository).

mod paginator;
mod params;
mod queryset;
mod sort;

pub use paginator::{PageWindow, Paginator, DEFAULT_PER_PAGE};
pub use params::{
    strip_cache_buster, ControlParams, QueryParams, CACHE_BUSTER_PARAM, FIELDS_PARAM, PAGE_PARAM,
    SORT_BY_PARAM,
};
pub use queryset::{QuerySet, Slice};
pub use sort::{parse_sort_by, SortKey};
