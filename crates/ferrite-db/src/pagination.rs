//! Windowed result fetching.
//!
//! [`paginate`] turns any SELECT query into a counted page: one count
//! query for the total, one windowed fetch for the rows. Pages are
//! numbered from 1; the page number is validated before either query
//! runs.

use ferrite_core::{OrmError, OrmResult};
use tracing::debug;

use crate::driver::{Database, Row};
use crate::query::compiler::{Action, Limit, Query, Sort};

/// One page of results with its position in the full set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// The 1-based page number.
    pub number: u64,
    /// The rows on this page.
    pub data: Vec<T>,
    /// The requested page size.
    pub size: u64,
    /// The total number of matching rows across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    /// The number of pages the full set spans.
    pub const fn total_pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.total.div_ceil(self.size)
        }
    }

    /// Whether a page follows this one.
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages()
    }

    /// Whether a page precedes this one.
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Maps the page's rows, keeping the position metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            number: self.number,
            data: self.data.into_iter().map(f).collect(),
            size: self.size,
            total: self.total,
        }
    }
}

/// Fetches one page of the rows a query selects.
///
/// The count query reuses the filters and joins of the original; the
/// fetch query adds a window of `size` rows starting at
/// `(number - 1) * size`. Sorts carried by the query apply to the fetch,
/// with `sorts` appended after them, so page boundaries are stable and
/// callers can order a page without rebuilding the query.
///
/// # Errors
///
/// Returns [`OrmError::InvalidPageNumber`] for page 0 before any database
/// work happens. Driver failures pass through unchanged.
pub async fn paginate(
    db: &Database,
    query: &Query,
    number: u64,
    size: u64,
    sorts: &[Sort],
) -> OrmResult<Page<Row>> {
    if number < 1 {
        return Err(OrmError::InvalidPageNumber(number));
    }

    let mut count_query = query.clone();
    count_query.action = Action::Count;
    count_query.sorts.clear();
    count_query.limit = None;
    let total = db.count(&count_query).await?;

    let mut fetch_query = query.clone();
    fetch_query.sorts.extend_from_slice(sorts);
    let offset = usize::try_from((number - 1) * size).unwrap_or(usize::MAX);
    let count = usize::try_from(size).unwrap_or(usize::MAX);
    fetch_query.limit = Some(Limit::new(count, offset));
    let data = db.fetch(&fetch_query).await?;

    debug!(
        table = %query.table,
        number,
        size,
        total,
        rows = data.len(),
        "fetched page"
    );

    Ok(Page {
        number,
        data,
        size,
        total,
    })
}
