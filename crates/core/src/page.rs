//! Pagination primitives shared by every list query.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Page size applied when the caller does not pass `first`.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Hard cap on a single page.
pub const MAX_PAGE_SIZE: usize = 100;

/// Caller-supplied pagination window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageArgs {
    pub first: Option<i64>,
    pub offset: Option<i64>,
}

impl PageArgs {
    pub fn new(first: impl Into<Option<i64>>, offset: impl Into<Option<i64>>) -> Self {
        Self {
            first: first.into(),
            offset: offset.into(),
        }
    }
}

/// One page of a list query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Slice an already-filtered result set according to `args`.
    ///
    /// `has_more` is `offset + items.len() < total_count`.
    pub fn slice(all: Vec<T>, args: PageArgs) -> DomainResult<Self> {
        let first = match args.first {
            None => DEFAULT_PAGE_SIZE,
            Some(n) if n <= 0 => {
                return Err(DomainError::validation("first must be positive"));
            }
            Some(n) => (n as usize).min(MAX_PAGE_SIZE),
        };
        let offset = match args.offset {
            None => 0,
            Some(n) if n < 0 => {
                return Err(DomainError::validation("offset must not be negative"));
            }
            Some(n) => n as usize,
        };

        let total_count = all.len();
        let items: Vec<T> = all.into_iter().skip(offset).take(first).collect();
        let has_more = offset + items.len() < total_count;

        Ok(Self {
            items,
            total_count,
            has_more,
        })
    }

    /// Map the page's items, keeping the counts (used to resolve entity
    /// views after slicing).
    pub fn try_map<U, F>(self, f: F) -> DomainResult<Page<U>>
    where
        F: FnMut(T) -> DomainResult<U>,
    {
        let items = self
            .items
            .into_iter()
            .map(f)
            .collect::<DomainResult<Vec<U>>>()?;
        Ok(Page {
            items,
            total_count: self.total_count,
            has_more: self.has_more,
        })
    }
}
