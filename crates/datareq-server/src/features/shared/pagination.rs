//! Offset/limit pagination
//!
//! Listing computes aggregates over the whole filtered set and only then
//! cuts out the requested window, so pagination works on an in-memory slice
//! rather than a SQL `OFFSET`.
//!
//! # Examples
//!
//! ```rust,ignore
//! use datareq_server::features::shared::pagination::OffsetParams;
//!
//! let params = OffsetParams::new(Some(10), Some(5));
//! let page = params.slice(&all_rows, 10);
//! let meta = params.metadata(all_rows.len(), 10);
//! ```

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Offset/limit request parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OffsetParams {
    /// First element to return. Defaults to 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,

    /// Max number of elements to return. Defaults to the configured page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl OffsetParams {
    pub fn new(offset: Option<usize>, limit: Option<usize>) -> Self {
        Self { offset, limit }
    }

    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self, default_limit: usize) -> usize {
        self.limit.unwrap_or(default_limit)
    }

    /// Index range of the window inside a set of `total` elements
    ///
    /// Empty when the offset is past the end.
    pub fn window(&self, total: usize, default_limit: usize) -> Range<usize> {
        let start = self.offset().min(total);
        let end = start.saturating_add(self.limit(default_limit)).min(total);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T], default_limit: usize) -> &'a [T] {
        &items[self.window(items.len(), default_limit)]
    }

    pub fn metadata(&self, total: usize, default_limit: usize) -> PageMetadata {
        PageMetadata::new(self.offset(), self.limit(default_limit), total)
    }
}

/// Pagination metadata for the response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMetadata {
    pub offset: usize,
    pub limit: usize,
    /// Total number of matching items
    pub total: usize,
    /// Whether items exist past this window
    pub has_more: bool,
}

impl PageMetadata {
    pub fn new(offset: usize, limit: usize, total: usize) -> Self {
        Self {
            offset,
            limit,
            total,
            has_more: offset.saturating_add(limit) < total,
        }
    }
}
