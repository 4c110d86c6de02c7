//! Data models shared by the metadata clients.
//!
//! Media records stay schemaless: the caller's field list decides what
//! upstream returns, so records are kept as JSON objects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One anime or manga item as returned by upstream
pub type MediaRecord = serde_json::Map<String, serde_json::Value>;

/// Records keyed by their title
pub type TitleIndex = BTreeMap<String, MediaRecord>;

/// Records keyed by their upstream rank (ranks may be sparse)
pub type RankIndex = BTreeMap<u32, MediaRecord>;

/// Offsets for the neighbouring pages of an offset/limit query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingCursor {
    /// Offset of the previous page, `None` on the first page
    pub previous: Option<u32>,
    /// Offset of the next page, `None` when upstream has no more results
    pub next: Option<u32>,
}

impl PagingCursor {
    /// Derive the cursor from the request's offset/limit and upstream's
    /// "next page exists" signal.
    ///
    /// `previous` never goes below zero: an offset smaller than the limit
    /// points back at offset 0.
    pub fn from_offsets(offset: u32, limit: u32, has_next: bool) -> Self {
        let previous = (offset > 0).then(|| offset.saturating_sub(limit));
        let next = has_next.then(|| offset.saturating_add(limit));
        Self { previous, next }
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// A page of results plus the cursor for its neighbours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub results: T,
    pub paging: PagingCursor,
}

impl<T> Paged<T> {
    pub fn new(results: T, paging: PagingCursor) -> Self {
        Self { results, paging }
    }

    /// Apply `f` to the results, keeping the cursor
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Paged<U> {
        Paged {
            results: f(self.results),
            paging: self.paging,
        }
    }
}
