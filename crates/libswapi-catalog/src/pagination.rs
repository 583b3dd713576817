// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::Serialize;

use crate::types::{ActiveFilters, PageCursors};

/// Characters per page when filtered results are paginated locally.
pub const PAGE_SIZE: usize = 12;

/// Where page boundaries come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    /// No search and no filters: one listing page is shown as-is and the
    /// listing endpoint's cursors drive navigation.
    Server,
    /// Search or filters active: the filtered set is sliced locally.
    Client,
}

impl PaginationMode {
    pub fn select(search: &str, filters: &ActiveFilters) -> Self {
        if search.is_empty() && filters.is_empty() {
            Self::Server
        } else {
            Self::Client
        }
    }
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Returns the 1-based `page` of `items`; out-of-range pages are empty.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Next/previous availability for the current page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageAvailability {
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageAvailability {
    pub fn server(cursors: &PageCursors) -> Self {
        Self {
            has_next: cursors.next.is_some(),
            has_previous: cursors.previous.is_some(),
        }
    }

    pub fn client(current_page: usize, filtered_len: usize, page_size: usize) -> Self {
        Self {
            has_next: current_page < total_pages(filtered_len, page_size),
            has_previous: current_page > 1,
        }
    }
}
