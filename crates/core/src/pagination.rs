//! Page windows over the patient collection.

use crate::constants::PAGE_SIZE;

/// The navigable state of one list page.
///
/// `current` must be within `1..=total_pages`; the list screen never requests a page outside
/// that range because the previous/next controls are disabled at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub current: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PageWindow {
    pub fn new(total_items: u64, current: u32) -> Self {
        Self::with_page_size(total_items, PAGE_SIZE, current)
    }

    pub fn with_page_size(total_items: u64, page_size: u32, current: u32) -> Self {
        debug_assert!(page_size > 0);
        let total_pages = total_items.div_ceil(u64::from(page_size)).max(1);
        Self {
            current,
            page_size,
            total_items,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }

    pub fn can_go_previous(&self) -> bool {
        self.current > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current < self.total_pages
    }

    pub fn previous(&self) -> Option<u32> {
        self.can_go_previous().then(|| self.current - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.can_go_next().then(|| self.current + 1)
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current, self.total_pages)
    }
}
