//! Client-side paging over the flat hit list.
//!
//! All hits for a term are requested at once; pages are windows into that list.

/// Images shown per page.
pub const PAGE_SIZE: usize = 6;

/// Hard cap on the number of pages, whatever the provider returns.
pub const MAX_VISIBLE_PAGES: u32 = 3;

/// Number of hits requested from the image provider.
pub const MAX_RESULTS: usize = PAGE_SIZE * MAX_VISIBLE_PAGES as usize;

/// `min(ceil(count / PAGE_SIZE), MAX_VISIBLE_PAGES)`.
pub fn total_pages(count: usize) -> u32 {
    let pages = count.div_ceil(PAGE_SIZE).min(MAX_VISIBLE_PAGES as usize);
    pages as u32
}

/// Items of the 1-based `page`, clipped to the bounds of `items`.
pub fn visible_slice<T>(items: &[T], page: u32) -> &[T] {
    let Some(index) = (page as usize).checked_sub(1) else {
        return &[];
    };
    let start = index.saturating_mul(PAGE_SIZE);
    if start >= items.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

pub fn has_previous(page: u32) -> bool {
    page > 1
}

pub fn has_next(page: u32, total_pages: u32) -> bool {
    page < total_pages
}
