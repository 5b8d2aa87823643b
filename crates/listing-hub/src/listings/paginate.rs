use std::num::NonZeroUsize;

use serde::Serialize;

use super::domain::ListingRecord;

/// One fixed-size window over a listing collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub items: Vec<ListingRecord>,
    pub page_number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice `records` into 1-indexed pages of `page_size`.
///
/// Page 0 and pages past `total_pages` come back empty rather than clamped.
pub fn paginate(records: &[ListingRecord], page_size: NonZeroUsize, page_number: usize) -> Page {
    let size = page_size.get();
    let total_pages = records.len().div_ceil(size);

    let items = match page_number.checked_sub(1) {
        Some(index) if index < total_pages => {
            let start = index * size;
            let end = (start + size).min(records.len());
            records[start..end].to_vec()
        }
        _ => Vec::new(),
    };

    Page {
        items,
        page_number,
        total_pages,
        total_items: records.len(),
    }
}
