use serde::Serialize;

use crate::models::Category;

pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        count.div_ceil(page_size)
    }
}

/// Client-side page window over the filtered records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_number: usize,
    pub page_size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl Pagination {
    /// Window for `page`, clamped into `[1, max(total_pages, 1)]`.
    pub fn new(total_elements: usize, page_size: usize, page: usize) -> Self {
        let total_pages = total_pages(total_elements, page_size);
        Self {
            page_number: page.clamp(1, total_pages.max(1)),
            page_size,
            total_elements,
            total_pages,
        }
    }

    pub fn offset(&self) -> usize {
        (self.page_number - 1) * self.page_size
    }

    /// 1-based index of the first visible record, 0 when nothing is shown.
    pub fn first_item(&self) -> usize {
        if self.total_elements == 0 {
            0
        } else {
            self.offset() + 1
        }
    }

    pub fn last_item(&self) -> usize {
        (self.page_number * self.page_size).min(self.total_elements)
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }
}

/// What the list screen should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListCondition {
    Loading,
    /// The last refresh failed. `stale` records may still be listed.
    Failed { message: String, stale: bool },
    /// Nothing loaded at all; offer to create the first record.
    Empty,
    /// Records exist but search/filters exclude all of them; offer to clear.
    NoResults,
    Populated,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub condition: ListCondition,
    pub items: Vec<Category>,
    pub pagination: Pagination,
}

impl ListView {
    pub fn is_no_results(&self) -> bool {
        matches!(self.condition, ListCondition::NoResults)
    }

    pub fn is_empty_dataset(&self) -> bool {
        matches!(self.condition, ListCondition::Empty)
    }
}
