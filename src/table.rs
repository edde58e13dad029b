//! Table View Model
//!
//! Client-side filtering, sorting and pagination over the cached items, plus
//! the header checkbox state. Pure functions of (items, view state); nothing
//! here talks to the server.

use std::cmp::Ordering;

use crate::models::GroceryItem;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sorting {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// Header click: unsorted or descending -> ascending, ascending -> descending
pub fn toggle_sorting(current: Option<Sorting>, column: SortColumn) -> Sorting {
    let direction = match current {
        Some(Sorting { column: c, direction: SortDirection::Asc }) if c == column => SortDirection::Desc,
        _ => SortDirection::Asc,
    };
    Sorting { column, direction }
}

/// Tri-state of the "mark all visible" checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheckState {
    Checked,
    Indeterminate,
    Unchecked,
}

impl HeaderCheckState {
    pub fn from_rows(rows: &[GroceryItem]) -> Self {
        let bought = rows.iter().filter(|item| item.is_bought).count();
        if rows.is_empty() || bought == 0 {
            HeaderCheckState::Unchecked
        } else if bought == rows.len() {
            HeaderCheckState::Checked
        } else {
            HeaderCheckState::Indeterminate
        }
    }

    /// Value a click applies to every visible row
    pub fn toggle_target(self) -> bool {
        self != HeaderCheckState::Checked
    }

    pub fn is_checked(self) -> bool {
        self == HeaderCheckState::Checked
    }

    pub fn is_indeterminate(self) -> bool {
        self == HeaderCheckState::Indeterminate
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub sorting: Option<Sorting>,
    pub name_filter: String,
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            sorting: None,
            name_filter: String::new(),
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// What the table renders for one state
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    /// Rows of the visible page, in display order
    pub rows: Vec<GroceryItem>,
    /// Effective page index after clamping
    pub page_index: usize,
    pub page_count: usize,
    /// Rows left after filtering, across all pages
    pub filtered_count: usize,
}

impl PageView {
    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }

    pub fn header_state(&self) -> HeaderCheckState {
        HeaderCheckState::from_rows(&self.rows)
    }

    /// "Page 1 of 3"; an empty table still reads "Page 1 of 1"
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page_index + 1, self.page_count.max(1))
    }
}

/// Case-insensitive substring match on the name
pub fn matches_filter(item: &GroceryItem, filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || item.name.to_lowercase().contains(&filter.to_lowercase())
}

fn compare(a: &GroceryItem, b: &GroceryItem, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortColumn::Amount => a.amount.partial_cmp(&b.amount).unwrap_or(Ordering::Equal),
    }
}

/// Filter, then sort (stable), then cut out the current page
pub fn page_view(items: &[GroceryItem], state: &TableState) -> PageView {
    let mut rows: Vec<&GroceryItem> = items
        .iter()
        .filter(|item| matches_filter(item, &state.name_filter))
        .collect();

    if let Some(sorting) = state.sorting {
        rows.sort_by(|a, b| {
            let ord = compare(a, b, sorting.column);
            match sorting.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }

    let page_size = state.page_size.max(1);
    let filtered_count = rows.len();
    let page_count = filtered_count.div_ceil(page_size);
    // The collection can shrink under the current page; show the last one instead
    let page_index = state.page_index.min(page_count.saturating_sub(1));

    let rows = rows
        .into_iter()
        .skip(page_index * page_size)
        .take(page_size)
        .cloned()
        .collect();

    PageView { rows, page_index, page_count, filtered_count }
}
