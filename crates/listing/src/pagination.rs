//! Page/size bookkeeping against a total item count.
//!
//! Navigation never fails: out-of-range requests are clamped into
//! `[1, total_pages]`. `total_pages` is at least 1, so an empty result set is
//! still "page 1 of 1".
use serde::{Deserialize, Serialize};

use crate::error::ListError;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Page sizes offered by page-size pickers.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
}

impl PaginationState {
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size).max(1)
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page > 1
    }

    /// 1-based inclusive range of the items on the current page, `None` when
    /// there is nothing to show.
    pub fn item_range(&self) -> Option<(usize, usize)> {
        if self.total_items == 0 {
            return None;
        }
        let start = (self.current_page - 1) * self.page_size + 1;
        let end = (start + self.page_size - 1).min(self.total_items);
        (start <= end).then_some((start, end))
    }

    /// Zero-based offset of the first item of the current page.
    pub fn offset(&self) -> usize {
        (self.current_page - 1) * self.page_size
    }
}

/// One button of a page picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageItem {
    Page { number: usize, current: bool },
    Ellipsis,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginationController {
    state: PaginationState,
}

impl Default for PaginationController {
    fn default() -> Self {
        Self {
            state: PaginationState {
                current_page: 1,
                page_size: DEFAULT_PAGE_SIZE,
                total_items: 0,
            },
        }
    }
}

impl PaginationController {
    pub fn new(page_size: usize) -> Result<Self, ListError> {
        if page_size == 0 {
            return Err(ListError::InvalidPageSize);
        }
        Ok(Self {
            state: PaginationState {
                current_page: 1,
                page_size,
                total_items: 0,
            },
        })
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    pub fn page_size(&self) -> usize {
        self.state.page_size
    }

    pub fn total_items(&self) -> usize {
        self.state.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.state.total_pages()
    }

    pub fn can_go_next(&self) -> bool {
        self.state.can_go_next()
    }

    pub fn can_go_previous(&self) -> bool {
        self.state.can_go_previous()
    }

    /// Moves to `page` clamped into range. Returns `true` when the current
    /// page changed.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let target = page.clamp(1, self.total_pages());
        let changed = target != self.state.current_page;
        self.state.current_page = target;
        changed
    }

    pub fn go_to_next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.go_to_page(self.state.current_page + 1)
    }

    pub fn go_to_previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.go_to_page(self.state.current_page - 1)
    }

    pub fn reset(&mut self) -> bool {
        self.go_to_page(1)
    }

    /// Changes the page size and always goes back to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ListError> {
        if page_size == 0 {
            return Err(ListError::InvalidPageSize);
        }
        self.state.page_size = page_size;
        self.state.current_page = 1;
        Ok(())
    }

    /// Records the total reported by the data source. The current page is
    /// clamped when the total shrank below it; returns `true` in that case.
    pub fn set_total_items(&mut self, total_items: usize) -> bool {
        self.state.total_items = total_items;
        self.go_to_page(self.state.current_page)
    }

    /// Next/previous entry of [`PAGE_SIZE_OPTIONS`] relative to the current
    /// size, staying on the last option at either end.
    pub fn cycle_page_size(&self, forward: bool) -> usize {
        let size = self.state.page_size;
        let options = PAGE_SIZE_OPTIONS;
        if forward {
            options
                .iter()
                .copied()
                .find(|option| *option > size)
                .unwrap_or(options[options.len() - 1])
        } else {
            options
                .iter()
                .rev()
                .copied()
                .find(|option| *option < size)
                .unwrap_or(options[0])
        }
    }

    /// Page picker buttons: first and last page are always present, `window`
    /// pages on each side of the current one, gaps collapsed to an ellipsis.
    pub fn visible_pages(&self, window: usize) -> Vec<PageItem> {
        let total = self.total_pages();
        let current = self.state.current_page;
        let start = current.saturating_sub(window).max(1);
        let end = (current + window).min(total);

        let mut items = Vec::new();
        let push_page = |number: usize, items: &mut Vec<PageItem>| {
            items.push(PageItem::Page {
                number,
                current: number == current,
            });
        };

        if start > 1 {
            push_page(1, &mut items);
            if start > 2 {
                items.push(PageItem::Ellipsis);
            }
        }
        for number in start..=end {
            push_page(number, &mut items);
        }
        if end < total {
            if end + 1 < total {
                items.push(PageItem::Ellipsis);
            }
            push_page(total, &mut items);
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(total: usize, page_size: usize) -> PaginationController {
        let mut pagination = PaginationController::new(page_size).unwrap();
        pagination.set_total_items(total);
        pagination
    }

    #[test]
    fn clamps_out_of_range_pages() {
        let mut pagination = controller(45, 20);
        assert_eq!(pagination.total_pages(), 3);

        pagination.go_to_page(10);
        assert_eq!(pagination.current_page(), 3);
        assert!(!pagination.can_go_next());
        assert!(pagination.can_go_previous());

        pagination.go_to_page(0);
        assert_eq!(pagination.current_page(), 1);
        assert!(pagination.can_go_next());

        pagination.go_to_page(2);
        assert!(pagination.can_go_next());
    }

    #[test]
    fn empty_result_is_page_one_of_one() {
        let mut pagination = controller(0, 20);

        assert_eq!(pagination.total_pages(), 1);
        assert_eq!(pagination.current_page(), 1);
        assert!(!pagination.can_go_next());
        assert!(!pagination.can_go_previous());
        assert!(!pagination.go_to_next());
        assert!(!pagination.go_to_previous());
        assert_eq!(pagination.state().item_range(), None);
    }

    #[test]
    fn next_and_previous_stop_at_edges() {
        let mut pagination = controller(25, 10);

        assert!(!pagination.go_to_previous());
        assert!(pagination.go_to_next());
        assert!(pagination.go_to_next());
        assert!(!pagination.go_to_next());
        assert_eq!(pagination.current_page(), 3);
        assert_eq!(pagination.state().item_range(), Some((21, 25)));
    }

    #[test]
    fn page_size_change_resets_to_first_page() {
        let mut pagination = controller(100, 10);
        pagination.go_to_page(7);

        pagination.set_page_size(50).unwrap();
        assert_eq!(pagination.current_page(), 1);
        assert_eq!(pagination.total_pages(), 2);
        assert_eq!(
            pagination.set_page_size(0),
            Err(ListError::InvalidPageSize)
        );
        assert_eq!(pagination.page_size(), 50);
    }

    #[test]
    fn shrinking_total_clamps_current_page() {
        let mut pagination = controller(45, 20);
        pagination.go_to_page(3);

        assert!(pagination.set_total_items(30));
        assert_eq!(pagination.current_page(), 2);
        assert!(!pagination.set_total_items(31));
    }

    #[test]
    fn visible_pages_collapse_gaps() {
        let mut pagination = controller(200, 10);
        pagination.go_to_page(10);

        assert_eq!(
            pagination.visible_pages(1),
            vec![
                PageItem::Page { number: 1, current: false },
                PageItem::Ellipsis,
                PageItem::Page { number: 9, current: false },
                PageItem::Page { number: 10, current: true },
                PageItem::Page { number: 11, current: false },
                PageItem::Ellipsis,
                PageItem::Page { number: 20, current: false },
            ]
        );

        let pagination = controller(30, 10);
        assert_eq!(
            pagination.visible_pages(1),
            vec![
                PageItem::Page { number: 1, current: true },
                PageItem::Page { number: 2, current: false },
                PageItem::Page { number: 3, current: false },
            ]
        );
    }

    #[test]
    fn cycle_page_size_walks_the_options() {
        let pagination = controller(0, 20);
        assert_eq!(pagination.cycle_page_size(true), 50);
        assert_eq!(pagination.cycle_page_size(false), 10);

        let pagination = controller(0, 100);
        assert_eq!(pagination.cycle_page_size(true), 100);
    }
}
