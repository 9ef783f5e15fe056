//! Identifier-based row selection.
//!
//! The selection survives sorting, filtering and paging: rows are remembered
//! by id, not by position, so a multi-page bulk action can be prepared by
//! selecting on several pages. Ids of rows that disappeared server side stay
//! selected until the selection is cleared.
use std::collections::HashSet;

/// State of a "select all visible" checkbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderCheck {
    Unchecked,
    Indeterminate,
    Checked,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionModel {
    selected: Vec<String>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole selection. Duplicates are dropped, first occurrence
    /// order is kept.
    pub fn on_row_select<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        self.selected = ids
            .into_iter()
            .map(Into::into)
            .filter(|id| seen.insert(id.clone()))
            .collect();
    }

    pub fn selected_rows(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|selected| selected == id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Full selection after toggling `id`.
    pub fn toggled(&self, id: &str) -> Vec<String> {
        if self.is_selected(id) {
            self.selected
                .iter()
                .filter(|selected| *selected != id)
                .cloned()
                .collect()
        } else {
            let mut next = self.selected.clone();
            next.push(id.to_string());
            next
        }
    }

    /// Full selection after adding every visible id.
    pub fn with_all_visible(&self, visible: &[String]) -> Vec<String> {
        let mut next = self.selected.clone();
        for id in visible {
            if !self.is_selected(id) {
                next.push(id.clone());
            }
        }
        next
    }

    /// Full selection after removing every visible id; ids selected on other
    /// pages are kept.
    pub fn without_visible(&self, visible: &[String]) -> Vec<String> {
        self.selected
            .iter()
            .filter(|id| !visible.contains(id))
            .cloned()
            .collect()
    }

    /// Checkbox state for the visible rows.
    pub fn header_check(&self, visible: &[String]) -> HeaderCheck {
        let selected = visible.iter().filter(|id| self.is_selected(id)).count();
        match selected {
            0 => HeaderCheck::Unchecked,
            n if n == visible.len() => HeaderCheck::Checked,
            _ => HeaderCheck::Indeterminate,
        }
    }

    /// Full selection after clicking the header checkbox: a fully checked
    /// page is unselected, anything else selects the whole page.
    pub fn toggled_visible(&self, visible: &[String]) -> Vec<String> {
        match self.header_check(visible) {
            HeaderCheck::Checked => self.without_visible(visible),
            HeaderCheck::Unchecked | HeaderCheck::Indeterminate => self.with_all_visible(visible),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn replaces_wholesale_and_dedups() {
        let mut selection = SelectionModel::new();
        selection.on_row_select(["a", "b", "a"]);
        assert_eq!(selection.selected_rows(), ids(&["a", "b"]).as_slice());

        selection.on_row_select(["c"]);
        assert_eq!(selection.selected_rows(), ids(&["c"]).as_slice());

        selection.clear_selection();
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_adds_and_removes() {
        let mut selection = SelectionModel::new();
        selection.on_row_select(selection.toggled("a"));
        selection.on_row_select(selection.toggled("b"));
        selection.on_row_select(selection.toggled("a"));

        assert_eq!(selection.selected_rows(), ids(&["b"]).as_slice());
    }

    #[test]
    fn header_check_is_tristate() {
        let mut selection = SelectionModel::new();
        let page = ids(&["a", "b", "c"]);
        assert_eq!(selection.header_check(&page), HeaderCheck::Unchecked);

        selection.on_row_select(["a", "z"]);
        assert_eq!(selection.header_check(&page), HeaderCheck::Indeterminate);

        selection.on_row_select(selection.toggled_visible(&page));
        assert_eq!(selection.header_check(&page), HeaderCheck::Checked);
        assert_eq!(selection.len(), 4);

        selection.on_row_select(selection.toggled_visible(&page));
        assert_eq!(selection.selected_rows(), ids(&["z"]).as_slice());
    }

    #[test]
    fn empty_page_reports_unchecked() {
        let selection = SelectionModel::new();
        assert_eq!(selection.header_check(&[]), HeaderCheck::Unchecked);
    }
}
