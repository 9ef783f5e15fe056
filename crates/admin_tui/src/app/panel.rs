use listing::{
    BulkInput, DataSource, ListError, ListOrchestrator, SEARCH_FILTER, TableEvent,
};

use crate::{
    app::Mode,
    local_state::ListPrefs,
    sections::StatusFilter,
    ui::keymap::AppAction,
};

/// One list section: the orchestrator plus the console-only state around
/// it (cursor, search text, dialog input).
pub struct Panel<S: DataSource> {
    pub key: &'static str,
    pub list: ListOrchestrator<S>,
    pub cursor: usize,
    pub search: String,
    pub status: StatusFilter,
    pub status_index: Option<usize>,
    pub input: String,
    pub input_error: Option<String>,
}

impl<S: DataSource> Panel<S> {
    pub fn new(key: &'static str, list: ListOrchestrator<S>, status: StatusFilter) -> Self {
        Self {
            key,
            list,
            cursor: 0,
            search: String::new(),
            status,
            status_index: None,
            input: String::new(),
            input_error: None,
        }
    }

    /// Applies finished fetches and bulk results.
    pub fn tick(&mut self) {
        self.list.pump();
        let rows = self.list.rows().len();
        self.cursor = self.cursor.min(rows.saturating_sub(1));
    }

    pub fn take_notice(&mut self) -> Option<String> {
        let notice = self.list.notice().map(str::to_string);
        if notice.is_some() {
            self.list.dismiss_notice();
        }
        notice
    }

    /// `true` while keystrokes go to the bulk dialog input.
    pub fn dialog_open(&self) -> bool {
        self.list.bulk_dialog().is_some()
    }

    pub fn status_label(&self) -> Option<&'static str> {
        self.status_index
            .and_then(|index| self.status.options.get(index))
            .map(|(_, label)| *label)
    }

    pub fn prefs(&self) -> ListPrefs {
        ListPrefs {
            section: self.key.to_string(),
            page_size: self.list.pagination().page_size,
            sort: self.list.sort().config().cloned(),
        }
    }

    pub fn handle(&mut self, mode: &mut Mode, action: AppAction) -> Result<(), ListError> {
        if self.dialog_open() {
            return self.handle_dialog(action);
        }
        match mode {
            Mode::Search => {
                self.handle_search(mode, action);
                Ok(())
            }
            Mode::BulkMenu => self.handle_bulk_menu(mode, action),
            Mode::Browse => self.handle_browse(mode, action),
        }
    }

    fn handle_browse(&mut self, mode: &mut Mode, action: AppAction) -> Result<(), ListError> {
        match action {
            AppAction::Up => self.cursor = self.cursor.saturating_sub(1),
            AppAction::Down => {
                let last = self.list.rows().len().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(last);
            }
            AppAction::Left => self.list.previous_page(),
            AppAction::Right => self.list.next_page(),
            AppAction::Cancel => {
                self.list.dismiss_error();
            }
            AppAction::Input(ch) => match ch {
                ' ' if !self.list.loading() => {
                    if let Some(id) = self.list.visible_ids().get(self.cursor) {
                        self.list.handle_table_event(TableEvent::RowToggled(id.clone()))?;
                    }
                }
                'a' => self
                    .list
                    .handle_table_event(TableEvent::AllVisibleToggled)?,
                '1'..='9' => {
                    let column = ch as usize - '1' as usize;
                    self.list
                        .handle_table_event(TableEvent::HeaderClicked(column))?;
                }
                'n' => self.list.next_page(),
                'p' => self.list.previous_page(),
                '+' | '-' => {
                    let size = self
                        .list
                        .pagination_controller()
                        .cycle_page_size(ch == '+');
                    self.list.set_page_size(size)?;
                }
                '/' => *mode = Mode::Search,
                'f' => self.cycle_status_filter(),
                'c' => {
                    self.search.clear();
                    self.status_index = None;
                    self.list.clear_filters();
                }
                'x' => self.list.clear_selection(),
                'b' => {
                    if self.list.bulk_bar().is_none() {
                        return Err(ListError::NoSelection);
                    }
                    *mode = Mode::BulkMenu;
                }
                'r' => self.list.refresh(),
                _ => {}
            },
            _ => {}
        }
        Ok(())
    }

    fn handle_search(&mut self, mode: &mut Mode, action: AppAction) {
        match action {
            AppAction::Input(ch) => {
                self.search.push(ch);
                self.list
                    .set_filter_debounced(SEARCH_FILTER, self.search.clone());
            }
            AppAction::Backspace => {
                self.search.pop();
                self.list
                    .set_filter_debounced(SEARCH_FILTER, self.search.clone());
            }
            AppAction::Submit | AppAction::Cancel => *mode = Mode::Browse,
            _ => {}
        }
    }

    fn handle_bulk_menu(&mut self, mode: &mut Mode, action: AppAction) -> Result<(), ListError> {
        match action {
            AppAction::Input(ch @ '1'..='9') => {
                *mode = Mode::Browse;
                let index = ch as usize - '1' as usize;
                let id = self
                    .list
                    .actions()
                    .get(index)
                    .map(|action| action.id.clone())
                    .ok_or_else(|| ListError::UnknownAction(ch.to_string()))?;
                self.input.clear();
                self.input_error = None;
                self.list.begin_bulk(&id)
            }
            AppAction::Cancel => {
                *mode = Mode::Browse;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_dialog(&mut self, action: AppAction) -> Result<(), ListError> {
        if self
            .list
            .bulk_dialog()
            .is_some_and(|dialog| dialog.submitting)
        {
            return Ok(());
        }
        match action {
            AppAction::Input(ch) => {
                self.input.push(ch);
                self.input_error = None;
                Ok(())
            }
            AppAction::Backspace => {
                self.input.pop();
                self.input_error = None;
                Ok(())
            }
            AppAction::Submit => self.confirm_dialog(),
            AppAction::Cancel => {
                self.input.clear();
                self.input_error = None;
                self.list.cancel_bulk()
            }
            _ => Ok(()),
        }
    }

    fn confirm_dialog(&mut self) -> Result<(), ListError> {
        let Some(requirement) = self.list.bulk_dialog().map(|dialog| dialog.requirement) else {
            return Err(ListError::NotConfirming);
        };
        let input = match BulkInput::from_text(requirement, &self.input) {
            Ok(input) => input,
            Err(err) => {
                self.input_error = Some(err.to_string());
                return Ok(());
            }
        };
        self.list.set_bulk_input(input)?;
        match self.list.confirm_bulk() {
            // shown inside the dialog
            Err(ListError::Validation(_)) => Ok(()),
            other => other,
        }
    }

    fn cycle_status_filter(&mut self) {
        let next = match self.status_index {
            None => Some(0),
            Some(index) if index + 1 < self.status.options.len() => Some(index + 1),
            Some(_) => None,
        };
        self.status_index = next;
        match next.and_then(|index| self.status.options.get(index)) {
            Some((value, _)) => self.list.set_filter(self.status.key, value.clone()),
            None => self.list.remove_filter(self.status.key),
        }
    }
}
