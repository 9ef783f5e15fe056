//! Page-level composition of the list controllers.
//!
//! [`ListOrchestrator`] owns the sort, pagination, filter and selection state
//! of one list page, the rows currently displayed and the bulk-action dialog.
//! Every change to sort, filters or page issues a fetch on the
//! [`DataSource`]; results come back as [`ListEvent`]s over an internal
//! channel and are applied by [`ListOrchestrator::handle_event`].
//!
//! Fetches are tagged with a generation number. Only the response of the
//! latest request is applied, older ones are dropped, and issuing a new fetch
//! aborts the previous task. Dropping the orchestrator aborts whatever is in
//! flight, so nothing touches the state after the page is gone.
use std::{
    panic::AssertUnwindSafe,
    sync::Arc,
    time::Duration,
};

use futures::FutureExt;
use tokio::{sync::mpsc, task::AbortHandle};

use crate::{
    bulk::{BulkAction, BulkActionBar, BulkDialog, BulkInput, BulkOutcome, BulkPhase, BulkRequest},
    debounce::Debouncer,
    error::{ListError, ServiceError},
    filter::{FilterBag, FilterController},
    pagination::{DEFAULT_PAGE_SIZE, PaginationController, PaginationState},
    selection::SelectionModel,
    sort::{SortConfig, SortController},
    source::{DataSource, FetchParams, Page, RowKey},
    table::{Column, DEFAULT_EMPTY_MESSAGE, TableConfig, TableEvent, TableIntent},
    value::Value,
};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Clone, Debug)]
pub struct ListOptions {
    pub page_size: usize,
    /// Delay applied by [`ListOrchestrator::set_filter_debounced`].
    pub debounce: Duration,
    pub selectable: bool,
    pub empty_message: String,
    /// Keep the previous rows on screen when a fetch fails.
    pub keep_rows_on_error: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
            selectable: true,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            keep_rows_on_error: true,
        }
    }
}

/// Completion of asynchronous work started by the orchestrator.
#[derive(Debug)]
pub enum ListEvent<R> {
    Fetched {
        generation: u64,
        result: Result<Page<R>, ServiceError>,
    },
    DebounceElapsed {
        token: u64,
    },
    BulkFinished {
        action_id: String,
        result: Result<BulkOutcome, ServiceError>,
    },
}

pub struct ListOrchestratorBuilder<S: DataSource> {
    source: Arc<S>,
    columns: Vec<Column<S::Row>>,
    row_key: RowKey<S::Row>,
    actions: Vec<BulkAction>,
    options: ListOptions,
    sort: Option<SortConfig>,
    filters: FilterBag,
}

impl<S: DataSource> ListOrchestratorBuilder<S> {
    #[must_use]
    pub fn columns(mut self, columns: Vec<Column<S::Row>>) -> Self {
        self.columns = columns;
        self
    }

    #[must_use]
    pub fn row_key(mut self, row_key: RowKey<S::Row>) -> Self {
        self.row_key = row_key;
        self
    }

    #[must_use]
    pub fn action(mut self, action: BulkAction) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn options(mut self, options: ListOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: Option<SortConfig>) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn filters(mut self, filters: FilterBag) -> Self {
        self.filters = filters;
        self
    }

    /// Builds the orchestrator. Nothing is fetched until
    /// [`ListOrchestrator::refresh`] is called.
    pub fn build(self) -> Result<ListOrchestrator<S>, ListError> {
        let pagination = PaginationController::new(self.options.page_size)?;
        let mut sort = SortController::default();
        sort.set_sort(self.sort)?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(ListOrchestrator {
            source: self.source,
            columns: self.columns,
            row_key: self.row_key,
            actions: self.actions,
            debouncer: Debouncer::new(self.options.debounce),
            options: self.options,
            sort,
            pagination,
            filters: FilterController::new(self.filters),
            selection: SelectionModel::new(),
            rows: Vec::new(),
            loading: false,
            error: None,
            notice: None,
            dialog: None,
            generation: 0,
            in_flight: None,
            events_tx,
            events_rx,
        })
    }
}

pub struct ListOrchestrator<S: DataSource> {
    source: Arc<S>,
    columns: Vec<Column<S::Row>>,
    row_key: RowKey<S::Row>,
    actions: Vec<BulkAction>,
    options: ListOptions,
    sort: SortController,
    pagination: PaginationController,
    filters: FilterController,
    selection: SelectionModel,
    rows: Vec<S::Row>,
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
    dialog: Option<BulkDialog>,
    generation: u64,
    in_flight: Option<AbortHandle>,
    debouncer: Debouncer,
    events_tx: mpsc::UnboundedSender<ListEvent<S::Row>>,
    events_rx: mpsc::UnboundedReceiver<ListEvent<S::Row>>,
}

impl<S: DataSource> ListOrchestrator<S> {
    /// Return a builder for `ListOrchestrator`.
    pub fn builder(source: S) -> ListOrchestratorBuilder<S> {
        ListOrchestratorBuilder {
            source: Arc::new(source),
            columns: Vec::new(),
            row_key: RowKey::default(),
            actions: Vec::new(),
            options: ListOptions::default(),
            sort: None,
            filters: FilterBag::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn columns(&self) -> &[Column<S::Row>] {
        &self.columns
    }

    pub fn actions(&self) -> &[BulkAction] {
        &self.actions
    }

    pub fn rows(&self) -> &[S::Row] {
        &self.rows
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn sort(&self) -> &SortController {
        &self.sort
    }

    pub fn pagination(&self) -> &PaginationState {
        self.pagination.state()
    }

    pub fn pagination_controller(&self) -> &PaginationController {
        &self.pagination
    }

    pub fn filters(&self) -> &FilterController {
        &self.filters
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// Generation of the latest fetch request.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Parameters the next fetch would use.
    pub fn params(&self) -> FetchParams {
        FetchParams {
            filters: self.filters.bag().active(),
            sort: self.sort.config().cloned(),
            page: self.pagination.current_page(),
            page_size: self.pagination.page_size(),
        }
    }

    /// Props for the table renderer.
    pub fn table(&self) -> TableConfig<'_, S::Row> {
        TableConfig {
            columns: &self.columns,
            data: &self.rows,
            loading: self.loading,
            selectable: self.options.selectable,
            selection: &self.selection,
            sort_config: self.sort.config(),
            row_key: &self.row_key,
            empty_message: &self.options.empty_message,
        }
    }

    pub fn visible_ids(&self) -> Vec<String> {
        self.rows.iter().map(|row| self.row_key.id_of(row)).collect()
    }

    /// Props for the bulk-action bar, `None` while nothing is selected.
    pub fn bulk_bar(&self) -> Option<BulkActionBar> {
        BulkActionBar::new(
            self.selection.len(),
            self.pagination.total_items(),
            &self.actions,
        )
    }

    pub fn bulk_dialog(&self) -> Option<&BulkDialog> {
        self.dialog.as_ref()
    }

    pub fn bulk_phase(&self) -> BulkPhase {
        match &self.dialog {
            Some(dialog) if dialog.submitting => BulkPhase::Submitting,
            Some(_) => BulkPhase::Confirming,
            None if self.selection.is_empty() => BulkPhase::Idle,
            None => BulkPhase::Selectable,
        }
    }

    /// `true` while a fetch, a debounce timer or a bulk submission is pending.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
            || self.debouncer.is_pending()
            || self.dialog.as_ref().is_some_and(|dialog| dialog.submitting)
    }

    /// Fetches the current page right away, dropping any pending debounce.
    pub fn refresh(&mut self) {
        self.debouncer.cancel();
        self.fetch();
    }

    pub fn sort_by(&mut self, field: &str) -> Result<(), ListError> {
        self.sort.handle_sort(field)?;
        self.pagination.reset();
        self.refresh();
        Ok(())
    }

    /// Overrides the sort, refetching only when it changed.
    pub fn set_sort(&mut self, config: Option<SortConfig>) -> Result<(), ListError> {
        if self.sort.config() == config.as_ref() {
            return Ok(());
        }
        self.sort.set_sort(config)?;
        self.pagination.reset();
        self.refresh();
        Ok(())
    }

    pub fn go_to_page(&mut self, page: usize) {
        if self.pagination.go_to_page(page) {
            self.refresh();
        }
    }

    pub fn next_page(&mut self) {
        if self.pagination.go_to_next() {
            self.refresh();
        }
    }

    pub fn previous_page(&mut self) {
        if self.pagination.go_to_previous() {
            self.refresh();
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ListError> {
        let before = *self.pagination.state();
        self.pagination.set_page_size(page_size)?;
        if *self.pagination.state() != before {
            self.refresh();
        }
        Ok(())
    }

    /// Sets a filter and refetches immediately (filter panels, toggles).
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let before = self.filters.bag().active();
        self.filters.set_filter(key, value);
        self.after_filter_change(before, false);
    }

    /// Sets a filter at once but refetches only after the debounce delay
    /// elapsed without further calls (search inputs).
    pub fn set_filter_debounced(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let before = self.filters.bag().active();
        self.filters.set_filter(key, value);
        self.after_filter_change(before, true);
    }

    pub fn remove_filter(&mut self, key: &str) {
        let before = self.filters.bag().active();
        self.filters.remove_filter(key);
        self.after_filter_change(before, false);
    }

    pub fn clear_filters(&mut self) {
        let before = self.filters.bag().active();
        self.filters.clear_filters();
        self.after_filter_change(before, false);
    }

    fn after_filter_change(&mut self, before: FilterBag, debounced: bool) {
        if self.filters.bag().active() == before {
            return;
        }
        self.pagination.reset();
        if debounced && !self.debouncer.delay().is_zero() {
            self.loading = true;
            let events = self.events_tx.clone();
            self.debouncer.schedule(move |token| {
                let _ = events.send(ListEvent::DebounceElapsed { token });
            });
        } else {
            self.refresh();
        }
    }

    /// Replaces the selection with `ids`.
    pub fn select_rows<I, T>(&mut self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.selection.on_row_select(ids);
        if self.selection.is_empty()
            && self.dialog.as_ref().is_some_and(|dialog| !dialog.submitting)
        {
            self.dialog = None;
        }
    }

    pub fn toggle_row(&mut self, id: &str) {
        let next = self.selection.toggled(id);
        self.select_rows(next);
    }

    /// No-op while a fetch is pending: the rows on screen are not the
    /// ones being loaded.
    pub fn toggle_all_visible(&mut self) {
        if self.loading {
            return;
        }
        let next = self.selection.toggled_visible(&self.visible_ids());
        self.select_rows(next);
    }

    pub fn clear_selection(&mut self) {
        self.select_rows(Vec::<String>::new());
    }

    /// Applies a table interaction (header click, checkbox toggle).
    pub fn handle_table_event(&mut self, event: TableEvent) -> Result<(), ListError> {
        let intent = self.table().dispatch(event);
        match intent {
            Some(TableIntent::Sort(field)) => self.sort_by(&field),
            Some(TableIntent::Select(ids)) => {
                self.select_rows(ids);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Opens the confirmation dialog of `action_id` for the current selection.
    pub fn begin_bulk(&mut self, action_id: &str) -> Result<(), ListError> {
        if self.dialog.as_ref().is_some_and(|dialog| dialog.submitting) {
            return Err(ListError::BulkInProgress);
        }
        if self.selection.is_empty() {
            return Err(ListError::NoSelection);
        }
        let action = self
            .actions
            .iter()
            .find(|action| action.id == action_id)
            .ok_or_else(|| ListError::UnknownAction(action_id.to_string()))?;
        if action.disabled {
            return Err(ListError::ActionDisabled(action_id.to_string()));
        }

        self.dialog = Some(BulkDialog {
            action_id: action.id.clone(),
            label: action.label.clone(),
            variant: action.variant,
            requirement: action.input,
            input: BulkInput::None,
            selected_count: self.selection.len(),
            error: None,
            submitting: false,
        });
        Ok(())
    }

    pub fn set_bulk_input(&mut self, input: BulkInput) -> Result<(), ListError> {
        let dialog = self.dialog.as_mut().ok_or(ListError::NotConfirming)?;
        if dialog.submitting {
            return Err(ListError::BulkInProgress);
        }
        dialog.input = input;
        dialog.error = None;
        Ok(())
    }

    /// Validates the dialog input and submits the action. A validation
    /// failure stays in the dialog and nothing is sent.
    pub fn confirm_bulk(&mut self) -> Result<(), ListError> {
        let dialog = self.dialog.as_mut().ok_or(ListError::NotConfirming)?;
        if dialog.submitting {
            return Err(ListError::BulkInProgress);
        }
        let action = self
            .actions
            .iter()
            .find(|action| action.id == dialog.action_id)
            .ok_or_else(|| ListError::UnknownAction(dialog.action_id.clone()))?;

        let input = match action.validate(&dialog.input) {
            Ok(input) => input,
            Err(err) => {
                dialog.error = Some(err.to_string());
                return Err(err);
            }
        };

        dialog.submitting = true;
        dialog.error = None;
        let request = BulkRequest {
            ids: self.selection.selected_rows().to_vec(),
            input,
        };
        tracing::debug!(action = %action.id, rows = request.ids.len(), "submitting bulk action");

        let future = action.run(request);
        let action_id = action.id.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = AssertUnwindSafe(future)
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(ServiceError::new("bulk action failed unexpectedly")));
            let _ = events.send(ListEvent::BulkFinished { action_id, result });
        });
        Ok(())
    }

    pub fn cancel_bulk(&mut self) -> Result<(), ListError> {
        if self.dialog.as_ref().is_some_and(|dialog| dialog.submitting) {
            return Err(ListError::BulkInProgress);
        }
        self.dialog = None;
        Ok(())
    }

    /// Applies one completion event.
    pub fn handle_event(&mut self, event: ListEvent<S::Row>) {
        match event {
            ListEvent::Fetched { generation, result } => self.apply_fetch(generation, result),
            ListEvent::DebounceElapsed { token } => {
                if self.debouncer.take(token) {
                    self.fetch();
                }
            }
            ListEvent::BulkFinished { action_id, result } => self.apply_bulk(&action_id, result),
        }
    }

    /// Applies every event already received, without waiting. Returns how
    /// many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Waits for the next event and applies it.
    pub async fn next_event(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.handle_event(event);
        }
    }

    /// Processes events until no fetch, debounce or submission is pending.
    pub async fn settle(&mut self) {
        while self.is_busy() {
            self.next_event().await;
        }
    }

    fn fetch(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }
        self.generation += 1;
        self.loading = true;

        let generation = self.generation;
        let params = self.params();
        tracing::debug!(
            generation,
            page = params.page,
            page_size = params.page_size,
            "fetching rows"
        );

        let source = Arc::clone(&self.source);
        let events = self.events_tx.clone();
        let handle = tokio::spawn(async move {
            let result = AssertUnwindSafe(source.fetch(params))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(ServiceError::new("data source failed unexpectedly")));
            let _ = events.send(ListEvent::Fetched { generation, result });
        });
        self.in_flight = Some(handle.abort_handle());
    }

    fn apply_fetch(&mut self, generation: u64, result: Result<Page<S::Row>, ServiceError>) {
        if generation != self.generation {
            tracing::debug!(
                generation,
                latest = self.generation,
                "discarding stale response"
            );
            return;
        }
        self.in_flight = None;
        self.loading = self.debouncer.is_pending();

        match result {
            Ok(page) => {
                self.error = None;
                self.rows = page.rows;
                if self.pagination.set_total_items(page.total_items) {
                    tracing::debug!(
                        page = self.pagination.current_page(),
                        "page out of range after total changed, refetching"
                    );
                    self.fetch();
                }
            }
            Err(err) => {
                tracing::error!("fetch failed: {err}");
                self.error = Some(err.message);
                if !self.options.keep_rows_on_error {
                    self.rows.clear();
                }
            }
        }
    }

    fn apply_bulk(&mut self, action_id: &str, result: Result<BulkOutcome, ServiceError>) {
        let Some(dialog) = self
            .dialog
            .as_mut()
            .filter(|dialog| dialog.submitting && dialog.action_id == action_id)
        else {
            tracing::debug!(action = %action_id, "ignoring result of a closed bulk dialog");
            return;
        };

        match result {
            Ok(outcome) => {
                let summary = outcome.summary(&dialog.label);
                tracing::info!(
                    action = %action_id,
                    processed = outcome.processed,
                    skipped = outcome.skipped.len(),
                    "bulk action completed"
                );
                self.dialog = None;
                self.selection.clear_selection();
                self.notice = Some(summary);
                self.refresh();
            }
            Err(err) => {
                tracing::error!(action = %action_id, "bulk action failed: {err}");
                dialog.submitting = false;
                dialog.error = Some(err.message);
            }
        }
    }
}

impl<S: DataSource> Drop for ListOrchestrator<S> {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.abort();
        }
        self.debouncer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{memory::MemorySource, value::Row};

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: String,
    }

    impl Row for Item {
        fn field(&self, key: &str) -> Value {
            match key {
                "id" => self.id.as_str().into(),
                _ => Value::Null,
            }
        }
    }

    fn items(count: usize) -> Vec<Item> {
        (0..count)
            .map(|i| Item {
                id: format!("item-{i:02}"),
            })
            .collect()
    }

    fn orchestrator(count: usize) -> ListOrchestrator<MemorySource<Item>> {
        ListOrchestrator::builder(MemorySource::new(items(count)))
            .columns(vec![Column::new("id", "Id").sortable()])
            .options(ListOptions {
                page_size: 10,
                ..ListOptions::default()
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn stale_generation_is_discarded() {
        let mut list = orchestrator(25);
        list.refresh();
        list.settle().await;
        let first_page = list.rows().to_vec();

        list.next_page();
        let stale = list.generation() - 1;
        list.handle_event(ListEvent::Fetched {
            generation: stale,
            result: Ok(Page::new(items(3), 3)),
        });
        assert!(list.loading());
        assert_eq!(list.pagination().total_items, 25);
        assert_eq!(list.rows(), first_page.as_slice());

        list.settle().await;
        assert_eq!(list.rows()[0].id, "item-10");
    }

    #[tokio::test]
    async fn superseded_debounce_token_does_not_fetch() {
        let mut list = orchestrator(5);
        let generation = list.generation();

        list.handle_event(ListEvent::DebounceElapsed { token: 7 });
        assert_eq!(list.generation(), generation);
        assert!(!list.loading());
    }

    #[tokio::test]
    async fn bulk_result_for_closed_dialog_is_ignored() {
        let mut list = orchestrator(5);
        list.select_rows(["item-00"]);

        list.handle_event(ListEvent::BulkFinished {
            action_id: "ghost".to_string(),
            result: Ok(BulkOutcome::processed(1)),
        });
        assert_eq!(list.selection().len(), 1);
        assert_eq!(list.notice(), None);
    }

    #[test]
    fn builder_rejects_zero_page_size() {
        let result = ListOrchestrator::builder(MemorySource::new(items(1)))
            .options(ListOptions {
                page_size: 0,
                ..ListOptions::default()
            })
            .build();
        assert!(matches!(result, Err(ListError::InvalidPageSize)));
    }
}
