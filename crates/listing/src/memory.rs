//! In-process data source.
//!
//! Filters, sorts and pages a shared `Vec` the way a list endpoint would. It
//! backs the console demo mode and the tests; the optional latency makes
//! loading states and out-of-order responses observable.
use std::{
    cmp::Ordering,
    future::Future,
    sync::{Arc, RwLock},
    time::Duration,
};

use crate::{
    bulk::BulkOutcome,
    error::ServiceError,
    source::{DataSource, FetchParams, Page, RowKey},
    sort::SortDirection,
    value::{Row, Value},
};

/// Filter key matched against every search field instead of a single column.
pub const SEARCH_FILTER: &str = "search";

pub struct MemorySource<R> {
    rows: Arc<RwLock<Vec<R>>>,
    row_key: RowKey<R>,
    search_fields: Vec<String>,
    latency: Option<Duration>,
}

impl<R> Clone for MemorySource<R> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            row_key: self.row_key.clone(),
            search_fields: self.search_fields.clone(),
            latency: self.latency,
        }
    }
}

fn poisoned() -> ServiceError {
    ServiceError::new("in-memory store is unavailable")
}

impl<R: Row> MemorySource<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
            row_key: RowKey::default(),
            search_fields: Vec::new(),
            latency: None,
        }
    }

    #[must_use]
    pub fn with_row_key(mut self, row_key: RowKey<R>) -> Self {
        self.row_key = row_key;
        self
    }

    #[must_use]
    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Result<Vec<R>, ServiceError> {
        self.rows.read().map(|rows| rows.clone()).map_err(|_| poisoned())
    }

    /// Runs `update` on every row whose id is in `ids`. Unknown ids are
    /// reported as skipped.
    pub fn update(
        &self,
        ids: &[String],
        mut update: impl FnMut(&mut R),
    ) -> Result<BulkOutcome, ServiceError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let mut outcome = BulkOutcome::default();
        for id in ids {
            match rows.iter_mut().find(|row| self.row_key.id_of(row) == *id) {
                Some(row) => {
                    update(row);
                    outcome.processed += 1;
                }
                None => outcome.skipped.push(id.clone()),
            }
        }
        Ok(outcome)
    }

    pub fn remove(&self, ids: &[String]) -> Result<BulkOutcome, ServiceError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let mut outcome = BulkOutcome::default();
        for id in ids {
            match rows.iter().position(|row| self.row_key.id_of(row) == *id) {
                Some(index) => {
                    rows.remove(index);
                    outcome.processed += 1;
                }
                None => outcome.skipped.push(id.clone()),
            }
        }
        Ok(outcome)
    }

    /// Synchronous query used by [`DataSource::fetch`].
    pub fn query(&self, params: &FetchParams) -> Result<Page<R>, ServiceError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        let mut matching: Vec<R> = rows
            .iter()
            .filter(|row| {
                params
                    .filters
                    .iter()
                    .all(|(key, value)| self.matches(row, key, value))
            })
            .cloned()
            .collect();
        drop(rows);

        if let Some(sort) = &params.sort {
            matching.sort_by(|a, b| {
                let ord = a.field(&sort.field).compare(&b.field(&sort.field));
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let total_items = matching.len();
        let offset = params.page.saturating_sub(1) * params.page_size;
        let rows = matching
            .into_iter()
            .skip(offset)
            .take(params.page_size)
            .collect();
        Ok(Page::new(rows, total_items))
    }

    fn matches(&self, row: &R, key: &str, filter: &Value) -> bool {
        if filter.is_blank() {
            return true;
        }
        if key == SEARCH_FILTER && !self.search_fields.is_empty() {
            let needle = filter.to_string().to_lowercase();
            return self.search_fields.iter().any(|field| {
                row.field(field)
                    .to_string()
                    .to_lowercase()
                    .contains(&needle)
            });
        }

        let actual = row.field(key);
        match filter {
            Value::List(options) => options
                .iter()
                .any(|option| actual.compare(option) == Ordering::Equal),
            Value::Range { min, max } => {
                min.as_ref()
                    .is_none_or(|min| actual.compare(min) != Ordering::Less)
                    && max
                        .as_ref()
                        .is_none_or(|max| actual.compare(max) != Ordering::Greater)
            }
            other => actual.compare(other) == Ordering::Equal,
        }
    }
}

impl<R: Row> DataSource for MemorySource<R> {
    type Row = R;

    fn fetch(
        &self,
        params: FetchParams,
    ) -> impl Future<Output = Result<Page<R>, ServiceError>> + Send {
        let latency = self.latency;
        let result = self.query(&params);
        async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            result
        }
    }
}
