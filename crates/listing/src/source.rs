use std::{fmt, future::Future, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    error::ServiceError,
    filter::FilterBag,
    sort::SortConfig,
    value::{Row, Value},
};

/// Parameters of one fetch request. Filters only hold active entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FetchParams {
    pub filters: FilterBag,
    pub sort: Option<SortConfig>,
    pub page: usize,
    pub page_size: usize,
}

/// One page of rows plus the total number of matching rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<R> {
    pub rows: Vec<R>,
    pub total_items: usize,
}

impl<R> Page<R> {
    pub fn new(rows: Vec<R>, total_items: usize) -> Self {
        Self { rows, total_items }
    }
}

/// The data-fetch collaborator consumed by the orchestrator.
///
/// A failed fetch resolves to a [`ServiceError`] whose message is shown to
/// the user.
pub trait DataSource: Send + Sync + 'static {
    type Row: Row;

    fn fetch(
        &self,
        params: FetchParams,
    ) -> impl Future<Output = Result<Page<Self::Row>, ServiceError>> + Send;
}

/// How a row identifier is obtained.
pub enum RowKey<R> {
    /// Read a field and stringify it.
    Field(String),
    /// Derive the id from the whole row.
    Derive(Arc<dyn Fn(&R) -> String + Send + Sync>),
}

impl<R: Row> RowKey<R> {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    pub fn derive(f: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        Self::Derive(Arc::new(f))
    }

    pub fn id_of(&self, row: &R) -> String {
        match self {
            Self::Field(name) => match row.field(name) {
                Value::Text(text) => text,
                other => other.to_string(),
            },
            Self::Derive(f) => f(row),
        }
    }
}

impl<R> Default for RowKey<R> {
    fn default() -> Self {
        Self::Field("id".to_string())
    }
}

impl<R> Clone for RowKey<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Field(name) => Self::Field(name.clone()),
            Self::Derive(f) => Self::Derive(Arc::clone(f)),
        }
    }
}

impl<R> fmt::Debug for RowKey<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Derive(_) => f.write_str("Derive(..)"),
        }
    }
}
