//! Headless list-page core: sorting, pagination, filtering, row selection,
//! bulk actions and table rendering, composed by [`ListOrchestrator`] on top
//! of a pluggable [`DataSource`].
//!
//! Nothing here draws to a screen. Renderers consume the views
//! ([`TableView`], [`BulkActionBar`], [`PaginationState`]) and feed user
//! input back through the orchestrator.

pub use bulk::{
    ActionVariant, BulkAction, BulkActionBar, BulkActionView, BulkDialog, BulkHandler, BulkInput,
    BulkOutcome, BulkPhase, BulkRequest, InputRequirement,
};
pub use debounce::Debouncer;
pub use error::{ListError, ServiceError};
pub use filter::{FilterBag, FilterController};
pub use memory::{MemorySource, SEARCH_FILTER};
pub use orchestrator::{
    DEFAULT_DEBOUNCE, ListEvent, ListOptions, ListOrchestrator, ListOrchestratorBuilder,
};
pub use pagination::{
    DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, PageItem, PaginationController, PaginationState,
};
pub use selection::{HeaderCheck, SelectionModel};
pub use sort::{SortConfig, SortController, SortDirection};
pub use source::{DataSource, FetchParams, Page, RowKey};
pub use table::{
    Align, CELL_PLACEHOLDER, CellRenderer, Column, DEFAULT_EMPTY_MESSAGE, HeaderCell,
    RenderedRow, TableBody, TableConfig, TableEvent, TableIntent, TableView, render_table,
};
pub use value::{Row, Value};

mod bulk;
mod debounce;
mod error;
mod filter;
mod memory;
mod orchestrator;
mod pagination;
mod selection;
mod sort;
mod source;
mod table;
mod value;
