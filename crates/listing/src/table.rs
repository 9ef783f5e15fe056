//! Stateless table rendering.
//!
//! [`TableConfig`] borrows everything a table needs (columns, current rows,
//! loading flag, selection, sort) and turns it into a [`TableView`]: plain
//! strings a UI layer can draw. User interaction goes the other way through
//! [`TableConfig::dispatch`], which translates a [`TableEvent`] into a
//! [`TableIntent`] for the owner of the state. The renderer owns nothing.
//!
//! A failing cell (a custom renderer returning `Err` or panicking) is logged
//! and shown as [`CELL_PLACEHOLDER`]; the rest of the table still renders.
use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use chrono::{DateTime, Utc};

use crate::{
    selection::{HeaderCheck, SelectionModel},
    sort::{SortConfig, SortDirection},
    source::RowKey,
    value::{Row, Value},
};

pub const CELL_PLACEHOLDER: &str = "-";

pub const DEFAULT_EMPTY_MESSAGE: &str = "No data available";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

type CustomRenderer<R> = Arc<dyn Fn(&Value, &R, usize) -> Result<String, String> + Send + Sync>;

/// How a cell turns its value into text.
pub enum CellRenderer<R> {
    /// The raw value.
    Text,
    /// Boolean labels; non-boolean values fall back to their text.
    Boolean { yes: String, no: String },
    /// Value to label mapping; unmapped values show as is.
    Badge(Vec<(Value, String)>),
    /// RFC 3339 text or unix seconds, formatted with a chrono format string.
    Date { format: String },
    /// Integer minor units (cents) with a currency symbol suffix.
    Money { symbol: String },
    /// Caller supplied renderer receiving `(value, row, index)`.
    Custom(CustomRenderer<R>),
}

impl<R> Clone for CellRenderer<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Text => Self::Text,
            Self::Boolean { yes, no } => Self::Boolean {
                yes: yes.clone(),
                no: no.clone(),
            },
            Self::Badge(labels) => Self::Badge(labels.clone()),
            Self::Date { format } => Self::Date {
                format: format.clone(),
            },
            Self::Money { symbol } => Self::Money {
                symbol: symbol.clone(),
            },
            Self::Custom(f) => Self::Custom(Arc::clone(f)),
        }
    }
}

impl<R> fmt::Debug for CellRenderer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("Text"),
            Self::Boolean { yes, no } => f
                .debug_struct("Boolean")
                .field("yes", yes)
                .field("no", no)
                .finish(),
            Self::Badge(labels) => f.debug_tuple("Badge").field(labels).finish(),
            Self::Date { format } => f.debug_struct("Date").field("format", format).finish(),
            Self::Money { symbol } => f.debug_struct("Money").field("symbol", symbol).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl<R> CellRenderer<R> {
    fn render(&self, value: &Value, row: &R, index: usize) -> Result<String, String> {
        match self {
            Self::Text => Ok(value.to_string()),
            Self::Boolean { yes, no } => Ok(match value {
                Value::Bool(true) => yes.clone(),
                Value::Bool(false) => no.clone(),
                other => other.to_string(),
            }),
            Self::Badge(labels) => Ok(labels
                .iter()
                .find(|(candidate, _)| candidate == value)
                .map(|(_, label)| label.clone())
                .unwrap_or_else(|| value.to_string())),
            Self::Date { format } => render_date(value, format),
            Self::Money { symbol } => render_money(value, symbol),
            Self::Custom(f) => f(value, row, index),
        }
    }
}

fn render_date(value: &Value, format: &str) -> Result<String, String> {
    let timestamp = match value {
        Value::Null => return Ok(String::new()),
        Value::Text(text) => DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|err| format!("invalid timestamp {text:?}: {err}"))?,
        Value::Int(secs) => DateTime::<Utc>::from_timestamp(*secs, 0)
            .ok_or_else(|| format!("timestamp {secs} out of range"))?,
        other => return Err(format!("cannot format {other:?} as a date")),
    };
    Ok(timestamp.format(format).to_string())
}

fn render_money(value: &Value, symbol: &str) -> Result<String, String> {
    let minor = match value {
        Value::Null => return Ok(String::new()),
        Value::Int(minor) => *minor,
        other => return Err(format!("cannot format {other:?} as money")),
    };
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    Ok(format!("{sign}{}.{:02}{symbol}", abs / 100, abs % 100))
}

/// One table dimension. Columns are configured once per table.
pub struct Column<R> {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    pub filterable: bool,
    pub align: Align,
    pub width: Option<u16>,
    pub renderer: CellRenderer<R>,
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            sortable: self.sortable,
            filterable: self.filterable,
            align: self.align,
            width: self.width,
            renderer: self.renderer.clone(),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("align", &self.align)
            .field("width", &self.width)
            .field("renderer", &self.renderer)
            .finish()
    }
}

impl<R> Column<R> {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
            filterable: false,
            align: Align::Left,
            width: None,
            renderer: CellRenderer::Text,
        }
    }

    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    #[must_use]
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    #[must_use]
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn renderer(mut self, renderer: CellRenderer<R>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Shorthand for a [`CellRenderer::Custom`] renderer.
    #[must_use]
    pub fn render(
        self,
        f: impl Fn(&Value, &R, usize) -> Result<String, String> + Send + Sync + 'static,
    ) -> Self {
        self.renderer(CellRenderer::Custom(Arc::new(f)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    pub sort: Option<SortDirection>,
    pub align: Align,
    pub width: Option<u16>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedRow {
    pub id: String,
    pub index: usize,
    pub selected: bool,
    pub cells: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableBody {
    Loading,
    Empty(String),
    Rows(Vec<RenderedRow>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableView {
    pub header: Vec<HeaderCell>,
    /// Present when rows can be selected.
    pub header_check: Option<HeaderCheck>,
    pub body: TableBody,
}

impl TableView {
    pub fn rows(&self) -> &[RenderedRow] {
        match &self.body {
            TableBody::Rows(rows) => rows,
            TableBody::Loading | TableBody::Empty(_) => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableEvent {
    HeaderClicked(usize),
    RowToggled(String),
    AllVisibleToggled,
}

/// What the state owner should do in reaction to a [`TableEvent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableIntent {
    Sort(String),
    /// The complete new selection.
    Select(Vec<String>),
}

pub struct TableConfig<'a, R> {
    pub columns: &'a [Column<R>],
    pub data: &'a [R],
    pub loading: bool,
    pub selectable: bool,
    pub selection: &'a SelectionModel,
    pub sort_config: Option<&'a SortConfig>,
    pub row_key: &'a RowKey<R>,
    pub empty_message: &'a str,
}

impl<R: Row> TableConfig<'_, R> {
    pub fn visible_ids(&self) -> Vec<String> {
        self.data.iter().map(|row| self.row_key.id_of(row)).collect()
    }

    pub fn render(&self) -> TableView {
        let header = self
            .columns
            .iter()
            .map(|column| HeaderCell {
                key: column.key.clone(),
                label: column.label.clone(),
                sortable: column.sortable,
                sort: self
                    .sort_config
                    .filter(|config| column.sortable && config.field == column.key)
                    .map(|config| config.direction),
                align: column.align,
                width: column.width,
            })
            .collect();

        let header_check = (self.selectable && !self.loading)
            .then(|| self.selection.header_check(&self.visible_ids()));

        let body = if self.loading {
            TableBody::Loading
        } else if self.data.is_empty() {
            TableBody::Empty(self.empty_message.to_string())
        } else {
            TableBody::Rows(
                self.data
                    .iter()
                    .enumerate()
                    .map(|(index, row)| self.render_row(row, index))
                    .collect(),
            )
        };

        TableView {
            header,
            header_check,
            body,
        }
    }

    fn render_row(&self, row: &R, index: usize) -> RenderedRow {
        let id = self.row_key.id_of(row);
        let cells = self
            .columns
            .iter()
            .map(|column| render_cell(column, row, index))
            .collect();
        RenderedRow {
            selected: self.selectable && self.selection.is_selected(&id),
            id,
            index,
            cells,
        }
    }

    pub fn dispatch(&self, event: TableEvent) -> Option<TableIntent> {
        match event {
            TableEvent::HeaderClicked(index) => self
                .columns
                .get(index)
                .filter(|column| column.sortable)
                .map(|column| TableIntent::Sort(column.key.clone())),
            TableEvent::RowToggled(id) => (self.selectable && !self.loading)
                .then(|| TableIntent::Select(self.selection.toggled(&id))),
            TableEvent::AllVisibleToggled => {
                if !self.selectable || self.loading || self.data.is_empty() {
                    return None;
                }
                Some(TableIntent::Select(
                    self.selection.toggled_visible(&self.visible_ids()),
                ))
            }
        }
    }
}

/// Renders `config` into a drawable view.
pub fn render_table<R: Row>(config: &TableConfig<'_, R>) -> TableView {
    config.render()
}

fn render_cell<R: Row>(column: &Column<R>, row: &R, index: usize) -> String {
    let value = row.field(&column.key);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        column.renderer.render(&value, row, index)
    }));
    match outcome {
        Ok(Ok(text)) => text,
        Ok(Err(err)) => {
            tracing::warn!(column = %column.key, row = index, "cell render failed: {err}");
            CELL_PLACEHOLDER.to_string()
        }
        Err(_) => {
            tracing::warn!(column = %column.key, row = index, "cell renderer panicked");
            CELL_PLACEHOLDER.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct User {
        id: &'static str,
        name: &'static str,
        active: bool,
        balance: i64,
        joined: &'static str,
    }

    impl Row for User {
        fn field(&self, key: &str) -> Value {
            match key {
                "id" => self.id.into(),
                "name" => self.name.into(),
                "active" => self.active.into(),
                "balance" => self.balance.into(),
                "joined" => self.joined.into(),
                _ => Value::Null,
            }
        }
    }

    fn users() -> Vec<User> {
        vec![
            User {
                id: "u1",
                name: "Ada",
                active: true,
                balance: 1050,
                joined: "2024-03-01T10:00:00Z",
            },
            User {
                id: "u2",
                name: "Bob",
                active: false,
                balance: -5,
                joined: "not a date",
            },
        ]
    }

    fn columns() -> Vec<Column<User>> {
        vec![
            Column::new("name", "Name").sortable(),
            Column::new("active", "Active").renderer(CellRenderer::Boolean {
                yes: "yes".to_string(),
                no: "no".to_string(),
            }),
            Column::new("balance", "Balance")
                .align(Align::Right)
                .renderer(CellRenderer::Money {
                    symbol: "€".to_string(),
                }),
            Column::new("joined", "Joined").renderer(CellRenderer::Date {
                format: "%Y-%m-%d".to_string(),
            }),
        ]
    }

    fn config<'a>(
        columns: &'a [Column<User>],
        data: &'a [User],
        selection: &'a SelectionModel,
        sort: Option<&'a SortConfig>,
        key: &'a RowKey<User>,
    ) -> TableConfig<'a, User> {
        TableConfig {
            columns,
            data,
            loading: false,
            selectable: true,
            selection,
            sort_config: sort,
            row_key: key,
            empty_message: DEFAULT_EMPTY_MESSAGE,
        }
    }

    #[test]
    fn renders_one_row_per_item_with_builtin_renderers() {
        let columns = columns();
        let data = users();
        let selection = SelectionModel::new();
        let key = RowKey::default();
        let view = config(&columns, &data, &selection, None, &key).render();

        assert_eq!(view.header.len(), 4);
        let rows = view.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells, vec!["Ada", "yes", "10.50€", "2024-03-01"]);
        assert_eq!(rows[1].cells, vec!["Bob", "no", "-0.05€", CELL_PLACEHOLDER]);
        assert_eq!(view.header_check, Some(HeaderCheck::Unchecked));
    }

    #[test]
    fn failing_custom_renderers_are_isolated_per_cell() {
        let columns: Vec<Column<User>> = vec![
            Column::new("name", "Name").render(|value, _, index| {
                if index == 1 {
                    Err("boom".to_string())
                } else {
                    Ok(value.to_string().to_uppercase())
                }
            }),
            Column::new("id", "Id").render(|value, row: &User, _| {
                if row.name == "Ada" {
                    panic!("malformed row");
                }
                Ok(value.to_string())
            }),
        ];
        let data = users();
        let selection = SelectionModel::new();
        let key = RowKey::default();
        let view = config(&columns, &data, &selection, None, &key).render();

        let rows = view.rows();
        assert_eq!(rows[0].cells, vec!["ADA", CELL_PLACEHOLDER]);
        assert_eq!(rows[1].cells, vec![CELL_PLACEHOLDER, "u2"]);
    }

    #[test]
    fn loading_and_empty_replace_rows() {
        let columns = columns();
        let data = users();
        let selection = SelectionModel::new();
        let key = RowKey::default();

        let mut loading = config(&columns, &data, &selection, None, &key);
        loading.loading = true;
        let view = loading.render();
        assert_eq!(view.body, TableBody::Loading);
        assert_eq!(view.header_check, None);

        let empty = config(&columns, &[], &selection, None, &key);
        assert_eq!(
            empty.render().body,
            TableBody::Empty(DEFAULT_EMPTY_MESSAGE.to_string())
        );
    }

    #[test]
    fn selection_events_wait_for_loaded_rows() {
        let columns = columns();
        let data = users();
        let selection = SelectionModel::new();
        let key = RowKey::default();
        let mut table = config(&columns, &data, &selection, None, &key);
        table.loading = true;

        assert_eq!(table.dispatch(TableEvent::AllVisibleToggled), None);
        assert_eq!(table.dispatch(TableEvent::RowToggled("u1".to_string())), None);
        assert_eq!(
            table.dispatch(TableEvent::HeaderClicked(0)),
            Some(TableIntent::Sort("name".to_string()))
        );
    }

    #[test]
    fn header_shows_active_sort_only_on_sortable_column() {
        let columns = columns();
        let data = users();
        let selection = SelectionModel::new();
        let key = RowKey::default();
        let sort = SortConfig::desc("name");
        let view = config(&columns, &data, &selection, Some(&sort), &key).render();

        assert_eq!(view.header[0].sort, Some(SortDirection::Desc));
        assert!(view.header[1..].iter().all(|cell| cell.sort.is_none()));
    }

    #[test]
    fn dispatch_translates_events() {
        let columns = columns();
        let data = users();
        let mut selection = SelectionModel::new();
        selection.on_row_select(["u9"]);
        let key = RowKey::default();
        let table = config(&columns, &data, &selection, None, &key);

        assert_eq!(
            table.dispatch(TableEvent::HeaderClicked(0)),
            Some(TableIntent::Sort("name".to_string()))
        );
        assert_eq!(table.dispatch(TableEvent::HeaderClicked(1)), None);
        assert_eq!(table.dispatch(TableEvent::HeaderClicked(42)), None);
        assert_eq!(
            table.dispatch(TableEvent::RowToggled("u1".to_string())),
            Some(TableIntent::Select(vec!["u9".to_string(), "u1".to_string()]))
        );
        assert_eq!(
            table.dispatch(TableEvent::AllVisibleToggled),
            Some(TableIntent::Select(vec![
                "u9".to_string(),
                "u1".to_string(),
                "u2".to_string()
            ]))
        );
    }

    #[test]
    fn non_selectable_table_ignores_selection_events() {
        let columns = columns();
        let data = users();
        let selection = SelectionModel::new();
        let key = RowKey::derive(|user: &User| user.name.to_string());
        let mut table = config(&columns, &data, &selection, None, &key);
        table.selectable = false;

        assert_eq!(table.dispatch(TableEvent::RowToggled("Ada".to_string())), None);
        assert_eq!(table.dispatch(TableEvent::AllVisibleToggled), None);
        let view = table.render();
        assert_eq!(view.header_check, None);
        assert_eq!(view.rows()[0].id, "Ada");
    }
}
