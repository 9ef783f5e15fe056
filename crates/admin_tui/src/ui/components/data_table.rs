use listing::{Align, DataSource, HeaderCheck, HeaderCell, TableBody, TableView};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use crate::{app::Panel, ui::theme::Theme};

const LOADING: &str = "Loading…";

pub fn render<S: DataSource>(frame: &mut Frame<'_>, area: Rect, panel: &Panel<S>, theme: &Theme) {
    let view = panel.list.table().render();
    let selectable = view.header_check.is_some();

    let mut widths = Vec::with_capacity(view.header.len() + 1);
    if selectable {
        widths.push(Constraint::Length(3));
    }
    widths.extend(view.header.iter().map(|cell| {
        cell.width
            .map(Constraint::Length)
            .unwrap_or(Constraint::Fill(1))
    }));

    let header = header_row(&view, selectable, theme);
    let rows = body_rows(&view, selectable, theme);

    let mut state = TableState::default();
    if !view.rows().is_empty() {
        state.select(Some(panel.cursor));
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .column_spacing(1)
        .row_highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(table, area, &mut state);
}

fn header_row(view: &TableView, selectable: bool, theme: &Theme) -> Row<'static> {
    let mut cells = Vec::with_capacity(view.header.len() + 1);
    if selectable {
        let mark = match view.header_check {
            Some(HeaderCheck::Checked) => "[x]",
            Some(HeaderCheck::Indeterminate) => "[-]",
            Some(HeaderCheck::Unchecked) | None => "[ ]",
        };
        cells.push(Cell::from(mark));
    }
    cells.extend(
        view.header
            .iter()
            .enumerate()
            .map(|(index, cell)| Cell::from(aligned(header_label(index, cell), cell.align))),
    );

    Row::new(cells).style(
        Style::default()
            .fg(theme.text_muted)
            .add_modifier(Modifier::BOLD),
    )
}

/// `"3 Balance ▼"`: the digit sorts by the column.
fn header_label(index: usize, cell: &HeaderCell) -> String {
    let mut label = if cell.sortable && index < 9 {
        format!("{} {}", index + 1, cell.label)
    } else {
        cell.label.clone()
    };
    if let Some(direction) = cell.sort {
        label.push(' ');
        label.push_str(direction.arrow());
    }
    label
}

fn body_rows(view: &TableView, selectable: bool, theme: &Theme) -> Vec<Row<'static>> {
    let message = match &view.body {
        TableBody::Loading => Some(LOADING.to_string()),
        TableBody::Empty(message) => Some(message.clone()),
        TableBody::Rows(_) => None,
    };
    if let Some(message) = message {
        let mut cells = Vec::new();
        if selectable {
            cells.push(Cell::from(""));
        }
        cells.push(Cell::from(message));
        return vec![Row::new(cells).style(Style::default().fg(theme.text_muted))];
    }

    view.rows()
        .iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(row.cells.len() + 1);
            if selectable {
                cells.push(Cell::from(if row.selected { "[x]" } else { "[ ]" }));
            }
            cells.extend(
                row.cells
                    .iter()
                    .zip(&view.header)
                    .map(|(text, header)| Cell::from(aligned(text.clone(), header.align))),
            );
            let style = if row.selected {
                Style::default().fg(theme.text).bg(theme.selected)
            } else {
                Style::default().fg(theme.text)
            };
            Row::new(cells).style(style)
        })
        .collect()
}

fn aligned(text: String, align: Align) -> Line<'static> {
    let line = Line::from(text);
    match align {
        Align::Left => line,
        Align::Center => line.centered(),
        Align::Right => line.right_aligned(),
    }
}

#[cfg(test)]
mod tests {
    use listing::SortDirection;

    use super::*;

    #[test]
    fn header_label_shows_shortcut_and_direction() {
        let cell = HeaderCell {
            key: "balance".to_string(),
            label: "Balance".to_string(),
            sortable: true,
            sort: Some(SortDirection::Desc),
            align: Align::Right,
            width: None,
        };
        assert_eq!(header_label(3, &cell), "4 Balance ▼");

        let plain = HeaderCell {
            sortable: false,
            sort: None,
            ..cell
        };
        assert_eq!(header_label(3, &plain), "Balance");
    }
}
