use listing::DataSource;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{Mode, Panel},
    ui::{
        components::{bulk_bar, data_table, dialog, filter_bar, pagination},
        theme::Theme,
    },
};

/// Filter bar, notices, table and pager of one section, plus the bulk dialog
/// on top when it is open.
pub fn render<S: DataSource>(
    frame: &mut Frame<'_>,
    area: Rect,
    panel: &Panel<S>,
    mode: Mode,
    theme: &Theme,
) {
    let bar = panel.list.bulk_bar();
    let error = panel.list.error();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(u16::from(error.is_some())),
            Constraint::Length(u16::from(bar.is_some())),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    filter_bar::render(frame, layout[0], panel, mode == Mode::Search, theme);

    if let Some(error) = error {
        let line = Line::from(vec![
            Span::styled(" ✕ ", Style::default().fg(theme.error)),
            Span::styled(error.to_string(), Style::default().fg(theme.error)),
            Span::styled("  (Esc to dismiss, r to retry)", Style::default().fg(theme.text_muted)),
        ]);
        frame.render_widget(Paragraph::new(line), layout[1]);
    }

    if let Some(bar) = &bar {
        bulk_bar::render(frame, layout[2], bar, mode == Mode::BulkMenu, theme);
    }

    data_table::render(frame, layout[3], panel, theme);
    pagination::render(frame, layout[4], panel.list.pagination_controller(), theme);

    if let Some(open) = panel.list.bulk_dialog() {
        dialog::render(
            frame,
            area,
            open,
            &panel.input,
            panel.input_error.as_deref(),
            theme,
        );
    }
}
