use listing::{PageItem, PaginationController};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::Theme;

const PAGE_WINDOW: usize = 2;

pub fn render(frame: &mut Frame<'_>, area: Rect, pagination: &PaginationController, theme: &Theme) {
    let [range_area, pages_area, size_area] = Layout::horizontal([
        Constraint::Length(24),
        Constraint::Fill(1),
        Constraint::Length(22),
    ])
    .areas(area);

    let muted = Style::default().fg(theme.text_muted);
    frame.render_widget(
        Paragraph::new(Span::styled(range_label(pagination), muted)),
        range_area,
    );
    frame.render_widget(
        Paragraph::new(page_line(pagination, theme)).centered(),
        pages_area,
    );
    let size = format!(
        "{} / page  {} of {}",
        pagination.page_size(),
        pagination.current_page(),
        pagination.total_pages()
    );
    frame.render_widget(Paragraph::new(Span::styled(size, muted)).right_aligned(), size_area);
}

fn range_label(pagination: &PaginationController) -> String {
    match pagination.state().item_range() {
        Some((start, end)) => format!("Rows {start}–{end} of {}", pagination.total_items()),
        None => "No rows".to_string(),
    }
}

fn page_line(pagination: &PaginationController, theme: &Theme) -> Line<'static> {
    let enabled = Style::default().fg(theme.text);
    let disabled = Style::default().fg(theme.border);

    let mut spans = vec![Span::styled(
        "‹ ",
        if pagination.can_go_previous() {
            enabled
        } else {
            disabled
        },
    )];
    for item in pagination.visible_pages(PAGE_WINDOW) {
        match item {
            PageItem::Page { number, current: true } => spans.push(Span::styled(
                format!("[{number}]"),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            PageItem::Page { number, .. } => {
                spans.push(Span::styled(format!(" {number} "), enabled))
            }
            PageItem::Ellipsis => spans.push(Span::styled(" … ", disabled)),
        }
    }
    spans.push(Span::styled(
        " ›",
        if pagination.can_go_next() {
            enabled
        } else {
            disabled
        },
    ));
    Line::from(spans)
}
