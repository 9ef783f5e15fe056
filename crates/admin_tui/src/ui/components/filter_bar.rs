use listing::DataSource;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{app::Panel, ui::theme::Theme};

pub fn render<S: DataSource>(
    frame: &mut Frame<'_>,
    area: Rect,
    panel: &Panel<S>,
    searching: bool,
    theme: &Theme,
) {
    let label = Style::default().fg(theme.text_muted);
    let value = Style::default().fg(theme.text);

    let mut spans = vec![Span::styled(" Search: ", label)];
    if searching {
        spans.push(Span::styled(
            panel.search.clone(),
            value.add_modifier(Modifier::UNDERLINED),
        ));
        spans.push(Span::styled("▏", Style::default().fg(theme.accent)));
    } else if panel.search.is_empty() {
        spans.push(Span::styled("-", label));
    } else {
        spans.push(Span::styled(format!("\"{}\"", panel.search), value));
    }

    spans.push(Span::styled("   Status: ", label));
    spans.push(match panel.status_label() {
        Some(status) => Span::styled(status, Style::default().fg(theme.accent)),
        None => Span::styled("all", label),
    });

    let active = panel.list.filters().active_filter_count();
    if active > 0 {
        spans.push(Span::styled(
            format!("   {active} filter{} active", if active == 1 { "" } else { "s" }),
            Style::default().fg(theme.warning),
        ));
    }
    if panel.list.loading() {
        spans.push(Span::styled("   loading…", label));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
