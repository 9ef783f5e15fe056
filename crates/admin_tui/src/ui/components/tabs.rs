use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{app::Section, ui::theme::Theme};

/// Horizontal section bar; `counts` holds the total rows per section.
pub fn render_tabs(
    frame: &mut Frame<'_>,
    area: Rect,
    active: Section,
    counts: [usize; 2],
    theme: &Theme,
) {
    let mut spans = vec![Span::raw(" ")];

    for (i, (section, count)) in Section::ALL.iter().zip(counts).enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let label = format!("{} ({count})", section.label());
        if *section == active {
            spans.push(Span::styled("[", Style::default().fg(theme.accent)));
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("]", Style::default().fg(theme.accent)));
        } else {
            spans.push(Span::styled(label, Style::default().fg(theme.text_muted)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
