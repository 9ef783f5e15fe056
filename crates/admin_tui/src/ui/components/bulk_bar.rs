use listing::{ActionVariant, BulkActionBar};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::Theme;

/// Selection summary followed by the numbered actions. In the bulk menu the
/// numbers are highlighted since they are what the next key picks.
pub fn render(frame: &mut Frame<'_>, area: Rect, bar: &BulkActionBar, menu: bool, theme: &Theme) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", bar.summary()),
            Style::default()
                .fg(theme.text)
                .bg(theme.selected)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];

    let number = if menu {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(theme.text_muted)
    };

    for (i, action) in bar.actions.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if action.disabled {
            Style::default()
                .fg(theme.border)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            match action.variant {
                ActionVariant::Primary => Style::default().fg(theme.accent),
                ActionVariant::Secondary => Style::default().fg(theme.text),
                ActionVariant::Danger => Style::default().fg(theme.error),
            }
        };
        spans.push(Span::styled(format!("{}", i + 1), number));
        spans.push(Span::styled(format!(" {}", action.label), style));
    }

    if menu {
        spans.push(Span::styled(
            "   pick an action",
            Style::default().fg(theme.warning),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
