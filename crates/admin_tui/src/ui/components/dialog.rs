use listing::{ActionVariant, BulkDialog, InputRequirement};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::{
    components::hints::{self, hints_to_spans},
    theme::Theme,
};

/// Confirmation box of a bulk action. `input` is the raw text typed so far
/// and `input_error` a parse error not yet handed to the list.
pub fn render(
    frame: &mut Frame<'_>,
    area: Rect,
    dialog: &BulkDialog,
    input: &str,
    input_error: Option<&str>,
    theme: &Theme,
) {
    let rect = centered(area, 52, 9);
    let border = match dialog.variant {
        ActionVariant::Danger => theme.error,
        ActionVariant::Primary | ActionVariant::Secondary => theme.accent,
    };

    let rows = if dialog.selected_count == 1 { "row" } else { "rows" };
    let mut lines = vec![
        Line::from(format!(
            "Apply to {} selected {rows}?",
            dialog.selected_count
        )),
        Line::default(),
    ];

    let prompt = match dialog.requirement {
        InputRequirement::None => None,
        InputRequirement::Reason => Some("Reason: "),
        InputRequirement::Amount => Some("Amount: "),
    };
    if let Some(prompt) = prompt {
        lines.push(Line::from(vec![
            Span::styled(prompt, Style::default().fg(theme.text_muted)),
            Span::styled(input.to_string(), Style::default().fg(theme.text)),
            Span::styled("▏", Style::default().fg(theme.accent)),
        ]));
    }

    if let Some(error) = input_error.or(dialog.error.as_deref()) {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(theme.error),
        )));
    }

    lines.push(Line::default());
    if dialog.submitting {
        lines.push(Line::from(Span::styled(
            "Submitting…",
            Style::default()
                .fg(theme.warning)
                .add_modifier(Modifier::ITALIC),
        )));
    } else {
        lines.push(Line::from(hints_to_spans(&hints::DIALOG, theme)));
    }

    let block = Block::default()
        .title(format!(" {} ", dialog.label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true }),
        rect,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    rect
}
