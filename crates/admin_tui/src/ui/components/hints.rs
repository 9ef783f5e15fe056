use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }
    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

pub const BROWSE: [KeyHint; 9] = [
    KeyHint::new("space", "select"),
    KeyHint::new("a", "all"),
    KeyHint::new("1-9", "sort"),
    KeyHint::new("n/p", "page"),
    KeyHint::new("+/-", "size"),
    KeyHint::new("/", "search"),
    KeyHint::new("f", "status"),
    KeyHint::new("c", "clear"),
    KeyHint::new("r", "refresh"),
];

pub const SELECTION: [KeyHint; 2] = [KeyHint::new("b", "bulk"), KeyHint::new("x", "unselect")];

pub const SEARCH: [KeyHint; 2] = [KeyHint::new("Enter", "done"), KeyHint::new("Esc", "done")];

pub const BULK_MENU: [KeyHint; 2] = [KeyHint::new("1-9", "action"), KeyHint::new("Esc", "cancel")];

pub const DIALOG: [KeyHint; 2] = [KeyHint::new("Enter", "confirm"), KeyHint::new("Esc", "cancel")];
