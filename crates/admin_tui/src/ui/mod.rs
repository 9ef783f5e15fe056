pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Mode, Section};
use components::hints::{self, KeyHint, hint_separator, hints_to_spans};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(1), // Tabs
            Constraint::Min(0),
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    let counts = [
        state.users.list.pagination().total_items,
        state.codes.list.pagination().total_items,
    ];
    components::tabs::render_tabs(frame, layout[1], state.section, counts, &theme);

    match state.section {
        Section::Users => {
            screens::list_page::render(frame, layout[2], &state.users, state.mode, &theme)
        }
        Section::ReferralCodes => {
            screens::list_page::render(frame, layout[2], &state.codes, state.mode, &theme)
        }
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref(), &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let user = if state.username.is_empty() {
        "-"
    } else {
        state.username.as_str()
    };
    let backend_style = if state.backend == "demo" {
        Style::default().fg(theme.warning)
    } else {
        Style::default().fg(theme.positive)
    };

    let line = Line::from(vec![
        Span::styled(" Backend", Style::default().fg(theme.text_muted)),
        Span::raw(": "),
        Span::styled(state.backend, backend_style),
        Span::raw("  "),
        Span::styled("Origin", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.origin)),
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}")),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let (dialog_open, has_selection) = match state.section {
        Section::Users => (
            state.users.dialog_open(),
            !state.users.list.selection().is_empty(),
        ),
        Section::ReferralCodes => (
            state.codes.dialog_open(),
            !state.codes.list.selection().is_empty(),
        ),
    };

    let mut parts = vec![Span::raw(" ")];
    let context: &[KeyHint] = if dialog_open {
        &hints::DIALOG
    } else {
        match state.mode {
            Mode::Search => &hints::SEARCH,
            Mode::BulkMenu => &hints::BULK_MENU,
            Mode::Browse => &hints::BROWSE,
        }
    };
    parts.extend(hints_to_spans(context, theme));

    if state.mode == Mode::Browse && !dialog_open {
        if has_selection {
            parts.push(hint_separator(theme));
            parts.extend(hints_to_spans(&hints::SELECTION, theme));
        }
        parts.push(hint_separator(theme));
        parts.extend(hints_to_spans(
            &[KeyHint::new("Tab", "section"), KeyHint::new("q", "quit")],
            theme,
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use crate::{config::AppConfig, local_state::LocalState};

    use super::*;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn users_screen_shows_headers_and_selection() {
        let config = AppConfig {
            demo: true,
            demo_latency_ms: 0,
            ..AppConfig::default()
        };
        let mut state = AppState::new(&config, &LocalState::default()).unwrap();
        state.load();
        state.users.list.settle().await;
        state.codes.list.settle().await;

        let ids = state.users.list.visible_ids();
        state.users.list.select_rows(ids.into_iter().take(2));

        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|frame| render(frame, &state)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("Users (57)"));
        assert!(text.contains("Referral codes (23)"));
        assert!(text.contains("1 Name"));
        assert!(text.contains("4 Balance"));
        assert!(text.contains("2 of 57 selected"));
        assert!(text.contains("Rows 1–20 of 57"));
    }

    #[tokio::test]
    async fn open_dialog_replaces_the_hints() {
        let config = AppConfig {
            demo: true,
            demo_latency_ms: 0,
            ..AppConfig::default()
        };
        let mut state = AppState::new(&config, &LocalState::default()).unwrap();
        state.load();
        state.codes.list.settle().await;
        state.section = Section::ReferralCodes;

        let ids = state.codes.list.visible_ids();
        state.codes.list.select_rows(ids.into_iter().take(3));
        state.codes.list.begin_bulk("deactivate").unwrap();

        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|frame| render(frame, &state)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("Apply to 3 selected rows?"));
        assert!(text.contains("Enter confirm"));
        assert!(!text.contains("Tab section"));
    }
}
