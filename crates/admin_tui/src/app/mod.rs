mod panel;

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent};
use listing::ListOptions;

use crate::{
    client::AdminSource,
    config::AppConfig,
    error::{AppError, Result},
    local_state::LocalState,
    rows::{CodeRow, UserRow},
    sections::{self, Backend},
    ui::{
        self,
        keymap::{self, AppAction},
    },
};

pub use panel::Panel;

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Users,
    ReferralCodes,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Users, Section::ReferralCodes];

    pub fn label(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::ReferralCodes => "Referral codes",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Users => Self::ReferralCodes,
            Self::ReferralCodes => Self::Users,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    /// Keystrokes edit the search filter.
    Search,
    /// Waiting for the digit of a bulk action.
    BulkMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    expires_at: Instant,
}

pub struct AppState {
    pub section: Section,
    pub mode: Mode,
    pub users: Panel<AdminSource<UserRow>>,
    pub codes: Panel<AdminSource<CodeRow>>,
    pub backend: &'static str,
    pub origin: String,
    pub username: String,
    pub toast: Option<ToastState>,
}

impl AppState {
    pub fn new(config: &AppConfig, local_state: &LocalState) -> Result<Self> {
        let backend = Backend::from_config(config)?;

        let options = |key: &str| {
            let prefs = local_state.prefs_for(key);
            let page_size = prefs
                .map(|prefs| prefs.page_size)
                .filter(|size| *size > 0)
                .unwrap_or(config.page_size);
            let sort = prefs
                .and_then(|prefs| prefs.sort.clone())
                .filter(|sort| !sort.field.trim().is_empty());
            let options = ListOptions {
                page_size,
                debounce: Duration::from_millis(config.debounce_ms),
                ..ListOptions::default()
            };
            (options, sort)
        };

        let (user_options, user_sort) = options("users");
        let users = Panel::new(
            "users",
            sections::users_list(&backend, user_options, user_sort)?,
            sections::user_status_filter(),
        );
        let (code_options, code_sort) = options("referral_codes");
        let codes = Panel::new(
            "referral_codes",
            sections::codes_list(&backend, code_options, code_sort)?,
            sections::code_status_filter(),
        );

        let origin = match &backend {
            Backend::Remote(_) => config.base_url.clone(),
            Backend::Demo(_) => "in-memory".to_string(),
        };

        Ok(Self {
            section: Section::Users,
            mode: Mode::Browse,
            users,
            codes,
            backend: backend.label(),
            origin,
            username: config.username.clone(),
            toast: None,
        })
    }

    /// Fetches both sections; needs a tokio runtime.
    pub fn load(&mut self) {
        self.users.list.refresh();
        self.codes.list.refresh();
    }

    pub fn tick(&mut self) {
        self.users.tick();
        self.codes.tick();

        let notices = [self.users.take_notice(), self.codes.take_notice()];
        for notice in notices.into_iter().flatten() {
            self.show_toast(notice, ToastLevel::Success);
        }
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= Instant::now())
        {
            self.toast = None;
        }
    }

    pub fn show_toast(&mut self, message: impl Into<String>, level: ToastLevel) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    /// `true` while characters are text input rather than shortcuts.
    pub fn typing(&self) -> bool {
        self.mode == Mode::Search
            || match self.section {
                Section::Users => self.users.dialog_open(),
                Section::ReferralCodes => self.codes.dialog_open(),
            }
    }

    pub fn handle_action(&mut self, action: AppAction) -> bool {
        if action == AppAction::Quit {
            return true;
        }
        if action == AppAction::NextSection && self.mode == Mode::Browse && !self.typing() {
            self.section = self.section.next();
            return false;
        }

        let result = match self.section {
            Section::Users => self.users.handle(&mut self.mode, action),
            Section::ReferralCodes => self.codes.handle(&mut self.mode, action),
        };
        if let Err(err) = result {
            tracing::debug!("rejected key: {err}");
            self.show_toast(err.to_string(), ToastLevel::Error);
        }
        false
    }
}

pub struct App {
    config: AppConfig,
    local_state: LocalState,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let local_state = LocalState::load(&config.state_file).unwrap_or_else(|err| {
            tracing::warn!("ignoring unreadable list preferences: {err}");
            LocalState::default()
        });
        let state = AppState::new(&config, &local_state)?;

        Ok(Self {
            config,
            local_state,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.state.load();
        if self.state.backend == "demo" {
            self.state
                .show_toast("Demo mode: changes stay in memory", ToastLevel::Info);
        }

        let (mut terminal, guard) = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(guard)?;
        self.save_prefs();
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            self.state.tick();
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            } else {
                tokio::task::yield_now().await;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = keymap::map_key(key, self.state.typing());
        if action != AppAction::None {
            self.should_quit = self.state.handle_action(action);
        }
    }

    fn save_prefs(&mut self) {
        self.local_state.set_prefs(self.state.users.prefs());
        self.local_state.set_prefs(self.state.codes.prefs());
        if let Err(err) = self.local_state.save(&self.config.state_file) {
            tracing::warn!("failed to save list preferences: {err}");
        }
    }
}
