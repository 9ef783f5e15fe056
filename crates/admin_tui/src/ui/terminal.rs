use std::io::{Stdout, stdout};

use crossterm::{
    cursor::{Hide, Show},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::error::Result;

pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Puts the terminal back when dropped, so an error or a panic escaping the
/// event loop does not leave the shell in raw mode. Panics caught inside the
/// loop (cell renderers, data sources) never reach it.
pub struct TerminalGuard {
    restore: Option<fn() -> std::io::Result<()>>,
}

impl TerminalGuard {
    fn new(restore: fn() -> std::io::Result<()>) -> Self {
        Self {
            restore: Some(restore),
        }
    }

    /// Restores now and disarms the guard.
    pub fn restore(mut self) -> Result<()> {
        if let Some(restore) = self.restore.take() {
            restore()?;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            let _ = restore();
        }
    }
}

/// Enters raw mode on the alternate screen.
pub fn setup_terminal() -> Result<(AppTerminal, TerminalGuard)> {
    enable_raw_mode()?;
    let guard = TerminalGuard::new(leave);
    crossterm::execute!(stdout(), EnterAlternateScreen, Hide)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok((terminal, guard))
}

pub fn restore_terminal(guard: TerminalGuard) -> Result<()> {
    guard.restore()
}

fn leave() -> std::io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(stdout(), LeaveAlternateScreen, Show)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    static DROPPED: AtomicUsize = AtomicUsize::new(0);
    static RESTORED: AtomicUsize = AtomicUsize::new(0);

    fn count_dropped() -> std::io::Result<()> {
        DROPPED.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn count_restored() -> std::io::Result<()> {
        RESTORED.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    #[test]
    fn guard_restores_once_on_unwind() {
        let result = std::panic::catch_unwind(|| {
            let _guard = TerminalGuard::new(count_dropped);
            panic!("event loop failed");
        });
        assert!(result.is_err());
        assert_eq!(DROPPED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn explicit_restore_disarms_the_guard() {
        let guard = TerminalGuard::new(count_restored);
        guard.restore().unwrap();
        assert_eq!(RESTORED.load(Ordering::SeqCst), 1);
    }
}
