//! Single-column sort state.
//!
//! Clicking a header the first time sorts ascending, clicking the same header
//! again flips the direction, clicking another header starts over ascending on
//! the new field. There is never more than one active field.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ListError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Arrow shown next to the active header.
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortConfig {
    pub field: String,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

type SortListener = Box<dyn FnMut(Option<&SortConfig>) + Send>;

#[derive(Default)]
pub struct SortController {
    config: Option<SortConfig>,
    on_change: Option<SortListener>,
}

impl fmt::Debug for SortController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortController")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SortController {
    pub fn new(initial: Option<SortConfig>) -> Self {
        Self {
            config: initial,
            on_change: None,
        }
    }

    /// Registers a listener called with the new config after every change.
    #[must_use]
    pub fn with_on_change(
        mut self,
        listener: impl FnMut(Option<&SortConfig>) + Send + 'static,
    ) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    pub fn config(&self) -> Option<&SortConfig> {
        self.config.as_ref()
    }

    /// Direction of `field` when it is the active sort field.
    pub fn direction_for(&self, field: &str) -> Option<SortDirection> {
        self.config
            .as_ref()
            .filter(|config| config.field == field)
            .map(|config| config.direction)
    }

    /// Header click: flips the direction of the active field or activates
    /// `field` ascending.
    ///
    /// ```rust
    /// use listing::{SortController, SortDirection};
    ///
    /// let mut sort = SortController::default();
    /// sort.handle_sort("name").unwrap();
    /// let config = sort.handle_sort("name").unwrap();
    /// assert_eq!(config.direction, SortDirection::Desc);
    /// ```
    pub fn handle_sort(&mut self, field: &str) -> Result<SortConfig, ListError> {
        let field = field.trim();
        if field.is_empty() {
            return Err(ListError::EmptySortField);
        }

        let next = match &self.config {
            Some(current) if current.field == field => SortConfig {
                field: current.field.clone(),
                direction: current.direction.flipped(),
            },
            _ => SortConfig::asc(field),
        };
        self.config = Some(next.clone());
        self.notify();
        Ok(next)
    }

    /// Programmatic override, e.g. restoring a persisted sort.
    pub fn set_sort(&mut self, config: Option<SortConfig>) -> Result<(), ListError> {
        if config
            .as_ref()
            .is_some_and(|config| config.field.trim().is_empty())
        {
            return Err(ListError::EmptySortField);
        }
        if self.config == config {
            return Ok(());
        }
        self.config = config;
        self.notify();
        Ok(())
    }

    pub fn clear(&mut self) {
        if self.config.take().is_some() {
            self.notify();
        }
    }

    fn notify(&mut self) {
        if let Some(listener) = self.on_change.as_mut() {
            listener(self.config.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn same_field_flips_and_other_field_resets() {
        let mut sort = SortController::default();

        assert_eq!(sort.handle_sort("name").unwrap(), SortConfig::asc("name"));
        assert_eq!(sort.handle_sort("name").unwrap(), SortConfig::desc("name"));
        assert_eq!(sort.handle_sort("email").unwrap(), SortConfig::asc("email"));
        assert_eq!(sort.config(), Some(&SortConfig::asc("email")));
    }

    #[test]
    fn empty_field_is_rejected_without_touching_state() {
        let mut sort = SortController::new(Some(SortConfig::desc("name")));

        assert_eq!(sort.handle_sort(""), Err(ListError::EmptySortField));
        assert_eq!(sort.handle_sort("   "), Err(ListError::EmptySortField));
        assert_eq!(sort.config(), Some(&SortConfig::desc("name")));
    }

    #[test]
    fn direction_only_reported_for_active_field() {
        let sort = SortController::new(Some(SortConfig::desc("status")));

        assert_eq!(sort.direction_for("status"), Some(SortDirection::Desc));
        assert_eq!(sort.direction_for("name"), None);
    }

    #[test]
    fn listener_sees_every_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut sort = SortController::default()
            .with_on_change(move |config| sink.lock().unwrap().push(config.cloned()));

        sort.handle_sort("name").unwrap();
        sort.set_sort(Some(SortConfig::desc("email"))).unwrap();
        sort.set_sort(Some(SortConfig::desc("email"))).unwrap();
        sort.clear();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                Some(SortConfig::asc("name")),
                Some(SortConfig::desc("email")),
                None
            ]
        );
    }
}
