//! Bulk actions over the current selection.
//!
//! A [`BulkAction`] only describes an operation; the mutation itself belongs
//! to the caller-supplied handler. The orchestrator drives the dialog
//! lifecycle (see [`BulkPhase`]).
use std::{fmt, future::Future, sync::Arc};

use futures::future::BoxFuture;

use crate::error::{ListError, ServiceError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActionVariant {
    #[default]
    Primary,
    Secondary,
    Danger,
}

/// Extra input a bulk action needs before it can be submitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputRequirement {
    #[default]
    None,
    Reason,
    Amount,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BulkInput {
    #[default]
    None,
    Reason(String),
    /// Minor units (cents).
    Amount(i64),
}

impl BulkInput {
    /// Parses dialog text for `requirement`. Amounts accept `.` or `,` as
    /// decimal separator, a leading sign and at most two decimals.
    pub fn from_text(requirement: InputRequirement, text: &str) -> Result<Self, ListError> {
        match requirement {
            InputRequirement::None => Ok(Self::None),
            InputRequirement::Reason => Ok(Self::Reason(text.trim().to_string())),
            InputRequirement::Amount => parse_amount(text).map(Self::Amount),
        }
    }
}

fn parse_amount(text: &str) -> Result<i64, ListError> {
    let invalid = || ListError::Validation("Invalid amount".to_string());

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ListError::Validation("Amount is required".to_string()));
    }

    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let rest = rest.trim().replace(',', ".");
    let (units, fraction) = match rest.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (rest.as_str(), ""),
    };
    if units.is_empty()
        || !units.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let units: i64 = units.parse().map_err(|_| invalid())?;
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        2 => fraction.parse().map_err(|_| invalid())?,
        _ => return Err(ListError::Validation("Too many decimals".to_string())),
    };

    let total = units
        .checked_mul(100)
        .and_then(|value| value.checked_add(cents))
        .ok_or_else(|| ListError::Validation("Amount too large".to_string()))?;
    Ok(if negative { -total } else { total })
}

/// What a handler receives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkRequest {
    pub ids: Vec<String>,
    pub input: BulkInput,
}

/// What a handler reports back. `skipped` lists ids the backend no longer
/// knows about (deleted since they were selected).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub processed: usize,
    pub skipped: Vec<String>,
}

impl BulkOutcome {
    pub fn processed(processed: usize) -> Self {
        Self {
            processed,
            skipped: Vec::new(),
        }
    }

    pub fn summary(&self, label: &str) -> String {
        if self.skipped.is_empty() {
            format!("{label}: {} processed", self.processed)
        } else {
            format!(
                "{label}: {} processed, {} skipped",
                self.processed,
                self.skipped.len()
            )
        }
    }
}

pub type BulkHandler =
    Arc<dyn Fn(BulkRequest) -> BoxFuture<'static, Result<BulkOutcome, ServiceError>> + Send + Sync>;

pub struct BulkAction {
    pub id: String,
    pub label: String,
    pub variant: ActionVariant,
    pub disabled: bool,
    pub input: InputRequirement,
    handler: BulkHandler,
}

impl fmt::Debug for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkAction")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("variant", &self.variant)
            .field("disabled", &self.disabled)
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

impl BulkAction {
    pub fn new<F, Fut>(id: impl Into<String>, label: impl Into<String>, handler: F) -> Self
    where
        F: Fn(BulkRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<BulkOutcome, ServiceError>> + Send + 'static,
    {
        Self {
            id: id.into(),
            label: label.into(),
            variant: ActionVariant::Primary,
            disabled: false,
            input: InputRequirement::None,
            handler: Arc::new(move |request| -> BoxFuture<'static, _> {
                Box::pin(handler(request))
            }),
        }
    }

    #[must_use]
    pub fn variant(mut self, variant: ActionVariant) -> Self {
        self.variant = variant;
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn requires(mut self, input: InputRequirement) -> Self {
        self.input = input;
        self
    }

    /// Checks the dialog input before anything is sent.
    pub fn validate(&self, input: &BulkInput) -> Result<BulkInput, ListError> {
        match (self.input, input) {
            (InputRequirement::None, _) => Ok(BulkInput::None),
            (InputRequirement::Reason, BulkInput::Reason(reason)) if !reason.trim().is_empty() => {
                Ok(BulkInput::Reason(reason.trim().to_string()))
            }
            (InputRequirement::Reason, _) => {
                Err(ListError::Validation("A reason is required".to_string()))
            }
            (InputRequirement::Amount, BulkInput::Amount(amount)) if *amount != 0 => {
                Ok(BulkInput::Amount(*amount))
            }
            (InputRequirement::Amount, _) => {
                Err(ListError::Validation("Enter a non-zero amount".to_string()))
            }
        }
    }

    pub(crate) fn run(
        &self,
        request: BulkRequest,
    ) -> BoxFuture<'static, Result<BulkOutcome, ServiceError>> {
        (self.handler)(request)
    }

    pub fn view(&self) -> BulkActionView {
        BulkActionView {
            id: self.id.clone(),
            label: self.label.clone(),
            variant: self.variant,
            disabled: self.disabled,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkActionView {
    pub id: String,
    pub label: String,
    pub variant: ActionVariant,
    pub disabled: bool,
}

/// Props of the bar shown above a table while rows are selected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkActionBar {
    pub selected_count: usize,
    pub total_count: usize,
    pub actions: Vec<BulkActionView>,
}

impl BulkActionBar {
    /// `None` when nothing is selected: the bar is hidden.
    pub fn new(selected_count: usize, total_count: usize, actions: &[BulkAction]) -> Option<Self> {
        if selected_count == 0 {
            return None;
        }
        Some(Self {
            selected_count,
            total_count,
            actions: actions.iter().map(BulkAction::view).collect(),
        })
    }

    pub fn summary(&self) -> String {
        format!("{} of {} selected", self.selected_count, self.total_count)
    }
}

/// Where the bulk-action flow currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulkPhase {
    Idle,
    Selectable,
    Confirming,
    Submitting,
}

/// The confirmation dialog of the action being run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkDialog {
    pub action_id: String,
    pub label: String,
    pub variant: ActionVariant,
    pub requirement: InputRequirement,
    pub input: BulkInput,
    pub selected_count: usize,
    pub error: Option<String>,
    pub submitting: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_parsing_follows_money_rules() {
        let parse = |text: &str| BulkInput::from_text(InputRequirement::Amount, text);

        assert_eq!(parse("10"), Ok(BulkInput::Amount(1000)));
        assert_eq!(parse("10,5"), Ok(BulkInput::Amount(1050)));
        assert_eq!(parse(" -0.01 "), Ok(BulkInput::Amount(-1)));
        assert_eq!(parse("+2.30"), Ok(BulkInput::Amount(230)));
        assert!(parse("12.345").is_err());
        assert!(parse("abc").is_err());
        assert!(parse("").is_err());
        assert!(parse("1.2.3").is_err());
    }

    #[test]
    fn validation_requires_the_declared_input() {
        let action = BulkAction::new("deactivate", "Deactivate", |_| async {
            Ok(BulkOutcome::default())
        })
        .requires(InputRequirement::Reason);

        assert!(action.validate(&BulkInput::None).is_err());
        assert!(action.validate(&BulkInput::Reason("  ".to_string())).is_err());
        assert_eq!(
            action.validate(&BulkInput::Reason(" spam ".to_string())),
            Ok(BulkInput::Reason("spam".to_string()))
        );

        let adjust = BulkAction::new("adjust", "Adjust", |_| async {
            Ok(BulkOutcome::default())
        })
        .requires(InputRequirement::Amount);
        assert!(adjust.validate(&BulkInput::Amount(0)).is_err());
        assert!(adjust.validate(&BulkInput::Amount(-100)).is_ok());
    }

    #[test]
    fn bar_is_hidden_without_selection() {
        let actions = vec![BulkAction::new("activate", "Activate", |_| async {
            Ok(BulkOutcome::default())
        })];

        assert_eq!(BulkActionBar::new(0, 25, &actions), None);
        let bar = BulkActionBar::new(2, 25, &actions).unwrap();
        assert_eq!(bar.summary(), "2 of 25 selected");
        assert_eq!(bar.actions[0].id, "activate");
    }

    #[test]
    fn outcome_summary_mentions_skipped_ids() {
        let outcome = BulkOutcome {
            processed: 3,
            skipped: vec!["gone".to_string()],
        };
        assert_eq!(outcome.summary("Deactivate"), "Deactivate: 3 processed, 1 skipped");
        assert_eq!(
            BulkOutcome::processed(2).summary("Activate"),
            "Activate: 2 processed"
        );
    }
}
