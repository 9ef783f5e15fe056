//! Columns, filters and bulk actions of the two console sections.
use std::time::Duration;

use api_types::user::UserStatus;
use listing::{
    ActionVariant, Align, BulkAction, BulkInput, BulkOutcome, BulkRequest, CellRenderer, Column,
    InputRequirement, ListOptions, ListOrchestrator, ServiceError, SortConfig, Value,
};

use crate::{
    client::{AdminSource, Client, HttpSource},
    config::AppConfig,
    demo::DemoStore,
    error::Result,
    rows::{CodeRow, UserRow},
};

/// Where rows come from and where bulk actions go.
#[derive(Clone)]
pub enum Backend {
    Remote(Client),
    Demo(DemoStore),
}

impl Backend {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        if config.demo {
            let latency = Duration::from_millis(config.demo_latency_ms);
            return Ok(Self::Demo(DemoStore::new(latency)));
        }
        let client = Client::new(&config.base_url, &config.username, &config.password)?;
        Ok(Self::Remote(client))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Remote(_) => "remote",
            Self::Demo(_) => "demo",
        }
    }
}

/// The one-key status filter of a section, cycled with `f`.
#[derive(Debug, Clone)]
pub struct StatusFilter {
    pub key: &'static str,
    pub options: Vec<(Value, &'static str)>,
}

pub fn user_columns() -> Vec<Column<UserRow>> {
    vec![
        Column::new("name", "Name").sortable().width(22),
        Column::new("email", "Email").sortable().width(30),
        Column::new("status", "Status")
            .sortable()
            .filterable()
            .width(11)
            .renderer(CellRenderer::Badge(vec![
                (Value::from("active"), "● active".to_string()),
                (Value::from("inactive"), "○ inactive".to_string()),
                (Value::from("suspended"), "✕ suspended".to_string()),
            ])),
        Column::new("balance", "Balance")
            .sortable()
            .align(Align::Right)
            .width(13)
            .renderer(CellRenderer::Money {
                symbol: "€".to_string(),
            }),
        Column::new("referrals", "Refs")
            .sortable()
            .align(Align::Right)
            .width(6),
        Column::new("joined", "Joined")
            .sortable()
            .width(12)
            .renderer(CellRenderer::Date {
                format: "%d %b %Y".to_string(),
            }),
    ]
}

pub fn user_status_filter() -> StatusFilter {
    StatusFilter {
        key: "status",
        options: vec![
            (Value::from("active"), "active"),
            (Value::from("inactive"), "inactive"),
            (Value::from("suspended"), "suspended"),
        ],
    }
}

pub fn user_actions(backend: &Backend) -> Vec<BulkAction> {
    let activate = backend.clone();
    let deactivate = backend.clone();
    let adjust = backend.clone();
    vec![
        BulkAction::new("activate", "Activate", move |request| {
            set_user_status(activate.clone(), request, UserStatus::Active)
        }),
        BulkAction::new("deactivate", "Deactivate", move |request| {
            set_user_status(deactivate.clone(), request, UserStatus::Inactive)
        })
        .variant(ActionVariant::Danger)
        .requires(InputRequirement::Reason),
        BulkAction::new("adjust_balance", "Adjust balance", move |request| {
            adjust_balance(adjust.clone(), request)
        })
        .variant(ActionVariant::Secondary)
        .requires(InputRequirement::Amount),
    ]
}

async fn set_user_status(
    backend: Backend,
    request: BulkRequest,
    status: UserStatus,
) -> std::result::Result<BulkOutcome, ServiceError> {
    match backend {
        Backend::Remote(client) => {
            let reason = match request.input {
                BulkInput::Reason(reason) => Some(reason),
                BulkInput::None | BulkInput::Amount(_) => None,
            };
            Ok(client
                .users_bulk_status(&request.ids, status, reason)
                .await?)
        }
        Backend::Demo(store) => store
            .users
            .update(&request.ids, |user| user.0.status = status),
    }
}

async fn adjust_balance(
    backend: Backend,
    request: BulkRequest,
) -> std::result::Result<BulkOutcome, ServiceError> {
    let BulkInput::Amount(amount) = request.input else {
        return Err(ServiceError::new("an amount is required"));
    };
    match backend {
        Backend::Remote(client) => Ok(client.balances_bulk_adjust(&request.ids, amount).await?),
        Backend::Demo(store) => store.users.update(&request.ids, |user| {
            user.0.balance_minor = user.0.balance_minor.saturating_add(amount);
        }),
    }
}

pub fn code_columns() -> Vec<Column<CodeRow>> {
    vec![
        Column::new("code", "Code").sortable().width(10),
        Column::new("owner", "Owner").sortable().width(14),
        Column::new("campaign", "Campaign").sortable().width(12),
        Column::new("uses", "Uses")
            .sortable()
            .align(Align::Right)
            .width(6),
        Column::new("active", "Active")
            .sortable()
            .filterable()
            .align(Align::Center)
            .width(8)
            .renderer(CellRenderer::Boolean {
                yes: "yes".to_string(),
                no: "no".to_string(),
            }),
        Column::new("created", "Created")
            .sortable()
            .width(12)
            .renderer(CellRenderer::Date {
                format: "%d %b %Y".to_string(),
            }),
    ]
}

pub fn code_status_filter() -> StatusFilter {
    StatusFilter {
        key: "active",
        options: vec![(Value::from(true), "active"), (Value::from(false), "inactive")],
    }
}

pub fn code_actions(backend: &Backend) -> Vec<BulkAction> {
    let backend = backend.clone();
    vec![
        BulkAction::new("deactivate", "Deactivate", move |request| {
            deactivate_codes(backend.clone(), request)
        })
        .variant(ActionVariant::Danger),
    ]
}

async fn deactivate_codes(
    backend: Backend,
    request: BulkRequest,
) -> std::result::Result<BulkOutcome, ServiceError> {
    match backend {
        Backend::Remote(client) => Ok(client.referral_codes_bulk_deactivate(&request.ids).await?),
        Backend::Demo(store) => store
            .codes
            .update(&request.ids, |code| code.0.active = false),
    }
}

pub fn users_list(
    backend: &Backend,
    options: ListOptions,
    sort: Option<SortConfig>,
) -> Result<ListOrchestrator<AdminSource<UserRow>>> {
    let source = match backend {
        Backend::Remote(client) => AdminSource::Http(HttpSource::new(client.clone())),
        Backend::Demo(store) => AdminSource::Memory(store.users.clone()),
    };
    let mut builder = ListOrchestrator::builder(source)
        .columns(user_columns())
        .options(options)
        .sort(sort);
    for action in user_actions(backend) {
        builder = builder.action(action);
    }
    Ok(builder.build()?)
}

pub fn codes_list(
    backend: &Backend,
    options: ListOptions,
    sort: Option<SortConfig>,
) -> Result<ListOrchestrator<AdminSource<CodeRow>>> {
    let source = match backend {
        Backend::Remote(client) => AdminSource::Http(HttpSource::new(client.clone())),
        Backend::Demo(store) => AdminSource::Memory(store.codes.clone()),
    };
    let mut builder = ListOrchestrator::builder(source)
        .columns(code_columns())
        .options(options)
        .sort(sort);
    for action in code_actions(backend) {
        builder = builder.action(action);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> Backend {
        Backend::Demo(DemoStore::new(Duration::ZERO))
    }

    #[tokio::test]
    async fn demo_deactivation_updates_the_store() {
        let backend = demo();
        let Backend::Demo(store) = &backend else {
            unreachable!()
        };
        let target = store.users.snapshot().unwrap()[1].0.id.to_string();

        let mut users = users_list(&backend, ListOptions::default(), None).unwrap();
        users.refresh();
        users.settle().await;
        users.select_rows([target.clone()]);
        users.begin_bulk("deactivate").unwrap();
        users
            .set_bulk_input(BulkInput::Reason("chargeback".to_string()))
            .unwrap();
        users.confirm_bulk().unwrap();
        users.settle().await;

        assert_eq!(users.notice(), Some("Deactivate: 1 processed"));
        let updated = store.users.snapshot().unwrap();
        assert_eq!(updated[1].0.status, UserStatus::Inactive);
    }

    #[tokio::test]
    async fn demo_balance_adjustment_adds_the_amount() {
        let backend = demo();
        let Backend::Demo(store) = &backend else {
            unreachable!()
        };
        let before = store.users.snapshot().unwrap()[0].0.balance_minor;
        let id = store.users.snapshot().unwrap()[0].0.id.to_string();

        let outcome = adjust_balance(
            backend.clone(),
            BulkRequest {
                ids: vec![id],
                input: BulkInput::Amount(-250),
            },
        )
        .await
        .unwrap();

        assert_eq!(outcome.processed, 1);
        assert_eq!(store.users.snapshot().unwrap()[0].0.balance_minor, before - 250);
    }

    #[test]
    fn every_column_key_is_a_row_field() {
        use listing::Row;

        let user = &crate::demo::users()[0];
        for column in user_columns() {
            assert_ne!(user.field(&column.key), Value::Null, "{}", column.key);
        }
        let code = &crate::demo::codes()[3];
        for column in code_columns() {
            assert_ne!(code.field(&column.key), Value::Null, "{}", column.key);
        }
    }
}
