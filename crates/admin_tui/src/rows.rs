//! Table rows of the console sections, wrapping the API views.
use api_types::{referral::ReferralCodeView, user::UserView};
use listing::{Row, Value};
use serde::de::DeserializeOwned;

/// A row type fetched from a `POST .../list` endpoint.
pub trait Remote: Row {
    type Dto: DeserializeOwned + Send + 'static;

    const LIST_PATH: &'static str;

    fn from_dto(dto: Self::Dto) -> Self;
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRow(pub UserView);

impl Row for UserRow {
    fn field(&self, key: &str) -> Value {
        let user = &self.0;
        match key {
            "id" => user.id.to_string().into(),
            "name" => user.name.as_str().into(),
            "email" => user.email.as_str().into(),
            "status" => user.status.as_str().into(),
            "balance" => user.balance_minor.into(),
            "referrals" => user.referrals.into(),
            "joined" => user.joined_at.to_rfc3339().into(),
            _ => Value::Null,
        }
    }
}

impl Remote for UserRow {
    type Dto = UserView;

    const LIST_PATH: &'static str = "admin/users/list";

    fn from_dto(dto: UserView) -> Self {
        Self(dto)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeRow(pub ReferralCodeView);

impl Row for CodeRow {
    fn field(&self, key: &str) -> Value {
        let code = &self.0;
        match key {
            "id" => code.id.to_string().into(),
            "code" => code.code.as_str().into(),
            "owner" => code.owner.as_deref().into(),
            "campaign" => code.campaign.as_deref().into(),
            "uses" => code.uses.into(),
            "active" => code.active.into(),
            "created" => code.created_at.to_rfc3339().into(),
            _ => Value::Null,
        }
    }
}

impl Remote for CodeRow {
    type Dto = ReferralCodeView;

    const LIST_PATH: &'static str = "admin/referral-codes/list";

    fn from_dto(dto: ReferralCodeView) -> Self {
        Self(dto)
    }
}
