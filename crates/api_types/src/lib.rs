use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod list {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum SortDir {
        #[default]
        Asc,
        Desc,
    }

    /// Request body of every `POST .../list` endpoint.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct ListRequest {
        /// 1-based.
        pub page: u64,
        pub page_size: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub sort_by: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub sort_dir: Option<SortDir>,
        /// Only filters with a value; blank ones are never sent.
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        pub filters: BTreeMap<String, serde_json::Value>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ListResponse<T> {
        pub items: Vec<T>,
        /// Matching rows across all pages.
        pub total: u64,
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum UserStatus {
        Active,
        Inactive,
        Suspended,
    }

    impl UserStatus {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Active => "active",
                Self::Inactive => "inactive",
                Self::Suspended => "suspended",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub status: UserStatus,
        pub balance_minor: i64,
        pub referrals: u32,
        /// RFC3339 timestamp, including timezone offset.
        pub joined_at: DateTime<FixedOffset>,
    }
}

pub mod referral {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ReferralCodeView {
        pub id: Uuid,
        pub code: String,
        /// Username of the owner, absent for campaign codes.
        pub owner: Option<String>,
        pub campaign: Option<String>,
        pub uses: u32,
        pub active: bool,
        pub created_at: DateTime<FixedOffset>,
    }
}

pub mod bulk {
    use super::*;
    use crate::user::UserStatus;

    /// Request body of the `POST .../bulk/...` endpoints. Which optional
    /// fields are required depends on the endpoint:
    /// - `users/bulk/status`: `status`, plus `reason` when deactivating.
    /// - `balances/bulk/adjust`: `amount_minor` (signed, non-zero).
    /// - `referral-codes/bulk/deactivate`: ids only.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BulkRequest {
        pub ids: Vec<Uuid>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub status: Option<UserStatus>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub reason: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub amount_minor: Option<i64>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BulkResponse {
        pub processed: u64,
        /// Ids the server no longer knows about.
        #[serde(default)]
        pub skipped: Vec<Uuid>,
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_request_omits_unset_fields() {
        let request = list::ListRequest {
            page: 2,
            page_size: 20,
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "page": 2, "page_size": 20 }));
    }

    #[test]
    fn bulk_response_defaults_skipped() {
        let response: bulk::BulkResponse = serde_json::from_str(r#"{"processed":3}"#).unwrap();
        assert_eq!(response.processed, 3);
        assert!(response.skipped.is_empty());
    }
}
