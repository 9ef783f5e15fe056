//! In-memory fixtures for `--demo`.
use std::time::Duration;

use api_types::{
    referral::ReferralCodeView,
    user::{UserStatus, UserView},
};
use chrono::{DateTime, Duration as Days, FixedOffset};
use listing::{MemorySource, RowKey};
use uuid::Uuid;

use crate::rows::{CodeRow, UserRow};

const FIRST_NAMES: [&str; 12] = [
    "Alice", "Bruno", "Chiara", "Dario", "Elena", "Fabio", "Giulia", "Luca", "Marta", "Nicola",
    "Paola", "Sara",
];
const LAST_NAMES: [&str; 7] = [
    "Rossi", "Bianchi", "Greco", "Conti", "Ferri", "Marino", "Costa",
];
const CAMPAIGNS: [&str; 3] = ["spring", "launch", "partners"];

pub const DEMO_USERS: usize = 57;
pub const DEMO_CODES: usize = 23;

fn epoch() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2025-01-06T09:30:00+01:00").unwrap_or_default()
}

pub fn users() -> Vec<UserRow> {
    (0..DEMO_USERS)
        .map(|i| {
            let first = FIRST_NAMES[i % FIRST_NAMES.len()];
            let last = LAST_NAMES[(i / FIRST_NAMES.len() + i) % LAST_NAMES.len()];
            let status = match i % 7 {
                0 => UserStatus::Suspended,
                3 | 5 => UserStatus::Inactive,
                _ => UserStatus::Active,
            };
            UserRow(UserView {
                id: Uuid::from_u128(0x1000 + i as u128),
                name: format!("{first} {last}"),
                email: format!("{}.{}{i}@example.com", first.to_lowercase(), last.to_lowercase()),
                status,
                balance_minor: ((i * 7919) % 250_000) as i64 - 20_000,
                referrals: (i * 3 % 11) as u32,
                joined_at: epoch() + Days::days(i as i64 * 5),
            })
        })
        .collect()
}

pub fn codes() -> Vec<CodeRow> {
    (0..DEMO_CODES)
        .map(|i| {
            let owner = (i % 4 != 0).then(|| FIRST_NAMES[i % FIRST_NAMES.len()].to_lowercase());
            let campaign = (i % 3 == 0).then(|| CAMPAIGNS[i % CAMPAIGNS.len()].to_string());
            CodeRow(ReferralCodeView {
                id: Uuid::from_u128(0x2000 + i as u128),
                code: format!("REF{:04}", 17 + i * 37),
                owner,
                campaign,
                uses: (i * 5 % 17) as u32,
                active: i % 5 != 4,
                created_at: epoch() + Days::days(i as i64 * 9),
            })
        })
        .collect()
}

/// Shared in-memory stores backing both sections.
#[derive(Clone)]
pub struct DemoStore {
    pub users: MemorySource<UserRow>,
    pub codes: MemorySource<CodeRow>,
}

impl DemoStore {
    pub fn new(latency: Duration) -> Self {
        let users = MemorySource::new(users())
            .with_row_key(RowKey::field("id"))
            .with_search_fields(["name", "email"])
            .with_latency(latency);
        let codes = MemorySource::new(codes())
            .with_search_fields(["code", "owner", "campaign"])
            .with_latency(latency);
        Self { users, codes }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn fixtures_have_unique_ids() {
        let users = users();
        let ids: HashSet<_> = users.iter().map(|user| user.0.id).collect();
        assert_eq!(ids.len(), DEMO_USERS);

        let codes = codes();
        let ids: HashSet<_> = codes.iter().map(|code| code.0.code.clone()).collect();
        assert_eq!(ids.len(), DEMO_CODES);
    }
}
