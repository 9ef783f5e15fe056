mod source;

use api_types::{
    ErrorBody,
    bulk::{BulkRequest, BulkResponse},
    list::{ListRequest, SortDir},
    user::UserStatus,
};
use listing::{BulkOutcome, FetchParams, ServiceError, SortDirection};
use reqwest::Url;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::error::{AppError, Result};

pub use source::{AdminSource, HttpSource};

#[derive(Debug)]
pub enum ClientError {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict(String),
    Validation(String),
    Server(String),
    Transport(reqwest::Error),
}

/// User-facing text for a failed request.
pub fn message_for_error(err: ClientError) -> String {
    match err {
        ClientError::Unauthorized | ClientError::Forbidden => {
            "Wrong credentials or missing admin rights.".to_string()
        }
        ClientError::NotFound => "Endpoint not found.".to_string(),
        ClientError::Conflict(message) => format!("Conflict: {message}"),
        ClientError::Validation(message) => format!("Validation error: {message}"),
        ClientError::Server(message) => format!("Server error: {message}"),
        ClientError::Transport(err) => format!("Server unreachable: {err}"),
    }
}

impl From<ClientError> for ServiceError {
    fn from(err: ClientError) -> Self {
        ServiceError::new(message_for_error(err))
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    username: String,
    password: String,
}

impl Client {
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|err| AppError::BaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            base_url: parsed,
            http: reqwest::Client::new(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// `POST {base}/{path}` with a JSON body, decoding a JSON response.
    pub async fn post<Req, Res>(
        &self,
        path: &str,
        payload: &Req,
    ) -> std::result::Result<Res, ClientError>
    where
        Req: Serialize + Sync + ?Sized,
        Res: DeserializeOwned,
    {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;

        tracing::debug!(%endpoint, "request");
        let res = self
            .http
            .post(endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .json(payload)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if res.status().is_success() {
            return res.json::<Res>().await.map_err(ClientError::Transport);
        }

        let status = res.status();
        let body = res
            .json::<ErrorBody>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());
        tracing::warn!(%status, "request failed: {body}");

        let err = match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            409 => ClientError::Conflict(body),
            422 => ClientError::Validation(body),
            _ => ClientError::Server(body),
        };
        Err(err)
    }

    pub async fn users_bulk_status(
        &self,
        ids: &[String],
        status: UserStatus,
        reason: Option<String>,
    ) -> std::result::Result<BulkOutcome, ClientError> {
        let payload = BulkRequest {
            ids: parse_ids(ids)?,
            status: Some(status),
            reason,
            amount_minor: None,
        };
        self.bulk("admin/users/bulk/status", &payload).await
    }

    pub async fn balances_bulk_adjust(
        &self,
        ids: &[String],
        amount_minor: i64,
    ) -> std::result::Result<BulkOutcome, ClientError> {
        let payload = BulkRequest {
            ids: parse_ids(ids)?,
            amount_minor: Some(amount_minor),
            ..BulkRequest::default()
        };
        self.bulk("admin/balances/bulk/adjust", &payload).await
    }

    pub async fn referral_codes_bulk_deactivate(
        &self,
        ids: &[String],
    ) -> std::result::Result<BulkOutcome, ClientError> {
        let payload = BulkRequest {
            ids: parse_ids(ids)?,
            ..BulkRequest::default()
        };
        self.bulk("admin/referral-codes/bulk/deactivate", &payload)
            .await
    }

    async fn bulk(
        &self,
        path: &str,
        payload: &BulkRequest,
    ) -> std::result::Result<BulkOutcome, ClientError> {
        let response: BulkResponse = self.post(path, payload).await?;
        Ok(BulkOutcome {
            processed: usize::try_from(response.processed).unwrap_or(usize::MAX),
            skipped: response.skipped.iter().map(Uuid::to_string).collect(),
        })
    }
}

fn parse_ids(ids: &[String]) -> std::result::Result<Vec<Uuid>, ClientError> {
    ids.iter()
        .map(|id| {
            Uuid::parse_str(id).map_err(|_| ClientError::Validation(format!("invalid id {id}")))
        })
        .collect()
}

/// Maps list parameters onto the wire request.
pub fn list_request(params: &FetchParams) -> std::result::Result<ListRequest, ServiceError> {
    let filters = params
        .filters
        .iter()
        .map(|(key, value)| {
            serde_json::to_value(value)
                .map(|value| (key.clone(), value))
                .map_err(|err| ServiceError::new(format!("invalid filter {key}: {err}")))
        })
        .collect::<std::result::Result<_, _>>()?;

    Ok(ListRequest {
        page: params.page as u64,
        page_size: params.page_size as u64,
        sort_by: params.sort.as_ref().map(|sort| sort.field.clone()),
        sort_dir: params.sort.as_ref().map(|sort| match sort.direction {
            SortDirection::Asc => SortDir::Asc,
            SortDirection::Desc => SortDir::Desc,
        }),
        filters,
    })
}

#[cfg(test)]
mod tests {
    use listing::{FilterBag, SortConfig, Value};

    use super::*;

    #[test]
    fn malformed_base_url_is_a_config_problem() {
        let err = Client::new("127.0.0.1:3000/api", "admin", "secret").unwrap_err();
        assert!(matches!(&err, AppError::BaseUrl { url, .. } if url == "127.0.0.1:3000/api"));
        assert!(err.to_string().starts_with("invalid base_url \"127.0.0.1:3000/api\""));
    }

    #[test]
    fn list_request_carries_sort_and_filters() {
        let filters: FilterBag = [
            ("status".to_string(), Value::from("active")),
            (
                "balance".to_string(),
                Value::range(Some(Value::from(100)), None),
            ),
        ]
        .into_iter()
        .collect();
        let params = FetchParams {
            filters,
            sort: Some(SortConfig::desc("joined")),
            page: 3,
            page_size: 50,
        };

        let request = list_request(&params).unwrap();
        assert_eq!(request.page, 3);
        assert_eq!(request.page_size, 50);
        assert_eq!(request.sort_by.as_deref(), Some("joined"));
        assert_eq!(request.sort_dir, Some(SortDir::Desc));
        assert_eq!(request.filters["status"], serde_json::json!("active"));
        assert_eq!(
            request.filters["balance"],
            serde_json::json!({ "min": 100, "max": null })
        );
    }

    #[test]
    fn bad_ids_never_reach_the_server() {
        let result = parse_ids(&["not-a-uuid".to_string()]);
        assert!(matches!(result, Err(ClientError::Validation(_))));
    }

    #[test]
    fn errors_become_readable_messages() {
        let err: ServiceError = ClientError::Validation("amount too large".to_string()).into();
        assert_eq!(err.message, "Validation error: amount too large");
        assert_eq!(
            message_for_error(ClientError::Forbidden),
            "Wrong credentials or missing admin rights."
        );
    }
}
