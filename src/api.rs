use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::CycleError;

/// Homework status endpoint of the Practicum API.
pub const ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Per-request cap, well under the retry period so a hung request cannot
/// stall the loop past its cadence.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything the poller can fetch homework statuses from.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the raw payload of statuses updated at or after `from_date`.
    async fn fetch(&self, from_date: i64) -> Result<Value, CycleError>;
}

/// HTTP client for the Practicum homework-status API.
///
/// One GET per call, no internal retries — retrying is the poller's job,
/// at whole-cycle granularity.
pub struct PracticumClient {
    client: reqwest::Client,
    token: String,
    endpoint: String,
}

impl PracticumClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_endpoint(token, ENDPOINT)
    }

    /// Same client against a non-default endpoint. Tests point this at a
    /// stub server.
    pub fn with_endpoint(token: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, CycleError> {
        debug!("GET {} from_date={}", self.endpoint, from_date);

        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|source| {
                error!("request to {} failed: {}", self.endpoint, source);
                CycleError::Transport {
                    endpoint: self.endpoint.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            error!("{} answered with status code {}", self.endpoint, status);
            return Err(CycleError::HttpStatus { status });
        }

        response.json().await.map_err(|source| {
            error!("failed to decode API response as JSON: {}", source);
            CycleError::Decode(source)
        })
    }
}
