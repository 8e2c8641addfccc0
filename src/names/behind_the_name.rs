use std::{fmt, time::Duration};

use async_trait::async_trait;
use tracing::debug;

use crate::{ExternalError, NameRequest, NameResponse, NameSource, NamegateError};

/// Public endpoint of the Behind the Name random name API.
pub const DEFAULT_ENDPOINT: &str = "https://www.behindthename.com/api/random.json";

/// HTTP client for the Behind the Name random name API.
pub struct BehindTheNameClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl BehindTheNameClient {
    /// Client for `endpoint` authenticating with `api_key`.
    ///
    /// Every request is abandoned after `timeout`.
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NamegateError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NamegateError::HttpClient)?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout,
        })
    }

    fn query(&self, request: &NameRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("key", self.api_key.clone()),
            ("number", request.number.to_string()),
            (
                "randomsurname",
                if request.random_surname { "yes" } else { "no" }.to_string(),
            ),
        ];

        if let Some(gender) = request.gender.api_param() {
            query.push(("gender", gender.to_string()));
        }

        if let Some(usage) = request.usage.as_deref().filter(|usage| !usage.is_empty()) {
            query.push(("usage", usage.to_string()));
        }

        query
    }

    fn transport_error(&self, error: reqwest::Error) -> ExternalError {
        if error.is_timeout() {
            ExternalError::Timeout(self.timeout)
        } else {
            // The URL carries the API key.
            ExternalError::Transport(error.without_url())
        }
    }
}

impl fmt::Debug for BehindTheNameClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehindTheNameClient")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl NameSource for BehindTheNameClient {
    async fn fetch(&self, request: &NameRequest) -> Result<NameResponse, ExternalError> {
        debug!(endpoint = %self.endpoint, ?request, "requesting names");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&self.query(request))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(ExternalError::Status {
                status: status.as_u16(),
                body,
            });
        }

        NameResponse::parse(body)
    }
}
