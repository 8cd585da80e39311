//! reqwest implementation of [`ConciergeApi`]

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::{ApiError, ChatAnswer, ConciergeApi, HealthReport};
use crate::feedback::FeedbackSubmission;
use crate::license::LicenseReport;

/// HTTP client for the concierge backend
#[derive(Debug, Clone)]
pub struct HttpConciergeClient {
    client: Client,
    base_url: String,
}

/// FastAPI-style error body. `detail` is usually a string but validation
/// errors send a list.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

impl HttpConciergeClient {
    /// Create a client for `base_url`. `timeout` of `None` never times out.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(builder.build()?, base_url)
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let body = Self::check_status(response).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .map(|detail| match detail {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });

        warn!("Backend returned {} (detail: {:?})", status, detail);
        Err(ApiError::Status {
            status: status.as_u16(),
            detail,
        })
    }
}

#[async_trait]
impl ConciergeApi for HttpConciergeClient {
    async fn ask(&self, question: &str) -> Result<ChatAnswer, ApiError> {
        let url = self.url(&format!("/api/chat?q={}", urlencoding::encode(question)));
        self.get_json(&url).await
    }

    async fn license_status(&self, email: &str) -> Result<LicenseReport, ApiError> {
        let url = self.url(&format!(
            "/api/license-status?email={}",
            urlencoding::encode(email)
        ));
        self.get_json(&url).await
    }

    async fn submit_feedback(&self, submission: &FeedbackSubmission) -> Result<(), ApiError> {
        let url = self.url("/api/feedback");
        debug!("POST {}", url);
        let response = self.client.post(&url).json(submission).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn fetch_splash(&self) -> Result<String, ApiError> {
        let url = self.url("/beta.md");
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        Ok(Self::check_status(response).await?.text().await?)
    }

    async fn health(&self) -> Result<HealthReport, ApiError> {
        self.get_json(&self.url("/health")).await
    }
}
