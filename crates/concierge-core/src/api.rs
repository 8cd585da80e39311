//! Backend API abstraction
//!
//! The concierge backend is an external service. `ConciergeApi` is the seam
//! the controller talks to; [`crate::http::HttpConciergeClient`] is the
//! production implementation.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::feedback::FeedbackSubmission;
use crate::license::LicenseReport;

/// Answer returned by the chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<String>,
}

/// Backend health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_store_loaded: Option<bool>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// Errors from backend calls
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network or protocol failure before a response arrived
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("Backend returned {status}{}", .detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    Status { status: u16, detail: Option<String> },

    /// Response body was not what the endpoint promises
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid backend URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Server-provided error detail, if the backend sent one
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Operations the client needs from the backend
#[async_trait]
pub trait ConciergeApi: Send + Sync {
    /// `GET /api/chat?q=`
    async fn ask(&self, question: &str) -> Result<ChatAnswer, ApiError>;

    /// `GET /api/license-status?email=`
    async fn license_status(&self, email: &str) -> Result<LicenseReport, ApiError>;

    /// `POST /api/feedback`
    async fn submit_feedback(&self, submission: &FeedbackSubmission) -> Result<(), ApiError>;

    /// `GET /beta.md`
    async fn fetch_splash(&self) -> Result<String, ApiError>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthReport, ApiError>;
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_sources_default_to_empty() {
        let answer: ChatAnswer = serde_json::from_str(r#"{"answer": "Yes."}"#).unwrap();
        assert!(answer.sources.is_empty());

        let answer: ChatAnswer =
            serde_json::from_str(r#"{"answer": "Yes.", "sources": null}"#).unwrap();
        assert!(answer.sources.is_empty());
    }

    #[test]
    fn test_status_error_message_includes_detail() {
        let err = ApiError::Status {
            status: 404,
            detail: Some("No account found".to_string()),
        };
        assert_eq!(err.to_string(), "Backend returned 404: No account found");
        assert_eq!(err.detail(), Some("No account found"));

        let err = ApiError::Status {
            status: 502,
            detail: None,
        };
        assert_eq!(err.to_string(), "Backend returned 502");
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn test_health_report() {
        let report: HealthReport =
            serde_json::from_str(r#"{"status": "healthy", "vector_store_loaded": true}"#).unwrap();
        assert!(report.is_healthy());
        assert_eq!(report.vector_store_loaded, Some(true));

        let report: HealthReport = serde_json::from_str(r#"{"status": "degraded"}"#).unwrap();
        assert!(!report.is_healthy());
    }
}
