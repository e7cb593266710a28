use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use super::QueueError;
use crate::features::reports::dtos::{CreateReportDto, ReportResponseDto};
use crate::shared::types::ApiResponse;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Remote side of the queue: delivers one report to the server
#[async_trait]
pub trait ReportSubmitter: Send + Sync {
    async fn submit(&self, report: &CreateReportDto) -> Result<ReportResponseDto, QueueError>;
}

/// Submits reports to `POST {base_url}/api/reports`
pub struct HttpReportSubmitter {
    client: reqwest::Client,
    endpoint: String,
    bearer_token: Option<String>,
}

impl HttpReportSubmitter {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            endpoint: format!("{}/api/reports", base_url.trim_end_matches('/')),
            bearer_token: None,
        }
    }

    /// Attribute submitted reports to the session behind `token`
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn auth_headers(&self) -> Result<HeaderMap, QueueError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| QueueError::Network(format!("invalid auth header: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl ReportSubmitter for HttpReportSubmitter {
    async fn submit(&self, report: &CreateReportDto) -> Result<ReportResponseDto, QueueError> {
        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.auth_headers()?)
            .json(report)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&body)
                .ok()
                .and_then(|r| match (r.message, r.errors) {
                    (Some(message), Some(errors)) if !errors.is_empty() => {
                        Some(format!("{}: {}", message, errors.join("; ")))
                    }
                    (message, _) => message,
                })
                .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());

            return Err(QueueError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice::<ApiResponse<ReportResponseDto>>(&body)?
            .data
            .ok_or_else(|| QueueError::Serialization("response carried no report".to_string()))
    }
}
