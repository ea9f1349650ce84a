//! Summary service client implementation

use crate::error::SummarizerError;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Request body for the summarization endpoint
///
/// Both fields are free text authored by the dashboard user; the service
/// does not interpret them beyond producing the summary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SummarizeRequest {
    /// Current project details (status, counts, milestones)
    pub project_details: String,
    /// Recent changes worth highlighting
    pub recent_changes: String,
}

impl SummarizeRequest {
    /// Creates a request from the two free-text fields
    pub fn new(project_details: impl Into<String>, recent_changes: impl Into<String>) -> Self {
        Self {
            project_details: project_details.into(),
            recent_changes: recent_changes.into(),
        }
    }
}

/// Response body from the summarization endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    /// The generated summary text
    pub summary: String,
}

/// Summary service client
#[derive(Clone)]
pub struct SummarizerClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl SummarizerClient {
    /// Create a new client with API key from environment
    ///
    /// Reads `DEBRISFLOW_SUMMARIZER_API_KEY` (required) and
    /// `DEBRISFLOW_SUMMARIZER_URL` (optional).
    ///
    /// # Errors
    ///
    /// Returns [`SummarizerError::MissingApiKey`] if the key is not set
    pub fn from_env() -> Result<Self, SummarizerError> {
        let api_key = std::env::var("DEBRISFLOW_SUMMARIZER_API_KEY")
            .map_err(|_| SummarizerError::MissingApiKey)?;

        let mut client = Self::new(api_key);
        if let Ok(url) = std::env::var("DEBRISFLOW_SUMMARIZER_URL") {
            client.api_url = url;
        }
        Ok(client)
    }

    /// Create a new client with explicit API key
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url: "https://api.debrisflow.example/v1".to_string(),
        }
    }

    /// Override the service base URL (used against test servers)
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Request a summary for one project
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, service errors, or parsing
    /// failures
    pub async fn summarize(
        &self,
        request: SummarizeRequest,
    ) -> Result<SummarizeResponse, SummarizerError> {
        let response = self
            .client
            .post(format!("{}/summarize", self.api_url))
            .header("x-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizerError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<SummarizeResponse>()
                .await
                .map_err(|e| SummarizerError::ResponseParseFailed(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(SummarizerError::RateLimited),
            StatusCode::UNAUTHORIZED => Err(SummarizerError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(SummarizerError::ServiceError {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SummarizerClient::new("test-key".to_string());
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.api_url, "https://api.debrisflow.example/v1");
    }

    #[test]
    fn test_api_url_override() {
        let client =
            SummarizerClient::new("test-key".to_string()).with_api_url("http://localhost:9999");
        assert_eq!(client.api_url, "http://localhost:9999");
    }

    #[test]
    fn test_request_serialization() {
        let request = SummarizeRequest::new("details", "changes");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["project_details"], "details");
        assert_eq!(json["recent_changes"], "changes");
    }
}
