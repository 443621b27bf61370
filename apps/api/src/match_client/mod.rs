/// Match client: the single point of entry for calls to the external matching service.
///
/// One request per submission: no retries, and no timeout unless one is configured.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::opportunity::MatchResponse;
use crate::models::profile::EsgProfile;

pub const MATCH_OPPORTUNITIES_PATH: &str = "/api/v1/match_opportunities";

#[derive(Debug, Error)]
pub enum MatchClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Anything that can rank carbon-credit opportunities for a profile.
///
/// Carried in `AppState` as `Arc<dyn OpportunityMatcher>`.
#[async_trait]
pub trait OpportunityMatcher: Send + Sync {
    async fn match_opportunities(
        &self,
        profile: &EsgProfile,
    ) -> Result<MatchResponse, MatchClientError>;
}

/// Error body shape used by the matching service (`{"detail": ...}`).
#[derive(Debug, Deserialize)]
struct ServiceError {
    detail: serde_json::Value,
}

/// Talks to the matching service over HTTP.
#[derive(Clone)]
pub struct HttpMatcher {
    client: Client,
    endpoint: String,
}

impl HttpMatcher {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, MatchClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                MATCH_OPPORTUNITIES_PATH
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl OpportunityMatcher for HttpMatcher {
    async fn match_opportunities(
        &self,
        profile: &EsgProfile,
    ) -> Result<MatchResponse, MatchClientError> {
        debug!(
            "Requesting matches for '{}' from {}",
            profile.company_name, self.endpoint
        );

        let response = self.client.post(&self.endpoint).json(profile).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ServiceError>(&body)
                .map(|e| match e.detail {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .unwrap_or(body);
            return Err(MatchClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MatchResponse = serde_json::from_str(&body)?;

        debug!("Matching service returned {} matches", parsed.matches.len());

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn profile() -> EsgProfile {
        EsgProfile {
            company_name: "Acme".to_string(),
            industry: "Energy".to_string(),
            description: String::new(),
            annual_emissions: 1000.0,
            carbon_reduction_goal: 25.0,
            preferred_project_types: vec!["Solar".to_string()],
            preferred_locations: vec![],
            sdgs: vec![7],
            environmental_focus: String::new(),
            social_focus: String::new(),
            technology_interests: vec![],
        }
    }

    fn response_body() -> serde_json::Value {
        json!({
            "matches": [{
                "opportunity": {
                    "id": 1,
                    "name": "Solar Kenya",
                    "project_type": "Solar",
                    "location": "Kenya",
                    "description": "Community solar",
                    "detailed_explanation": "",
                    "sdgs": [7, 13],
                    "environmental_impact": "Displaces diesel",
                    "social_impact": "Jobs",
                    "annual_co2_reduction": 5000.0,
                    "total_co2_reduction": 50000.0,
                    "project_duration": 10,
                    "co_benefits": ["Energy access"],
                    "technology_used": "PV"
                },
                "match_explanation": "a. Industry and Focus Area Alignment: Good.",
                "short_summary": "Good fit",
                "match_score": 0.91
            }],
            "summary": {
                "average_score": 0.91,
                "median_score": 0.91,
                "best_score": 0.91,
                "average_co2_reduction": 5000.0,
                "total_co2_reduction": 5000.0,
                "number_of_matches": 1
            }
        })
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let matcher = HttpMatcher::new("http://matcher.local:8000/", None).unwrap();
        assert_eq!(
            matcher.endpoint(),
            "http://matcher.local:8000/api/v1/match_opportunities"
        );
    }

    #[tokio::test]
    async fn test_posts_profile_and_decodes_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MATCH_OPPORTUNITIES_PATH))
            .and(body_partial_json(json!({ "company_name": "Acme", "sdgs": [7] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body()))
            .expect(1)
            .mount(&server)
            .await;

        let matcher = HttpMatcher::new(&server.uri(), None).unwrap();
        let response = matcher.match_opportunities(&profile()).await.unwrap();

        assert_eq!(response.matches.len(), 1);
        assert_eq!(response.matches[0].opportunity.name, "Solar Kenya");
        assert_eq!(response.summary.unwrap().number_of_matches, 1);
    }

    #[tokio::test]
    async fn test_error_status_extracts_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MATCH_OPPORTUNITIES_PATH))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({ "detail": "industry missing" })),
            )
            .mount(&server)
            .await;

        let matcher = HttpMatcher::new(&server.uri(), None).unwrap();
        match matcher.match_opportunities(&profile()).await {
            Err(MatchClientError::Api { status, message }) => {
                assert_eq!(status, 422);
                assert_eq!(message, "industry missing");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MATCH_OPPORTUNITIES_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let matcher = HttpMatcher::new(&server.uri(), None).unwrap();
        match matcher.match_opportunities(&profile()).await {
            Err(MatchClientError::Api { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MATCH_OPPORTUNITIES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let matcher = HttpMatcher::new(&server.uri(), None).unwrap();
        let result = matcher.match_opportunities(&profile()).await;
        assert!(matches!(result, Err(MatchClientError::Parse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_http_error() {
        // Reserve a free port, then close it so the connection is refused.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let base_url = format!("http://127.0.0.1:{port}");
        let matcher = HttpMatcher::new(&base_url, Some(Duration::from_secs(2))).unwrap();
        let result = matcher.match_opportunities(&profile()).await;
        assert!(matches!(result, Err(MatchClientError::Http(_))));
    }
}
