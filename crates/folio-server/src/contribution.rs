//! Contribution graph endpoint.
//!
//! `GET /api/contribution?name=<user>&year=<year>` proxies the public
//! contributions API. In development mode the bundled fixture is returned
//! instead and the network is never touched.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use reqwest::Url;
use serde::Deserialize;

/// Default upstream API base; the user name is appended as a path segment.
pub const CONTRIBUTIONS_API: &str = "https://github-contributions-api.jogruber.de/v4";

/// Route the handler is mounted at.
pub const CONTRIBUTION_ROUTE: &str = "/api/contribution";

/// Sample payload served in development mode.
const FIXTURE: &str = include_str!("../fixtures/contributions.json");

const JSON_CONTENT_TYPE: &str = "application/json";

/// Whether the server runs for local development or production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Local development: fixtures instead of network calls
    #[default]
    Development,
    /// Production: real upstream requests
    Production,
}

/// Query parameters of the contribution endpoint.
///
/// Both are optional; missing values are forwarded as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContributionQuery {
    /// User name
    pub name: Option<String>,
    /// Year
    pub year: Option<String>,
}

impl ContributionQuery {
    /// Build a query from a name and year.
    pub fn new(name: impl Into<String>, year: impl ToString) -> Self {
        Self {
            name: Some(name.into()),
            year: Some(year.to_string()),
        }
    }
}

/// Configuration for [`ContributionService`].
#[derive(Debug, Clone)]
pub struct ContributionConfig {
    /// Development or production behavior
    pub mode: ExecutionMode,

    /// Upstream API base URL
    pub api_base: String,

    /// Fixture file replacing the bundled one in development mode
    pub fixture: Option<PathBuf>,
}

impl Default for ContributionConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Development,
            api_base: CONTRIBUTIONS_API.to_string(),
            fixture: None,
        }
    }
}

/// Errors surfaced by the contribution endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ContributionError {
    #[error("Invalid upstream URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream returned {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Failed to read fixture {path}: {source}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContributionError {
    /// HTTP status reported to the caller.
    ///
    /// Upstream statuses pass through; anything else on the way out is a
    /// bad gateway.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Request(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidUrl { .. } | Self::Fixture { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ContributionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "statusCode": status.as_u16(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// A payload returned verbatim to the caller.
#[derive(Debug, Clone)]
pub struct ContributionResponse {
    /// Content type of the payload
    pub content_type: String,
    /// Raw body
    pub body: Bytes,
}

impl IntoResponse for ContributionResponse {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Resolves contribution queries against the fixture or the upstream API.
#[derive(Debug, Clone)]
pub struct ContributionService {
    mode: ExecutionMode,
    api_base: Url,
    fixture: Bytes,
    client: reqwest::Client,
}

impl ContributionService {
    /// Create a service, validating the API base and loading the fixture.
    pub fn new(config: ContributionConfig) -> Result<Self, ContributionError> {
        let api_base = Url::parse(&config.api_base).map_err(|e| ContributionError::InvalidUrl {
            url: config.api_base.clone(),
            message: e.to_string(),
        })?;

        if api_base.cannot_be_a_base() {
            return Err(ContributionError::InvalidUrl {
                url: config.api_base,
                message: "not a base URL".to_string(),
            });
        }

        let fixture = match &config.fixture {
            Some(path) => {
                let data = std::fs::read(path).map_err(|source| ContributionError::Fixture {
                    path: path.clone(),
                    source,
                })?;
                tracing::debug!("Loaded contribution fixture from {}", path.display());
                Bytes::from(data)
            }
            None => Bytes::from_static(FIXTURE.as_bytes()),
        };

        let client = reqwest::Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            mode: config.mode,
            api_base,
            fixture,
            client,
        })
    }

    /// Upstream URL for `query`: `<api_base>/<name>?y=<year>`.
    pub fn upstream_url(&self, query: &ContributionQuery) -> Url {
        let mut url = self.api_base.clone();

        // Checked in `new`: the base can carry path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(query.name.as_deref().unwrap_or_default());
        }

        url.query_pairs_mut()
            .append_pair("y", query.year.as_deref().unwrap_or_default());

        url
    }

    /// Resolve `query`.
    pub async fn fetch(
        &self,
        query: &ContributionQuery,
    ) -> Result<ContributionResponse, ContributionError> {
        if self.mode == ExecutionMode::Development {
            tracing::debug!("Serving contribution fixture for {:?}", query);
            return Ok(ContributionResponse {
                content_type: JSON_CONTENT_TYPE.to_string(),
                body: self.fixture.clone(),
            });
        }

        let url = self.upstream_url(query);
        tracing::debug!("Fetching contributions from {}", url);

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContributionError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(JSON_CONTENT_TYPE)
            .to_string();

        let body = response.bytes().await?;

        Ok(ContributionResponse { content_type, body })
    }
}

/// Handler for `GET /api/contribution`.
pub async fn contribution_handler(
    State(service): State<Arc<ContributionService>>,
    Query(query): Query<ContributionQuery>,
) -> Result<ContributionResponse, ContributionError> {
    service.fetch(&query).await.inspect_err(|e| {
        tracing::warn!("Contribution request failed: {}", e);
    })
}

/// Router exposing the contribution endpoint, mergeable into any app router.
pub fn api_router<S>(service: Arc<ContributionService>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(CONTRIBUTION_ROUTE, get(contribution_handler))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn service(mode: ExecutionMode, api_base: &str) -> ContributionService {
        ContributionService::new(ContributionConfig {
            mode,
            api_base: api_base.to_string(),
            fixture: None,
        })
        .unwrap()
    }

    #[test]
    fn builds_upstream_url() {
        let service = service(ExecutionMode::Production, CONTRIBUTIONS_API);
        let url = service.upstream_url(&ContributionQuery::new("octocat", 2022));

        assert_eq!(
            url.as_str(),
            "https://github-contributions-api.jogruber.de/v4/octocat?y=2022"
        );
    }

    #[test]
    fn trailing_slash_in_base_is_ignored() {
        let service = service(ExecutionMode::Production, "http://localhost:9000/v4/");
        let url = service.upstream_url(&ContributionQuery::new("octocat", "2021"));

        assert_eq!(url.as_str(), "http://localhost:9000/v4/octocat?y=2021");
    }

    #[test]
    fn missing_parameters_become_empty() {
        let service = service(ExecutionMode::Production, CONTRIBUTIONS_API);

        let query = ContributionQuery {
            name: Some("octocat".to_string()),
            year: None,
        };
        assert_eq!(
            service.upstream_url(&query).as_str(),
            "https://github-contributions-api.jogruber.de/v4/octocat?y="
        );

        let url = service.upstream_url(&ContributionQuery::default());
        assert_eq!(
            url.as_str(),
            "https://github-contributions-api.jogruber.de/v4/?y="
        );
    }

    #[test]
    fn rejects_invalid_api_base() {
        let result = ContributionService::new(ContributionConfig {
            api_base: "not a url".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(ContributionError::InvalidUrl { .. })));

        let result = ContributionService::new(ContributionConfig {
            api_base: "mailto:someone@example.com".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(ContributionError::InvalidUrl { .. })));
    }

    #[test]
    fn missing_fixture_file_is_an_error() {
        let result = ContributionService::new(ContributionConfig {
            fixture: Some(PathBuf::from("/nonexistent/contributions.json")),
            ..Default::default()
        });
        assert!(matches!(result, Err(ContributionError::Fixture { .. })));
    }

    #[tokio::test]
    async fn development_returns_fixture_for_any_query() {
        let service = service(ExecutionMode::Development, CONTRIBUTIONS_API);

        let a = service
            .fetch(&ContributionQuery::new("octocat", 2022))
            .await
            .unwrap();
        let b = service.fetch(&ContributionQuery::default()).await.unwrap();

        assert_eq!(a.body, b.body);
        assert_eq!(a.content_type, "application/json");

        let data: serde_json::Value = serde_json::from_slice(&a.body).unwrap();
        assert!(data["total"]["2022"].is_u64());
        assert_eq!(data["contributions"].as_array().unwrap().len(), 365);
    }

    #[tokio::test]
    async fn development_serves_configured_fixture() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("contributions.json");
        let payload = r#"{"total":{"2021":3},"contributions":[{"date":"2021-01-01","count":3,"level":1}]}"#;
        std::fs::write(&path, payload).unwrap();

        let service = ContributionService::new(ContributionConfig {
            mode: ExecutionMode::Development,
            api_base: CONTRIBUTIONS_API.to_string(),
            fixture: Some(path),
        })
        .unwrap();

        let response = service
            .fetch(&ContributionQuery::new("octocat", 2022))
            .await
            .unwrap();

        assert_eq!(response.content_type, "application/json");
        assert_eq!(response.body.as_ref(), payload.as_bytes());
    }

    #[tokio::test]
    async fn development_never_calls_upstream() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).body("{}");
            })
            .await;

        let service = service(ExecutionMode::Development, &server.url("/v4"));
        service
            .fetch(&ContributionQuery::new("octocat", 2022))
            .await
            .unwrap();

        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn production_passes_body_through() {
        let server = MockServer::start_async().await;
        let body = r#"{"total":{"2022":3},"contributions":[{"date":"2022-01-01","count":3,"level":1}]}"#;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v4/octocat")
                    .query_param("y", "2022");
                then.status(200)
                    .header("content-type", "application/json; charset=utf-8")
                    .body(body);
            })
            .await;

        let service = service(ExecutionMode::Production, &server.url("/v4"));
        let response = service
            .fetch(&ContributionQuery::new("octocat", 2022))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.body.as_ref(), body.as_bytes());
        assert_eq!(response.content_type, "application/json; charset=utf-8");
    }

    #[tokio::test]
    async fn production_surfaces_upstream_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v4/ghost");
                then.status(404).body("not found");
            })
            .await;

        let service = service(ExecutionMode::Production, &server.url("/v4"));
        let err = service
            .fetch(&ContributionQuery::new("ghost", 2022))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ContributionError::UpstreamStatus { status: 404, .. }
        ));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn production_surfaces_transport_failure() {
        // Nothing listens on port 9 (discard) on test hosts.
        let service = service(ExecutionMode::Production, "http://127.0.0.1:9/v4");
        let err = service
            .fetch(&ContributionQuery::new("octocat", 2022))
            .await
            .unwrap_err();

        assert!(matches!(err, ContributionError::Request(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
