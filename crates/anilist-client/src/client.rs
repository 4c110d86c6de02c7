//! AniList GraphQL client.

use crate::continuation::{Continuation, MangaSearch};
use crate::query::{GraphqlRequest, PageEnvelope};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use shared::{AnilistConfig, ApiError, ApiResult, HttpConfig};
use std::time::Duration;
use tracing::{debug, info, warn};

/// First page of a search
pub const DEFAULT_PAGE: u32 = 1;

/// Results per page when the caller has no preference
pub const DEFAULT_PER_PAGE: u32 = 3;

/// Where and how GraphQL requests are sent
///
/// Cloned into every continuation so later pages go out exactly like the
/// first one.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    http: Client,
    url: String,
    headers: HeaderMap,
}

impl Endpoint {
    pub(crate) fn url(&self) -> &str {
        &self.url
    }

    /// POST a paged search and triage the response
    ///
    /// Order matters: an unparseable body is a `SerializationFailed` even on
    /// error statuses, and an `errors` key wins over the status code.
    pub(crate) async fn search(&self, request: GraphqlRequest) -> ApiResult<MangaSearch> {
        debug!(
            url = %self.url,
            page = request.variables.page,
            per_page = request.variables.per_page,
            "Sending GraphQL request"
        );

        let response = self
            .http
            .post(&self.url)
            .headers(self.headers.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %self.url, error = %e, "Request error");
                ApiError::Http(e)
            })?;

        let status = response.status();
        let body = response.text().await?;
        let code = status.as_u16();

        let value: serde_json::Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(e) => {
                warn!(status = code, error = %e, "Failed to parse GraphQL response");
                return Err(ApiError::SerializationFailed { body, status: code });
            }
        };

        if value.get("errors").is_some() {
            warn!(status = code, "GraphQL query rejected");
            return Err(ApiError::ServerError { body, status: code });
        }

        if !status.is_success() {
            warn!(status = code, "Request failed");
            return Err(ApiError::RequestFailed { status: code, body });
        }

        let envelope: PageEnvelope = match serde_json::from_value(value) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(status = code, error = %e, "Unexpected GraphQL response shape");
                return Err(ApiError::SerializationFailed { body, status: code });
            }
        };

        let page = envelope.data.page;
        debug!(
            page = request.variables.page,
            current_page = ?page.page_info.current_page,
            results = page.media.len(),
            has_next_page = page.page_info.has_next_page,
            "GraphQL request successful"
        );

        if page.page_info.has_next_page {
            Ok(MangaSearch::Partial(Continuation::new(
                page.media,
                request,
                self.clone(),
            )))
        } else {
            Ok(MangaSearch::Complete(page.media))
        }
    }
}

/// AniList GraphQL API client
pub struct AnilistClient {
    endpoint: Endpoint,
}

impl AnilistClient {
    /// Create a new client
    ///
    /// # Errors
    /// - `Http` if the HTTP client cannot be built
    pub fn new(config: &AnilistConfig, http: &HttpConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(http.user_agent.as_str())
            .build()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Self {
            endpoint: Endpoint {
                http: client,
                url: config.api_url.clone(),
                headers,
            },
        })
    }

    /// GraphQL endpoint requests are sent to
    pub fn api_url(&self) -> &str {
        self.endpoint.url()
    }

    /// Search manga by title
    ///
    /// Returns the media of a terminal page directly, or a [`Continuation`]
    /// that can fetch the following page when upstream reports one.
    ///
    /// # Errors
    /// - `InvalidArgument` if `term` is blank or `page`/`per_page` is zero
    /// - `SerializationFailed` if the body is not JSON or not a page envelope
    /// - `ServerError` if the response carries an `errors` array
    /// - `RequestFailed` for a non-success status without `errors`
    pub async fn manga(&self, term: &str, page: u32, per_page: u32) -> ApiResult<MangaSearch> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ApiError::InvalidArgument(
                "Search term cannot be empty".to_string(),
            ));
        }
        if page == 0 || per_page == 0 {
            return Err(ApiError::InvalidArgument(
                "page and per_page must be greater than zero".to_string(),
            ));
        }

        info!(term = term, page = page, per_page = per_page, "Searching manga");

        self.endpoint
            .search(GraphqlRequest::manga_search(term, page, per_page))
            .await
    }
}
