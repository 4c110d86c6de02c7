//! MyAnimeList API v2 client.

use super::types::*;
use crate::season::{Clock, Season, SystemClock};
use chrono::Datelike;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    ApiError, ApiResult, HttpConfig, MalConfig, MediaRecord, Paged, RankIndex, TitleIndex,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Header carrying the API client id
pub const CLIENT_ID_HEADER: &str = "x-mal-client-id";

/// Status and body of a successful response, kept for error reporting
struct RawResponse {
    status: u16,
    body: String,
}

impl RawResponse {
    fn decode<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            warn!(status = self.status, error = %e, "Failed to parse response");
            self.malformed()
        })
    }

    fn missing(&self, field: &str) -> ApiError {
        warn!(status = self.status, field = field, "Response is missing a required field");
        self.malformed()
    }

    fn malformed(&self) -> ApiError {
        ApiError::SerializationFailed {
            body: self.body.clone(),
            status: self.status,
        }
    }
}

/// MyAnimeList API v2 client
///
/// Settings are fixed at construction; the client can be shared across
/// tasks.
pub struct MalClient {
    /// HTTP client with the API headers installed
    client: Client,
    /// Base URL without trailing slash
    base_url: String,
    /// Fields for single-anime lookups
    default_fields: String,
    /// Fields for list calls
    list_fields: String,
    /// Date source for seasonal defaults
    clock: Arc<dyn Clock>,
}

impl MalClient {
    /// Create a new client
    ///
    /// # Errors
    /// - `InvalidArgument` if the client id is empty or not a valid header value
    /// - `Http` if the HTTP client cannot be built
    pub fn new(config: &MalConfig, http: &HttpConfig) -> ApiResult<Self> {
        let client_id = config.client_id.trim();
        if client_id.is_empty() {
            return Err(ApiError::InvalidArgument(
                "MAL client id cannot be empty".to_string(),
            ));
        }

        let mut client_id = HeaderValue::from_str(client_id).map_err(|_| {
            ApiError::InvalidArgument("MAL client id is not a valid header value".to_string())
        })?;
        client_id.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static(CLIENT_ID_HEADER), client_id);

        let client = Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .user_agent(http.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_fields: config.default_fields.clone(),
            list_fields: config.list_fields.clone(),
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock used for the default seasonal year and season
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Make a GET request and return the body of a successful response
    async fn fetch(&self, endpoint: &str, query: &[(&str, String)]) -> ApiResult<RawResponse> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(url = %url, "Making API request");

        let response = self.client.get(&url).query(query).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Request error");
            ApiError::Http(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(url = %url, status = %status, "Request failed");
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        debug!(url = %url, status = %status, "Request successful");
        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }

    fn list_query(&self, request: &PageRequest) -> Vec<(&'static str, String)> {
        vec![
            ("limit", request.limit.to_string()),
            ("offset", request.offset.to_string()),
            (
                "fields",
                request
                    .fields
                    .clone()
                    .unwrap_or_else(|| self.list_fields.clone()),
            ),
            ("nsfw", request.nsfw.to_string()),
        ]
    }

    /// Search anime by name, keyed by title
    ///
    /// # Errors
    /// - `InvalidArgument` if `name` is blank or `limit` is zero
    /// - `RequestFailed` for any non-success status
    /// - `SerializationFailed` if the body is not the expected list envelope
    pub async fn search(&self, name: &str, request: &PageRequest) -> ApiResult<Paged<TitleIndex>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidArgument(
                "Search name cannot be empty".to_string(),
            ));
        }
        request.validate()?;

        info!(name = name, limit = request.limit, offset = request.offset, "Searching anime");

        let mut query = vec![("q", name.to_string())];
        query.extend(self.list_query(request));

        let raw = self.fetch("anime", &query).await?;
        let response: ListResponse = raw.decode()?;
        response
            .into_title_page(request)
            .map_err(|field| raw.missing(field))
    }

    /// Fetch details for one anime
    ///
    /// Adult entries are always included: an exact id is never filtered.
    ///
    /// # Errors
    /// - `NotFound` if no anime has this id
    /// - `RequestFailed` for any other non-success status
    /// - `SerializationFailed` if the body is not a JSON object
    pub async fn get(&self, id: u64, fields: Option<&str>) -> ApiResult<MediaRecord> {
        debug!(id = id, "Fetching anime details");

        let endpoint = format!("anime/{}", id);
        let query = [
            ("fields", fields.unwrap_or(self.default_fields.as_str()).to_string()),
            ("nsfw", "true".to_string()),
        ];

        match self.fetch(&endpoint, &query).await {
            Ok(raw) => raw.decode(),
            Err(ApiError::RequestFailed { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16() =>
            {
                Err(ApiError::NotFound(endpoint))
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch a ranking list, keyed by upstream rank
    ///
    /// # Errors
    /// - `InvalidArgument` if `limit` is zero
    /// - `RequestFailed` for any non-success status, including unknown ranking types
    /// - `SerializationFailed` if an entry has no rank
    pub async fn ranking(
        &self,
        rank_type: impl Into<RankingType>,
        request: &PageRequest,
    ) -> ApiResult<Paged<RankIndex>> {
        let rank_type = rank_type.into();
        request.validate()?;

        info!(
            ranking_type = %rank_type,
            limit = request.limit,
            offset = request.offset,
            "Fetching anime ranking"
        );

        let mut query = vec![("ranking_type", rank_type.to_string())];
        query.extend(self.list_query(request));

        let raw = self.fetch("anime/ranking", &query).await?;
        let response: ListResponse = raw.decode()?;
        response
            .into_rank_page(request)
            .map_err(|field| raw.missing(field))
    }

    /// Fetch anime of one broadcast season, keyed by title
    ///
    /// Year and season default to the ones containing the clock's date.
    ///
    /// # Errors
    /// - `InvalidArgument` if `limit` is zero
    /// - `RequestFailed` for any non-success status
    /// - `SerializationFailed` if the body is not the expected list envelope
    pub async fn seasonal(
        &self,
        season_query: &SeasonalQuery,
        request: &PageRequest,
    ) -> ApiResult<Paged<TitleIndex>> {
        request.validate()?;

        let today = self.clock.today();
        let year = season_query.year.unwrap_or_else(|| today.year());
        let season = season_query
            .season
            .unwrap_or_else(|| Season::for_date(today));

        info!(
            year = year,
            season = %season,
            sort = season_query.sort.as_str(),
            limit = request.limit,
            offset = request.offset,
            "Fetching seasonal anime"
        );

        let endpoint = format!("anime/season/{}/{}", year, season);
        let mut query = vec![("sort", season_query.sort.as_str().to_string())];
        query.extend(self.list_query(request));

        let raw = self.fetch(&endpoint, &query).await?;
        let response: ListResponse = raw.decode()?;
        response
            .into_title_page(request)
            .map_err(|field| raw.missing(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(client_id: &str) -> MalConfig {
        MalConfig {
            client_id: client_id.to_string(),
            ..MalConfig::default()
        }
    }

    #[test]
    fn test_client_creation() {
        let client = MalClient::new(&config("abc123"), &HttpConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = MalClient::new(&config("abc123"), &HttpConfig::default()).unwrap();
        assert_eq!(client.base_url, "https://api.myanimelist.net/v2");
    }

    #[test]
    fn test_empty_client_id_rejected() {
        let result = MalClient::new(&config("  "), &HttpConfig::default());
        match result {
            Err(ApiError::InvalidArgument(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidArgument error"),
        }
    }

    #[test]
    fn test_invalid_client_id_rejected() {
        let result = MalClient::new(&config("abc\n123"), &HttpConfig::default());
        assert!(matches!(result, Err(ApiError::InvalidArgument(_))));
    }

    #[test]
    fn test_list_query_uses_default_fields() {
        let client = MalClient::new(&config("abc123"), &HttpConfig::default()).unwrap();
        let query = client.list_query(&PageRequest::default());
        assert!(query.contains(&("fields", MalConfig::default().list_fields)));
        assert!(query.contains(&("nsfw", "false".to_string())));
        assert!(query.contains(&("limit", "10".to_string())));
        assert!(query.contains(&("offset", "0".to_string())));
    }

    #[tokio::test]
    async fn test_search_empty_name() {
        let client = MalClient::new(&config("abc123"), &HttpConfig::default()).unwrap();
        let result = client.search("   ", &PageRequest::default()).await;
        match result {
            Err(ApiError::InvalidArgument(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidArgument error"),
        }
    }

    #[tokio::test]
    async fn test_ranking_zero_limit() {
        let client = MalClient::new(&config("abc123"), &HttpConfig::default()).unwrap();
        let result = client
            .ranking(RankingType::All, &PageRequest::new().with_limit(0))
            .await;
        assert!(matches!(result, Err(ApiError::InvalidArgument(_))));
    }
}
