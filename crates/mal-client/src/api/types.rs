//! MyAnimeList API v2 request options and response envelopes.

use serde::{Deserialize, Serialize};
use shared::{ApiError, ApiResult, MediaRecord, Paged, PagingCursor, RankIndex, TitleIndex};
use tracing::warn;

use crate::season::Season;

/// Offset/limit window plus the field and content filters of a list call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Results per page (default: 10)
    pub limit: u32,
    /// Index of the first result (default: 0)
    pub offset: u32,
    /// Comma separated field list, `None` for the configured default
    pub fields: Option<String>,
    /// Include adult entries (default: false)
    pub nsfw: bool,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
            fields: None,
            nsfw: false,
        }
    }
}

impl PageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    #[must_use]
    pub fn with_nsfw(mut self, nsfw: bool) -> Self {
        self.nsfw = nsfw;
        self
    }

    /// Request for the page a cursor points to, keeping limit and filters
    pub fn at_offset(&self, offset: u32) -> Self {
        Self {
            offset,
            ..self.clone()
        }
    }

    pub(crate) fn validate(&self) -> ApiResult<()> {
        if self.limit == 0 {
            return Err(ApiError::InvalidArgument(
                "limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Ranking list to fetch
///
/// Unknown names are kept in `Other` and sent upstream untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum RankingType {
    #[default]
    All,
    Airing,
    Upcoming,
    Tv,
    Ova,
    Movie,
    Special,
    ByPopularity,
    Favorite,
    Other(String),
}

impl RankingType {
    pub fn as_str(&self) -> &str {
        match self {
            RankingType::All => "all",
            RankingType::Airing => "airing",
            RankingType::Upcoming => "upcoming",
            RankingType::Tv => "tv",
            RankingType::Ova => "ova",
            RankingType::Movie => "movie",
            RankingType::Special => "special",
            RankingType::ByPopularity => "bypopularity",
            RankingType::Favorite => "favorite",
            RankingType::Other(name) => name,
        }
    }
}

impl std::fmt::Display for RankingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RankingType {
    fn from(s: &str) -> Self {
        match s {
            "all" => RankingType::All,
            "airing" => RankingType::Airing,
            "upcoming" => RankingType::Upcoming,
            "tv" => RankingType::Tv,
            "ova" => RankingType::Ova,
            "movie" => RankingType::Movie,
            "special" => RankingType::Special,
            "bypopularity" => RankingType::ByPopularity,
            "favorite" => RankingType::Favorite,
            other => RankingType::Other(other.to_string()),
        }
    }
}

impl std::str::FromStr for RankingType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Sort order of a seasonal listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SeasonalSort {
    #[default]
    AnimeScore,
    AnimeNumListUsers,
}

impl SeasonalSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonalSort::AnimeScore => "anime_score",
            SeasonalSort::AnimeNumListUsers => "anime_num_list_users",
        }
    }
}

/// Which season to list; unset parts default from the client's clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeasonalQuery {
    pub year: Option<i32>,
    pub season: Option<Season>,
    pub sort: SeasonalSort,
}

impl SeasonalQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SeasonalSort) -> Self {
        self.sort = sort;
        self
    }
}

/// List envelope shared by search, ranking and seasonal responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub data: Vec<ListEntry>,
    #[serde(default)]
    pub paging: Paging,
}

/// One `data` element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEntry {
    pub node: MediaRecord,
    /// Present on ranking responses only
    #[serde(default)]
    pub ranking: Option<RankingInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingInfo {
    pub rank: u32,
    #[serde(default)]
    pub previous_rank: Option<u32>,
}

/// Upstream paging links; only their presence is used
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

impl ListResponse {
    fn cursor(&self, request: &PageRequest) -> PagingCursor {
        PagingCursor::from_offsets(request.offset, request.limit, self.paging.next.is_some())
    }

    /// Key results by `node.title`
    ///
    /// Returns the name of the missing field when a node has no title.
    /// A repeated title keeps the later node.
    pub fn into_title_page(self, request: &PageRequest) -> Result<Paged<TitleIndex>, &'static str> {
        let paging = self.cursor(request);
        let mut results = TitleIndex::new();
        for entry in self.data {
            let title = entry
                .node
                .get("title")
                .and_then(|t| t.as_str())
                .ok_or("node.title")?
                .to_string();
            if let Some(earlier) = results.insert(title.clone(), entry.node) {
                warn!(
                    title = %title,
                    dropped_id = ?earlier.get("id"),
                    "Duplicate title in response, keeping the later entry"
                );
            }
        }
        Ok(Paged::new(results, paging))
    }

    /// Key results by `ranking.rank`
    ///
    /// Ranks are taken as reported; gaps and ordering are not normalized.
    /// A repeated rank keeps the later node.
    pub fn into_rank_page(self, request: &PageRequest) -> Result<Paged<RankIndex>, &'static str> {
        let paging = self.cursor(request);
        let mut results = RankIndex::new();
        for entry in self.data {
            let rank = entry.ranking.ok_or("ranking.rank")?.rank;
            if let Some(earlier) = results.insert(rank, entry.node) {
                warn!(
                    rank = rank,
                    dropped_id = ?earlier.get("id"),
                    "Duplicate rank in response, keeping the later entry"
                );
            }
        }
        Ok(Paged::new(results, paging))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(value: serde_json::Value) -> ListResponse {
        serde_json::from_value(value).expect("Deserialization should succeed")
    }

    #[test]
    fn test_page_request_defaults() {
        let request = PageRequest::default();
        assert_eq!(request.limit, 10);
        assert_eq!(request.offset, 0);
        assert_eq!(request.fields, None);
        assert!(!request.nsfw);
    }

    #[test]
    fn test_page_request_zero_limit_rejected() {
        let request = PageRequest::new().with_limit(0);
        match request.validate() {
            Err(ApiError::InvalidArgument(msg)) => assert!(msg.contains("limit")),
            _ => panic!("Expected InvalidArgument error"),
        }
    }

    #[test]
    fn test_page_request_at_offset_keeps_filters() {
        let request = PageRequest::new().with_limit(25).with_fields("id").with_nsfw(true);
        let next = request.at_offset(25);
        assert_eq!(next.offset, 25);
        assert_eq!(next.limit, 25);
        assert_eq!(next.fields.as_deref(), Some("id"));
        assert!(next.nsfw);
    }

    #[test]
    fn test_ranking_type_parse() {
        assert_eq!(RankingType::from("bypopularity"), RankingType::ByPopularity);
        assert_eq!(RankingType::from("all"), RankingType::All);
        assert_eq!(
            RankingType::from("weekly"),
            RankingType::Other("weekly".to_string())
        );
        assert_eq!(RankingType::Other("weekly".to_string()).as_str(), "weekly");
        assert_eq!(RankingType::default().to_string(), "all");
    }

    #[test]
    fn test_seasonal_sort_names() {
        assert_eq!(SeasonalSort::default().as_str(), "anime_score");
        assert_eq!(SeasonalSort::AnimeNumListUsers.as_str(), "anime_num_list_users");
    }

    #[test]
    fn test_title_page() {
        let response = list(json!({
            "data": [
                {"node": {"id": 1, "title": "Cowboy Bebop"}},
                {"node": {"id": 5, "title": "Cowboy Bebop: Tengoku no Tobira"}}
            ],
            "paging": {"next": "https://api.myanimelist.net/v2/anime?offset=2&q=bebop&limit=2"}
        }));

        let page = response
            .into_title_page(&PageRequest::new().with_limit(2))
            .unwrap();

        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results["Cowboy Bebop"]["id"], 1);
        assert_eq!(page.paging, PagingCursor { previous: None, next: Some(2) });
    }

    #[test]
    fn test_title_named_paging_does_not_collide() {
        let response = list(json!({
            "data": [{"node": {"id": 9, "title": "paging"}}],
            "paging": {}
        }));

        let page = response.into_title_page(&PageRequest::default()).unwrap();
        assert_eq!(page.results["paging"]["id"], 9);
        assert_eq!(page.paging.next, None);
    }

    #[test]
    fn test_missing_paging_means_last_page() {
        let response = list(json!({"data": []}));
        let page = response
            .into_title_page(&PageRequest::new().with_offset(10))
            .unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.paging, PagingCursor { previous: Some(0), next: None });
    }

    #[test]
    fn test_title_page_missing_title() {
        let response = list(json!({"data": [{"node": {"id": 1}}]}));
        assert_eq!(
            response.into_title_page(&PageRequest::default()).unwrap_err(),
            "node.title"
        );
    }

    #[test]
    fn test_rank_page_keeps_reported_ranks() {
        let response = list(json!({
            "data": [
                {"node": {"id": 3, "title": "C"}, "ranking": {"rank": 7}},
                {"node": {"id": 1, "title": "A"}, "ranking": {"rank": 2}},
                {"node": {"id": 2, "title": "B"}, "ranking": {"rank": 4, "previous_rank": 5}}
            ],
            "paging": {"previous": "x", "next": "y"}
        }));

        let page = response
            .into_rank_page(&PageRequest::new().with_limit(3).with_offset(3))
            .unwrap();

        let ranks: Vec<u32> = page.results.keys().copied().collect();
        assert_eq!(ranks, vec![2, 4, 7]);
        assert_eq!(page.results[&7]["title"], "C");
        assert_eq!(page.paging, PagingCursor { previous: Some(0), next: Some(6) });
    }

    #[test]
    fn test_duplicate_rank_keeps_later_entry() {
        let response = list(json!({
            "data": [
                {"node": {"id": 1, "title": "A"}, "ranking": {"rank": 1}},
                {"node": {"id": 2, "title": "B"}, "ranking": {"rank": 1}}
            ]
        }));

        let page = response.into_rank_page(&PageRequest::default()).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[&1]["id"], 2);
    }

    #[test]
    fn test_duplicate_title_keeps_later_entry() {
        let response = list(json!({
            "data": [
                {"node": {"id": 10, "title": "Hunter x Hunter"}},
                {"node": {"id": 11061, "title": "Hunter x Hunter"}}
            ]
        }));

        let page = response.into_title_page(&PageRequest::default()).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results["Hunter x Hunter"]["id"], 11061);
    }

    #[test]
    fn test_rank_page_missing_ranking() {
        let response = list(json!({"data": [{"node": {"id": 1, "title": "A"}}]}));
        assert_eq!(
            response.into_rank_page(&PageRequest::default()).unwrap_err(),
            "ranking.rank"
        );
    }
}
