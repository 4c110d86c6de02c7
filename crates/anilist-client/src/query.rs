//! GraphQL documents and the request/response shapes around them.

use serde::{Deserialize, Serialize};
use shared::MediaRecord;

/// Paged manga search by title
pub const MANGA_SEARCH: &str = r#"
query ($query: String, $page: Int, $perPage: Int) {
  Page (page: $page, perPage: $perPage) {
    pageInfo {
      currentPage
      hasNextPage
    }
    media (search: $query, type: MANGA) {
      id
      idMal
      title {
        romaji
        english
      }
      coverImage {
        extraLarge
        large
        medium
        color
      }
      status
      description
      startDate {
        year
        month
        day
      }
      endDate {
        year
        month
        day
      }
      averageScore
      popularity
      chapters
      volumes
      genres
      hashtag
      isAdult
      synonyms
      siteUrl
    }
  }
}
"#;

/// Variables of a paged search document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageVariables {
    /// Search term
    pub query: String,
    /// 1-based page number
    pub page: u32,
    #[serde(rename = "perPage")]
    pub per_page: u32,
}

/// Body POSTed to the GraphQL endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: PageVariables,
}

impl GraphqlRequest {
    pub fn manga_search(term: impl Into<String>, page: u32, per_page: u32) -> Self {
        Self {
            query: MANGA_SEARCH.to_string(),
            variables: PageVariables {
                query: term.into(),
                page,
                per_page,
            },
        }
    }

    /// Same document and variables, pointed at another page
    pub fn for_page(&self, page: u32) -> Self {
        let mut request = self.clone();
        request.variables.page = page;
        request
    }
}

/// `{data: {Page: ...}}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PageEnvelope {
    pub data: PageData,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PageData {
    #[serde(rename = "Page")]
    pub page: MediaPage,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MediaPage {
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
    pub media: Vec<MediaRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PageInfo {
    #[serde(rename = "currentPage", default)]
    pub current_page: Option<u32>,
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
}
