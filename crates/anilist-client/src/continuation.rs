//! Paged search results and the handle for fetching the pages after them.

use crate::client::Endpoint;
use crate::query::GraphqlRequest;
use shared::{ApiResult, MediaRecord};
use tracing::debug;

/// Outcome of one search page
#[derive(Debug, Clone)]
pub enum MangaSearch {
    /// Upstream reported no further page
    Complete(Vec<MediaRecord>),
    /// More pages exist; the continuation can fetch the next one
    Partial(Continuation),
}

impl MangaSearch {
    /// Media on this page
    pub fn media(&self) -> &[MediaRecord] {
        match self {
            MangaSearch::Complete(media) => media,
            MangaSearch::Partial(continuation) => continuation.media(),
        }
    }

    pub fn into_media(self) -> Vec<MediaRecord> {
        match self {
            MangaSearch::Complete(media) => media,
            MangaSearch::Partial(continuation) => continuation.into_media(),
        }
    }

    pub fn has_next(&self) -> bool {
        matches!(self, MangaSearch::Partial(_))
    }

    pub fn continuation(&self) -> Option<&Continuation> {
        match self {
            MangaSearch::Complete(_) => None,
            MangaSearch::Partial(continuation) => Some(continuation),
        }
    }
}

/// A non-terminal page plus everything needed to request the next one
///
/// Holds the request that produced this page and the endpoint it was sent
/// to. Nothing is mutated: each fetch returns a fresh [`MangaSearch`].
#[derive(Debug, Clone)]
pub struct Continuation {
    media: Vec<MediaRecord>,
    request: GraphqlRequest,
    endpoint: Endpoint,
}

impl Continuation {
    pub(crate) fn new(media: Vec<MediaRecord>, request: GraphqlRequest, endpoint: Endpoint) -> Self {
        Self {
            media,
            request,
            endpoint,
        }
    }

    /// Page number this continuation holds
    pub fn page(&self) -> u32 {
        self.request.variables.page
    }

    pub fn media(&self) -> &[MediaRecord] {
        &self.media
    }

    pub fn into_media(self) -> Vec<MediaRecord> {
        self.media
    }

    /// Request that produced this page
    pub fn request(&self) -> &GraphqlRequest {
        &self.request
    }

    /// Endpoint the next request will be sent to
    pub fn url(&self) -> &str {
        self.endpoint.url()
    }

    /// Request for the following page: same document, term and page size
    pub fn next_request(&self) -> GraphqlRequest {
        self.request.for_page(self.page().saturating_add(1))
    }

    /// Fetch the following page
    pub async fn fetch_next(&self) -> ApiResult<MangaSearch> {
        self.endpoint.search(self.next_request()).await
    }

    /// Fetch every remaining page in order and return all media, this page
    /// included
    ///
    /// Stops at the first terminal page, or at a page that comes back empty.
    pub async fn fetch_all(self) -> ApiResult<Vec<MediaRecord>> {
        let Continuation {
            mut media,
            request,
            endpoint,
        } = self;
        let mut next = request.for_page(request.variables.page.saturating_add(1));

        loop {
            match endpoint.search(next).await? {
                MangaSearch::Complete(rest) => {
                    media.extend(rest);
                    break;
                }
                MangaSearch::Partial(continuation) => {
                    if continuation.media.is_empty() {
                        debug!(page = continuation.page(), "Empty page, stopping");
                        break;
                    }
                    next = continuation.next_request();
                    media.extend(continuation.media);
                }
            }
        }

        Ok(media)
    }
}
