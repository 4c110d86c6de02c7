//! MyAnimeList client for anime metadata.
//!
//! Wraps the MyAnimeList v2 REST API: every call performs one request and
//! reshapes the list payload into results keyed by title or rank, with the
//! paging cursor carried alongside.
//!
//! # Example
//!
//! ```no_run
//! use mal_client::{MalClient, PageRequest};
//! use shared::Config;
//!
//! # async fn example() -> shared::ApiResult<()> {
//! let config = Config::default().apply_env();
//! let client = MalClient::new(&config.mal, &config.http)?;
//!
//! let page = client.search("bebop", &PageRequest::new().with_limit(5)).await?;
//! for title in page.results.keys() {
//!     println!("{}", title);
//! }
//! if let Some(next) = page.paging.next {
//!     let more = client
//!         .search("bebop", &PageRequest::new().with_limit(5).with_offset(next))
//!         .await?;
//!     println!("{} more", more.results.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod season;

pub use api::{
    ListEntry, ListResponse, MalClient, PageRequest, Paging, RankingInfo, RankingType,
    SeasonalQuery, SeasonalSort,
};
pub use season::{Clock, FixedClock, Season, SystemClock};
