//! AniList client for manga metadata.
//!
//! Runs a paged GraphQL search against AniList. A page that has successors
//! comes back as a [`Continuation`] which replays the same query for the
//! next page on demand.
//!
//! # Example
//!
//! ```no_run
//! use anilist_client::{AnilistClient, MangaSearch, DEFAULT_PAGE, DEFAULT_PER_PAGE};
//! use shared::Config;
//!
//! # async fn example() -> shared::ApiResult<()> {
//! let config = Config::default();
//! let client = AnilistClient::new(&config.anilist, &config.http)?;
//!
//! match client.manga("berserk", DEFAULT_PAGE, DEFAULT_PER_PAGE).await? {
//!     MangaSearch::Complete(media) => println!("{} results", media.len()),
//!     MangaSearch::Partial(continuation) => {
//!         let next = continuation.fetch_next().await?;
//!         println!("page 2 has {} results", next.media().len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod continuation;
pub mod query;

pub use client::{AnilistClient, DEFAULT_PAGE, DEFAULT_PER_PAGE};
pub use continuation::{Continuation, MangaSearch};
pub use query::{GraphqlRequest, PageVariables};
