pub mod cache;
pub mod fetcher;
pub mod parse;
pub mod source;

pub use cache::FeedCache;
pub use fetcher::{run, BodyOrigin, FeedFetcher, FetchedBody};
pub use source::{FeedSource, HttpFeedSource};

pub mod prelude {
    pub use super::source::FeedSource;
    pub use fh_core::{Error, RawFeed, Result};
}
