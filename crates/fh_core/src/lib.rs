pub mod artifact;
pub mod category;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod slug;
pub mod timestamp;
pub mod types;

pub use category::Category;
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use report::{BatchReport, ItemOutcome};
pub use types::{
    AffiliateLink, AffiliateLinks, AffiliateDump, Article, Monetization, Platform,
    PrimaryPlatform, ProcessedDump, RawArticle, RawDump, RawFeed,
};

pub mod prelude {
    pub use super::logging::StageLogger;
    pub use super::{Article, Category, Error, PipelineConfig, Result};
}
