pub mod catalog;
pub mod links;
pub mod recommend;
pub mod search;
pub mod stage;

pub use catalog::{Product, ProductCatalog, StaticCatalog};
pub use recommend::category_recommendations;
pub use stage::{enhance_article, enhance_dump, monetization, run};

pub mod prelude {
    pub use super::catalog::ProductCatalog;
    pub use fh_core::{AffiliateLink, AffiliateLinks, Article, Platform, Result};
}
