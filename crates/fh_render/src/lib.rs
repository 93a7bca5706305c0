pub mod api;
pub mod display;
pub mod html;
pub mod paginate;
pub mod score;
pub mod sitemap;
pub mod sort;
pub mod stage;

pub use display::{enhance_for_display, DisplayArticle};
pub use score::{article_instant, importance_score, quality_score};
pub use sort::sort_articles;
pub use stage::{render_site, run, run_sitemap, write_sitemaps};

pub mod prelude {
    pub use super::display::DisplayArticle;
    pub use fh_core::config::{RenderMode, SortPolicy};
    pub use fh_core::{Article, PipelineConfig, Result};
}
