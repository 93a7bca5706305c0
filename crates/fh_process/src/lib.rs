pub mod categorize;
pub mod clean;
pub mod keywords;
pub mod matcher;
pub mod stage;
pub mod summary;

pub use categorize::categorize;
pub use clean::clean_html;
pub use keywords::extract_keywords;
pub use stage::{process_article, process_dump, run};
pub use summary::{create_summary, sentence_summary, truncate_summary};
