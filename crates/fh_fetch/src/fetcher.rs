use std::time::SystemTime;

use fh_core::artifact::write_artifact;
use fh_core::logging::StageLogger;
use fh_core::timestamp::now_rfc3339;
use fh_core::{BatchReport, ItemOutcome, PipelineConfig, RawDump, RawFeed, Result};

use crate::cache::FeedCache;
use crate::parse::{parse_feed, ParsedFeed};
use crate::source::{FeedSource, HttpFeedSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyOrigin {
    Network,
    FreshCache,
    /// The fetch failed and an expired cache file stood in.
    StaleCache,
}

/// A body that parsed as a feed, with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedBody {
    pub bytes: Vec<u8>,
    pub origin: BodyOrigin,
    pub feed: ParsedFeed,
}

type Clock = Box<dyn Fn() -> SystemTime + Send + Sync>;

/// Fetches feeds one after another through a [`FeedSource`], consulting the
/// per-URL cache first and falling back to it when the network fails.
pub struct FeedFetcher<S: FeedSource> {
    source: S,
    cache: FeedCache,
    max_articles: usize,
    clock: Clock,
    logger: StageLogger,
}

impl<S: FeedSource> FeedFetcher<S> {
    pub fn new(source: S, cache: FeedCache, max_articles: usize) -> Self {
        Self {
            source,
            cache,
            max_articles,
            clock: Box::new(SystemTime::now),
            logger: StageLogger::for_stage("fetch"),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> SystemTime + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &FeedCache {
        &self.cache
    }

    fn parse(&self, bytes: &[u8], url: &str) -> Result<ParsedFeed> {
        parse_feed(bytes, url, &now_rfc3339(), self.max_articles)
    }

    fn cached(&self, url: &str, bytes: Vec<u8>, origin: BodyOrigin) -> Result<FetchedBody> {
        let feed = self.parse(&bytes, url)?;
        Ok(FetchedBody { bytes, origin, feed })
    }

    /// Resolves one feed according to the cache policy. Only bodies that
    /// parse are served or written to the cache, so a bad response never
    /// replaces the last good copy.
    pub async fn fetch_body(&self, url: &str) -> Result<FetchedBody> {
        let now = (self.clock)();
        match self.cache.read_fresh(url, now) {
            Ok(Some(fresh)) => {
                let age = fresh.age.as_secs();
                match self.cached(url, fresh.bytes, BodyOrigin::FreshCache) {
                    Ok(body) => {
                        self.logger.debug(&format!("cache hit for {} ({}s old)", url, age));
                        return Ok(body);
                    }
                    Err(e) => self.logger.warn(&format!("ignoring unreadable cache for {}: {}", url, e)),
                }
            }
            Ok(None) => {}
            Err(e) => self.logger.warn(&format!("cannot read cache for {}: {}", url, e)),
        }

        self.logger.info(&format!("Fetching RSS from: {} via {}", url, self.source.name()));
        let fetched = match self.source.fetch(url).await {
            Ok(bytes) => self.parse(&bytes, url).map(|feed| (bytes, feed)),
            Err(e) => Err(e),
        };
        let error = match fetched {
            Ok((bytes, feed)) => {
                if let Err(e) = self.cache.store(url, &bytes) {
                    self.logger.warn(&format!("could not cache {}: {}", url, e));
                }
                return Ok(FetchedBody {
                    bytes,
                    origin: BodyOrigin::Network,
                    feed,
                });
            }
            Err(e) => e,
        };

        let stale = match self.cache.read_any(url, now) {
            Ok(stale) => stale,
            Err(e) => {
                self.logger.warn(&format!("cannot read cache for {}: {}", url, e));
                None
            }
        };
        let Some(stale) = stale else {
            return Err(error);
        };
        let age = stale.age.as_secs();
        match self.cached(url, stale.bytes, BodyOrigin::StaleCache) {
            Ok(body) => {
                self.logger.warn(&format!(
                    "fetch failed for {} ({}); serving {}s old cache",
                    url, error, age
                ));
                Ok(body)
            }
            Err(e) => {
                self.logger.warn(&format!("stale cache for {} is unusable: {}", url, e));
                Err(error)
            }
        }
    }

    pub async fn fetch_feed(&self, url: &str) -> Result<RawFeed> {
        let body = self.fetch_body(url).await?;
        let parsed = body.feed;

        let feed_title = parsed.title.unwrap_or_else(|| "Unknown".to_string());
        self.logger.info(&format!(
            "Fetched {} articles from {}",
            parsed.entries.len(),
            feed_title
        ));
        Ok(RawFeed {
            feed_url: url.to_string(),
            feed_title,
            feed_description: parsed.description,
            total_articles: parsed.entries.len(),
            articles: parsed.entries,
            from_cache: body.origin == BodyOrigin::FreshCache,
            from_cache_fallback: body.origin == BodyOrigin::StaleCache,
        })
    }

    /// Fetches every feed in order. A failing feed is logged and left out;
    /// it never stops the batch.
    pub async fn fetch_all(&self, urls: &[String]) -> (RawDump, BatchReport) {
        let mut report = BatchReport::new("fetch");
        let mut feeds = Vec::new();

        for url in urls {
            let outcome = match self.fetch_feed(url).await {
                Ok(feed) => ItemOutcome::Processed(feed),
                Err(e) => {
                    self.logger.error(&format!("Failed to fetch feed {}: {}", url, e));
                    ItemOutcome::skipped(url.clone(), e)
                }
            };
            if let Some(feed) = report.record(outcome) {
                feeds.push(feed);
            }
        }

        let total_articles = feeds.iter().map(|f| f.total_articles).sum();
        let dump = RawDump {
            fetch_timestamp: now_rfc3339(),
            total_feeds: feeds.len(),
            total_articles,
            feeds,
        };
        (dump, report)
    }
}

/// Stage entry point: fetch all configured feeds and write the raw dump.
pub async fn run(config: &PipelineConfig) -> Result<BatchReport> {
    let logger = StageLogger::for_stage("fetch");
    logger.info("=== RSS Feed Fetcher ===");

    let source = HttpFeedSource::new(config.fetch_timeout())?;
    let cache = FeedCache::new(config.cache_dir(), config.cache_ttl());
    let fetcher = FeedFetcher::new(source, cache, config.max_articles_per_feed);

    let (dump, report) = fetcher.fetch_all(&config.feeds).await;
    let path = config.raw_feed_path();
    write_artifact(&path, &dump)?;

    logger.info(&format!("Total feeds processed: {}", dump.total_feeds));
    logger.info(&format!("Total articles fetched: {}", dump.total_articles));
    logger.info(&format!("Data saved to: {}", path.display()));
    if config.debug {
        if let Some(sample) = dump.feeds.first().and_then(|f| f.articles.first()) {
            logger.debug(&format!("Sample article: {} ({}) {}", sample.title, sample.source_name, sample.link));
        }
    }
    report.log_summary(&logger);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::tests::SAMPLE_RSS;
    use async_trait::async_trait;
    use fh_core::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const URL: &str = "https://news.example.com/rss";

    struct MockSource {
        body: Option<Vec<u8>>,
        calls: AtomicUsize,
    }

    impl MockSource {
        fn serving(body: &str) -> Self {
            Self {
                body: Some(body.as_bytes().to_vec()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                body: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FeedSource for MockSource {
        fn name(&self) -> &str {
            "mock"
        }

        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.body
                .clone()
                .ok_or_else(|| Error::Feed(format!("connection refused: {}", url)))
        }
    }

    fn fetcher(source: MockSource, dir: &std::path::Path) -> FeedFetcher<MockSource> {
        FeedFetcher::new(source, FeedCache::new(dir, Duration::from_secs(45 * 60)), 5)
    }

    #[tokio::test]
    async fn test_second_fetch_within_window_uses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let first = fetcher(MockSource::serving(SAMPLE_RSS), dir.path());
        let fetched = first.fetch_body(URL).await.unwrap();
        assert_eq!(fetched.origin, BodyOrigin::Network);
        assert_eq!(first.source().calls(), 1);

        let later = fetcher(MockSource::serving("<rss>changed</rss>"), dir.path())
            .with_clock(|| SystemTime::now() + Duration::from_secs(10 * 60));
        let cached = later.fetch_body(URL).await.unwrap();
        assert_eq!(cached.origin, BodyOrigin::FreshCache);
        assert_eq!(cached.bytes, fetched.bytes);
        assert_eq!(later.source().calls(), 0);
    }

    #[tokio::test]
    async fn test_expired_cache_refetches() {
        let dir = tempfile::tempdir().unwrap();
        fetcher(MockSource::serving(SAMPLE_RSS), dir.path())
            .fetch_body(URL)
            .await
            .unwrap();

        let later = fetcher(MockSource::serving(SAMPLE_RSS), dir.path())
            .with_clock(|| SystemTime::now() + Duration::from_secs(50 * 60));
        let body = later.fetch_body(URL).await.unwrap();
        assert_eq!(body.origin, BodyOrigin::Network);
        assert_eq!(later.source().calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_falls_back_to_stale_cache() {
        let dir = tempfile::tempdir().unwrap();
        fetcher(MockSource::serving(SAMPLE_RSS), dir.path())
            .fetch_body(URL)
            .await
            .unwrap();

        let offline = fetcher(MockSource::failing(), dir.path())
            .with_clock(|| SystemTime::now() + Duration::from_secs(24 * 3600));
        let feed = offline.fetch_feed(URL).await.unwrap();
        assert!(feed.from_cache_fallback);
        assert!(!feed.from_cache);
        assert_eq!(feed.feed_title, "Sample Tech News");
        assert_eq!(offline.source().calls(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_response_keeps_last_good_cache() {
        let dir = tempfile::tempdir().unwrap();
        fetcher(MockSource::serving(SAMPLE_RSS), dir.path())
            .fetch_body(URL)
            .await
            .unwrap();

        let maintenance = fetcher(MockSource::serving("<html>maintenance</html>"), dir.path())
            .with_clock(|| SystemTime::now() + Duration::from_secs(50 * 60));
        let feed = maintenance.fetch_feed(URL).await.unwrap();
        assert!(feed.from_cache_fallback);
        assert_eq!(feed.feed_title, "Sample Tech News");
        assert_eq!(maintenance.source().calls(), 1);

        let cached = std::fs::read(maintenance.cache().path_for(URL)).unwrap();
        assert_eq!(cached, SAMPLE_RSS.as_bytes());
    }

    #[tokio::test]
    async fn test_unparseable_response_without_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let maintenance = fetcher(MockSource::serving("<html>maintenance</html>"), dir.path());
        assert!(matches!(maintenance.fetch_feed(URL).await, Err(Error::Feed(_))));
        assert!(!maintenance.cache().path_for(URL).exists());
    }

    #[tokio::test]
    async fn test_unreadable_cache_falls_through_to_network() {
        let dir = tempfile::tempdir().unwrap();
        let online = fetcher(MockSource::serving(SAMPLE_RSS), dir.path());
        // A directory where the cache file should be cannot be read as a file.
        std::fs::create_dir_all(online.cache().path_for(URL)).unwrap();

        let body = online.fetch_body(URL).await.unwrap();
        assert_eq!(body.origin, BodyOrigin::Network);
        assert_eq!(online.source().calls(), 1);
        assert_eq!(body.feed.entries.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_fetch_without_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let offline = fetcher(MockSource::failing(), dir.path());
        assert!(offline.fetch_feed(URL).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_all_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = fetcher(MockSource::serving(SAMPLE_RSS), dir.path());
        good.fetch_body(URL).await.unwrap();

        // Only URL has a cache entry; the second feed has nothing to fall back on.
        let offline = fetcher(MockSource::failing(), dir.path());
        let urls = vec![URL.to_string(), "https://down.example.com/rss".to_string()];
        let (dump, report) = offline.fetch_all(&urls).await;

        assert_eq!(dump.total_feeds, 1);
        assert_eq!(dump.total_articles, 3);
        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.skipped[0].id, "https://down.example.com/rss");
    }

    #[tokio::test]
    async fn test_max_articles_per_feed() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = FeedFetcher::new(
            MockSource::serving(SAMPLE_RSS),
            FeedCache::new(dir.path(), Duration::from_secs(60)),
            2,
        );
        let feed = fetcher.fetch_feed(URL).await.unwrap();
        assert_eq!(feed.total_articles, 2);
        assert_eq!(feed.articles.len(), 2);
    }
}
