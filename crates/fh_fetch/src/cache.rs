use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use fh_core::slug::hex_digest;
use fh_core::{Error, Result};

/// A cached feed body together with how old it is.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedBody {
    pub bytes: Vec<u8>,
    pub age: Duration,
}

/// One file per feed URL, named by the SHA-256 of the URL. Freshness is
/// judged from the file's modification time.
#[derive(Debug, Clone)]
pub struct FeedCache {
    dir: PathBuf,
    ttl: Duration,
}

impl FeedCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn key(url: &str) -> String {
        hex_digest(url)
    }

    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.xml", Self::key(url)))
    }

    /// The cached body regardless of age, if any.
    pub fn read_any(&self, url: &str, now: SystemTime) -> Result<Option<CachedBody>> {
        let path = self.path_for(url);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let modified = fs::metadata(&path)?.modified()?;
        // A clock that runs behind the file's mtime counts as age zero.
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        Ok(Some(CachedBody { bytes, age }))
    }

    /// The cached body only while it is younger than the TTL.
    pub fn read_fresh(&self, url: &str, now: SystemTime) -> Result<Option<CachedBody>> {
        Ok(self
            .read_any(url, now)?
            .filter(|cached| cached.age < self.ttl))
    }

    pub fn store(&self, url: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Cache(format!("cannot create {}: {}", self.dir.display(), e))
        })?;
        let path = self.path_for(url);
        fs::write(&path, bytes)
            .map_err(|e| Error::Cache(format!("cannot write {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/feed.xml";

    #[test]
    fn test_key_is_stable_per_url() {
        assert_eq!(FeedCache::key(URL), FeedCache::key(URL));
        assert_ne!(FeedCache::key(URL), FeedCache::key("https://example.com/other.xml"));
    }

    #[test]
    fn test_missing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FeedCache::new(dir.path(), Duration::from_secs(60));
        assert!(cache.read_any(URL, SystemTime::now()).unwrap().is_none());
        assert!(cache.read_fresh(URL, SystemTime::now()).unwrap().is_none());
    }

    #[test]
    fn test_freshness_window() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FeedCache::new(dir.path().join("cache"), Duration::from_secs(45 * 60));
        cache.store(URL, b"<rss/>").unwrap();

        let ten_minutes_later = SystemTime::now() + Duration::from_secs(10 * 60);
        let fresh = cache.read_fresh(URL, ten_minutes_later).unwrap().unwrap();
        assert_eq!(fresh.bytes, b"<rss/>");

        let an_hour_later = SystemTime::now() + Duration::from_secs(60 * 60);
        assert!(cache.read_fresh(URL, an_hour_later).unwrap().is_none());
        let stale = cache.read_any(URL, an_hour_later).unwrap().unwrap();
        assert_eq!(stale.bytes, b"<rss/>");
        assert!(stale.age >= Duration::from_secs(59 * 60));
    }
}
