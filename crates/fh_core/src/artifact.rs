use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{Error, Result};

/// Reads a stage artifact. A missing file means the previous stage never ran.
pub fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Writes a stage artifact as pretty JSON. The file is replaced whole via a
/// sibling temp file so readers never see a partial snapshot.
pub fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_text(path, &json)
}

pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawDump;

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rss_raw.json");
        let result: Result<RawDump> = read_artifact(&path);
        assert!(matches!(result, Err(Error::MissingInput(p)) if p == path));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rss_raw.json");
        let dump = RawDump {
            fetch_timestamp: "2024-01-03T10:00:00Z".to_string(),
            total_feeds: 0,
            total_articles: 0,
            feeds: vec![],
        };
        write_artifact(&path, &dump).unwrap();
        let back: RawDump = read_artifact(&path).unwrap();
        assert_eq!(back, dump);
        assert!(!dir.path().join("nested").join("rss_raw.json.tmp").exists());
    }

    #[test]
    fn test_malformed_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        let result: Result<RawDump> = read_artifact(&path);
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
