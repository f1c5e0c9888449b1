//! Model download URL lookup backed by a flat JSON cache file

use crate::error::{handle_error, Result, ScoutError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Filename to download URL cache, persisted after every write
#[derive(Debug)]
pub struct ModelUrlCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl ModelUrlCache {
    /// Open the cache at `path`; a missing or corrupt file yields an empty cache
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring corrupt model cache {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Cannot read model cache {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        debug!("Model cache {} holds {} entries", path.display(), entries.len());
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, filename: &str) -> Option<&str> {
        self.entries.get(filename).map(String::as_str)
    }

    /// Record a URL and rewrite the cache file
    pub fn put(&mut self, filename: impl Into<String>, url: impl Into<String>) -> Result<()> {
        self.entries.insert(filename.into(), url.into());
        self.save()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn save(&self) -> Result<()> {
        let cache_error = |message: String| ScoutError::Cache {
            path: self.path.clone(),
            message,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| cache_error(e.to_string()))?;
        }
        let json = serde_json::to_string(&self.entries).map_err(|e| cache_error(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| cache_error(e.to_string()))
    }
}

/// Finds a download URL for a model file the cache does not know
pub trait ModelLocator {
    fn locate(&mut self, filename: &str) -> Option<String>;
}

/// Cache-first model URL lookup with an optional locator fallback
pub struct ModelFinder {
    cache: ModelUrlCache,
    locator: Option<Box<dyn ModelLocator>>,
}

impl ModelFinder {
    pub fn new(cache: ModelUrlCache) -> Self {
        Self { cache, locator: None }
    }

    /// Consult `locator` on cache misses
    pub fn with_locator(mut self, locator: Box<dyn ModelLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn cache(&self) -> &ModelUrlCache {
        &self.cache
    }

    /// URL for `filename`, storing located URLs in the cache
    pub fn find(&mut self, filename: &str) -> Option<String> {
        if let Some(url) = self.cache.get(filename) {
            info!("Found cached URL for {}", filename);
            return Some(url.to_string());
        }

        let url = self.locator.as_mut()?.locate(filename)?;
        if let Err(err) = self.cache.put(filename, url.clone()) {
            handle_error(err);
        }
        Some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FixedLocator;

    impl ModelLocator for FixedLocator {
        fn locate(&mut self, filename: &str) -> Option<String> {
            (filename != "unknown.bin").then(|| format!("https://huggingface.co/x/{}", filename))
        }
    }

    #[test]
    fn test_put_persists_and_reopens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache/.model_cache.json");

        let mut cache = ModelUrlCache::open(&path);
        assert!(cache.is_empty());
        cache.put("a.safetensors", "https://example.com/a").unwrap();

        let reopened = ModelUrlCache::open(&path);
        assert_eq!(reopened.get("a.safetensors"), Some("https://example.com/a"));
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "not json").unwrap();

        assert!(ModelUrlCache::open(&path).is_empty());
    }

    #[test]
    fn test_finder_without_locator_only_uses_cache() {
        let dir = TempDir::new().unwrap();
        let mut cache = ModelUrlCache::open(dir.path().join("cache.json"));
        cache.put("a.pt", "https://example.com/a.pt").unwrap();

        let mut finder = ModelFinder::new(cache);
        assert_eq!(finder.find("a.pt").as_deref(), Some("https://example.com/a.pt"));
        assert_eq!(finder.find("b.pt"), None);
    }

    #[test]
    fn test_finder_writes_back_located_urls() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let mut finder = ModelFinder::new(ModelUrlCache::open(&path))
            .with_locator(Box::new(FixedLocator));

        assert_eq!(
            finder.find("b.pt").as_deref(),
            Some("https://huggingface.co/x/b.pt")
        );
        assert_eq!(finder.find("unknown.bin"), None);
        assert_eq!(
            ModelUrlCache::open(&path).get("b.pt"),
            Some("https://huggingface.co/x/b.pt")
        );
    }
}
