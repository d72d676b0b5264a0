/// Per-domain cookie cache persisted as a single JSON document, so
/// authenticated sessions survive across runs.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cookie::parse_cookie_header;
use crate::error::SnapError;
use crate::types::CookieRecord;

/// Which tier of the lookup produced a domain's cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieSource {
    Cache,
    Environment,
    None,
}

pub struct CookieStore {
    // domain -> records, shared by all pipelines
    entries: DashMap<String, Vec<CookieRecord>>,
    path: PathBuf,
    enabled: bool,
    // serializes whole-document writes so concurrent write-backs
    // cannot drop each other's domains
    write_lock: Mutex<()>,
}

impl CookieStore {
    /// Load the cache document if it exists. A present-but-unreadable
    /// document is a hard error, not a silent reset.
    pub fn load(path: impl Into<PathBuf>, enabled: bool) -> Result<Self, SnapError> {
        let path = path.into();
        let entries = DashMap::new();

        if enabled && path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let parsed: BTreeMap<String, Vec<CookieRecord>> = serde_json::from_str(&raw)
                .map_err(|e| {
                    SnapError::CookieCache(format!("unreadable cache {}: {}", path.display(), e))
                })?;
            for (domain, records) in parsed {
                entries.insert(domain, records);
            }
            debug!(path = %path.display(), domains = entries.len(), "cookie cache loaded");
        }

        Ok(Self {
            entries,
            path,
            enabled,
            write_lock: Mutex::new(()),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn domains(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    pub fn get(&self, domain: &str) -> Option<Vec<CookieRecord>> {
        self.entries.get(domain).map(|e| e.value().clone())
    }

    /// Resolve the cookies to apply before navigating to `domain`: the cached
    /// entry wins, else the environment-supplied raw string is parsed, else
    /// the visit proceeds unauthenticated.
    pub fn resolve(
        &self,
        domain: &str,
        env_map: &HashMap<String, String>,
    ) -> (Vec<CookieRecord>, CookieSource) {
        if self.enabled {
            if let Some(entry) = self.entries.get(domain) {
                return (entry.value().clone(), CookieSource::Cache);
            }
        }
        if let Some(raw) = env_map.get(domain) {
            return (parse_cookie_header(raw, domain), CookieSource::Environment);
        }
        (Vec::new(), CookieSource::None)
    }

    /// Overwrite `domain`'s entry with the live session's cookies and persist
    /// the whole document. No merge: the previous entry for the domain is
    /// replaced in full.
    pub async fn record(
        &self,
        domain: &str,
        cookies: Vec<CookieRecord>,
    ) -> Result<(), SnapError> {
        if !self.enabled {
            return Ok(());
        }

        self.entries.insert(domain.to_string(), cookies);

        let _guard = self.write_lock.lock().await;
        let snapshot: BTreeMap<String, Vec<CookieRecord>> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        let doc = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| SnapError::CookieCache(e.to_string()))?;
        tokio::fs::write(&self.path, doc).await?;
        debug!(domain = %domain, "cookie cache persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(domain: &str, pairs: &[(&str, &str)]) -> Vec<CookieRecord> {
        pairs
            .iter()
            .map(|(n, v)| CookieRecord::new(*n, *v, domain))
            .collect()
    }

    #[test]
    fn test_cache_entry_wins_over_env_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        let cached = BTreeMap::from([("a.example".to_string(), records("a.example", &[("sid", "cached")]))]);
        std::fs::write(&path, serde_json::to_string(&cached).unwrap()).unwrap();

        let store = CookieStore::load(&path, true).unwrap();
        let env_map = HashMap::from([("a.example".to_string(), "sid=env".to_string())]);

        let (resolved, source) = store.resolve("a.example", &env_map);
        assert_eq!(source, CookieSource::Cache);
        assert_eq!(resolved, records("a.example", &[("sid", "cached")]));
    }

    #[test]
    fn test_env_map_used_when_domain_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let store = CookieStore::load(dir.path().join("cookies.json"), true).unwrap();
        let env_map = HashMap::from([("a.example".to_string(), "sid=1;theme=dark".to_string())]);

        let (resolved, source) = store.resolve("a.example", &env_map);
        assert_eq!(source, CookieSource::Environment);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].name, "sid");
        assert_eq!(resolved[1].value, "dark");
    }

    #[test]
    fn test_unknown_domain_resolves_empty_without_failing() {
        let dir = tempfile::tempdir().unwrap();
        let store = CookieStore::load(dir.path().join("cookies.json"), true).unwrap();

        let (resolved, source) = store.resolve("missing.example", &HashMap::new());
        assert_eq!(source, CookieSource::None);
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_disabled_store_skips_cache_tier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        let cached = BTreeMap::from([("a.example".to_string(), records("a.example", &[("sid", "cached")]))]);
        std::fs::write(&path, serde_json::to_string(&cached).unwrap()).unwrap();

        let store = CookieStore::load(&path, false).unwrap();
        let env_map = HashMap::from([("a.example".to_string(), "sid=env".to_string())]);

        let (resolved, source) = store.resolve("a.example", &env_map);
        assert_eq!(source, CookieSource::Environment);
        assert_eq!(resolved[0].value, "env");
    }

    #[test]
    fn test_corrupt_cache_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            CookieStore::load(&path, true),
            Err(SnapError::CookieCache(_))
        ));
    }

    #[tokio::test]
    async fn test_record_overwrites_domain_in_full() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        let store = CookieStore::load(&path, true).unwrap();

        store
            .record("a.example", records("a.example", &[("sid", "1"), ("theme", "dark")]))
            .await
            .unwrap();
        store
            .record("a.example", records("a.example", &[("sid", "2")]))
            .await
            .unwrap();

        // in-memory view
        assert_eq!(store.get("a.example"), Some(records("a.example", &[("sid", "2")])));

        // persisted view
        let reloaded = CookieStore::load(&path, true).unwrap();
        assert_eq!(
            reloaded.get("a.example"),
            Some(records("a.example", &[("sid", "2")]))
        );
    }

    #[tokio::test]
    async fn test_record_keeps_other_domains() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        let store = CookieStore::load(&path, true).unwrap();

        store
            .record("a.example", records("a.example", &[("sid", "a")]))
            .await
            .unwrap();
        store
            .record("b.example", records("b.example", &[("sid", "b")]))
            .await
            .unwrap();

        let reloaded = CookieStore::load(&path, true).unwrap();
        assert!(reloaded.get("a.example").is_some());
        assert!(reloaded.get("b.example").is_some());
    }

    #[tokio::test]
    async fn test_disabled_store_never_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        let store = CookieStore::load(&path, false).unwrap();

        store
            .record("a.example", records("a.example", &[("sid", "1")]))
            .await
            .unwrap();
        assert!(!path.exists());
    }
}
