//! Single-entry, time-limited cache for the course/topic list.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ServiceResult;
use crate::models::CourseTopicMap;
use crate::service::ContentService;

/// File name of the cache entry inside the cache directory.
pub const CACHE_FILE_NAME: &str = "course_topic_map.json";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry {
    saved_at: DateTime<Utc>,
    course_topic_map: CourseTopicMap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedTaxonomy {
    pub map: CourseTopicMap,
    pub saved_at: DateTime<Utc>,
}

impl CachedTaxonomy {
    pub fn age_at(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.saved_at)
    }

    /// Fresh while `0 <= age <= ttl`. An entry from the future is stale.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match self.age_at(now).to_std() {
            Ok(age) => age <= ttl,
            Err(_) => false,
        }
    }
}

pub struct TaxonomyCache {
    path: PathBuf,
}

impl TaxonomyCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored entry, or `None` when nothing usable is on disk.
    pub fn get(&self) -> Option<CachedTaxonomy> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %e, "cannot read taxonomy cache");
                }
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry>(&contents) {
            Ok(entry) => Some(CachedTaxonomy {
                map: entry.course_topic_map,
                saved_at: entry.saved_at,
            }),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt taxonomy cache");
                None
            }
        }
    }

    /// Replaces the entry, stamped with the current time.
    pub fn put(&self, map: &CourseTopicMap) -> io::Result<()> {
        self.put_at(map, Utc::now())
    }

    pub fn put_at(&self, map: &CourseTopicMap, saved_at: DateTime<Utc>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entry = CacheEntry {
            saved_at,
            course_topic_map: map.clone(),
        };
        let json = serde_json::to_string_pretty(&entry).map_err(io::Error::other)?;
        fs::write(&self.path, json)
    }
}

/// Returns the course/topic list, from the cache while it is fresh and from
/// the service otherwise. A failed cache write does not fail the load.
pub async fn load_taxonomy(
    service: &dyn ContentService,
    cache: &TaxonomyCache,
    ttl: Duration,
    now: DateTime<Utc>,
) -> ServiceResult<CourseTopicMap> {
    if let Some(cached) = cache.get() {
        if cached.is_fresh_at(now, ttl) {
            tracing::debug!(saved_at = %cached.saved_at, "using cached course list");
            return Ok(cached.map);
        }
        tracing::debug!(saved_at = %cached.saved_at, "course list cache expired");
    }

    let map = service.courses_and_topics().await?;
    if let Err(e) = cache.put_at(&map, now) {
        tracing::warn!(path = %cache.path().display(), error = %e, "failed to write taxonomy cache");
    }
    tracing::info!(courses = map.courses().len(), "course list loaded");
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{FakeService, temp_path};

    fn sample_map() -> CourseTopicMap {
        CourseTopicMap::from([("Elementary", &["Fractions", "Decimals"][..])])
    }

    #[test]
    fn test_put_then_get() {
        let cache = TaxonomyCache::new(temp_path("cache"));
        let now = Utc::now();
        cache.put_at(&sample_map(), now).unwrap();

        let cached = cache.get().unwrap();
        assert_eq!(cached.map, sample_map());
        assert_eq!(cached.saved_at, now);
        let _ = fs::remove_file(cache.path());
    }

    #[test]
    fn test_put_stamps_current_time() {
        let cache = TaxonomyCache::new(temp_path("stamped"));
        let before = Utc::now();
        cache.put(&sample_map()).unwrap();

        let cached = cache.get().unwrap();
        assert!(cached.saved_at >= before);
        assert!(cached.is_fresh_at(Utc::now(), Duration::from_secs(60)));
        let _ = fs::remove_file(cache.path());
    }

    #[test]
    fn test_missing_and_corrupt_are_misses() {
        let cache = TaxonomyCache::new(temp_path("missing"));
        assert!(cache.get().is_none());

        let path = temp_path("corrupt");
        fs::write(&path, "{\"savedAt\": 12, ").unwrap();
        let cache = TaxonomyCache::new(&path);
        assert!(cache.get().is_none());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_freshness_boundary() {
        let saved_at = Utc::now();
        let cached = CachedTaxonomy {
            map: sample_map(),
            saved_at,
        };
        let ttl = Duration::from_secs(3600);

        assert!(cached.is_fresh_at(saved_at + chrono::Duration::seconds(3599), ttl));
        assert!(!cached.is_fresh_at(saved_at + chrono::Duration::seconds(3601), ttl));
        assert!(!cached.is_fresh_at(saved_at - chrono::Duration::seconds(10), ttl));
    }

    #[tokio::test]
    async fn test_load_uses_cache_until_ttl_expires() {
        let service = FakeService::new().with_taxonomy(sample_map());
        let cache = TaxonomyCache::new(temp_path("ttl"));
        let ttl = Duration::from_secs(3600);
        let t = Utc::now();
        cache.put_at(&sample_map(), t).unwrap();

        let map = load_taxonomy(&service, &cache, ttl, t + chrono::Duration::seconds(3599))
            .await
            .unwrap();
        assert_eq!(map, sample_map());
        assert_eq!(service.call_count("getCoursesAndTopics"), 0);

        load_taxonomy(&service, &cache, ttl, t + chrono::Duration::seconds(3601))
            .await
            .unwrap();
        assert_eq!(service.call_count("getCoursesAndTopics"), 1);
        let _ = fs::remove_file(cache.path());
    }

    #[tokio::test]
    async fn test_corrupt_cache_falls_back_to_service() {
        let path = temp_path("corrupt-load");
        fs::write(&path, "not json").unwrap();
        let cache = TaxonomyCache::new(&path);
        let service = FakeService::new().with_taxonomy(sample_map());

        let map = load_taxonomy(&service, &cache, Duration::from_secs(3600), Utc::now())
            .await
            .unwrap();
        assert_eq!(map, sample_map());
        assert_eq!(service.call_count("getCoursesAndTopics"), 1);
        assert!(cache.get().is_some());
        let _ = fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_service_failure_without_cache() {
        let cache = TaxonomyCache::new(temp_path("down"));
        let service = FakeService::new();
        let result = load_taxonomy(&service, &cache, Duration::from_secs(3600), Utc::now()).await;
        assert!(result.is_err());
    }
}
