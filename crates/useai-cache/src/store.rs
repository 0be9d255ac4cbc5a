//! File-backed generation cache

use crate::entry::CacheEntry;
use crate::error::CacheError;
use crate::key::CacheKey;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use useai_directive::Metadata;

/// Default cache file, relative to the working directory
pub const DEFAULT_CACHE_FILE: &str = ".ai-cache.json";

/// Persistent mapping from `{signature, metadata}` digests to generated code
///
/// Shared across concurrent generation tasks behind an `Arc`. Writers to the
/// same key race with last-writer-wins; both hold an equivalent result.
#[derive(Debug)]
pub struct GenerationCache {
    /// Cache file location
    path: PathBuf,
    /// Digest string -> entry, sorted so the file is stable
    entries: RwLock<BTreeMap<String, CacheEntry>>,
    /// Serializes snapshot + write so an older snapshot never lands last
    persist: Mutex<()>,
}

impl GenerationCache {
    /// Open the cache stored at `path`
    ///
    /// Relative paths resolve against the working directory. A missing or
    /// unreadable file yields an empty cache.
    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = resolve(path.as_ref());
        let entries = load(&path);
        debug!(path = %path.display(), entries = entries.len(), "opened generation cache");
        Self {
            path,
            entries: RwLock::new(entries),
            persist: Mutex::new(()),
        }
    }

    /// Cache file location
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Key for a `{signature, metadata}` pair
    #[inline]
    #[must_use]
    pub fn key(signature: &str, metadata: &Metadata) -> CacheKey {
        CacheKey::for_pair(signature, metadata)
    }

    /// Look up previously generated code
    ///
    /// Pure lookup. An entry with empty code counts as absent.
    #[must_use]
    pub fn get(&self, signature: &str, metadata: &Metadata) -> Option<String> {
        let key = Self::key(signature, metadata).to_string();
        self.entries
            .read()
            .get(&key)
            .filter(|e| !e.generated_code.is_empty())
            .map(|e| e.generated_code.clone())
    }

    /// Full entry for a pair
    #[must_use]
    pub fn entry(&self, signature: &str, metadata: &Metadata) -> Option<CacheEntry> {
        let key = Self::key(signature, metadata).to_string();
        self.entries.read().get(&key).cloned()
    }

    /// Store generated code and persist the whole cache
    ///
    /// A failed write is logged and swallowed: the value stays available for
    /// the rest of this process.
    pub fn set(&self, signature: &str, metadata: &Metadata, code: &str) -> CacheKey {
        let key = Self::key(signature, metadata);
        let entry = CacheEntry::new(signature, metadata.clone(), code);
        self.entries.write().insert(key.to_string(), entry);
        debug!(key = %key.short(), "cached generated body");
        self.persist_quietly();
        key
    }

    /// Remove every entry and persist
    pub fn clear(&self) {
        self.entries.write().clear();
        self.persist_quietly();
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Write the cache file
    ///
    /// Writes a temporary file next to the target and renames it over the
    /// target, so readers never observe a truncated file.
    ///
    /// # Errors
    /// - `CacheError::Serialize` if the entries cannot be encoded
    /// - `CacheError::Io` if the temporary file cannot be written or renamed
    pub fn save(&self) -> Result<(), CacheError> {
        let _guard = self.persist.lock();

        let json = serde_json::to_string_pretty(&*self.entries.read())?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| CacheError::io_error(&self.path, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| CacheError::io_error(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| CacheError::io_error(&self.path, e.error))?;

        debug!(path = %self.path.display(), "persisted generation cache");
        Ok(())
    }

    fn persist_quietly(&self) {
        if let Err(e) = self.save() {
            warn!(error = %e, "generation cache not persisted; results will not be reused");
        }
    }
}

fn resolve(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
}

/// Read the cache file; every failure degrades to an empty or partial cache
fn load(path: &Path) -> BTreeMap<String, CacheEntry> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no cache file, starting cold");
            return BTreeMap::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cache file unreadable, starting cold");
            return BTreeMap::new();
        }
    };

    let raw: serde_json::Map<String, serde_json::Value> = match serde_json::from_str(&data) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cache file corrupt, starting cold");
            return BTreeMap::new();
        }
    };

    raw.into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<CacheEntry>(value) {
            Ok(entry) => Some((key, entry)),
            Err(e) => {
                warn!(key = %key, error = %e, "skipping malformed cache entry");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn cache_in(dir: &TempDir) -> GenerationCache {
        GenerationCache::open(dir.path().join(DEFAULT_CACHE_FILE))
    }

    fn meta() -> Metadata {
        Metadata::new().with_model("openai/gpt-4-turbo").with_temperature(0.7)
    }

    #[test]
    fn missing_file_is_cold_start() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        assert!(cache.is_empty());
        assert_eq!(cache.get("function f()", &meta()), None);
    }

    #[test]
    fn set_then_get_returns_exact_code() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        cache.set("function add(a, b)", &meta(), "return a + b;");

        assert_eq!(cache.get("function add(a, b)", &meta()).as_deref(), Some("return a + b;"));
        assert_eq!(cache.get("function add(a, b)", &meta()).as_deref(), Some("return a + b;"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn different_metadata_misses() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        cache.set("function f()", &meta(), "return 1;");

        assert!(cache.get("function f()", &meta().with_seed(1_i64)).is_none());
    }

    #[test]
    fn entries_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let cache = cache_in(&dir);
            cache.set("function f()", &meta(), "return 1;");
        }
        let reopened = cache_in(&dir);
        assert_eq!(reopened.len(), 1);
        let entry = reopened.entry("function f()", &meta()).unwrap();
        assert_eq!(entry.signature, "function f()");
        assert_eq!(entry.metadata, meta());
        assert_eq!(entry.generated_code, "return 1;");
    }

    #[test]
    fn file_is_keyed_by_digest() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        let key = cache.set("function f()", &meta(), "return 1;");

        let data = std::fs::read_to_string(cache.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&data).unwrap();
        assert_eq!(json[key.to_string()]["generatedCode"], "return 1;");
    }

    #[test]
    fn corrupt_file_is_cold_start() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CACHE_FILE), "{ not json").unwrap();
        assert!(cache_in(&dir).is_empty());
    }

    #[test]
    fn malformed_entry_skipped_others_kept() {
        let dir = TempDir::new().unwrap();
        let good = CacheEntry::new("function f()", meta(), "return 1;");
        let key = CacheKey::for_pair("function f()", &meta()).to_string();
        let mut file = serde_json::Map::new();
        file.insert(key, serde_json::to_value(&good).unwrap());
        file.insert("deadbeef".to_string(), serde_json::json!({ "signature": 3 }));
        std::fs::write(
            dir.path().join(DEFAULT_CACHE_FILE),
            serde_json::Value::Object(file).to_string(),
        )
        .unwrap();

        let cache = cache_in(&dir);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("function f()", &meta()).as_deref(), Some("return 1;"));
    }

    #[test]
    fn empty_code_counts_as_absent() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        cache.set("function f()", &meta(), "");
        assert_eq!(cache.get("function f()", &meta()), None);
    }

    #[test]
    fn clear_empties_and_persists() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        cache.set("function f()", &meta(), "return 1;");
        cache.set("function g()", &meta(), "return 2;");
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache_in(&dir).is_empty());
    }

    #[test]
    fn unwritable_location_keeps_memory_copy() {
        let dir = TempDir::new().unwrap();
        let cache = GenerationCache::open(dir.path().join("missing-dir").join("cache.json"));

        cache.set("function f()", &meta(), "return 1;");

        assert_eq!(cache.get("function f()", &meta()).as_deref(), Some("return 1;"));
        assert!(matches!(cache.save(), Err(CacheError::Io { .. })));
    }

    #[test]
    fn relative_path_resolves_against_cwd() {
        let cache = GenerationCache::open("does-not-exist/.ai-cache.json");
        assert!(cache.path().is_absolute());
    }
}
