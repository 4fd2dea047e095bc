//! Ghost run persistence
//!
//! Features:
//! - Pluggable string key-value backend (memory, files, LocalStorage)
//! - One best run per maze fingerprint, replaced only by a faster run
//! - Corrupt records are logged and treated as missing

pub mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use crate::error::Result;
use crate::ghost::GhostRun;

/// Minimal string store the host provides.
///
/// `set` must replace the whole value atomically: a reader sees either the
/// previous record or the new one, never a partial write.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Storage key for a fingerprint's best run
pub fn storage_key(fingerprint: &str) -> String {
    format!("ghost_{fingerprint}")
}

/// Best-run-per-maze policy over a key-value backend
#[derive(Debug, Clone, Default)]
pub struct GhostStore<S> {
    backend: S,
}

impl<S: KeyValueStore> GhostStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Stored best run for a maze, if any
    pub fn load_best(&self, fingerprint: &str) -> Result<Option<GhostRun>> {
        let Some(json) = self.backend.get(&storage_key(fingerprint))? else {
            return Ok(None);
        };
        match serde_json::from_str::<GhostRun>(&json) {
            Ok(run) if run.maze_fingerprint == fingerprint => {
                log::debug!("Loaded ghost {} ({:.2}s)", fingerprint, run.time);
                Ok(Some(run))
            }
            Ok(run) => {
                log::warn!(
                    "Ghost under {} belongs to {}, ignoring",
                    fingerprint,
                    run.maze_fingerprint
                );
                Ok(None)
            }
            Err(e) => {
                log::warn!("Corrupt ghost record for {}: {}", fingerprint, e);
                Ok(None)
            }
        }
    }

    /// Persist `run` if it is the first or fastest for its maze.
    /// Returns whether it was stored.
    pub fn offer(&mut self, run: &GhostRun) -> Result<bool> {
        if let Some(existing) = self.load_best(&run.maze_fingerprint)? {
            if !run.beats(&existing) {
                log::debug!(
                    "Ghost {:.2}s does not beat {:.2}s for {}",
                    run.time,
                    existing.time,
                    run.maze_fingerprint
                );
                return Ok(false);
            }
        }

        let json = serde_json::to_string(run)?;
        self.backend.set(&storage_key(&run.maze_fingerprint), &json)?;
        log::info!(
            "New best ghost for {}: {:.2}s ({} snapshots)",
            run.maze_fingerprint,
            run.time,
            run.snapshots.len()
        );
        Ok(true)
    }

    pub fn clear(&mut self, fingerprint: &str) -> Result<()> {
        self.backend.remove(&storage_key(fingerprint))
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghost::{Snapshot, fingerprint};

    fn run(time: f32) -> GhostRun {
        GhostRun {
            maze_fingerprint: fingerprint(10, 7, 1, 7),
            level: 1,
            time,
            snapshots: vec![
                Snapshot {
                    x: 20.0,
                    y: 20.0,
                    t: 0.0,
                },
                Snapshot {
                    x: 260.0,
                    y: 380.0,
                    t: time,
                },
            ],
        }
    }

    #[test]
    fn test_keeps_fastest_run() {
        let mut store = GhostStore::new(MemoryStore::new());
        let key = fingerprint(10, 7, 1, 7);

        assert!(store.offer(&run(42.0)).unwrap());
        assert!(store.offer(&run(30.0)).unwrap());
        assert_eq!(store.load_best(&key).unwrap().unwrap().time, 30.0);

        assert!(!store.offer(&run(50.0)).unwrap());
        assert_eq!(store.load_best(&key).unwrap().unwrap().time, 30.0);
        assert_eq!(store.backend().len(), 1);
    }

    #[test]
    fn test_equal_time_does_not_replace() {
        let mut store = GhostStore::new(MemoryStore::new());
        assert!(store.offer(&run(30.0)).unwrap());
        assert!(!store.offer(&run(30.0)).unwrap());
    }

    #[test]
    fn test_missing_ghost_is_none() {
        let store = GhostStore::new(MemoryStore::new());
        assert!(store.load_best("3x3_L1_S1").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_record_treated_as_missing() {
        let mut backend = MemoryStore::new();
        let key = fingerprint(10, 7, 1, 7);
        backend.set(&storage_key(&key), "{not json").unwrap();

        let mut store = GhostStore::new(backend);
        assert!(store.load_best(&key).unwrap().is_none());
        // A fresh run overwrites the bad record
        assert!(store.offer(&run(55.0)).unwrap());
        assert_eq!(store.load_best(&key).unwrap().unwrap().time, 55.0);
    }

    #[test]
    fn test_stored_bytes_roundtrip() {
        let mut store = GhostStore::new(MemoryStore::new());
        let original = run(12.5);
        store.offer(&original).unwrap();

        let key = storage_key(&original.maze_fingerprint);
        let stored = store.backend().get(&key).unwrap().unwrap();
        let loaded = store.load_best(&original.maze_fingerprint).unwrap().unwrap();
        assert_eq!(loaded, original);
        assert_eq!(serde_json::to_string(&loaded).unwrap(), stored);
    }

    #[test]
    fn test_clear() {
        let mut store = GhostStore::new(MemoryStore::new());
        let original = run(12.5);
        store.offer(&original).unwrap();
        store.clear(&original.maze_fingerprint).unwrap();
        assert!(store.load_best(&original.maze_fingerprint).unwrap().is_none());
    }
}
