//! JSON state file persistence

use std::path::{Path, PathBuf};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::engine::StateSnapshot;

/// Reads and writes the session snapshot as a JSON file
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted record. A missing file is not an error.
    pub async fn load(&self) -> Result<Option<Value>, String> {
        debug!("Loading state from {}", self.path.display());

        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No state file at {}, using defaults", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(format!("Failed to read {}: {}", self.path.display(), e));
            }
        };

        let state = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse {}: {}", self.path.display(), e))?;
        Ok(Some(state))
    }

    /// Write the snapshot, replacing the previous file atomically.
    /// Every save stages into its own temp file; the last rename wins.
    pub async fn save(&self, snapshot: &StateSnapshot) -> Result<(), String> {
        let contents = serde_json::to_string_pretty(snapshot)
            .map_err(|e| format!("Failed to serialize state: {}", e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }

        let tmp_path = self
            .path
            .with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        fs::write(&tmp_path, contents)
            .await
            .map_err(|e| format!("Failed to write {}: {}", tmp_path.display(), e))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| format!("Failed to replace {}: {}", self.path.display(), e))?;

        debug!("Saved state to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TurnEngine;
    use crate::roster::Mobber;

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn saved_snapshot_restores_into_fresh_engine() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("nested").join("state.json"));

        let mut engine = TurnEngine::new();
        engine.add_mobber(Mobber::new("ada").with_id("1"));
        engine.set_seconds_per_turn(240);
        store.save(&engine.get_state()).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        let mut restored = TurnEngine::new();
        restored.load_state(&loaded);
        assert_eq!(restored.get_state(), engine.get_state());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").await.unwrap();

        let err = StateStore::new(&path).load().await.unwrap_err();
        assert!(err.contains("Failed to parse"));
    }

    #[tokio::test]
    async fn concurrent_saves_both_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));

        let mut first = TurnEngine::new();
        first.set_seconds_per_turn(60);
        let mut second = TurnEngine::new();
        second.set_seconds_per_turn(120);
        let (a, b) = (first.get_state(), second.get_state());

        for _ in 0..20 {
            let (left, right) = tokio::join!(store.save(&a), store.save(&b));
            left.unwrap();
            right.unwrap();
        }

        let loaded = store.load().await.unwrap().unwrap();
        let seconds = loaded["secondsPerTurn"].as_i64().unwrap();
        assert!(seconds == 60 || seconds == 120);

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name != "state.json")
            .collect();
        assert!(leftovers.is_empty(), "stale temp files: {:?}", leftovers);
    }
}
