//! Serialized snapshots of a loaded rating matrix.
//!
//! Re-parsing the raw rating files dominates session start-up, so a loaded
//! store can be persisted as an explicit snapshot of its fields (id lists,
//! flat matrix, feature texts) and reloaded on the next run. The snapshot is
//! a cache keyed by dataset name and invalidated whenever a source file is
//! newer than the snapshot file.

use crate::error::{Result, SugerirError};
use crate::ratings::{DatasetConfig, RatingMatrix};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::info;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    users: Vec<String>,
    items: Vec<String>,
    /// Row-major rating cells, shape (users.len(), items.len()).
    data: Vec<f32>,
    features: Vec<String>,
}

/// Writes a snapshot of the store to `path`.
///
/// # Errors
///
/// Returns an error on I/O or encoding failure.
pub fn save_snapshot(store: &RatingMatrix, path: &Path) -> Result<()> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        users: store.user_ids().to_vec(),
        items: store.item_ids().to_vec(),
        data: store.matrix_data(),
        features: store.features().to_vec(),
    };
    let encoded =
        serde_json::to_vec(&snapshot).map_err(|e| SugerirError::Snapshot(e.to_string()))?;
    fs::write(path, encoded)?;
    Ok(())
}

/// Reads a snapshot back into a store.
///
/// # Errors
///
/// Returns an error on I/O failure, a decode failure, or an unsupported
/// snapshot version.
pub fn load_snapshot(path: &Path) -> Result<RatingMatrix> {
    let bytes = fs::read(path)?;
    let snapshot: Snapshot =
        serde_json::from_slice(&bytes).map_err(|e| SugerirError::Snapshot(e.to_string()))?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SugerirError::Snapshot(format!(
            "unsupported snapshot version {}, expected {SNAPSHOT_VERSION}",
            snapshot.version
        )));
    }
    RatingMatrix::from_parts(
        snapshot.users,
        snapshot.items,
        snapshot.data,
        snapshot.features,
    )
}

/// Loads the store from a fresh snapshot when one exists, rebuilding from the
/// raw files (and rewriting the snapshot) otherwise.
///
/// # Errors
///
/// Returns an error when the rebuild itself fails. A stale, missing, or
/// corrupt snapshot is not an error; it just forces a rebuild.
pub fn load_snapshot_or_build(config: &DatasetConfig, cache_dir: &Path) -> Result<RatingMatrix> {
    let path = snapshot_path(config, cache_dir);
    if is_fresh(&path, &config.source_paths()) {
        match load_snapshot(&path) {
            Ok(store) => {
                info!(path = %path.display(), "loaded rating matrix from snapshot");
                return Ok(store);
            }
            Err(e) => {
                info!(error = %e, "snapshot unreadable, rebuilding");
            }
        }
    }
    let store = config.load()?;
    if let Err(e) = save_snapshot(&store, &path) {
        // A failed cache write never fails the session.
        info!(error = %e, "could not write snapshot");
    }
    Ok(store)
}

/// Snapshot location for a dataset, keyed by its name.
#[must_use]
pub(crate) fn snapshot_path(config: &DatasetConfig, cache_dir: &Path) -> PathBuf {
    cache_dir.join(format!("ratings_{}.snapshot.json", config.name))
}

/// True when the snapshot exists and is at least as new as every source file.
fn is_fresh(snapshot: &Path, sources: &[&Path]) -> bool {
    let Some(snapshot_time) = mtime(snapshot) else {
        return false;
    };
    sources
        .iter()
        .all(|src| mtime(src).is_some_and(|t| t <= snapshot_time))
}

fn mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn sample_store() -> RatingMatrix {
        let mut store = RatingMatrix::new();
        store.register("u0", "i0");
        store.register("u1", "i1");
        store.set_rating("u0", "i0", 5.0);
        store.set_rating("u1", "i1", 3.0);
        store.set_feature("i0", "action");
        store
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("store.snapshot.json");
        let store = sample_store();

        save_snapshot(&store, &path).expect("save");
        let loaded = load_snapshot(&path).expect("load");
        assert_eq!(loaded, store);
        assert_eq!(loaded.item_text_features(&["i0"]), vec!["action"]);
    }

    #[test]
    fn test_load_snapshot_rejects_corrupt_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("broken.json");
        fs::write(&path, b"not json").expect("write");
        let err = load_snapshot(&path).unwrap_err();
        assert!(matches!(err, SugerirError::Snapshot(_)));
    }

    #[test]
    fn test_load_snapshot_rejects_wrong_version() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("old.json");
        let json = r#"{"version":99,"users":[],"items":[],"data":[],"features":[]}"#;
        fs::write(&path, json).expect("write");
        let err = load_snapshot(&path).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn test_load_or_build_creates_then_reuses_snapshot() {
        let dir = TempDir::new().expect("temp dir");
        let mut f = File::create(dir.path().join("ratings.csv")).expect("create");
        f.write_all(b"userId,movieId,rating,timestamp\n1,10,5.0,0\n")
            .expect("write");
        let mut f = File::create(dir.path().join("movies.csv")).expect("create");
        f.write_all(b"movieId,title,genres\n10,T,Action\n").expect("write");

        let config = DatasetConfig::movielens(dir.path());
        let cache = TempDir::new().expect("cache dir");

        let built = load_snapshot_or_build(&config, cache.path()).expect("build");
        assert!(snapshot_path(&config, cache.path()).exists());

        let cached = load_snapshot_or_build(&config, cache.path()).expect("cached");
        assert_eq!(built, cached);
    }

    #[test]
    fn test_stale_snapshot_is_ignored() {
        let dir = TempDir::new().expect("temp dir");
        let snapshot = dir.path().join("s.json");
        let source = dir.path().join("ratings.csv");
        fs::write(&snapshot, b"{}").expect("write snapshot");
        std::thread::sleep(std::time::Duration::from_millis(20));
        fs::write(&source, b"newer").expect("write source");
        assert!(!is_fresh(&snapshot, &[source.as_path()]));
    }

    #[test]
    fn test_missing_snapshot_is_not_fresh() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("nope.json");
        let source = dir.path().join("src.csv");
        fs::write(&source, b"x").expect("write");
        assert!(!is_fresh(&missing, &[source.as_path()]));
    }
}
