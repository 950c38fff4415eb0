use std::path::{Path, PathBuf};

use crate::error::{Result, TaggerError};

/// Deterministic cache location of a release artifact:
/// `{cache_dir}/{ontology}_{version}.owl`.
pub fn artifact_path(cache_dir: &Path, ontology: &str, version: &str) -> PathBuf {
    cache_dir.join(format!("{}_{}.owl", ontology, version))
}

/// Cached artifacts are trusted forever; presence is the only check.
pub fn cached_artifact(cache_dir: &Path, ontology: &str, version: &str) -> Option<PathBuf> {
    let path = artifact_path(cache_dir, ontology, version);
    path.is_file().then_some(path)
}

pub async fn ensure_cache_dir(cache_dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(cache_dir)
        .await
        .map_err(|e| TaggerError::io(cache_dir, e))
}

pub async fn store_artifact(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| TaggerError::io(path, e))
}
