use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::error::PifError;
use crate::extraction::DocumentLayout;

/// On-disk cache of extracted layouts, one JSON file per input path.
///
/// Entries are keyed by the path alone. A PDF that changes on disk keeps
/// being served from its stale entry, so this is only for repeated debug
/// runs over the same files.
#[derive(Debug, Clone)]
pub struct LayoutCache {
    dir: PathBuf,
}

impl LayoutCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LayoutCache { dir: dir.into() }
    }

    /// `<system temp>/pifsheet-cache`
    pub fn default_dir() -> PathBuf {
        std::env::temp_dir().join("pifsheet-cache")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<stem>-<first 16 hex digits of SHA-256 of the path>.json`, stable
    /// across runs and toolchains.
    pub fn entry_path(&self, source: &Path) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(source.to_string_lossy().as_bytes());
        let digest = hasher.finalize();
        let key: String = digest[..8].iter().map(|b| format!("{b:02x}")).collect();
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.dir.join(format!("{stem}-{key}.json"))
    }

    /// Cached layout for `source`, `Ok(None)` on a miss.
    pub fn load(&self, source: &Path) -> Result<Option<DocumentLayout>, PifError> {
        let path = self.entry_path(source);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PifError::Cache {
                    path,
                    reason: e.to_string(),
                })
            }
        };
        let layout = serde_json::from_slice(&bytes).map_err(|e| PifError::Cache {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(Some(layout))
    }

    pub fn store(&self, source: &Path, layout: &DocumentLayout) -> Result<(), PifError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| PifError::Cache {
            path: self.dir.clone(),
            reason: e.to_string(),
        })?;
        let path = self.entry_path(source);
        let json = serde_json::to_vec(layout)?;
        std::fs::write(&path, json).map_err(|e| PifError::Cache {
            path,
            reason: e.to_string(),
        })
    }
}
