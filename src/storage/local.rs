//! Local filesystem snapshot storage.
//!
//! Writes go to a sibling `.tmp` file that is renamed over the snapshot.
//! The JSON is indented with four spaces.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Posting;
use crate::storage::SnapshotStore;

/// Snapshot stored as a JSON file on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalSnapshotStore {
    path: PathBuf,
}

impl LocalSnapshotStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

/// Serialize as pretty JSON with four-space indentation.
fn to_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut bytes, formatter);
    value.serialize(&mut serializer)?;
    Ok(bytes)
}

#[async_trait]
impl SnapshotStore for LocalSnapshotStore {
    async fn load(&self) -> Result<Vec<Posting>> {
        match self.read_bytes().await? {
            Some(bytes) => {
                let postings: Vec<Posting> = serde_json::from_slice(&bytes)?;
                log::debug!(
                    "Loaded {} postings from {}",
                    postings.len(),
                    self.path.display()
                );
                Ok(postings)
            }
            None => {
                log::debug!("No snapshot found at {}", self.path.display());
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, postings: &[Posting]) -> Result<()> {
        let bytes = to_json_bytes(postings)?;
        self.write_bytes(&bytes).await?;
        log::info!(
            "Saved {} postings to {}",
            postings.len(),
            self.path.display()
        );
        Ok(())
    }
}
