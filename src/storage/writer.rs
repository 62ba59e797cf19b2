//! Atomic document writes
//!
//! A document is written to a hidden temp file in the destination directory,
//! synced, and only then renamed over the destination. A crash at any point
//! leaves either no destination file or a complete one; the worst leftover
//! is a stray `.part` file, which the next successful write of the same
//! document removes. Each write gets its own temp name, so concurrent writers
//! can never interleave bytes in one file.

use crate::storage::layout::{is_temp_for, temp_path};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Errors that can occur while persisting a document
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to move {from} into place at {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Writes `contents` to `destination` via temp file + rename
pub async fn write_atomic(destination: &Path, contents: &[u8]) -> Result<(), WriteError> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    let temp = temp_path(destination);

    if let Err(source) = write_and_sync(&temp, contents).await {
        let _ = fs::remove_file(&temp).await;
        return Err(WriteError::Write { path: temp, source });
    }

    if let Err(source) = fs::rename(&temp, destination).await {
        let _ = fs::remove_file(&temp).await;
        return Err(WriteError::Rename {
            from: temp,
            to: destination.to_path_buf(),
            source,
        });
    }

    tracing::trace!("Wrote {} bytes to {}", contents.len(), destination.display());
    remove_stale_temps(destination).await;
    Ok(())
}

/// Best effort: leftovers of interrupted writes to `destination`
async fn remove_stale_temps(destination: &Path) {
    let Some(parent) = destination.parent() else {
        return;
    };
    let Ok(mut entries) = fs::read_dir(parent).await else {
        return;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        if is_temp_for(destination, &name.to_string_lossy()) {
            tracing::debug!("Removing stale temp file {}", entry.path().display());
            let _ = fs::remove_file(entry.path()).await;
        }
    }
}

async fn write_and_sync(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(contents).await?;
    file.flush().await?;
    file.sync_all().await
}
