//! Resume detection
use async_trait::async_trait;
use std::path::Path;

/// Decides whether a leaf document is already on disk
///
/// Implementations only read the filesystem namespace, so they are safe to
/// call while workers are writing.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn exists(&self, destination: &Path) -> bool;
}

/// A leaf is done iff its destination is a non-empty regular file.
///
/// Zero-length files (left by a non-atomic writer or a full disk) are not
/// trusted and get fetched again.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsResumeStore;

#[async_trait]
impl ResumeStore for FsResumeStore {
    async fn exists(&self, destination: &Path) -> bool {
        match tokio::fs::metadata(destination).await {
            Ok(meta) => meta.is_file() && meta.len() > 0,
            Err(_) => false,
        }
    }
}

/// Reports nothing as present; used for `--overwrite` runs
#[derive(Debug, Default, Clone, Copy)]
pub struct NoResume;

#[async_trait]
impl ResumeStore for NoResume {
    async fn exists(&self, _destination: &Path) -> bool {
        false
    }
}
