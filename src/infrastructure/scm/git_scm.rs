use super::scm_interface::{PullStatus, ScmError, ScmOperations};
use crate::infrastructure::git::{GitRepository, PullOutcome};
use async_trait::async_trait;
use std::path::Path;

/// Git implementation of SCM operations, backed by libgit2
///
/// libgit2 calls block, so each operation runs on tokio's blocking pool.
#[derive(Debug, Default, Clone)]
pub struct GitScm;

impl GitScm {
    /// Create a new Git SCM instance
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScmOperations for GitScm {
    async fn clone_repository(&self, url: &str, dest_path: &Path) -> Result<(), ScmError> {
        let url = url.to_string();
        let dest = dest_path.to_path_buf();

        tokio::task::spawn_blocking(move || {
            GitRepository::clone(&url, &dest)
                .map(|_| ())
                .map_err(|e| ScmError::clone_failed(e.to_string()))
        })
        .await
        .map_err(|e| ScmError::internal(format!("Clone task failed: {}", e)))?
    }

    async fn pull_repository(&self, repo_path: &Path) -> Result<PullStatus, ScmError> {
        let path = repo_path.to_path_buf();

        tokio::task::spawn_blocking(move || {
            let repo =
                GitRepository::open(&path).map_err(|e| ScmError::pull_failed(e.to_string()))?;
            let outcome = repo
                .pull()
                .map_err(|e| ScmError::pull_failed(e.to_string()))?;

            if let Ok(head) = repo.head_commit() {
                tracing::debug!("{} is at {}", repo.path().display(), head);
            }

            Ok(match outcome {
                PullOutcome::UpToDate => PullStatus::UpToDate,
                PullOutcome::FastForwarded => PullStatus::Updated,
            })
        })
        .await
        .map_err(|e| ScmError::internal(format!("Pull task failed: {}", e)))?
    }

    async fn remote_url(&self, repo_path: &Path) -> Result<Option<String>, ScmError> {
        let path = repo_path.to_path_buf();

        tokio::task::spawn_blocking(move || {
            GitRepository::open(&path)
                .and_then(|repo| repo.origin_url())
                .map_err(|e| ScmError::internal(e.to_string()))
        })
        .await
        .map_err(|e| ScmError::internal(format!("Remote lookup task failed: {}", e)))?
    }
}
