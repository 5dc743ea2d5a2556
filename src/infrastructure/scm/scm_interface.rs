use async_trait::async_trait;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

/// Version-control operations the synchronizer depends on
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ScmOperations: Send + Sync {
    /// Clone a repository from the given URL to the specified path
    async fn clone_repository(&self, url: &str, dest_path: &Path) -> Result<(), ScmError>;

    /// Bring an existing clone up to date with its upstream
    async fn pull_repository(&self, repo_path: &Path) -> Result<PullStatus, ScmError>;

    /// URL the existing clone was cloned from, if it records one
    async fn remote_url(&self, repo_path: &Path) -> Result<Option<String>, ScmError>;
}

/// What a successful pull did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullStatus {
    /// Nothing to pull
    UpToDate,
    /// New commits were applied
    Updated,
}

/// Errors that can occur during SCM operations
#[derive(Debug, thiserror::Error)]
pub enum ScmError {
    #[error("Clone operation failed: {message}")]
    CloneFailed { message: String },

    #[error("Pull operation failed: {message}")]
    PullFailed { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ScmError {
    /// Create a clone failed error
    pub fn clone_failed(message: impl Into<String>) -> Self {
        Self::CloneFailed {
            message: message.into(),
        }
    }

    /// Create a pull failed error
    pub fn pull_failed(message: impl Into<String>) -> Self {
        Self::PullFailed {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
