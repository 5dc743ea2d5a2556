use std::path::PathBuf;
use thiserror::Error;

/// Run-level errors.
///
/// Everything here aborts the whole batch before (or instead of) processing
/// repositories. Per-repository failures have their own error types and are
/// contained at the task boundary.
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Configuration file not found: {}", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("Configuration file could not be read: {}: {message}", path.display())]
    ConfigUnreadable {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("No repositories configured in {}", path.display())]
    ConfigEmpty { path: PathBuf },

    #[error("Output folder could not be created: {}", path.display())]
    OutputFolderUncreatable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Repository root could not be created: {}", path.display())]
    ReposRootUncreatable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HarvestError {
    pub fn config_missing(path: impl Into<PathBuf>) -> Self {
        Self::ConfigMissing { path: path.into() }
    }

    pub fn config_unreadable_with_source(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigUnreadable {
            path: path.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn config_empty(path: impl Into<PathBuf>) -> Self {
        Self::ConfigEmpty { path: path.into() }
    }

    pub fn output_folder_uncreatable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputFolderUncreatable {
            path: path.into(),
            source,
        }
    }

    pub fn repos_root_uncreatable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReposRootUncreatable {
            path: path.into(),
            source,
        }
    }

    /// Whether the error stems from the configuration file itself.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigMissing { .. } | Self::ConfigUnreadable { .. } | Self::ConfigEmpty { .. }
        )
    }
}
