use std::path::Path;
use tokio::fs as async_fs;

use crate::common::error::HarvestError;
use crate::common::result::HarvestResult;
use crate::domain::entities::repository_config::RepositoryConfig;

/// Loads the repository list from its JSON file
#[derive(Debug, Default)]
pub struct ConfigStore;

impl ConfigStore {
    /// Create a new config store
    pub fn new() -> Self {
        Self
    }

    /// Read and parse the configuration file.
    ///
    /// An empty list is returned as-is; rejecting it is the caller's decision.
    pub async fn load<P: AsRef<Path>>(&self, config_path: P) -> HarvestResult<RepositoryConfig> {
        let config_path = config_path.as_ref();

        if !config_path.is_file() {
            return Err(HarvestError::config_missing(config_path));
        }

        let content = async_fs::read_to_string(config_path).await.map_err(|e| {
            HarvestError::config_unreadable_with_source(config_path, "failed to read file", e)
        })?;

        let config: RepositoryConfig = serde_json::from_str(&content).map_err(|e| {
            HarvestError::config_unreadable_with_source(
                config_path,
                format!("invalid JSON: {}", e),
                e,
            )
        })?;

        let config = config.with_source(config_path);

        tracing::debug!(
            "Loaded {} repositories from {}",
            config.len(),
            config_path.display()
        );

        Ok(config)
    }
}
