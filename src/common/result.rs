use crate::common::error::HarvestError;

/// Result alias used by the run-level APIs.
///
/// # Examples
///
/// ```
/// use repo_sbom::common::result::HarvestResult;
/// use repo_sbom::common::error::HarvestError;
///
/// fn example_function() -> HarvestResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> HarvestResult<()> {
///     Err(HarvestError::config_missing("repos.json"))
/// }
/// ```
pub type HarvestResult<T> = Result<T, HarvestError>;
