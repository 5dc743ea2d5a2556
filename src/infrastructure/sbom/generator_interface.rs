use async_trait::async_trait;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;

/// Inputs of one generator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRequest {
    /// Directory with the sources to catalogue
    pub source_path: PathBuf,
    /// Directory with build outputs (the clone itself here)
    pub build_path: PathBuf,
    /// Package name written into the SBOM
    pub package_name: String,
    /// Package version written into the SBOM
    pub package_version: String,
    /// Supplier organization written into the SBOM
    pub supplier: String,
    /// Base URI for the SPDX document namespace
    pub namespace_base_uri: String,
    /// Directory the generator writes its `_manifest/` tree into
    pub manifest_dir: PathBuf,
}

/// Captured generator output, relayed to the log by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOutput {
    pub stdout: String,
    pub stderr: String,
}

/// External SBOM generator
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ManifestGenerator: Send + Sync {
    /// Run the generator to completion
    async fn generate(&self, request: &ManifestRequest)
        -> Result<GeneratorOutput, ManifestGeneratorError>;
}

/// Errors reported by a generator run
#[derive(Debug, thiserror::Error)]
pub enum ManifestGeneratorError {
    #[error("Failed to launch SBOM generator '{program}': {message}")]
    LaunchFailed { program: String, message: String },

    #[error("SBOM generator exited with code {exit_code}")]
    ExitedNonZero {
        exit_code: i32,
        output: GeneratorOutput,
    },

    #[error("SBOM generator '{program}' failed while running: {message}")]
    ExecutionFailed { program: String, message: String },

    #[error("SBOM generator timed out after {timeout_secs} seconds")]
    TimedOut {
        timeout_secs: u64,
        /// Whatever the generator printed before it was killed
        output: GeneratorOutput,
    },
}
