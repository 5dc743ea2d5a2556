/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - Git operations (clone, fetch, fast-forward) via libgit2
/// - SCM seam used by the repository synchronizer
/// - Process execution with concurrent output capture
/// - The external SBOM generator
/// - Configuration file loading
pub mod filesystem;
pub mod git;
pub mod process;
pub mod sbom;
pub mod scm;

// Re-export commonly used types
pub use filesystem::ConfigStore;
pub use git::GitRepository;
pub use process::CommandExecutor;
pub use sbom::{ManifestGenerator, SbomTool, SbomToolConfig};
pub use scm::{GitScm, ScmError, ScmOperations};
