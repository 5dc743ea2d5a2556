pub mod repository;

// Re-export main types for convenience
pub use repository::{FetchConfig, GitRepository, GitRepositoryError, PullOutcome};
