pub mod batch_generate;
pub mod generate_manifest;
pub mod sync_repository;

pub use batch_generate::{
    BatchGenerateConfig, BatchGenerateUseCase, BatchResult, RepositoryTaskError, TaskFailure,
};
pub use generate_manifest::{GenerateManifestError, GenerateManifestUseCase, ManifestDefaults};
pub use sync_repository::{SyncOperation, SyncRepositoryError, SyncRepositoryUseCase};
