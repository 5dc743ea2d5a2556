pub mod repository_config;
pub mod repository_task;

pub use repository_config::RepositoryConfig;
pub use repository_task::RepositoryTask;
