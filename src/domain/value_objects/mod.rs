pub mod git_url;
pub mod repository_name;

pub use git_url::{GitUrl, GitUrlError};
pub use repository_name::{RepositoryName, RepositoryNameError};
