/// SCM (Source Control Management) operations infrastructure
///
/// `ScmOperations` is the seam the repository synchronizer talks to;
/// `GitScm` implements it on top of libgit2.
pub mod git_scm;
pub mod scm_interface;

pub use git_scm::GitScm;
pub use scm_interface::{PullStatus, ScmError, ScmOperations};

#[cfg(test)]
pub use scm_interface::MockScmOperations;
