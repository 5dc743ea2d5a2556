use git2::{
    build::{CheckoutBuilder, RepoBuilder},
    Cred, CredentialType, FetchOptions, RemoteCallbacks, Repository as Git2Repository,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Git repository operations related errors
#[derive(Debug, Error)]
pub enum GitRepositoryError {
    #[error("Repository not found at path: {0}")]
    RepositoryNotFound(String),

    #[error("Git clone failed: {0}")]
    CloneFailed(String),

    #[error("Git fetch failed: {0}")]
    FetchFailed(String),

    #[error("Git merge failed: {0}")]
    MergeFailed(String),

    #[error("Branch not found: {0}")]
    BranchNotFound(String),

    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    #[error("HEAD is detached; cannot fast-forward")]
    DetachedHead,

    #[error("Git operation failed: {0}")]
    GitOperationFailed(String),

    #[error("Git2 error: {0}")]
    Git2Error(#[from] git2::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Outcome of a pull on an existing clone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// Local branch already matched upstream
    UpToDate,
    /// Local branch was fast-forwarded
    FastForwarded,
}

/// Fetch options for repository fetching
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Remote name to fetch from
    pub remote_name: String,

    /// Specific refspecs to fetch (if None, the remote's configured refspecs)
    pub refs: Option<Vec<String>>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            remote_name: "origin".to_string(),
            refs: None,
        }
    }
}

/// Wrapper around git2::Repository with high-level operations
pub struct GitRepository {
    /// The underlying git2 repository
    repo: Git2Repository,

    /// Repository path
    path: PathBuf,
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("path", &self.path)
            .field("repo", &"<git2::Repository>")
            .finish()
    }
}

const MAX_CREDENTIAL_ATTEMPTS: u32 = 3;

/// Credential callbacks shared by clone and fetch
fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    let mut attempts = 0;
    callbacks.credentials(move |url, username_from_url, allowed_types| {
        // libgit2 asks again after rejected credentials
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("Authentication failed"));
        }

        if allowed_types.contains(CredentialType::SSH_KEY) {
            Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
        } else if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            let config = git2::Config::open_default()?;
            Cred::credential_helper(&config, url, username_from_url)
        } else if allowed_types.contains(CredentialType::DEFAULT) {
            Cred::default()
        } else {
            Err(git2::Error::from_str("No supported authentication method"))
        }
    });
    callbacks
}

impl GitRepository {
    /// Open an existing Git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GitRepositoryError> {
        let path_buf = path.as_ref().to_path_buf();

        if !path_buf.exists() {
            return Err(GitRepositoryError::RepositoryNotFound(
                path_buf.display().to_string(),
            ));
        }

        let repo = Git2Repository::open(&path_buf)
            .map_err(|e| GitRepositoryError::GitOperationFailed(e.to_string()))?;

        Ok(Self {
            repo,
            path: path_buf,
        })
    }

    /// Clone a remote repository
    ///
    /// The URL is passed to libgit2 as given. If the clone fails, whatever it
    /// left at `target_path` is removed.
    pub fn clone<P: AsRef<Path>>(url: &str, target_path: P) -> Result<Self, GitRepositoryError> {
        let target_path_buf = target_path.as_ref().to_path_buf();

        if let Some(parent) = target_path_buf.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks());

        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_options);

        match builder.clone(url, &target_path_buf) {
            Ok(repo) => Ok(Self {
                repo,
                path: target_path_buf,
            }),
            Err(e) => {
                if target_path_buf.exists() {
                    if let Err(cleanup) = std::fs::remove_dir_all(&target_path_buf) {
                        tracing::warn!(
                            "Failed to remove partial clone at {}: {}",
                            target_path_buf.display(),
                            cleanup
                        );
                    }
                }
                Err(GitRepositoryError::CloneFailed(e.message().to_string()))
            }
        }
    }

    /// Fetch changes from remote
    pub fn fetch(&self, config: &FetchConfig) -> Result<(), GitRepositoryError> {
        let mut remote = self
            .repo
            .find_remote(&config.remote_name)
            .map_err(|_| GitRepositoryError::RemoteNotFound(config.remote_name.clone()))?;

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks());

        // Empty means the remote's configured refspecs
        let refs: Vec<&str> = config
            .refs
            .as_ref()
            .map(|list| list.iter().map(String::as_str).collect())
            .unwrap_or_default();

        remote
            .fetch(&refs, Some(&mut fetch_options), None)
            .map_err(|e| GitRepositoryError::FetchFailed(e.message().to_string()))?;

        Ok(())
    }

    /// Fast-forward the current branch to `origin/<branch>`
    pub fn fast_forward_merge(&self, branch_name: &str) -> Result<PullOutcome, GitRepositoryError> {
        let upstream_ref = format!("refs/remotes/origin/{}", branch_name);
        let upstream = self
            .repo
            .find_reference(&upstream_ref)
            .map_err(|_| GitRepositoryError::BranchNotFound(upstream_ref.clone()))?;
        let upstream_commit = self.repo.reference_to_annotated_commit(&upstream)?;

        let (analysis, _) = self.repo.merge_analysis(&[&upstream_commit])?;

        if analysis.is_up_to_date() {
            return Ok(PullOutcome::UpToDate);
        }

        if !analysis.is_fast_forward() {
            return Err(GitRepositoryError::MergeFailed(
                "Fast-forward merge not possible".to_string(),
            ));
        }

        // Update the working tree first so local modifications abort the merge
        let target = self.repo.find_commit(upstream_commit.id())?;
        let mut checkout_builder = CheckoutBuilder::new();
        checkout_builder.safe();
        self.repo
            .checkout_tree(target.as_object(), Some(&mut checkout_builder))?;

        let mut head_ref = self.repo.head()?;
        head_ref.set_target(
            target.id(),
            &format!("pull: Fast-forward to {}", upstream_ref),
        )?;

        Ok(PullOutcome::FastForwarded)
    }

    /// Fetch from origin and fast-forward the current branch
    pub fn pull(&self) -> Result<PullOutcome, GitRepositoryError> {
        self.fetch(&FetchConfig::default())?;
        let branch = self.get_current_branch()?;
        self.fast_forward_merge(&branch)
    }

    /// Get current branch name
    pub fn get_current_branch(&self) -> Result<String, GitRepositoryError> {
        let head = self.repo.head()?;

        if !head.is_branch() {
            return Err(GitRepositoryError::DetachedHead);
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| GitRepositoryError::GitOperationFailed("Invalid branch name".into()))
    }

    /// URL of the `origin` remote, `None` if the clone has no such remote
    pub fn origin_url(&self) -> Result<Option<String>, GitRepositoryError> {
        match self.repo.find_remote("origin") {
            Ok(remote) => Ok(remote.url().map(str::to_string)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitRepositoryError::Git2Error(e)),
        }
    }

    /// Current HEAD commit id
    pub fn head_commit(&self) -> Result<String, GitRepositoryError> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    /// Get repository path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
