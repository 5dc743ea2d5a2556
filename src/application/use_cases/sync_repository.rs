use colored::Colorize;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::entities::repository_task::RepositoryTask;
use crate::infrastructure::scm::{PullStatus, ScmError, ScmOperations};

/// SyncRepository関連のエラー
#[derive(Debug, Error)]
pub enum SyncRepositoryError {
    #[error("Clone of '{url}' failed: {error}")]
    CloneFailed { url: String, error: ScmError },
}

/// 同期で実際に行われた操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    /// 新規にクローンした
    Cloned,
    /// pullで更新した
    Updated,
    /// pullしたが変更なし
    UpToDate,
    /// pullに失敗したため既存のクローンをそのまま使う
    Stale,
}

/// ローカルクローンを最新にするユースケース
///
/// - クローンが無ければクローンする（失敗はタスクのエラー）
/// - クローンがあればpullする（失敗は警告のみで、既存のクローンで続行）
pub struct SyncRepositoryUseCase {
    scm: Arc<dyn ScmOperations>,
    verbose: bool,
}

impl SyncRepositoryUseCase {
    /// 新しいSyncRepositoryUseCaseを作成
    pub fn new(scm: Arc<dyn ScmOperations>) -> Self {
        Self {
            scm,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// 既存クローンのoriginがタスクのURLと異なる場合、そのoriginを返す
    ///
    /// クローンが無い、originが無い、または読めない場合は `None`。
    pub async fn foreign_origin(&self, task: &RepositoryTask) -> Option<String> {
        if !task.local_path.exists() {
            return None;
        }

        match self.scm.remote_url(&task.local_path).await {
            Ok(Some(origin)) if !task.url.same_repository(&origin) => Some(origin),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(
                    "Could not read origin of {}: {}",
                    task.local_path.display(),
                    e
                );
                None
            }
        }
    }

    /// タスクのローカルクローンを同期
    ///
    /// 成功時は `task.local_path` に作業ツリーが存在する。
    pub async fn execute(&self, task: &RepositoryTask) -> Result<SyncOperation, SyncRepositoryError> {
        let local_path = &task.local_path;

        if !local_path.exists() {
            println!(
                "  {} Cloning {} into {}",
                "::".blue(),
                task.url,
                local_path.display()
            );

            self.scm
                .clone_repository(task.url.as_str(), local_path)
                .await
                .map_err(|error| SyncRepositoryError::CloneFailed {
                    url: task.url.to_string(),
                    error,
                })?;

            return Ok(SyncOperation::Cloned);
        }

        println!("  {} Pulling {}", "::".blue(), local_path.display());

        match self.scm.pull_repository(local_path).await {
            Ok(PullStatus::Updated) => {
                if self.verbose {
                    println!("    Fast-forwarded {}", task.name);
                }
                Ok(SyncOperation::Updated)
            }
            Ok(PullStatus::UpToDate) => {
                if self.verbose {
                    println!("    {} is already up to date", task.name);
                }
                Ok(SyncOperation::UpToDate)
            }
            Err(e) => {
                tracing::warn!("Pull failed for {}: {}", task.url, e);
                println!(
                    "  {} Pull failed for {} ({}); using existing clone",
                    "⚠".yellow(),
                    task.url,
                    e
                );
                Ok(SyncOperation::Stale)
            }
        }
    }
}
