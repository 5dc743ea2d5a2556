use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use super::generate_manifest::{GenerateManifestError, GenerateManifestUseCase, ManifestDefaults};
use super::sync_repository::{SyncRepositoryError, SyncRepositoryUseCase};
use crate::application::services::task_planner::{TaskPlanError, TaskPlanner};
use crate::common::error::HarvestError;
use crate::common::result::HarvestResult;
use crate::domain::entities::repository_config::RepositoryConfig;
use crate::infrastructure::sbom::ManifestGenerator;
use crate::infrastructure::scm::ScmOperations;

/// 1リポジトリ分の処理で発生したエラー
///
/// バッチ全体は止めず、失敗として集計される。
#[derive(Debug, Error)]
pub enum RepositoryTaskError {
    #[error(transparent)]
    Plan(#[from] TaskPlanError),

    #[error(transparent)]
    Sync(#[from] SyncRepositoryError),

    #[error(transparent)]
    Generate(#[from] GenerateManifestError),
}

/// バッチ処理の設定
#[derive(Debug, Clone)]
pub struct BatchGenerateConfig {
    /// SBOMの出力先
    pub output_folder: PathBuf,

    /// ローカルクローンのルート
    pub repos_root: PathBuf,

    /// SBOMに書き込む固定値
    pub manifest_defaults: ManifestDefaults,

    /// 詳細ログを出力するか
    pub verbose: bool,
}

impl BatchGenerateConfig {
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
            repos_root: PathBuf::from("repos"),
            manifest_defaults: ManifestDefaults::default(),
            verbose: false,
        }
    }

    pub fn with_repos_root(mut self, repos_root: impl Into<PathBuf>) -> Self {
        self.repos_root = repos_root.into();
        self
    }

    pub fn with_manifest_defaults(mut self, defaults: ManifestDefaults) -> Self {
        self.manifest_defaults = defaults;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// 失敗したリポジトリの記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// 設定ファイルに書かれたURL
    pub url: String,
    /// エラーメッセージ
    pub message: String,
}

/// バッチ処理の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// 成功したリポジトリの数
    pub succeeded_count: usize,

    /// 失敗したリポジトリの数
    pub failed_count: usize,

    /// 失敗の詳細（設定ファイルの記載順）
    pub failures: Vec<TaskFailure>,

    /// 生成されたSBOMファイル
    pub generated: Vec<PathBuf>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// 処理したリポジトリの総数
    pub fn total(&self) -> usize {
        self.succeeded_count + self.failed_count
    }

    /// 全て成功したかどうか
    pub fn is_success(&self) -> bool {
        self.failed_count == 0
    }

    /// プロセスの終了コード（全て成功なら0、それ以外は1）
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    fn record_success(&mut self, sbom_path: PathBuf) {
        self.succeeded_count += 1;
        self.generated.push(sbom_path);
    }

    fn record_failure(&mut self, url: &str, error: &RepositoryTaskError) {
        self.failed_count += 1;
        self.failures.push(TaskFailure {
            url: url.to_string(),
            message: error.to_string(),
        });
    }
}

/// 設定ファイルの全リポジトリについて同期とSBOM生成を行うユースケース
///
/// リポジトリは記載順に1つずつ処理する。あるリポジトリの失敗は記録されるだけで、
/// 残りのリポジトリの処理は続行する。
pub struct BatchGenerateUseCase {
    config: BatchGenerateConfig,
    sync: SyncRepositoryUseCase,
    generate: GenerateManifestUseCase,
}

impl BatchGenerateUseCase {
    /// 新しいBatchGenerateUseCaseを作成
    pub fn new(
        config: BatchGenerateConfig,
        scm: Arc<dyn ScmOperations>,
        generator: Arc<dyn ManifestGenerator>,
    ) -> Self {
        let sync = SyncRepositoryUseCase::new(scm).with_verbose(config.verbose);
        let generate = GenerateManifestUseCase::new(generator)
            .with_defaults(config.manifest_defaults.clone());

        Self {
            config,
            sync,
            generate,
        }
    }

    /// バッチ処理を実行
    ///
    /// 設定が空の場合や出力先を作成できない場合はリポジトリを処理する前にエラーを返す。
    /// それ以外はリポジトリごとの成否を `BatchResult` にまとめて返す。
    pub async fn execute(&self, repositories: &RepositoryConfig) -> HarvestResult<BatchResult> {
        if repositories.is_empty() {
            return Err(HarvestError::config_empty(repositories.source_path()));
        }

        let output_folder = &self.config.output_folder;
        tokio::fs::create_dir_all(output_folder)
            .await
            .map_err(|e| HarvestError::output_folder_uncreatable(output_folder, e))?;

        let repos_root = &self.config.repos_root;
        tokio::fs::create_dir_all(repos_root)
            .await
            .map_err(|e| HarvestError::repos_root_uncreatable(repos_root, e))?;

        let total = repositories.len();
        let mut planner = TaskPlanner::new(repos_root);
        let mut result = BatchResult::new();

        for (index, url) in repositories.repositories.iter().enumerate() {
            println!(
                "{} [{}/{}] {}",
                "::".blue().bold(),
                index + 1,
                total,
                url.bold()
            );

            match self.process(&mut planner, url).await {
                Ok(sbom_path) => {
                    println!("  {} Wrote {}", "✓".green(), sbom_path.display());
                    result.record_success(sbom_path);
                }
                Err(e) => {
                    tracing::error!("Failed to process {}: {}", url, e);
                    println!("  {} Failed to process {}: {}", "✗".red(), url, e);
                    result.record_failure(url, &e);
                }
            }
        }

        tracing::info!(
            "Batch finished: {} succeeded, {} failed",
            result.succeeded_count,
            result.failed_count
        );

        Ok(result)
    }

    async fn process(
        &self,
        planner: &mut TaskPlanner,
        url: &str,
    ) -> Result<PathBuf, RepositoryTaskError> {
        let mut task = planner.plan(url)?;

        // 別のURLのクローンが同じ名前で残っている場合は、次のサフィックスを使う
        while let Some(origin) = self.sync.foreign_origin(&task).await {
            tracing::warn!(
                "{} belongs to {}, not {}",
                task.local_path.display(),
                origin,
                url
            );
            println!(
                "  {} {} is a clone of {}; choosing another directory",
                "⚠".yellow(),
                task.local_path.display(),
                origin
            );
            planner.mark_foreign(&task.name, origin);
            task = planner.plan(url)?;
        }

        if self.config.verbose {
            println!(
                "  Repository '{}' -> {}",
                task.name,
                task.local_path.display()
            );
        }

        let operation = self.sync.execute(&task).await?;
        tracing::debug!("{}: {:?}", task.name, operation);

        let sbom_path = self
            .generate
            .execute(&task, &self.config.output_folder)
            .await?;

        Ok(sbom_path)
    }
}
