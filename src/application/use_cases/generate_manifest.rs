use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs as async_fs;

use crate::domain::entities::repository_task::RepositoryTask;
use crate::infrastructure::sbom::{
    GeneratorOutput, ManifestGenerator, ManifestGeneratorError, ManifestRequest,
};

/// 生成ツールがスクラッチディレクトリ内に書き出すSPDX文書の相対パス
pub const MANIFEST_RELATIVE_PATH: &str = "_manifest/spdx_2.2/manifest.spdx.json";

/// GenerateManifest関連のエラー
#[derive(Debug, Error)]
pub enum GenerateManifestError {
    #[error("Failed to create scratch directory {}: {source}", path.display())]
    ScratchDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    GeneratorLaunchFailed { message: String },

    #[error("SBOM generator exited with code {exit_code}")]
    GeneratorExitedNonZero { exit_code: i32 },

    #[error("{message}")]
    GeneratorExecutionFailed { message: String },

    #[error("SBOM generator timed out after {timeout_secs} seconds")]
    GeneratorTimedOut { timeout_secs: u64 },

    #[error("SBOM generator produced no manifest at {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    ArtifactCopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// SBOMに書き込む固定値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDefaults {
    /// パッケージバージョン
    pub package_version: String,
    /// 供給元組織
    pub supplier: String,
    /// SPDX名前空間のベースURI
    pub namespace_base_uri: String,
}

impl Default for ManifestDefaults {
    fn default() -> Self {
        Self {
            package_version: "1.0.0".to_string(),
            supplier: "Example Organization".to_string(),
            namespace_base_uri: "https://sbom.example.com".to_string(),
        }
    }
}

/// 1リポジトリ分のSBOMを生成するユースケース
///
/// スクラッチディレクトリ `{output}/_manifest_{name}` を作って生成ツールを実行し、
/// 生成物を `{output}/{name}.sbom.json` にコピーした後スクラッチを削除する。
/// 生成物が見つからない場合、スクラッチディレクトリは調査用に残す。
pub struct GenerateManifestUseCase {
    generator: Arc<dyn ManifestGenerator>,
    defaults: ManifestDefaults,
}

impl GenerateManifestUseCase {
    /// 新しいGenerateManifestUseCaseを作成
    pub fn new(generator: Arc<dyn ManifestGenerator>) -> Self {
        Self {
            generator,
            defaults: ManifestDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: ManifestDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// SBOMを生成し、出力ファイルのパスを返す
    pub async fn execute(
        &self,
        task: &RepositoryTask,
        output_folder: &Path,
    ) -> Result<PathBuf, GenerateManifestError> {
        let scratch_dir = task.scratch_dir(output_folder);

        // 前回の失敗で残ったスクラッチの生成物を今回の結果と取り違えないようにする
        if scratch_dir.exists() {
            if let Err(e) = async_fs::remove_dir_all(&scratch_dir).await {
                tracing::warn!(
                    "Failed to remove stale scratch directory {}: {}",
                    scratch_dir.display(),
                    e
                );
            }
        }

        async_fs::create_dir_all(&scratch_dir)
            .await
            .map_err(|source| GenerateManifestError::ScratchDirectoryFailed {
                path: scratch_dir.clone(),
                source,
            })?;

        let request = ManifestRequest {
            source_path: task.local_path.clone(),
            build_path: task.local_path.clone(),
            package_name: task.name.to_string(),
            package_version: self.defaults.package_version.clone(),
            supplier: self.defaults.supplier.clone(),
            namespace_base_uri: self.defaults.namespace_base_uri.clone(),
            manifest_dir: scratch_dir.clone(),
        };

        println!("  {} Generating SBOM for {}", "::".blue(), task.name);

        let output = match self.generator.generate(&request).await {
            Ok(output) => output,
            Err(ManifestGeneratorError::ExitedNonZero { exit_code, output }) => {
                relay_output(&output);
                return Err(GenerateManifestError::GeneratorExitedNonZero { exit_code });
            }
            Err(ManifestGeneratorError::TimedOut {
                timeout_secs,
                output,
            }) => {
                relay_output(&output);
                return Err(GenerateManifestError::GeneratorTimedOut { timeout_secs });
            }
            Err(e @ ManifestGeneratorError::LaunchFailed { .. }) => {
                return Err(GenerateManifestError::GeneratorLaunchFailed {
                    message: e.to_string(),
                });
            }
            Err(e @ ManifestGeneratorError::ExecutionFailed { .. }) => {
                return Err(GenerateManifestError::GeneratorExecutionFailed {
                    message: e.to_string(),
                });
            }
        };
        relay_output(&output);

        let artifact = scratch_dir.join(MANIFEST_RELATIVE_PATH);
        if !artifact.is_file() {
            return Err(GenerateManifestError::ArtifactNotFound { path: artifact });
        }

        let sbom_path = task.sbom_path(output_folder);
        async_fs::copy(&artifact, &sbom_path)
            .await
            .map_err(|source| GenerateManifestError::ArtifactCopyFailed {
                from: artifact.clone(),
                to: sbom_path.clone(),
                source,
            })?;

        if let Err(e) = async_fs::remove_dir_all(&scratch_dir).await {
            tracing::warn!(
                "Failed to remove scratch directory {}: {}",
                scratch_dir.display(),
                e
            );
        }

        Ok(sbom_path)
    }
}

/// 生成ツールの出力をインデントして表示
fn relay_output(output: &GeneratorOutput) {
    for line in output.stdout.lines().filter(|l| !l.trim().is_empty()) {
        println!("    {}", line.dimmed());
    }
    for line in output.stderr.lines().filter(|l| !l.trim().is_empty()) {
        println!("    {}", line.yellow());
    }
}
