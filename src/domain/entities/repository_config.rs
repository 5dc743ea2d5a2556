use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 処理対象リポジトリの一覧（設定ファイルの内容）
///
/// ```json
/// { "repositories": ["https://github.com/owner/repo.git"] }
/// ```
///
/// `repositories` キーが無い場合は空リストとして扱う。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// リポジトリURL（設定ファイルの記載順）
    #[serde(default)]
    pub repositories: Vec<String>,

    /// 読み込み元のファイル（メモリ上で作成した場合はNone）
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl RepositoryConfig {
    /// 新しいRepositoryConfigを作成
    pub fn new(repositories: Vec<String>) -> Self {
        Self {
            repositories,
            source: None,
        }
    }

    /// 読み込み元ファイルを記録
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// エラーメッセージ用の読み込み元
    pub fn source_path(&self) -> &Path {
        self.source
            .as_deref()
            .unwrap_or_else(|| Path::new("<in-memory configuration>"))
    }

    /// リポジトリが一つも無いかどうか
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// リポジトリ数
    pub fn len(&self) -> usize {
        self.repositories.len()
    }
}
