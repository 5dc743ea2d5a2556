use std::fmt;
use thiserror::Error;

use super::git_url::GitUrl;

/// リポジトリ名関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum RepositoryNameError {
    #[error("Repository name is empty (derived from '{0}')")]
    Empty(String),

    #[error("Repository name '{name}' is reserved (derived from '{url}')")]
    Reserved { name: String, url: String },
}

/// ローカルディレクトリ名・出力ファイル名として安全なリポジトリ名
///
/// `[A-Za-z0-9._-]` 以外の文字は `_` に置き換える。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

impl RepositoryName {
    /// URLから導出した名前をサニタイズして作成
    pub fn from_url(url: &GitUrl) -> Result<Self, RepositoryNameError> {
        Self::sanitize(&url.repo_name(), url.as_str())
    }

    fn sanitize(raw: &str, url: &str) -> Result<Self, RepositoryNameError> {
        if raw.is_empty() {
            return Err(RepositoryNameError::Empty(url.to_string()));
        }

        let sanitized: String = raw
            .chars()
            .map(|c| if is_safe_char(c) { c } else { '_' })
            .collect();

        if sanitized == "." || sanitized == ".." {
            return Err(RepositoryNameError::Reserved {
                name: sanitized,
                url: url.to_string(),
            });
        }

        Ok(Self(sanitized))
    }

    /// 重複回避のために番号付きの名前を作成（`repo-2` など）
    pub fn with_suffix(&self, n: usize) -> Self {
        Self(format!("{}-{}", self.0, n))
    }

    /// 名前を文字列として取得
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
