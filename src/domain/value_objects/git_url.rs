use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// クローン可能として受け付けるURLスキーム
pub const SUPPORTED_SCHEMES: [&str; 4] = ["http", "https", "git", "ssh"];

/// GitURL関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum GitUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Git URLの値オブジェクト
///
/// 元の文字列をそのまま保持する。クローン時にも正規化せずに渡す。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GitUrl {
    /// 設定ファイルに書かれたURL文字列（前後の空白のみ除去）
    url: String,

    /// URLのスキーム（https、git、ssh等）
    scheme: String,
}

impl GitUrl {
    /// 新しいGitUrlインスタンスを作成
    pub fn new(url: &str) -> Result<Self, GitUrlError> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(GitUrlError::InvalidFormat("Empty URL".to_string()));
        }

        // 絶対URIとして解析できない場合（相対パス、scp形式など）は拒否
        let parsed =
            Url::parse(trimmed).map_err(|_| GitUrlError::InvalidFormat(trimmed.to_string()))?;

        let scheme = parsed.scheme().to_string();
        if !SUPPORTED_SCHEMES.contains(&scheme.as_str()) {
            return Err(GitUrlError::UnsupportedScheme(scheme));
        }

        Ok(Self {
            url: trimmed.to_string(),
            scheme,
        })
    }

    /// URLがクローン対象として有効かどうか
    pub fn is_valid(url: &str) -> bool {
        Self::new(url).is_ok()
    }

    /// 元のURL文字列を取得
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// スキームを取得
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// リポジトリ名を取得
    pub fn repo_name(&self) -> String {
        derive_repository_name(&self.url)
    }

    /// 既存クローンのoriginが同じリポジトリを指しているか
    ///
    /// 末尾の`/`と`.git`の有無だけの違いは同一とみなす。
    pub fn same_repository(&self, other: &str) -> bool {
        comparable_form(&self.url) == comparable_form(other)
    }
}

fn comparable_form(url: &str) -> &str {
    let trimmed = url.trim().trim_end_matches('/');
    match trimmed.len().checked_sub(4).and_then(|i| trimmed.get(i..)) {
        Some(suffix) if suffix.eq_ignore_ascii_case(".git") => &trimmed[..trimmed.len() - 4],
        _ => trimmed,
    }
}

/// URL文字列からリポジトリ名を導出する
///
/// 末尾の`/`を除去し、`.git`サフィックス（大文字小文字を区別しない）を一度だけ除去し、
/// 最後の`/`以降を取り出す。`/`を含まない場合は文字列全体を返す。
pub fn derive_repository_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');

    let without_suffix = match trimmed.len().checked_sub(4).and_then(|i| trimmed.get(i..)) {
        Some(suffix) if suffix.eq_ignore_ascii_case(".git") => &trimmed[..trimmed.len() - 4],
        _ => trimmed,
    };

    match without_suffix.rfind('/') {
        Some(index) => without_suffix[index + 1..].to_string(),
        None => without_suffix.to_string(),
    }
}

impl fmt::Display for GitUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

impl TryFrom<&str> for GitUrl {
    type Error = GitUrlError;

    fn try_from(url: &str) -> Result<Self, Self::Error> {
        GitUrl::new(url)
    }
}

impl TryFrom<String> for GitUrl {
    type Error = GitUrlError;

    fn try_from(url: String) -> Result<Self, Self::Error> {
        GitUrl::new(&url)
    }
}
