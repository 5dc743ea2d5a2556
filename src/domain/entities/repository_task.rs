use std::path::{Path, PathBuf};

use crate::domain::value_objects::{git_url::GitUrl, repository_name::RepositoryName};

/// 1リポジトリ分の処理単位
///
/// 各イテレーションの開始時に作られ、処理後に破棄される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTask {
    /// クローン元URL
    pub url: GitUrl,

    /// ローカルディレクトリ名および出力ファイル名の元になる名前
    pub name: RepositoryName,

    /// ローカルクローンのパス（`{repos_root}/{name}`）
    pub local_path: PathBuf,
}

impl RepositoryTask {
    /// 新しいRepositoryTaskを作成
    pub fn new(url: GitUrl, name: RepositoryName, repos_root: &Path) -> Self {
        let local_path = repos_root.join(name.as_str());
        Self {
            url,
            name,
            local_path,
        }
    }

    /// 出力ファイルのパス（`{output_folder}/{name}.sbom.json`）
    pub fn sbom_path(&self, output_folder: &Path) -> PathBuf {
        output_folder.join(format!("{}.sbom.json", self.name))
    }

    /// スクラッチディレクトリのパス（`{output_folder}/_manifest_{name}`）
    pub fn scratch_dir(&self, output_folder: &Path) -> PathBuf {
        output_folder.join(format!("_manifest_{}", self.name))
    }
}
