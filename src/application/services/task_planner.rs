use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::entities::repository_task::RepositoryTask;
use crate::domain::value_objects::{
    git_url::{GitUrl, GitUrlError},
    repository_name::{RepositoryName, RepositoryNameError},
};

/// タスク作成時のエラー
#[derive(Debug, Error, PartialEq)]
pub enum TaskPlanError {
    #[error("Invalid repository URL: {0}")]
    InvalidUrl(#[from] GitUrlError),

    #[error("Invalid repository name: {0}")]
    InvalidRepositoryName(#[from] RepositoryNameError),
}

/// URLからRepositoryTaskを作るサービス
///
/// 1回のバッチ実行の間、割り当て済みの名前を覚えておき、
/// 別のURLが同じ名前になる場合は `-2`, `-3` ... を付けて区別する。
/// 同じURLが再度現れた場合は同じ名前を返す。
#[derive(Debug)]
pub struct TaskPlanner {
    repos_root: PathBuf,
    /// 名前 -> その名前を割り当てたURL
    assigned: HashMap<RepositoryName, String>,
}

impl TaskPlanner {
    /// 新しいTaskPlannerを作成
    pub fn new(repos_root: impl Into<PathBuf>) -> Self {
        Self {
            repos_root: repos_root.into(),
            assigned: HashMap::new(),
        }
    }

    /// クローン先のルートディレクトリ
    pub fn repos_root(&self) -> &Path {
        &self.repos_root
    }

    /// URLを検証し、一意な名前を割り当てたタスクを作成
    pub fn plan(&mut self, url: &str) -> Result<RepositoryTask, TaskPlanError> {
        let git_url = GitUrl::new(url)?;
        let base = RepositoryName::from_url(&git_url)?;
        let name = self.claim(base, git_url.as_str());

        Ok(RepositoryTask::new(git_url, name, &self.repos_root))
    }

    /// ディスク上のクローンが別のURLのものと判明した名前を、そのURLに割り当て直す
    ///
    /// 以後の `plan` はこの名前を避けて次のサフィックスを使う。
    pub fn mark_foreign(&mut self, name: &RepositoryName, owner_url: impl Into<String>) {
        self.assigned.insert(name.clone(), owner_url.into());
    }

    fn claim(&mut self, base: RepositoryName, url: &str) -> RepositoryName {
        let mut candidate = base.clone();
        let mut suffix = 1;

        loop {
            match self.assigned.get(&candidate) {
                Some(owner) if owner == url => return candidate,
                Some(_) => {
                    suffix += 1;
                    candidate = base.with_suffix(suffix);
                }
                None => {
                    if suffix > 1 {
                        tracing::debug!(
                            "Name '{}' already taken, using '{}' for {}",
                            base,
                            candidate,
                            url
                        );
                    }
                    self.assigned.insert(candidate.clone(), url.to_string());
                    return candidate;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plan_paths() {
        let mut planner = TaskPlanner::new("/work/repos");
        let task = planner.plan("https://github.com/owner/tool.git").unwrap();

        assert_eq!(task.name.as_str(), "tool");
        assert_eq!(task.local_path, PathBuf::from("/work/repos/tool"));
        assert_eq!(task.url.as_str(), "https://github.com/owner/tool.git");
    }

    #[test]
    fn test_colliding_names_are_disambiguated() {
        let mut planner = TaskPlanner::new("repos");
        let first = planner.plan("https://github.com/alice/tool.git").unwrap();
        let second = planner.plan("https://gitlab.com/bob/tool").unwrap();
        let third = planner.plan("ssh://git@example.com/carol/tool.git").unwrap();

        assert_eq!(first.name.as_str(), "tool");
        assert_eq!(second.name.as_str(), "tool-2");
        assert_eq!(third.name.as_str(), "tool-3");
        assert_ne!(first.local_path, second.local_path);
    }

    #[test]
    fn test_repeated_url_reuses_name() {
        let mut planner = TaskPlanner::new("repos");
        planner.plan("https://github.com/alice/tool.git").unwrap();
        let other = planner.plan("https://github.com/bob/tool.git").unwrap();
        let again = planner.plan("https://github.com/bob/tool.git").unwrap();

        assert_eq!(other.name, again.name);
        assert_eq!(again.name.as_str(), "tool-2");
    }

    #[test]
    fn test_derived_name_can_match_suffixed_name() {
        let mut planner = TaskPlanner::new("repos");
        planner.plan("https://github.com/a/tool.git").unwrap();
        planner.plan("https://github.com/b/tool.git").unwrap();
        let literal = planner.plan("https://github.com/c/tool-2.git").unwrap();

        assert_eq!(literal.name.as_str(), "tool-2-2");
    }

    #[test]
    fn test_foreign_clone_pushes_url_to_next_suffix() {
        let mut planner = TaskPlanner::new("repos");
        let first = planner.plan("https://github.com/bob/tool.git").unwrap();
        planner.mark_foreign(&first.name, "https://github.com/alice/tool.git");

        let retried = planner.plan("https://github.com/bob/tool.git").unwrap();
        assert_eq!(retried.name.as_str(), "tool-2");
        assert_eq!(retried.local_path, PathBuf::from("repos/tool-2"));

        // 元の持ち主が後から現れた場合は既存のクローンを使う
        let owner = planner.plan("https://github.com/alice/tool.git").unwrap();
        assert_eq!(owner.name.as_str(), "tool");
    }

    #[test]
    fn test_unsafe_characters_are_replaced() {
        let mut planner = TaskPlanner::new("repos");
        let task = planner.plan("https://example.com/owner/my%20repo").unwrap();

        assert_eq!(task.name.as_str(), "my_20repo");
        assert!(task.local_path.starts_with("repos"));
    }

    #[test]
    fn test_invalid_url() {
        let mut planner = TaskPlanner::new("repos");
        assert!(matches!(
            planner.plan("not a url"),
            Err(TaskPlanError::InvalidUrl(_))
        ));
        assert!(matches!(
            planner.plan("ftp://example.com/owner/repo.git"),
            Err(TaskPlanError::InvalidUrl(GitUrlError::UnsupportedScheme(_)))
        ));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut planner = TaskPlanner::new("repos");
        assert!(matches!(
            planner.plan("https://example.com/.git"),
            Err(TaskPlanError::InvalidRepositoryName(_))
        ));
    }
}
