//! Test helper functions and utilities

use git2::{Repository, Signature};
use std::path::{Path, PathBuf};

/// Base of URLs that refuse connections immediately
pub const UNREACHABLE_BASE: &str = "https://127.0.0.1:1/owner";

/// URL of a repository that can never be cloned or pulled
pub fn unreachable_url(name: &str) -> String {
    format!("{}/{}.git", UNREACHABLE_BASE, name)
}

/// Write `{"repositories": [...]}` and return its path
pub fn write_config(dir: &Path, urls: &[String]) -> PathBuf {
    let path = dir.join("repos.json");
    let content = serde_json::json!({ "repositories": urls });
    std::fs::write(&path, content.to_string()).expect("Failed to write config");
    path
}

/// Create `{repos_root}/{name}` as a git repository with one commit and
/// an `origin` that cannot be reached, so pulls fail and the clone is reused.
pub fn create_stale_clone(repos_root: &Path, name: &str) -> PathBuf {
    create_clone_with_origin(repos_root, name, &unreachable_url(name))
}

/// Create `{repos_root}/{name}` as a git repository with one commit whose
/// `origin` points at `origin_url`
pub fn create_clone_with_origin(repos_root: &Path, name: &str, origin_url: &str) -> PathBuf {
    let path = repos_root.join(name);
    std::fs::create_dir_all(&path).expect("Failed to create clone directory");

    let repo = Repository::init(&path).expect("Failed to init repository");
    std::fs::write(path.join("README.md"), format!("# {}\n", name)).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new("README.md")).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = Signature::now("Test User", "test@example.com").unwrap();
    repo.commit(Some("HEAD"), &signature, &signature, "Initial commit", &tree, &[])
        .unwrap();

    repo.remote("origin", origin_url).unwrap();
    path
}

/// How the fake generator behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeTool {
    /// Writes `_manifest/spdx_2.2/manifest.spdx.json` and exits 0
    Succeed,
    /// Exits 0 without writing anything
    NoArtifact,
    /// Prints to stderr and exits 2
    Fail,
    /// Prints a progress line, then sleeps far longer than any test timeout
    Hang,
}

/// Write the fake generator script; run it as `sh <script> generate ...`
pub fn write_fake_tool(dir: &Path, behavior: FakeTool) -> PathBuf {
    let body = match behavior {
        FakeTool::Succeed => {
            r#"
name=""
manifest=""
while [ $# -gt 0 ]; do
  case "$1" in
    -pn) name="$2"; shift 2 ;;
    -m) manifest="$2"; shift 2 ;;
    *) shift ;;
  esac
done
mkdir -p "$manifest/_manifest/spdx_2.2"
printf '{"spdxVersion":"SPDX-2.2","name":"%s"}' "$name" > "$manifest/_manifest/spdx_2.2/manifest.spdx.json"
echo "generated $name"
"#
        }
        FakeTool::NoArtifact => "echo \"nothing to do\"\n",
        FakeTool::Fail => "echo \"fake failure\" >&2\nexit 2\n",
        FakeTool::Hang => "echo \"scanning sources\"\nexec sleep 30\n",
    };

    let path = dir.join("fake-sbom-tool.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{}", body)).expect("Failed to write fake tool");
    path
}

/// Names of the `_manifest_*` scratch directories left in a folder
pub fn scratch_dirs(output: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(output)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|n| n.starts_with("_manifest_"))
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
