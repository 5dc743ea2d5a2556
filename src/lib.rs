//! # repo-sbom - SBOM generation for a list of git repositories
//!
//! `repo-sbom` reads a JSON list of git URLs, keeps a local clone of each
//! repository up to date, and runs an external SPDX generator
//! (`sbom-tool` by default) against every clone. The result is one
//! `<name>.sbom.json` per repository in the output folder.
//!
//! ## Quick Start
//!
//! 1. Create a configuration file (`repos.json`):
//!
//! ```json
//! {
//!   "repositories": [
//!     "https://github.com/example/frontend.git",
//!     "https://github.com/example/backend.git"
//!   ]
//! }
//! ```
//!
//! 2. Generate the SBOMs:
//!
//! ```bash
//! repo-sbom repos.json sboms/
//! ```
//!
//! Repositories are processed one after another. A failing repository is
//! reported and skipped; the process exits with status 1 if any repository
//! failed and 0 otherwise.
//!
//! ## Architecture
//!
//! - [`domain`]: configuration, URLs, repository names and per-repository tasks
//! - [`application`]: task planning, synchronization, SBOM generation and the batch loop
//! - [`infrastructure`]: libgit2, subprocess execution and configuration loading
//! - [`presentation`]: command-line interface
//! - [`common`]: run-level errors
//!
//! ## Using the Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use repo_sbom::application::use_cases::batch_generate::{
//!     BatchGenerateConfig, BatchGenerateUseCase,
//! };
//! use repo_sbom::infrastructure::filesystem::ConfigStore;
//! use repo_sbom::infrastructure::sbom::SbomTool;
//! use repo_sbom::infrastructure::scm::GitScm;
//!
//! # async fn example() -> repo_sbom::Result<()> {
//! let repositories = ConfigStore::new().load("repos.json").await?;
//!
//! let config = BatchGenerateConfig::new("sboms").with_repos_root("repos");
//! let use_case = BatchGenerateUseCase::new(
//!     config,
//!     Arc::new(GitScm::new()),
//!     Arc::new(SbomTool::default()),
//! );
//! let result = use_case.execute(&repositories).await?;
//!
//! println!("{} succeeded, {} failed", result.succeeded_count, result.failed_count);
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use crate::common::error::HarvestError;
pub use crate::common::result::HarvestResult as Result;
