use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use crate::application::use_cases::batch_generate::{
    BatchGenerateConfig, BatchGenerateUseCase, BatchResult,
};
use crate::common::error::HarvestError;
use crate::infrastructure::filesystem::ConfigStore;
use crate::infrastructure::sbom::{SbomTool, SbomToolConfig, DEFAULT_TIMEOUT_SECS, DEFAULT_TOOL};
use crate::infrastructure::scm::GitScm;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_DATE"),
    ")"
);

/// repo-sbom - Generate an SPDX SBOM for every repository in a list
#[derive(Debug, Parser)]
#[command(name = "repo-sbom")]
#[command(about = "Clone or update a list of git repositories and generate an SBOM for each")]
#[command(version = VERSION)]
pub struct Cli {
    /// JSON file of the form {"repositories": ["<git url>", ...]}
    pub config_file: PathBuf,

    /// Folder that receives one <name>.sbom.json per repository
    pub output_folder: PathBuf,

    /// Folder holding the local clones
    #[arg(long, env = "REPO_SBOM_REPOS_ROOT", default_value = "repos")]
    pub repos_root: PathBuf,

    /// SBOM generator executable
    #[arg(long, env = "REPO_SBOM_TOOL", default_value = DEFAULT_TOOL)]
    pub tool: PathBuf,

    /// Extra argument passed to the generator before `generate` (repeatable)
    #[arg(long = "tool-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub tool_args: Vec<String>,

    /// Kill the generator after this many seconds (0 disables the limit)
    #[arg(long, env = "REPO_SBOM_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Generator deadline, `None` when disabled
    pub fn generator_timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(self) -> ExitCode {
        if self.cli.no_color {
            colored::control::set_override(false);
        }

        match self.handle_batch().await {
            Ok(result) => {
                self.print_summary(&result);
                ExitCode::from(result.exit_code())
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                let is_config_error = e
                    .downcast_ref::<HarvestError>()
                    .is_some_and(HarvestError::is_config_error);
                if is_config_error {
                    eprintln!(
                        "  Expected a JSON file like {}",
                        r#"{"repositories": ["https://github.com/owner/repo.git"]}"#.dimmed()
                    );
                }
                ExitCode::from(1)
            }
        }
    }

    async fn handle_batch(&self) -> anyhow::Result<BatchResult> {
        let repositories = ConfigStore::new().load(&self.cli.config_file).await?;

        println!(
            "{} Generating SBOMs for {} repositories into {}",
            "::".blue().bold(),
            repositories.len(),
            self.cli.output_folder.display()
        );

        let tool = SbomTool::new(
            SbomToolConfig::default()
                .with_program(&self.cli.tool)
                .with_leading_args(self.cli.tool_args.clone())
                .with_timeout(self.cli.generator_timeout()),
        );

        let config = BatchGenerateConfig::new(&self.cli.output_folder)
            .with_repos_root(&self.cli.repos_root)
            .with_verbose(self.cli.verbose);

        let use_case = BatchGenerateUseCase::new(config, Arc::new(GitScm::new()), Arc::new(tool));
        Ok(use_case.execute(&repositories).await?)
    }

    fn print_summary(&self, result: &BatchResult) {
        println!();
        println!(
            "{} Summary: {} succeeded, {} failed",
            "::".blue().bold(),
            result.succeeded_count,
            result.failed_count
        );

        if !result.generated.is_empty() {
            println!("Generated {} SBOMs:", result.generated.len());
            for sbom_path in &result.generated {
                println!("  - {}", sbom_path.display());
            }
        }

        if result.is_success() {
            println!(
                "{} All {} repositories processed successfully",
                "✓".green(),
                result.total()
            );
            return;
        }

        println!(
            "{} {} of {} repositories failed:",
            "✗".red(),
            result.failed_count,
            result.total()
        );
        for failure in &result.failures {
            println!("  - {}: {}", failure.url, failure.message);
        }
    }
}
