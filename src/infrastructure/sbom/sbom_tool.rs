use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use super::generator_interface::{
    GeneratorOutput, ManifestGenerator, ManifestGeneratorError, ManifestRequest,
};
use crate::infrastructure::process::{CommandExecutor, CommandExecutorError, ExecutionConfig};

/// Default generator executable
pub const DEFAULT_TOOL: &str = "sbom-tool";

/// Default generator deadline
pub const DEFAULT_TIMEOUT_SECS: u64 = 1800;

/// How to invoke the external SBOM generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbomToolConfig {
    /// Program to run
    pub program: PathBuf,

    /// Arguments placed before `generate` (e.g. a wrapper's own arguments)
    pub leading_args: Vec<String>,

    /// Kill the generator after this long; `None` waits forever
    pub timeout: Option<Duration>,
}

impl Default for SbomToolConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_TOOL),
            leading_args: Vec::new(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

impl SbomToolConfig {
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_leading_args(mut self, args: Vec<String>) -> Self {
        self.leading_args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Runs an `sbom-tool`-compatible generator as a subprocess
#[derive(Debug, Clone, Default)]
pub struct SbomTool {
    config: SbomToolConfig,
}

impl SbomTool {
    pub fn new(config: SbomToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SbomToolConfig {
        &self.config
    }

    /// Full argument list after the program name
    pub fn build_args(&self, request: &ManifestRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.config.leading_args.iter().map(OsString::from).collect();

        args.push("generate".into());
        args.push("-b".into());
        args.push(request.source_path.clone().into_os_string());
        args.push("-bc".into());
        args.push(request.build_path.clone().into_os_string());
        args.push("-pn".into());
        args.push(request.package_name.clone().into());
        args.push("-pv".into());
        args.push(request.package_version.clone().into());
        args.push("-ps".into());
        args.push(request.supplier.clone().into());
        args.push("-nsb".into());
        args.push(request.namespace_base_uri.clone().into());
        args.push("-m".into());
        args.push(request.manifest_dir.clone().into_os_string());

        args
    }
}

#[async_trait]
impl ManifestGenerator for SbomTool {
    async fn generate(
        &self,
        request: &ManifestRequest,
    ) -> Result<GeneratorOutput, ManifestGeneratorError> {
        let args = self.build_args(request);
        tracing::debug!("Running {} {:?}", self.config.program.display(), args);

        let mut exec_config = ExecutionConfig::new();
        if let Some(limit) = self.config.timeout {
            exec_config = exec_config.with_timeout(limit);
        }

        let result = CommandExecutor::execute(&self.config.program, args, &exec_config)
            .await
            .map_err(|e| map_executor_error(&self.config.program.display().to_string(), e))?;

        let output = GeneratorOutput {
            stdout: result.stdout,
            stderr: result.stderr,
        };

        if !result.success {
            return Err(ManifestGeneratorError::ExitedNonZero {
                exit_code: result.exit_code,
                output,
            });
        }

        Ok(output)
    }
}

/// Only a process that never started counts as a launch failure
fn map_executor_error(program: &str, error: CommandExecutorError) -> ManifestGeneratorError {
    match error {
        CommandExecutorError::Timeout {
            timeout_seconds,
            stdout,
            stderr,
        } => ManifestGeneratorError::TimedOut {
            timeout_secs: timeout_seconds,
            output: GeneratorOutput { stdout, stderr },
        },
        e @ (CommandExecutorError::SpawnFailed(_) | CommandExecutorError::InvalidCommand(_)) => {
            ManifestGeneratorError::LaunchFailed {
                program: program.to_string(),
                message: e.to_string(),
            }
        }
        e @ (CommandExecutorError::IoError(_) | CommandExecutorError::TerminationFailed(_)) => {
            ManifestGeneratorError::ExecutionFailed {
                program: program.to_string(),
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request() -> ManifestRequest {
        ManifestRequest {
            source_path: PathBuf::from("/repos/tool"),
            build_path: PathBuf::from("/repos/tool"),
            package_name: "tool".to_string(),
            package_version: "1.0.0".to_string(),
            supplier: "Example Org".to_string(),
            namespace_base_uri: "https://sbom.example.com".to_string(),
            manifest_dir: PathBuf::from("/out/_manifest_tool"),
        }
    }

    #[test]
    fn test_build_args() {
        let tool = SbomTool::default();
        let args: Vec<String> = tool
            .build_args(&request())
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "generate",
                "-b",
                "/repos/tool",
                "-bc",
                "/repos/tool",
                "-pn",
                "tool",
                "-pv",
                "1.0.0",
                "-ps",
                "Example Org",
                "-nsb",
                "https://sbom.example.com",
                "-m",
                "/out/_manifest_tool",
            ]
        );
    }

    #[test]
    fn test_leading_args_come_first() {
        let tool = SbomTool::new(
            SbomToolConfig::default()
                .with_program("dotnet")
                .with_leading_args(vec!["sbom-tool.dll".to_string()]),
        );
        let args = tool.build_args(&request());
        assert_eq!(args[0], OsString::from("sbom-tool.dll"));
        assert_eq!(args[1], OsString::from("generate"));
    }

    #[test]
    fn test_default_config() {
        let config = SbomToolConfig::default();
        assert_eq!(config.program, PathBuf::from(DEFAULT_TOOL));
        assert!(config.leading_args.is_empty());
        assert_eq!(config.timeout, Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_launch_failure() {
        let tool = SbomTool::new(
            SbomToolConfig::default().with_program("/nonexistent/sbom-tool-missing"),
        );
        let result = tool.generate(&request()).await;
        assert!(matches!(
            result,
            Err(ManifestGeneratorError::LaunchFailed { .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_keeps_output() {
        let tool = SbomTool::new(
            SbomToolConfig::default()
                .with_program("sh")
                .with_leading_args(vec!["-c".to_string(), "echo broken >&2; exit 4".to_string()]),
        );
        match tool.generate(&request()).await {
            Err(ManifestGeneratorError::ExitedNonZero { exit_code, output }) => {
                assert_eq!(exit_code, 4);
                assert_eq!(output.stderr.trim(), "broken");
            }
            other => panic!("Expected ExitedNonZero, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout() {
        let tool = SbomTool::new(
            SbomToolConfig::default()
                .with_program("sh")
                .with_leading_args(vec!["-c".to_string(), "exec sleep 30".to_string()])
                .with_timeout(Some(Duration::from_secs(1))),
        );
        assert!(matches!(
            tool.generate(&request()).await,
            Err(ManifestGeneratorError::TimedOut {
                timeout_secs: 1,
                ..
            })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_keeps_partial_output() {
        let tool = SbomTool::new(
            SbomToolConfig::default()
                .with_program("sh")
                .with_leading_args(vec![
                    "-c".to_string(),
                    "echo enumerating packages; exec sleep 30".to_string(),
                ])
                .with_timeout(Some(Duration::from_secs(1))),
        );
        match tool.generate(&request()).await {
            Err(ManifestGeneratorError::TimedOut { output, .. }) => {
                assert_eq!(output.stdout.trim(), "enumerating packages");
            }
            other => panic!("Expected TimedOut, got {:?}", other),
        }
    }

    #[test]
    fn test_spawn_errors_are_launch_failures() {
        let spawn = map_executor_error(
            "sbom-tool",
            CommandExecutorError::SpawnFailed("No such file or directory".to_string()),
        );
        assert!(matches!(spawn, ManifestGeneratorError::LaunchFailed { .. }));

        let invalid = map_executor_error(
            "",
            CommandExecutorError::InvalidCommand("Program is empty".to_string()),
        );
        assert!(matches!(invalid, ManifestGeneratorError::LaunchFailed { .. }));
    }

    #[test]
    fn test_runtime_errors_are_not_launch_failures() {
        let wait = map_executor_error(
            "sbom-tool",
            CommandExecutorError::TerminationFailed("Failed to wait for process".to_string()),
        );
        match wait {
            ManifestGeneratorError::ExecutionFailed { program, message } => {
                assert_eq!(program, "sbom-tool");
                assert!(message.contains("Failed to wait for process"));
            }
            other => panic!("Expected ExecutionFailed, got {:?}", other),
        }

        let io = map_executor_error(
            "sbom-tool",
            CommandExecutorError::IoError(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "pipe closed",
            )),
        );
        assert!(matches!(io, ManifestGeneratorError::ExecutionFailed { .. }));
    }
}
