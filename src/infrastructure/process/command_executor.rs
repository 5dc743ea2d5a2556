use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command as TokioCommand;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Command executor errors
#[derive(Debug, Error)]
pub enum CommandExecutorError {
    #[error("Command timed out after {timeout_seconds} seconds")]
    Timeout {
        timeout_seconds: u64,
        /// Output captured before the process was killed
        stdout: String,
        stderr: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Process spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Process termination failed: {0}")]
    TerminationFailed(String),
}

/// Configuration for command execution
#[derive(Debug, Clone, Default)]
pub struct ExecutionConfig {
    /// Deadline for the whole run; the process is killed when it expires
    pub timeout: Option<Duration>,
}

impl ExecutionConfig {
    /// Create a new execution config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Result of command execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Exit code of the process (-1 when terminated by a signal)
    pub exit_code: i32,

    /// Standard output
    pub stdout: String,

    /// Standard error output
    pub stderr: String,

    /// Execution time in milliseconds
    pub execution_time_ms: u64,

    /// Whether the command was successful (exit code 0)
    pub success: bool,
}

impl ExecutionResult {
    /// Create a new execution result
    pub fn new(exit_code: i32, stdout: String, stderr: String, execution_time_ms: u64) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            execution_time_ms,
            success: exit_code == 0,
        }
    }
}

/// Command executor for running external processes
pub struct CommandExecutor;

impl CommandExecutor {
    /// Run `program` with `args` and capture both output streams.
    ///
    /// stdout and stderr are drained by two separate tasks while the process
    /// runs, so a child that fills one pipe cannot stall on it. A non-zero
    /// exit is reported through [`ExecutionResult::success`], not as an error.
    pub async fn execute<I, S>(
        program: impl AsRef<Path>,
        args: I,
        config: &ExecutionConfig,
    ) -> Result<ExecutionResult, CommandExecutorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let program = program.as_ref();
        if program.as_os_str().is_empty() {
            return Err(CommandExecutorError::InvalidCommand(
                "Program is empty".to_string(),
            ));
        }

        let start_time = Instant::now();

        let mut cmd = TokioCommand::new(program);
        cmd.args(args.into_iter().map(Into::<OsString>::into));

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            CommandExecutorError::SpawnFailed(format!(
                "Failed to spawn '{}': {}",
                program.display(),
                e
            ))
        })?;

        let stdout_buffer = SharedBuffer::default();
        let stderr_buffer = SharedBuffer::default();
        let mut stdout_reader = spawn_reader(child.stdout.take(), stdout_buffer.clone());
        let mut stderr_reader = spawn_reader(child.stderr.take(), stderr_buffer.clone());

        // The deadline covers the readers too: a background process can keep
        // the pipes open after the direct child has exited.
        let run = async {
            let status = child.wait().await.map_err(|e| {
                CommandExecutorError::TerminationFailed(format!(
                    "Failed to wait for process: {}",
                    e
                ))
            })?;
            join_reader(&mut stdout_reader).await?;
            join_reader(&mut stderr_reader).await?;
            Ok::<_, CommandExecutorError>(status)
        };

        let exit_status = match config.timeout {
            Some(limit) => {
                let outcome = timeout(limit, run).await;
                match outcome {
                    Ok(status) => status?,
                    Err(_) => {
                        stdout_reader.abort();
                        stderr_reader.abort();
                        if let Err(e) = child.kill().await {
                            tracing::warn!("Failed to kill '{}': {}", program.display(), e);
                        }
                        return Err(CommandExecutorError::Timeout {
                            timeout_seconds: limit.as_secs(),
                            stdout: drain(&stdout_buffer).await,
                            stderr: drain(&stderr_buffer).await,
                        });
                    }
                }
            }
            None => run.await?,
        };

        let stdout = drain(&stdout_buffer).await;
        let stderr = drain(&stderr_buffer).await;

        let execution_time = start_time.elapsed().as_millis() as u64;
        tracing::debug!(
            "'{}' exited with {} after {} ms",
            program.display(),
            exit_status,
            execution_time
        );

        Ok(ExecutionResult::new(
            exit_status.code().unwrap_or(-1),
            stdout,
            stderr,
            execution_time,
        ))
    }
}

/// Output collected so far by one reader task
type SharedBuffer = Arc<Mutex<Vec<u8>>>;

fn spawn_reader<R>(stream: Option<R>, buffer: SharedBuffer) -> JoinHandle<std::io::Result<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(mut stream) = stream else {
            return Ok(());
        };
        let mut chunk = [0u8; 8192];
        loop {
            let read = stream.read(&mut chunk).await?;
            if read == 0 {
                return Ok(());
            }
            buffer.lock().await.extend_from_slice(&chunk[..read]);
        }
    })
}

async fn join_reader(
    handle: &mut JoinHandle<std::io::Result<()>>,
) -> Result<(), CommandExecutorError> {
    handle
        .await
        .map_err(|e| CommandExecutorError::TerminationFailed(format!("Output reader failed: {}", e)))?
        .map_err(CommandExecutorError::IoError)
}

async fn drain(buffer: &SharedBuffer) -> String {
    String::from_utf8_lossy(&buffer.lock().await).into_owned()
}
