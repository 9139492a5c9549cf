//! Runs a single external command to completion
//!
//! The command is spawned directly (never through a shell) with stdout and
//! stderr piped. Output is read incrementally so the size ceiling is enforced
//! while the process is still producing, and four completion sources race
//! each other: normal exit, timeout, operator interrupt and output overflow.
//! Whichever is observed first decides the outcome. On unix the child leads
//! its own process group, and the whole group is killed on every failure path
//! before the child is reaped.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tracing::debug;

use super::error::{ProcessError, Result};

const READ_CHUNK_SIZE: usize = 4096;

/// How long the pipes may stay open after the child exits
const EXIT_DRAIN: Duration = Duration::from_millis(200);

/// Configuration for one command invocation
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Terminate the command and fail with `Timeout` after this long
    pub timeout: Option<Duration>,
    /// Run the command here instead of the current directory
    pub working_directory: Option<PathBuf>,
    /// Ceiling on combined stdout + stderr bytes
    pub max_output_bytes: Option<usize>,
    /// Replaces the inherited environment entirely when set
    pub environment: Option<HashMap<String, String>>,
    /// Process-wide interrupt flag; when absent the command cannot be interrupted
    pub interrupt: Option<watch::Receiver<bool>>,
}

impl ProcessOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    pub fn with_max_output_bytes(mut self, limit: usize) -> Self {
        self.max_output_bytes = Some(limit);
        self
    }

    pub fn with_environment(mut self, environment: HashMap<String, String>) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_interrupt(mut self, interrupt: watch::Receiver<bool>) -> Self {
        self.interrupt = Some(interrupt);
        self
    }
}

/// Combined, trimmed output and the real exit code of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub output: String,
    pub status: i32,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Executes `args[0]` (resolved through `PATH`) with the remaining elements as arguments
///
/// A non-zero exit code is returned as data, not as an error; callers decide
/// what an exit code means.
pub async fn execute<S: AsRef<str>>(args: &[S], options: &ProcessOptions) -> Result<ProcessOutput> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    let Some((program, rest)) = args.split_first() else {
        return Err(ProcessError::ProcessSetupError(
            "no command given".to_string(),
        ));
    };
    let command_line = args.join(" ");

    let mut command = Command::new(program);
    command
        .args(rest)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);

    if let Some(dir) = &options.working_directory {
        if !dir.is_dir() {
            return Err(ProcessError::InvalidWorkingDirectory {
                path: dir.display().to_string(),
            });
        }
        command.current_dir(dir);
    }

    if let Some(environment) = &options.environment {
        command.env_clear().envs(environment);
    }

    let mut child = command.spawn().map_err(|e| {
        ProcessError::ProcessSetupError(format!("failed to start '{command_line}': {e}"))
    })?;
    debug!(command = %command_line, pid = ?child.id(), "spawned");
    let mut group = ProcessGroup::new(child.id());

    match supervise(&mut child, &command_line, options).await {
        Ok(finished) => {
            if finished.lingering {
                debug!(command = %command_line, "exited with descendants still holding its output");
                group.kill();
            } else {
                group.release();
            }
            Ok(finished.output)
        }
        Err(e) => {
            debug!(command = %command_line, error = %e, "terminating");
            group.kill();
            terminate(&mut child).await;
            Err(e)
        }
    }
}

/// A completed run; `lingering` is set when descendants kept the pipes open past the drain
struct Finished {
    output: ProcessOutput,
    lingering: bool,
}

async fn supervise(
    child: &mut Child,
    command_line: &str,
    options: &ProcessOptions,
) -> Result<Finished> {
    let mut stdout = child.stdout.take().ok_or_else(|| {
        ProcessError::ProcessSetupError("stdout was not captured".to_string())
    })?;
    let mut stderr = child.stderr.take().ok_or_else(|| {
        ProcessError::ProcessSetupError("stderr was not captured".to_string())
    })?;

    let mut out_buf = Vec::new();
    let mut err_buf = Vec::new();
    let mut out_chunk = [0u8; READ_CHUNK_SIZE];
    let mut err_chunk = [0u8; READ_CHUNK_SIZE];
    let mut stdout_open = true;
    let mut stderr_open = true;
    let mut exit_status: Option<ExitStatus> = None;

    let deadline = expire(options.timeout);
    tokio::pin!(deadline);
    let interrupt = interrupted(options.interrupt.clone());
    tokio::pin!(interrupt);
    // Armed once the child has exited
    let drain = tokio::time::sleep(EXIT_DRAIN);
    tokio::pin!(drain);

    // Each iteration observes exactly one event; the first terminal event returns.
    loop {
        if !stdout_open && !stderr_open {
            if let Some(status) = exit_status {
                let output = finish(out_buf, err_buf, status, command_line)?;
                return Ok(Finished {
                    output,
                    lingering: false,
                });
            }
        }

        tokio::select! {
            read = stdout.read(&mut out_chunk), if stdout_open => match read {
                Ok(0) => stdout_open = false,
                Ok(n) => {
                    out_buf.extend_from_slice(&out_chunk[..n]);
                    check_limit(out_buf.len() + err_buf.len(), options.max_output_bytes)?;
                }
                Err(e) => {
                    return Err(ProcessError::ExecutionFailed(format!(
                        "failed to read stdout of '{command_line}': {e}"
                    )))
                }
            },
            read = stderr.read(&mut err_chunk), if stderr_open => match read {
                Ok(0) => stderr_open = false,
                Ok(n) => {
                    err_buf.extend_from_slice(&err_chunk[..n]);
                    check_limit(out_buf.len() + err_buf.len(), options.max_output_bytes)?;
                }
                Err(e) => {
                    return Err(ProcessError::ExecutionFailed(format!(
                        "failed to read stderr of '{command_line}': {e}"
                    )))
                }
            },
            status = child.wait(), if exit_status.is_none() => {
                let status = status.map_err(|e| {
                    ProcessError::ExecutionFailed(format!("failed to wait for '{command_line}': {e}"))
                })?;
                exit_status = Some(status);
                drain.as_mut().reset(tokio::time::Instant::now() + EXIT_DRAIN);
            }
            () = &mut drain, if exit_status.is_some() => {
                if let Some(status) = exit_status {
                    let output = finish(out_buf, err_buf, status, command_line)?;
                    return Ok(Finished {
                        output,
                        lingering: true,
                    });
                }
            }
            () = &mut deadline => {
                let seconds = options
                    .timeout
                    .map(|t| t.as_secs_f64().ceil() as u64)
                    .unwrap_or_default();
                return Err(ProcessError::Timeout {
                    command: command_line.to_string(),
                    seconds,
                });
            }
            () = &mut interrupt => {
                return Err(ProcessError::Interrupted {
                    command: command_line.to_string(),
                });
            }
        }
    }
}

fn check_limit(total: usize, limit: Option<usize>) -> Result<()> {
    match limit {
        Some(limit) if total > limit => Err(ProcessError::OutputTooLarge { limit }),
        _ => Ok(()),
    }
}

fn finish(
    mut stdout: Vec<u8>,
    stderr: Vec<u8>,
    status: ExitStatus,
    command_line: &str,
) -> Result<ProcessOutput> {
    stdout.extend_from_slice(&stderr);
    let text = String::from_utf8(stdout).map_err(|_| {
        ProcessError::ExecutionFailed(format!("output of '{command_line}' is not valid UTF-8"))
    })?;

    Ok(ProcessOutput {
        output: text.trim().to_string(),
        status: status.code().unwrap_or(-1),
    })
}

async fn expire(timeout: Option<Duration>) {
    match timeout {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending().await,
    }
}

async fn interrupted(receiver: Option<watch::Receiver<bool>>) {
    match receiver {
        Some(mut receiver) => {
            // A dropped sender means nobody can interrupt any more.
            let closed = receiver.wait_for(|stop| *stop).await.is_err();
            if closed {
                std::future::pending::<()>().await;
            }
        }
        None => std::future::pending::<()>().await,
    }
}

/// The process group led by a spawned child; killed on drop unless released
struct ProcessGroup {
    leader: Option<u32>,
}

impl ProcessGroup {
    fn new(leader: Option<u32>) -> Self {
        Self { leader }
    }

    /// Sends SIGKILL to every process still in the group
    fn kill(&mut self) {
        if let Some(leader) = self.leader.take() {
            kill_group(leader);
        }
    }

    /// Forgets the group once nothing of it can still be running
    fn release(&mut self) {
        self.leader = None;
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(unix)]
fn kill_group(leader: u32) {
    let Ok(pgid) = libc::pid_t::try_from(leader) else {
        return;
    };
    // SAFETY: killpg takes plain integers and touches no memory of ours.
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } != 0 {
        debug!(pgid, error = %std::io::Error::last_os_error(), "process group already gone");
    }
}

#[cfg(not(unix))]
fn kill_group(_leader: u32) {}

/// Kills the child if it is still running and reaps it
async fn terminate(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        debug!(error = %e, "child already exited");
    }
    if let Err(e) = child.wait().await {
        debug!(error = %e, "failed to reap child");
    }
}
