//! Shared plumbing for running external command-line tools.
//!
//! The separator, muxer and fetcher all shell out and only care about the
//! exit status plus enough stderr to explain a failure. Children are spawned
//! with `kill_on_drop`, so a stage future dropped on timeout or cancellation
//! takes its process down with it.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

/// Number of trailing stderr lines kept for diagnostics.
const STDERR_TAIL_LINES: usize = 20;

/// Errors from running an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Binary could not be found.
    #[error("{program} not found")]
    NotFound { program: PathBuf },

    /// Tool ran and exited with a failure status.
    #[error("{program} exited with code {code:?}")]
    Failed {
        program: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// I/O error while spawning or waiting.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Captured stderr, if the tool got far enough to produce any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Failed { stderr, .. } if !stderr.is_empty() => Some(stderr),
            _ => None,
        }
    }
}

/// A fully built invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().to_string())
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Human readable command line for logs.
    pub fn display(&self) -> String {
        let mut line = self.program.to_string_lossy().to_string();
        for arg in &self.args {
            line.push(' ');
            if arg.contains(' ') {
                line.push('"');
                line.push_str(arg);
                line.push('"');
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub duration: Duration,
    pub stderr: String,
}

/// Runs `command` to completion.
pub async fn run_tool(command: &ToolCommand) -> Result<ToolOutput, ToolError> {
    let start = Instant::now();
    debug!("Running {}", command.display());

    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &command.current_dir {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ToolError::NotFound {
                program: command.program.clone(),
            }
        } else {
            ToolError::Io(e)
        }
    })?;

    // Tools print titles and tags in whatever encoding they like, so lines
    // are decoded lossily. A read error only ends the capture; the exit
    // status still decides the outcome.
    let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
    if let Some(stderr) = child.stderr.take() {
        let mut lines = BufReader::new(stderr).split(b'\n');
        while let Ok(Some(raw)) = lines.next_segment().await {
            let line = String::from_utf8_lossy(&raw);
            if tail.len() == STDERR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line.trim_end_matches('\r').to_string());
        }
    }

    let status = child.wait().await?;
    let stderr = tail.into_iter().collect::<Vec<_>>().join("\n");

    if !status.success() {
        return Err(ToolError::Failed {
            program: command.program.clone(),
            code: status.code(),
            stderr,
        });
    }

    Ok(ToolOutput {
        duration: start.elapsed(),
        stderr,
    })
}

/// Size of `path` if it exists and is a non-empty regular file.
pub async fn non_empty_file(path: &Path) -> Option<u64> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Some(meta.len()),
        _ => None,
    }
}
