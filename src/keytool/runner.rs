//! Blocking execution of the external key tool.
//!
//! Each run wires the child to anonymous temporary files: one holding the
//! optional stdin bytes, one receiving stdout and one receiving stderr. The
//! files are unlinked on creation and closed when the run returns, on every
//! path. Reading the captures only after exit also means a chatty child can
//! never block on a full pipe.

use crate::config::Config;
use crate::error::{KsError, Result};
use crate::keytool::args::{flatten, masked, Arg};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How often a child is polled while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Outcome of one successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Process exit code; always 0 for a returned result.
    pub exit_code: i32,

    /// Captured stdout. Empty when stdout was copied into a caller sink.
    pub stdout: String,

    /// Captured stderr, never shown on success.
    pub stderr: String,
}

/// Runs `keytool` (or any compatible program) synchronously.
#[derive(Debug, Clone)]
pub struct KeytoolRunner {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl KeytoolRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            program: config.keytool.clone(),
            timeout: config.timeout,
        }
    }

    /// Kill the child and fail when it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run with `args`, returning stdout as a string.
    ///
    /// `stdin` bytes, when given, are fed to the child; otherwise it reads
    /// from the null device. A non-zero exit yields
    /// [`KsError::InvocationFailure`] carrying stdout followed by stderr.
    pub fn run(&self, args: &[Arg], stdin: Option<&[u8]>) -> Result<CommandResult> {
        self.execute(args, stdin, None)
    }

    /// Run with `args`, copying stdout into `sink` instead of returning it.
    ///
    /// Output is written to the sink before the exit status is checked, so
    /// it stays visible there when the run fails.
    pub fn run_into(
        &self,
        args: &[Arg],
        stdin: Option<&[u8]>,
        sink: &mut dyn Write,
    ) -> Result<CommandResult> {
        self.execute(args, stdin, Some(sink))
    }

    fn execute(
        &self,
        args: &[Arg],
        stdin: Option<&[u8]>,
        sink: Option<&mut dyn Write>,
    ) -> Result<CommandResult> {
        let argv = flatten(args);
        debug!(
            program = %self.program.display(),
            args = ?masked(&argv),
            piped_stdin = stdin.is_some(),
            "running keytool"
        );

        let stdin_stdio = match stdin {
            Some(bytes) => {
                let mut input = tempfile::tempfile()?;
                input.write_all(bytes)?;
                input.seek(SeekFrom::Start(0))?;
                Stdio::from(input)
            }
            None => Stdio::null(),
        };
        let mut stdout_file = tempfile::tempfile()?;
        let mut stderr_file = tempfile::tempfile()?;

        let mut child = Command::new(&self.program)
            .args(&argv)
            .stdin(stdin_stdio)
            .stdout(Stdio::from(stdout_file.try_clone()?))
            .stderr(Stdio::from(stderr_file.try_clone()?))
            .spawn()
            .map_err(|source| KsError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let status = self.wait(&mut child)?;

        let stdout = read_capture(&mut stdout_file)?;
        let stderr = read_capture(&mut stderr_file)?;

        let sunk = sink.is_some();
        if let Some(sink) = sink {
            sink.write_all(stdout.as_bytes())?;
            sink.flush()?;
        }

        let Some(status) = status else {
            let timeout = self.timeout.unwrap_or_default();
            warn!(program = %self.program.display(), ?timeout, "keytool timed out");
            return Err(KsError::Timeout {
                program: self.program.display().to_string(),
                timeout,
            });
        };

        let exit_code = status.code().unwrap_or(-1);
        if exit_code != 0 {
            let message = failure_message(&stdout, &stderr);
            debug!(exit_code, %message, "keytool failed");
            return Err(KsError::InvocationFailure {
                code: exit_code,
                message,
            });
        }

        let stdout = if sunk { String::new() } else { stdout };
        Ok(CommandResult {
            exit_code,
            stdout,
            stderr,
        })
    }

    /// Wait for exit; `None` means the timeout fired and the child was killed.
    fn wait(&self, child: &mut Child) -> Result<Option<ExitStatus>> {
        let Some(limit) = self.timeout else {
            return Ok(Some(child.wait()?));
        };

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if started.elapsed() >= limit {
                // The child may have exited between the poll and the kill.
                let _ = child.kill();
                child.wait()?;
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn read_capture(file: &mut File) -> Result<String> {
    file.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Trimmed stdout followed by trimmed stderr, skipping empty parts.
fn failure_message(stdout: &str, stderr: &str) -> String {
    [stdout.trim(), stderr.trim()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}
