//! Child-process execution of console programs.
//!
//! [`ProcessHarness`] spawns a real executable, writes each command as one
//! line on its stdin, closes stdin, and captures stdout line by line. Output
//! that is not valid UTF-8 is decoded lossily. The run ends when the program
//! exits, even if a descendant keeps stdout open. The whole run is bounded by
//! a wall-clock timeout; a child that outlives it is killed.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::runtime::Builder;
use tracing::{debug, trace};

use super::{ExitPolicy, Harness};
use crate::config::{DEFAULT_TIMEOUT, VerifyConfig};
use crate::error::HarnessError;

/// How long to keep reading stdout after the program has exited.
const DRAIN_GRACE: Duration = Duration::from_millis(100);

/// Strip one trailing `\n` or `\r\n`.
fn trim_line_ending(line: &[u8]) -> &[u8] {
    match line.strip_suffix(b"\n") {
        Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
        None => line,
    }
}

/// Runs a console program as a child process.
#[derive(Debug, Clone)]
pub struct ProcessHarness {
    /// The executable to run.
    program: String,
    /// Arguments placed before the launch arguments.
    base_args: Vec<String>,
    /// Extra environment variables.
    env: HashMap<String, String>,
    /// Working directory for the child.
    working_dir: Option<PathBuf>,
    /// Wall-clock limit for one invocation.
    timeout: Duration,
    /// Commands for the next invocation.
    input: Vec<String>,
    /// Lines captured by the last invocation.
    output: Vec<String>,
    /// The exit policy for the next invocation.
    policy: ExitPolicy,
}

impl ProcessHarness {
    /// Create a harness for the given executable.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
            env: HashMap::new(),
            working_dir: None,
            timeout: DEFAULT_TIMEOUT,
            input: Vec::new(),
            output: Vec::new(),
            policy: ExitPolicy::default(),
        }
    }

    /// Create a harness using the timeout and exit policy from `config`.
    #[must_use]
    pub fn with_config(program: impl Into<String>, config: &VerifyConfig) -> Self {
        let mut harness = Self::new(program).timeout(config.timeout);
        harness.policy = config.exit_policy;
        harness
    }

    /// Add an argument placed before every session's launch arguments.
    #[must_use]
    pub fn base_arg(mut self, arg: impl Into<String>) -> Self {
        self.base_args.push(arg.into());
        self
    }

    /// Set the arguments placed before every session's launch arguments.
    #[must_use]
    pub fn base_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Add an environment variable.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the working directory.
    #[must_use]
    pub fn working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }

    /// Set the wall-clock limit for one invocation.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the executable.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Get the wall-clock limit for one invocation.
    #[must_use]
    pub const fn timeout_duration(&self) -> Duration {
        self.timeout
    }

    /// Render the queued commands as stdin text, one line each.
    fn input_text(&self) -> String {
        let mut text = String::new();
        for command in &self.input {
            text.push_str(command);
            text.push('\n');
        }
        text
    }

    fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.base_args)
            .args(args)
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }

    /// Spawn the child, feed it, and collect its stdout and exit status.
    async fn run_child(
        &self,
        args: &[String],
        output: &mut Vec<String>,
    ) -> Result<ExitStatus, HarnessError> {
        let mut child = self
            .command(args)
            .spawn()
            .map_err(|source| HarnessError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            HarnessError::io_context("opening stdin", std::io::Error::other("stdin not piped"))
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            HarnessError::io_context("opening stdout", std::io::Error::other("stdout not piped"))
        })?;
        let input = self.input_text();

        let writer = async move {
            let result = stdin.write_all(input.as_bytes()).await;
            drop(stdin);
            match result {
                // The program may quit before reading all of its input
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        };

        let reader = async {
            let mut stdout = BufReader::new(stdout);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                if stdout.read_until(b'\n', &mut buf).await? == 0 {
                    break;
                }
                let line = String::from_utf8_lossy(trim_line_ending(&buf)).into_owned();
                trace!(line = %line, "captured line");
                output.push(line);
            }
            Ok::<_, std::io::Error>(())
        };
        tokio::pin!(reader);

        let finished = async {
            tokio::select! {
                read = &mut reader => {
                    read.map_err(|e| HarnessError::io_context("reading output", e))?;
                    child
                        .wait()
                        .await
                        .map_err(|e| HarnessError::io_context("waiting for program", e))
                }
                status = child.wait() => {
                    let status =
                        status.map_err(|e| HarnessError::io_context("waiting for program", e))?;
                    // A descendant of the program may still hold stdout open
                    match tokio::time::timeout(DRAIN_GRACE, &mut reader).await {
                        Ok(read) => {
                            read.map_err(|e| HarnessError::io_context("reading output", e))?;
                        }
                        Err(_) => debug!("stdout still open after exit, stopped reading"),
                    }
                    Ok(status)
                }
            }
        };

        let session = async {
            let (written, status) = tokio::join!(writer, finished);
            written.map_err(|e| HarnessError::io_context("writing input", e))?;
            status
        };

        match tokio::time::timeout(self.timeout, session).await {
            Ok(status) => status,
            Err(_) => Err(HarnessError::Timeout {
                duration: self.timeout,
            }),
        }
    }

    fn check_status(&self, status: ExitStatus) -> Result<(), HarnessError> {
        match status.code() {
            // Exiting with 0 is the process form of returning normally
            Some(0) => Ok(()),
            Some(code) if self.policy.permits(code) => {
                debug!(code, "permitted exit");
                Ok(())
            }
            Some(code) => Err(HarnessError::IllegalExit {
                code,
                policy: self.policy,
            }),
            None => Err(HarnessError::Terminated {
                status: status.to_string(),
            }),
        }
    }
}

impl Harness for ProcessHarness {
    fn reset(&mut self) {
        debug!(program = %self.program, "resetting process harness");
        self.input.clear();
        self.output.clear();
    }

    fn set_input(&mut self, commands: &[String]) {
        self.input = commands.to_vec();
    }

    fn set_exit_policy(&mut self, policy: ExitPolicy) {
        self.policy = policy;
    }

    fn invoke(&mut self, args: &[String]) -> Result<(), HarnessError> {
        debug!(
            program = %self.program,
            args = args.len(),
            input = self.input.len(),
            timeout = ?self.timeout,
            "spawning program"
        );

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| HarnessError::io_context("creating tokio runtime", e))?;

        let mut output = Vec::new();
        let status = runtime.block_on(self.run_child(args, &mut output));
        debug!(lines = output.len(), "program finished");
        self.output = output;

        self.check_status(status?)
    }

    fn captured_output(&self) -> &[String] {
        &self.output
    }
}
