//! Bounded external process execution
//!
//! The separator and transcriber are long-running external tools. Each run
//! is bounded by a timeout, and a spawned child is always killed and reaped
//! if the runner leaves early, so abandoning a pipeline never leaks processes.

use std::ffi::OsStr;
use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Interval between exit-status polls
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Failure modes of a bounded process run
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("command is empty")]
    EmptyCommand,

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' timed out after {}s", .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },

    #[error("'{program}' failed with exit code {code}")]
    Failed { program: String, code: i32 },

    #[error("'{program}' was terminated by a signal")]
    Killed { program: String },

    #[error("failed waiting for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl ProcessError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProcessError::TimedOut { .. })
    }
}

/// Kills and reaps the child on drop unless it has already exited
struct ChildGuard {
    child: Child,
    finished: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            finished: false,
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.child.kill() {
            debug!("kill of pid {} failed: {}", self.child.id(), e);
        }
        let _ = self.child.wait();
    }
}

/// Run `command` (program followed by leading arguments) plus `args`
///
/// Child stdout is discarded; stderr is inherited. Succeeds only on a zero
/// exit status within `timeout`.
pub fn run_with_timeout<S: AsRef<OsStr>>(
    command: &[String],
    args: &[S],
    timeout: Duration,
) -> Result<(), ProcessError> {
    let (program, leading) = command.split_first().ok_or(ProcessError::EmptyCommand)?;

    debug!("Running {} {:?} (timeout {}s)", program, leading, timeout.as_secs());

    let child = Command::new(program)
        .args(leading)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            program: program.clone(),
            source,
        })?;

    let mut guard = ChildGuard::new(child);
    let status = wait_with_deadline(&mut guard, program, timeout)?;

    match status.code() {
        Some(0) => Ok(()),
        Some(code) => Err(ProcessError::Failed {
            program: program.clone(),
            code,
        }),
        None => Err(ProcessError::Killed {
            program: program.clone(),
        }),
    }
}

fn wait_with_deadline(
    guard: &mut ChildGuard,
    program: &str,
    timeout: Duration,
) -> Result<ExitStatus, ProcessError> {
    let started = Instant::now();
    loop {
        match guard.child.try_wait() {
            Ok(Some(status)) => {
                guard.finished = true;
                debug!("{} exited after {:.1}s", program, started.elapsed().as_secs_f64());
                return Ok(status);
            }
            Ok(None) => {
                if started.elapsed() >= timeout {
                    warn!("{} exceeded {}s, killing", program, timeout.as_secs());
                    // Guard drop kills and reaps
                    return Err(ProcessError::TimedOut {
                        program: program.to_string(),
                        timeout,
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(source) => {
                return Err(ProcessError::Wait {
                    program: program.to_string(),
                    source,
                })
            }
        }
    }
}
