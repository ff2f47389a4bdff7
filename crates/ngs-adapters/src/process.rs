//! Runs the bootstrap command as a child process.

use std::{
    io::Read,
    path::Path,
    process::{Child, Command, Stdio},
    sync::mpsc::{self, Receiver},
    thread,
    time::{Duration, Instant},
};

#[cfg(unix)]
use std::os::unix::process::CommandExt;

use tracing::{debug, instrument, warn};

use ngs_core::{
    application::{
        ApplicationError,
        ports::{BootstrapCommand, CancelToken, CommandOutput, CommandRunner, CommandStatus},
    },
    error::NgsResult,
};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long the pipe readers get after a kill before their output is dropped.
const KILL_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Spawns the command with the project root as its working directory.
///
/// Stdout and stderr are drained on two threads while the control thread
/// polls for exit, timeout and cancellation. On unix the child leads its own
/// process group, and a timeout or cancellation kills the whole group. Output
/// still held open by a surviving descendant is abandoned after a short grace
/// period, so the timeout bounds the run.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    cancel: CancelToken,
    poll_interval: Duration,
}

impl ProcessRunner {
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            cancel,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    fn wait(
        &self,
        child: &mut Child,
        started: Instant,
        timeout: Option<Duration>,
    ) -> std::io::Result<CommandStatus> {
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(CommandStatus::Exited(status.code()));
            }
            if self.cancel.is_cancelled() {
                warn!("bootstrap cancelled, killing child");
                kill(child);
                return Ok(CommandStatus::Cancelled);
            }
            if let Some(limit) = timeout
                && started.elapsed() >= limit
            {
                warn!(timeout_secs = limit.as_secs(), "bootstrap timed out, killing child");
                kill(child);
                return Ok(CommandStatus::TimedOut(limit));
            }
            thread::sleep(self.poll_interval);
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(CancelToken::new())
    }
}

impl CommandRunner for ProcessRunner {
    #[instrument(skip_all, fields(command = %command, cwd = %cwd.display()))]
    fn run(&self, command: &BootstrapCommand, cwd: &Path) -> NgsResult<CommandOutput> {
        let start_error = |reason: String| ApplicationError::Bootstrap {
            command: command.to_string(),
            status: "failed to start".into(),
            output: reason,
        };

        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        process.process_group(0);

        let started = Instant::now();
        let mut child = process.spawn().map_err(|e| start_error(e.to_string()))?;
        debug!(pid = child.id(), "child spawned");

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self.wait(&mut child, started, command.timeout).map_err(|e| {
            kill(&mut child);
            ApplicationError::Bootstrap {
                command: command.to_string(),
                status: "wait failed".into(),
                output: e.to_string(),
            }
        })?;

        let grace = Instant::now() + KILL_DRAIN_GRACE;
        let deadline = match status {
            CommandStatus::Exited(_) => command
                .timeout
                .and_then(|limit| started.checked_add(limit))
                .map(|end| end.max(grace)),
            CommandStatus::TimedOut(_) | CommandStatus::Cancelled => Some(grace),
        };
        let mut output = collect(stdout, deadline);
        output.push_str(&collect(stderr, deadline));
        debug!(%status, bytes = output.len(), "child finished");

        Ok(CommandOutput { status, output })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<Vec<u8>>> {
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            // A read error only truncates what gets reported.
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
        rx
    })
}

/// Waits for a reader until `deadline`; a reader still blocked by then is
/// left behind and its output dropped.
fn collect(reader: Option<Receiver<Vec<u8>>>, deadline: Option<Instant>) -> String {
    let Some(reader) = reader else {
        return String::new();
    };
    let bytes = match deadline {
        None => reader.recv().ok(),
        Some(deadline) => reader
            .recv_timeout(deadline.saturating_duration_since(Instant::now()))
            .inspect_err(|_| debug!("pipe still open past the deadline, output dropped"))
            .ok(),
    };
    bytes
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn kill(child: &mut Child) {
    #[cfg(unix)]
    kill_group(child.id());
    if let Err(e) = child.kill() {
        debug!(error = %e, "kill failed, child already exited");
    }
    let _ = child.wait();
}

/// Signals every process in the child's group. The child was spawned with
/// `process_group(0)`, so its pid is also the group id.
#[cfg(unix)]
fn kill_group(pid: u32) {
    let status = Command::new("kill")
        .args(["-KILL", "--", &format!("-{pid}")])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(status) if status.success() => debug!(pgid = pid, "process group killed"),
        Ok(status) => debug!(pgid = pid, %status, "kill of process group failed"),
        Err(e) => debug!(pgid = pid, error = %e, "could not run kill"),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> BootstrapCommand {
        BootstrapCommand::new("sh", ["-c", script])
    }

    #[test]
    fn captures_stdout_then_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let out = ProcessRunner::default()
            .run(&sh("echo err >&2; echo out"), dir.path())
            .unwrap();
        assert_eq!(out.status, CommandStatus::Exited(Some(0)));
        assert_eq!(out.output, "out\nerr\n");
    }

    #[test]
    fn runs_in_the_given_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("go.mod"), "module acme\n").unwrap();
        let out = ProcessRunner::default()
            .run(&sh("cat go.mod"), dir.path())
            .unwrap();
        assert_eq!(out.output, "module acme\n");
    }

    #[test]
    fn reports_non_zero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let out = ProcessRunner::default()
            .run(&sh("echo broken; exit 3"), dir.path())
            .unwrap();
        assert_eq!(out.status, CommandStatus::Exited(Some(3)));
        assert_eq!(out.output, "broken\n");
    }

    #[test]
    fn missing_program_fails_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProcessRunner::default()
            .run(
                &BootstrapCommand::new("definitely-not-a-real-program-ngs", ["x"]),
                dir.path(),
            )
            .unwrap_err();
        assert_eq!(err.kind(), "BootstrapError");
        assert!(err.to_string().contains("failed to start"));
    }

    #[test]
    fn kills_the_child_after_the_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let command = BootstrapCommand::new("sleep", ["30"]).with_timeout_secs(1);
        let started = Instant::now();
        let out = ProcessRunner::default().run(&command, dir.path()).unwrap();
        assert_eq!(out.status, CommandStatus::TimedOut(Duration::from_secs(1)));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn timeout_also_ends_grandchildren_holding_the_pipes() {
        let dir = tempfile::tempdir().unwrap();
        let command = sh("sleep 8; echo late").with_timeout_secs(1);
        let started = Instant::now();
        let out = ProcessRunner::default().run(&command, dir.path()).unwrap();
        assert_eq!(out.status, CommandStatus::TimedOut(Duration::from_secs(1)));
        assert!(started.elapsed() < Duration::from_secs(3), "{:?}", started.elapsed());
        assert!(!out.output.contains("late"));
    }

    #[test]
    fn cancellation_is_not_held_up_by_grandchildren() {
        let dir = tempfile::tempdir().unwrap();
        let token = CancelToken::new();
        let runner = ProcessRunner::new(token.clone());
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(300));
            token.cancel();
        });
        let started = Instant::now();
        let out = runner.run(&sh("sleep 8; echo late"), dir.path()).unwrap();
        canceller.join().unwrap();
        assert_eq!(out.status, CommandStatus::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(3), "{:?}", started.elapsed());
    }

    #[test]
    fn cancelled_token_stops_the_child() {
        let dir = tempfile::tempdir().unwrap();
        let token = CancelToken::new();
        token.cancel();
        let out = ProcessRunner::new(token)
            .run(&BootstrapCommand::new("sleep", ["30"]), dir.path())
            .unwrap();
        assert_eq!(out.status, CommandStatus::Cancelled);
    }
}
