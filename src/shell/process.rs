//! gnokii shell process supervision.
//!
//! [`ShellSupervisor`] owns at most one running `gnokii --shell` process,
//! its input pipe and its non-blocking output pipe. It starts, stops and
//! restarts the process, and routes requests through a
//! [`FramedTransport`]. Dropping the supervisor kills a process that is
//! still running.

use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::{Child, ChildStdin, Command};

use super::locate::resolve_binary;
use super::SpawnError;
use crate::command::CommandSpec;
use crate::config::{OutputMode, ShellConfig};
use crate::transport::{
    FrameOutcome, FramedTransport, Liveness, Response, TransportError, TransportStats,
};

/// Read side of the shell's output.
pub type ShellOutput = Box<dyn AsyncRead + Send + Unpin>;

type ShellTransport = FramedTransport<ShellOutput, ChildStdin>;

/// A running shell and the transport bound to its pipes.
#[derive(Debug)]
struct ShellProcess {
    child: Child,
    transport: ShellTransport,
}

/// Supervisor for a single gnokii shell process.
#[derive(Debug)]
pub struct ShellSupervisor {
    config: ShellConfig,
    process: Option<ShellProcess>,
}

impl ShellSupervisor {
    /// Create a supervisor. Nothing is launched until [`start`](Self::start).
    #[must_use]
    pub fn new(config: ShellConfig) -> Self {
        Self {
            config,
            process: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Get the process ID, if a process has been launched and not reaped.
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.process.as_ref().and_then(|p| p.child.id())
    }

    /// Transport counters for the current process.
    #[must_use]
    pub fn stats(&self) -> Option<TransportStats> {
        self.process.as_ref().map(|p| p.transport.stats())
    }

    /// True iff a process exists and has not exited. Never blocks.
    pub fn is_alive(&mut self) -> bool {
        self.process
            .as_mut()
            .is_some_and(|process| process.child.is_alive())
    }

    /// Launch the shell if it is not already running.
    ///
    /// Returns `Ok(false)` without doing anything when a live process
    /// exists. Otherwise resolves the binary, spawns it with piped streams,
    /// switches the output to non-blocking mode, optionally drains the
    /// greeting, and returns the resulting liveness.
    ///
    /// # Errors
    ///
    /// Returns `SpawnError` if the binary cannot be found or spawned, or if
    /// reading the greeting fails. The process is torn down in that case.
    pub async fn start(&mut self) -> Result<bool, SpawnError> {
        if self.is_alive() {
            tracing::debug!("Shell already running, start ignored");
            return Ok(false);
        }
        // Release a dead handle before replacing it.
        self.process = None;

        let binary = resolve_binary(&self.config.binary)?;
        let args = self.config.launch_args();
        let mut process = self.spawn(&binary, &args)?;

        tracing::info!(
            binary = %binary.display(),
            args = ?args,
            pid = process.child.id(),
            "Started shell"
        );

        if self.config.drain_greeting {
            if let Err(e) = drain_greeting(&mut process.transport, &mut process.child).await {
                tracing::warn!(error = %e, "Failed to read shell greeting, stopping shell");
                let ShellProcess { mut child, transport } = process;
                drop(transport);
                if let Err(kill_err) = terminate(&mut child, self.config.stop_timeout()).await {
                    tracing::warn!(error = %kill_err, "Failed to terminate shell");
                }
                return Err(e);
            }
        }

        self.process = Some(process);
        Ok(self.is_alive())
    }

    fn spawn(&self, binary: &Path, args: &[String]) -> Result<ShellProcess, SpawnError> {
        let display = binary.display().to_string();

        let mut cmd = Command::new(binary);
        cmd.args(args).stdin(Stdio::piped()).kill_on_drop(true);
        let output = pipes::attach_output(&mut cmd, self.config.output)?;

        let mut child = cmd.spawn().map_err(|e| SpawnError::from_io(&display, e))?;
        // The command keeps copies of the child's pipe ends; drop them so
        // the output reaches EOF when the child exits.
        drop(cmd);

        let stdin = child.stdin.take().ok_or(SpawnError::MissingPipe("stdin"))?;
        let reader = output.into_reader(&mut child)?;

        Ok(ShellProcess {
            child,
            transport: FramedTransport::new(reader, stdin, self.config.frame_settings()),
        })
    }

    /// Stop the shell.
    ///
    /// Returns `false` if no live process exists. Otherwise closes the input
    /// pipe, asks the process to terminate, waits up to the stop timeout,
    /// kills it if needed, and returns whether it is confirmed dead.
    pub async fn stop(&mut self) -> bool {
        if !self.is_alive() {
            self.process = None;
            return false;
        }
        let Some(process) = self.process.take() else {
            return false;
        };

        let ShellProcess { mut child, transport } = process;
        // Dropping the transport closes stdin (end of input) and our read end.
        drop(transport);

        let pid = child.id();
        if let Err(e) = terminate(&mut child, self.config.stop_timeout()).await {
            tracing::warn!(error = %e, pid, "Failed to terminate shell");
        }

        let dead = !child.is_alive();
        if dead {
            tracing::info!(pid, "Stopped shell");
        } else {
            tracing::warn!(pid, "Shell still running after stop");
            // kill_on_drop delivers a final SIGKILL here.
            drop(child);
        }
        dead
    }

    /// Stop (ignoring the result), then start.
    ///
    /// # Errors
    ///
    /// Returns `SpawnError` if the new process cannot be launched.
    pub async fn restart(&mut self) -> Result<bool, SpawnError> {
        let _ = self.stop().await;
        self.start().await
    }

    /// Send a command and wait for its framed response.
    ///
    /// If the process dies mid-response, whatever was read is returned and
    /// the process is reaped, so [`is_alive`](Self::is_alive) reports
    /// `false` afterwards.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::NotRunning` if no live process exists, and
    /// other `TransportError`s for malformed commands or pipe failures.
    pub async fn send(&mut self, command: &CommandSpec) -> Result<Response, TransportError> {
        let stop_timeout = self.config.stop_timeout();
        let Some(process) = self.process.as_mut() else {
            return Err(TransportError::NotRunning);
        };

        let response = process.transport.send(command, &mut process.child).await?;

        if response.outcome == FrameOutcome::ProcessExited {
            match tokio::time::timeout(stop_timeout, process.child.wait()).await {
                Ok(Ok(status)) => tracing::warn!(%status, "Shell exited mid-response"),
                Ok(Err(e)) => tracing::warn!(error = %e, "Failed to reap shell"),
                Err(_) => tracing::warn!("Shell output closed but process still running"),
            }
        }

        Ok(response)
    }

    /// Wait for a response without sending anything.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::NotRunning` if no process exists, or
    /// `Io` on read failures.
    pub async fn get_result(&mut self) -> Result<Response, TransportError> {
        let Some(process) = self.process.as_mut() else {
            return Err(TransportError::NotRunning);
        };
        process.transport.get_result(&mut process.child).await
    }
}

impl Drop for ShellSupervisor {
    fn drop(&mut self) {
        if let Some(mut process) = self.process.take() {
            if process.child.is_alive() {
                tracing::debug!(pid = process.child.id(), "Killing shell on drop");
                if let Err(e) = process.child.start_kill() {
                    tracing::warn!(error = %e, "Failed to kill shell on drop");
                }
            }
        }
    }
}

/// Read and discard the banner printed before the first prompt.
async fn drain_greeting<R, W, L>(
    transport: &mut FramedTransport<R, W>,
    liveness: &mut L,
) -> Result<(), SpawnError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    L: Liveness,
{
    let greeting = transport.get_result(liveness).await?;
    tracing::debug!(
        outcome = ?greeting.outcome,
        text = %greeting.text,
        "Shell greeting"
    );
    Ok(())
}

/// Attempt graceful termination with a timeout.
///
/// On Unix, sends SIGTERM first, then SIGKILL after the timeout.
/// On other platforms, falls back to immediate kill.
async fn terminate(child: &mut Child, timeout: std::time::Duration) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = child.id() {
            let nix_pid = Pid::from_raw(i32::try_from(pid).unwrap_or(i32::MAX));
            let _ = kill(nix_pid, Signal::SIGTERM);

            match tokio::time::timeout(timeout, child.wait()).await {
                Ok(Ok(_)) => return Ok(()),
                Ok(Err(e)) => return Err(e),
                Err(_) => tracing::debug!(pid, "Shell ignored SIGTERM, killing"),
            }
        } else {
            // Process already exited
            return Ok(());
        }
    }

    #[cfg(not(unix))]
    let _ = timeout;

    child.kill().await
}

#[cfg(unix)]
mod pipes {
    //! Unix output plumbing: optional stderr merge and `O_NONBLOCK`.

    use std::os::fd::{AsRawFd, OwnedFd};
    use std::process::Stdio;

    use nix::fcntl::{fcntl, FcntlArg, FdFlag, OFlag};
    use tokio::net::unix::pipe;
    use tokio::process::{Child, Command};

    use super::ShellOutput;
    use crate::config::OutputMode;
    use crate::shell::SpawnError;

    /// Output wiring chosen before spawn.
    pub(super) enum PendingOutput {
        /// Read end of a pipe shared by the child's stdout and stderr.
        Merged(OwnedFd),
        /// The child's own stdout pipe.
        Stdout,
    }

    pub(super) fn attach_output(
        cmd: &mut Command,
        mode: OutputMode,
    ) -> Result<PendingOutput, SpawnError> {
        match mode {
            OutputMode::Merged => {
                let (read, write) = nix::unistd::pipe().map_err(std::io::Error::from)?;
                set_cloexec(&read)?;
                set_cloexec(&write)?;
                cmd.stdout(Stdio::from(write.try_clone()?));
                cmd.stderr(Stdio::from(write));
                Ok(PendingOutput::Merged(read))
            }
            OutputMode::Separate => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::inherit());
                Ok(PendingOutput::Stdout)
            }
        }
    }

    impl PendingOutput {
        /// Turn the wiring into a non-blocking reader once the child runs.
        pub(super) fn into_reader(self, child: &mut Child) -> Result<ShellOutput, SpawnError> {
            match self {
                Self::Merged(read) => {
                    set_nonblocking(&read)?;
                    Ok(Box::new(pipe::Receiver::from_owned_fd(read)?))
                }
                // tokio registers child pipes in non-blocking mode itself.
                Self::Stdout => {
                    let stdout = child.stdout.take().ok_or(SpawnError::MissingPipe("stdout"))?;
                    Ok(Box::new(stdout))
                }
            }
        }
    }

    fn set_nonblocking(fd: &OwnedFd) -> std::io::Result<()> {
        let flags = fcntl(fd.as_raw_fd(), FcntlArg::F_GETFL)?;
        let flags = OFlag::from_bits_truncate(flags) | OFlag::O_NONBLOCK;
        fcntl(fd.as_raw_fd(), FcntlArg::F_SETFL(flags))?;
        Ok(())
    }

    fn set_cloexec(fd: &OwnedFd) -> std::io::Result<()> {
        fcntl(fd.as_raw_fd(), FcntlArg::F_SETFD(FdFlag::FD_CLOEXEC))?;
        Ok(())
    }
}

#[cfg(not(unix))]
mod pipes {
    use std::process::Stdio;

    use tokio::process::{Child, Command};

    use super::ShellOutput;
    use crate::config::OutputMode;
    use crate::shell::SpawnError;

    pub(super) struct PendingOutput;

    pub(super) fn attach_output(
        cmd: &mut Command,
        mode: OutputMode,
    ) -> Result<PendingOutput, SpawnError> {
        if mode == OutputMode::Merged {
            tracing::warn!("Merged output is only supported on Unix, stderr left separate");
        }
        cmd.stdout(Stdio::piped()).stderr(Stdio::inherit());
        Ok(PendingOutput)
    }

    impl PendingOutput {
        pub(super) fn into_reader(self, child: &mut Child) -> Result<ShellOutput, SpawnError> {
            let stdout = child.stdout.take().ok_or(SpawnError::MissingPipe("stdout"))?;
            Ok(Box::new(stdout))
        }
    }
}
