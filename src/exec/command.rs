// src/exec/command.rs

//! Supervised child processes.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{anyhow, Context};
use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::errors::{RebakeError, Result};
use crate::exec::cancel::CancelToken;

/// How long a cancelled process group gets to exit after SIGTERM before it
/// is sent SIGKILL.
pub const TERMINATE_GRACE: Duration = Duration::from_secs(10);

/// Run `program args...` in `cwd` and return its standard output.
///
/// The child gets its own process group, stdin from `/dev/null`, and a
/// piped stdout/stderr (stderr is logged at debug). Output that is not
/// valid UTF-8 is decoded lossily; it never turns a successful run into an
/// error.
///
/// If `cancel` fires while the child runs, the whole process group gets
/// SIGTERM so that anything the tool spawned goes down with it. A group
/// still alive after [`TERMINATE_GRACE`] gets SIGKILL. The child is then
/// reaped and [`RebakeError::Interrupted`] returned. A token that has
/// already fired stops the command from being started at all.
///
/// A non-zero exit status is [`RebakeError::ToolFailed`].
pub async fn run_supervised<S: AsRef<OsStr>>(
    program: impl AsRef<OsStr>,
    args: &[S],
    cwd: &Path,
    cancel: &CancelToken,
) -> Result<String> {
    supervise(program.as_ref(), args, cwd, cancel, TERMINATE_GRACE).await
}

async fn supervise<S: AsRef<OsStr>>(
    program: &OsStr,
    args: &[S],
    cwd: &Path,
    cancel: &CancelToken,
    grace: Duration,
) -> Result<String> {
    let command_line = render_command_line(program, args);

    if let Some(kind) = cancel.state() {
        debug!(command = %command_line, "not starting command; already {kind}");
        return Err(RebakeError::Interrupted(kind));
    }

    info!(command = %command_line, cwd = %cwd.display(), "starting process");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0)
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning `{command_line}`"))?;

    // With process_group(0) the group id is the child's pid.
    let pgid = child
        .id()
        .and_then(|pid| i32::try_from(pid).ok())
        .map(Pid::from_raw);

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("no stdout pipe for `{command_line}`"))?;
    let collector = tokio::spawn(async move {
        let mut out = Vec::new();
        stdout.read_to_end(&mut out).await?;
        Ok::<_, std::io::Error>(out)
    });

    // Always consume stderr so buffers don't fill; log at debug.
    if let Some(stderr) = child.stderr.take() {
        let program = program.to_string_lossy().into_owned();
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                debug!(%program, "stderr: {}", line);
            }
        });
    }

    tokio::select! {
        status_res = child.wait() => {
            let status = status_res
                .with_context(|| format!("waiting for `{command_line}`"))?;
            let raw = collector.await.map_err(anyhow::Error::from)??;

            info!(
                command = %command_line,
                exit_code = ?status.code(),
                success = status.success(),
                "process exited"
            );

            if status.success() {
                Ok(String::from_utf8_lossy(&raw).into_owned())
            } else {
                Err(RebakeError::ToolFailed {
                    command: command_line,
                    code: status.code(),
                })
            }
        }

        kind = cancel.cancelled() => {
            warn!(command = %command_line, ?pgid, "{kind}; terminating process group");
            stop_group(&mut child, pgid, grace).await;
            collector.abort();
            Err(RebakeError::Interrupted(kind))
        }
    }
}

/// SIGTERM the group, give it `grace` to exit, then SIGKILL it. Reaps the
/// direct child either way.
async fn stop_group(child: &mut Child, pgid: Option<Pid>, grace: Duration) {
    if let Some(pgid) = pgid {
        if let Err(e) = signal_process_group(pgid, Signal::SIGTERM) {
            warn!(?pgid, error = %e, "error terminating child processes");
        }
    }

    match tokio::time::timeout(grace, child.wait()).await {
        Ok(Ok(_)) => return,
        Ok(Err(e)) => {
            debug!(error = %e, "reaping cancelled child failed");
            return;
        }
        Err(_) => warn!(?pgid, grace_secs = grace.as_secs_f64(), "process group ignored SIGTERM; killing"),
    }

    match pgid {
        Some(pgid) => {
            if let Err(e) = signal_process_group(pgid, Signal::SIGKILL) {
                warn!(?pgid, error = %e, "error killing child processes");
            }
        }
        None => {
            if let Err(e) = child.start_kill() {
                debug!(error = %e, "killing cancelled child failed");
            }
        }
    }
    if let Err(e) = child.wait().await {
        debug!(error = %e, "reaping killed child failed");
    }
}

/// Send SIGTERM to every process in group `pgid`.
///
/// A group that no longer exists counts as success: the processes already
/// exited.
pub fn terminate_process_group(pgid: Pid) -> Result<()> {
    signal_process_group(pgid, Signal::SIGTERM)
}

fn signal_process_group(pgid: Pid, signal: Signal) -> Result<()> {
    match killpg(pgid, signal) {
        Ok(()) => Ok(()),
        Err(Errno::ESRCH) => {
            debug!(?pgid, ?signal, "process group already gone");
            Ok(())
        }
        Err(e) => Err(anyhow!("sending {signal} to process group {pgid}: {e}").into()),
    }
}

fn render_command_line<S: AsRef<OsStr>>(program: &OsStr, args: &[S]) -> String {
    let mut line = program.to_string_lossy().into_owned();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.as_ref().to_string_lossy());
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::cancel::{cancel_pair, Interruption};
    use std::time::Instant;

    #[test]
    fn missing_process_group_is_not_an_error() {
        // No pid can reach i32::MAX, so the group cannot exist.
        terminate_process_group(Pid::from_raw(i32::MAX)).unwrap();
        signal_process_group(Pid::from_raw(i32::MAX), Signal::SIGKILL).unwrap();
    }

    #[test]
    fn command_line_joins_program_and_args() {
        let line = render_command_line(OsStr::new("bitbake"), &["-c", "cleansstate", "zlib"][..]);
        assert_eq!(line, "bitbake -c cleansstate zlib");
    }

    #[tokio::test]
    async fn invalid_utf8_output_is_not_a_failure() {
        let dir = tempfile::tempdir().unwrap();

        let out = run_supervised(
            "sh",
            &["-c", "printf 'ok \\377\\n'; exit 0"][..],
            dir.path(),
            &CancelToken::never(),
        )
        .await
        .unwrap();

        assert_eq!(out, "ok \u{FFFD}\n");
    }

    #[tokio::test]
    async fn group_ignoring_sigterm_is_killed_after_grace() {
        let dir = tempfile::tempdir().unwrap();
        let (handle, token) = cancel_pair();

        let started = Instant::now();
        let run = supervise(
            OsStr::new("sh"),
            &["-c", "trap '' TERM; sleep 30"][..],
            dir.path(),
            &token,
            Duration::from_millis(200),
        );
        let cancel = async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            handle.cancel(Interruption::Interrupt);
        };

        let (result, ()) = tokio::time::timeout(Duration::from_secs(10), async {
            tokio::join!(run, cancel)
        })
        .await
        .expect("supervised command did not stop");

        assert!(matches!(
            result,
            Err(RebakeError::Interrupted(Interruption::Interrupt))
        ));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
