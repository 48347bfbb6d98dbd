// src/signals.rs

//! Turns SIGINT / SIGTERM into cancellation of the running tool.

use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::errors::Result;
use crate::exec::{CancelHandle, Interruption};

/// What to do about one received signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    /// Cancel the running tool and let the status line complete.
    Cancel(Interruption),
    /// The user asked again: leave now with this exit code.
    Exit(i32),
}

/// Signals seen so far. The first one cancels; any later one forces exit.
#[derive(Debug, Default)]
pub struct SignalLadder {
    cancelled: bool,
}

impl SignalLadder {
    pub fn on_signal(&mut self, kind: Interruption) -> SignalAction {
        if self.cancelled {
            SignalAction::Exit(kind.exit_code())
        } else {
            self.cancelled = true;
            SignalAction::Cancel(kind)
        }
    }
}

/// Listen for SIGINT and SIGTERM for the rest of the run.
///
/// The first signal fires `handle` with the matching [`Interruption`], so
/// the running child's process group is terminated and the status line
/// completed. A second signal exits the process immediately with the
/// shell exit code of that signal.
pub fn spawn_signal_listener(handle: CancelHandle) -> Result<JoinHandle<()>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        let mut ladder = SignalLadder::default();
        loop {
            let kind = tokio::select! {
                Some(()) = sigint.recv() => Interruption::Interrupt,
                Some(()) = sigterm.recv() => Interruption::Terminate,
                else => return,
            };

            match ladder.on_signal(kind) {
                SignalAction::Cancel(kind) => {
                    warn!(signal = ?kind.signal(), "signal received; cancelling");
                    handle.cancel(kind);
                }
                SignalAction::Exit(code) => {
                    error!(signal = ?kind.signal(), "signal received again; exiting");
                    std::process::exit(code);
                }
            }
        }
    }))
}
