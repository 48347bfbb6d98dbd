// src/exec/cancel.rs

use std::fmt;

use nix::sys::signal::Signal;
use tokio::sync::watch;

/// Why a run was cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    /// Interactive cancel (SIGINT / Ctrl-C).
    Interrupt,
    /// Termination requested by an outside supervisor (SIGTERM).
    Terminate,
}

impl Interruption {
    pub fn signal(self) -> Signal {
        match self {
            Interruption::Interrupt => Signal::SIGINT,
            Interruption::Terminate => Signal::SIGTERM,
        }
    }

    /// Shell convention for a process killed by this signal.
    pub fn exit_code(self) -> i32 {
        128 + self.signal() as i32
    }
}

impl fmt::Display for Interruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interruption::Interrupt => f.write_str("interrupted"),
            Interruption::Terminate => f.write_str("terminated"),
        }
    }
}

/// Sending half: fires the token once.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<Option<Interruption>>,
}

/// Receiving half, cheap to clone and pass down the call chain.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<Option<Interruption>>,
}

pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(None);
    (CancelHandle { tx }, CancelToken { rx })
}

impl CancelHandle {
    /// Cancel with `kind`. Only the first cancellation is recorded.
    pub fn cancel(&self, kind: Interruption) {
        self.tx.send_if_modified(|current| {
            if current.is_none() {
                *current = Some(kind);
                true
            } else {
                false
            }
        });
    }
}

impl CancelToken {
    /// A token nothing can cancel.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(None);
        Self { rx }
    }

    pub fn state(&self) -> Option<Interruption> {
        *self.rx.borrow()
    }

    /// Resolve once the token is cancelled. Pends forever if the handle is
    /// dropped without cancelling.
    pub async fn cancelled(&self) -> Interruption {
        let mut rx = self.rx.clone();
        loop {
            let current = *rx.borrow_and_update();
            if let Some(kind) = current {
                return kind;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn exit_codes_follow_shell_convention() {
        assert_eq!(Interruption::Interrupt.exit_code(), 130);
        assert_eq!(Interruption::Terminate.exit_code(), 143);
    }

    #[tokio::test]
    async fn first_cancellation_wins() {
        let (handle, token) = cancel_pair();
        assert_eq!(token.state(), None);

        handle.cancel(Interruption::Terminate);
        handle.cancel(Interruption::Interrupt);

        assert_eq!(token.state(), Some(Interruption::Terminate));
        assert_eq!(token.cancelled().await, Interruption::Terminate);
    }

    #[tokio::test]
    async fn clones_observe_cancellation_from_another_task() {
        let (handle, token) = cancel_pair();
        let waiter = tokio::spawn({
            let token = token.clone();
            async move { token.cancelled().await }
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel(Interruption::Interrupt);

        let kind = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("waiter did not wake")
            .unwrap();
        assert_eq!(kind, Interruption::Interrupt);
    }

    #[tokio::test]
    async fn never_token_does_not_fire() {
        let token = CancelToken::never();
        let res = tokio::time::timeout(Duration::from_millis(50), token.cancelled()).await;
        assert!(res.is_err());
    }
}
