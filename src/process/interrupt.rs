//! Ctrl-C handling while child processes run.
//!
//! Once installed, SIGINT no longer kills commitline. The terminal delivers
//! it to the whole foreground process group, so the running child sees it
//! too; the launcher waits for that child to end and then reports the run
//! as interrupted, which lets the prompt file be removed on the way out.

use std::io;

use tokio::sync::watch;
use tracing::debug;

/// Shared view of whether Ctrl-C has been pressed.
#[derive(Debug, Clone)]
pub struct InterruptWatch {
    rx: watch::Receiver<bool>,
}

impl InterruptWatch {
    /// Install the SIGINT handler and start recording interrupts.
    ///
    /// The handler is registered before this returns, so children spawned
    /// afterwards can never race it. Must be called inside a tokio runtime.
    pub fn install() -> io::Result<Self> {
        let mut signal = listen()?;
        let (tx, rx) = watch::channel(false);

        tokio::spawn(async move {
            while signal.recv().await.is_some() {
                debug!("received interrupt");
                if tx.send(true).is_err() {
                    break;
                }
            }
        });

        Ok(Self { rx })
    }

    /// A watch that never fires. Used when no handler is installed.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    #[cfg(test)]
    pub(crate) fn from_receiver(rx: watch::Receiver<bool>) -> Self {
        Self { rx }
    }

    pub fn is_interrupted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once an interrupt has been received.
    pub async fn interrupted(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|fired| *fired).await.is_err() {
            // Sender gone without firing
            std::future::pending::<()>().await;
        }
    }
}

impl Default for InterruptWatch {
    fn default() -> Self {
        Self::never()
    }
}

#[cfg(unix)]
fn listen() -> io::Result<tokio::signal::unix::Signal> {
    use tokio::signal::unix::{SignalKind, signal};
    signal(SignalKind::interrupt())
}

#[cfg(windows)]
fn listen() -> io::Result<tokio::signal::windows::CtrlC> {
    tokio::signal::windows::ctrl_c()
}
