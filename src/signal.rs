//! Interrupt handling.
//!
//! A pipeline is raced against SIGINT/SIGTERM (Ctrl+C elsewhere). When the
//! signal wins, the pipeline future is dropped, which drops everything it owns:
//! the scratch directory is removed and child processes spawned with
//! `kill_on_drop` are killed.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A termination request received from the OS.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShutdownSignal {
    /// SIGINT or Ctrl+C
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl ShutdownSignal {
    /// Conventional shell exit status: 128 + signal number.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Interrupt => 130,
            Self::Terminate => 143,
        }
    }
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => f.write_str("SIGINT"),
            Self::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Registered SIGINT/SIGTERM handlers.
///
/// Handlers are registered by [`SignalListener::install`], not on first poll.
#[cfg(unix)]
#[derive(Debug)]
pub struct SignalListener {
    sigint: tokio::signal::unix::Signal,
    sigterm: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalListener {
    /// Install the handlers. Must be called from within a tokio runtime.
    pub fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for the first SIGINT or SIGTERM.
    pub async fn recv(&mut self) -> ShutdownSignal {
        tokio::select! {
            _ = self.sigterm.recv() => ShutdownSignal::Terminate,
            _ = self.sigint.recv() => ShutdownSignal::Interrupt,
        }
    }
}

/// Registered Ctrl+C handler.
#[cfg(windows)]
#[derive(Debug)]
pub struct SignalListener {
    ctrl_c: tokio::signal::windows::CtrlC,
}

#[cfg(windows)]
impl SignalListener {
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    pub async fn recv(&mut self) -> ShutdownSignal {
        self.ctrl_c.recv().await;
        ShutdownSignal::Interrupt
    }
}

/// Run `pipeline` to completion unless a termination signal arrives first.
///
/// Handlers are installed before `pipeline` is first polled.
pub async fn run_interruptible<F>(pipeline: F) -> Result<F::Output, ShutdownSignal>
where
    F: Future,
{
    match SignalListener::install() {
        Ok(mut listener) => run_until(pipeline, async move { Ok(listener.recv().await) }).await,
        Err(e) => run_until(pipeline, async move { Err(e) }).await,
    }
}

/// Sets a shared flag when dropped.
///
/// Blocking work spawned by a future holds the flag; when the future is
/// dropped mid-flight (for example on interruption) the work sees the flag
/// and stops at its next checkpoint.
#[derive(Debug, Default)]
pub struct CancelOnDrop {
    flag: Arc<AtomicBool>,
}

impl CancelOnDrop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

/// Race `pipeline` against `signal`.
///
/// If the signal source itself fails (handlers cannot be installed), the
/// pipeline runs uninterruptible instead of aborting.
pub async fn run_until<F, S>(pipeline: F, signal: S) -> Result<F::Output, ShutdownSignal>
where
    F: Future,
    S: Future<Output = std::io::Result<ShutdownSignal>>,
{
    let signal = async {
        match signal.await {
            Ok(received) => received,
            Err(e) => {
                log::warn!("Could not install signal handlers: {e}");
                std::future::pending().await
            }
        }
    };

    tokio::select! {
        output = pipeline => Ok(output),
        received = signal => {
            log::warn!("Received {received}, cleaning up");
            Err(received)
        }
    }
}
