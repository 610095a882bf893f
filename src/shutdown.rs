//! Termination signals for the extraction loop.

use std::fmt;
use std::io;

/// A received termination signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Termination {
    pub signal: i32,
    pub name: &'static str,
}

impl Termination {
    pub const INTERRUPT: Termination = Termination {
        signal: 2,
        name: "SIGINT",
    };

    /// Process exit status for this signal, following the shell convention.
    pub fn exit_code(&self) -> i32 {
        128 + self.signal
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.signal)
    }
}

/// Resolve with the first of SIGINT, SIGTERM, SIGHUP or SIGQUIT.
#[cfg(unix)]
pub async fn wait_for_signal() -> io::Result<Termination> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;
    let mut quit = signal(SignalKind::quit())?;

    let received = tokio::select! {
        _ = interrupt.recv() => Termination::INTERRUPT,
        _ = terminate.recv() => Termination { signal: 15, name: "SIGTERM" },
        _ = hangup.recv() => Termination { signal: 1, name: "SIGHUP" },
        _ = quit.recv() => Termination { signal: 3, name: "SIGQUIT" },
    };
    Ok(received)
}

/// Resolve on ctrl-c.
#[cfg(not(unix))]
pub async fn wait_for_signal() -> io::Result<Termination> {
    tokio::signal::ctrl_c().await?;
    Ok(Termination::INTERRUPT)
}
