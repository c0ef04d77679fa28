use anyhow::{Context, Result};
use std::process::{Command, ExitStatus};

#[cfg(unix)]
mod signals {
    use anyhow::{Context, Result};
    use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

    const SUPPRESSED: [Signal; 3] = [Signal::SIGINT, Signal::SIGQUIT, Signal::SIGTSTP];

    /// Ignores terminal job-control signals until dropped, then restores
    /// the dispositions that were in place before.
    ///
    /// The interactive session child handles Ctrl+C itself; if this
    /// process also reacted to it, the child would be killed mid-session
    /// and could leave the terminal in a broken state.
    pub struct SignalGuard {
        saved: Vec<(Signal, SigAction)>,
    }

    impl SignalGuard {
        pub fn suppress() -> Result<Self> {
            let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
            let mut saved = Vec::with_capacity(SUPPRESSED.len());
            for signal in SUPPRESSED {
                let previous = unsafe { sigaction(signal, &ignore) }
                    .with_context(|| format!("failed to ignore {signal}"))?;
                saved.push((signal, previous));
            }
            Ok(Self { saved })
        }
    }

    impl Drop for SignalGuard {
        fn drop(&mut self) {
            for (signal, previous) in self.saved.drain(..).rev() {
                let _ = unsafe { sigaction(signal, &previous) };
            }
        }
    }
}

#[cfg(not(unix))]
mod signals {
    use anyhow::Result;

    /// No-op on non-Unix platforms.
    pub struct SignalGuard;

    impl SignalGuard {
        pub fn suppress() -> Result<Self> {
            Ok(Self)
        }
    }
}

pub use signals::SignalGuard;

#[cfg(unix)]
fn interrupted(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal() == Some(nix::sys::signal::Signal::SIGINT as i32)
}

#[cfg(not(unix))]
fn interrupted(_status: &ExitStatus) -> bool {
    false
}

/// Runs `aws ssm start-session` against the chosen instance, inheriting
/// this process's terminal. Terminal signals are suppressed for the
/// duration so only the session reacts to them.
pub fn launch_session(instance_id: &str, profile: &str, region: &str) -> Result<()> {
    let _guard = SignalGuard::suppress()?;

    crate::print_info("Starting SSM session...");
    let status = Command::new("aws")
        .args(["ssm", "start-session"])
        .args(["--profile", profile])
        .args(["--region", region])
        .args(["--target", instance_id])
        .status()
        .context("failed to run `aws ssm start-session`")?;

    if interrupted(&status) {
        println!("\nInterrupted by user");
    } else if !status.success() {
        let code = status
            .code()
            .map_or_else(|| "unknown".to_string(), |code| code.to_string());
        crate::print_error(&format!("SSM session exited with status {code}"));
    }
    Ok(())
}
