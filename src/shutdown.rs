//! Process shutdown on signals.
//!
//! The server holds no connections or sessions between requests, so there is
//! nothing to drain: a signal only needs to end the service loop. The
//! controller records what triggered the shutdown so it can be logged once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

/// What ended the service loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT or Ctrl+C.
    Interrupt,
    /// SIGTERM.
    Terminate,
    /// SIGHUP, usually the parent process going away.
    Hangup,
}

impl std::fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownReason::Interrupt => write!(f, "interrupt"),
            ShutdownReason::Terminate => write!(f, "terminate"),
            ShutdownReason::Hangup => write!(f, "hangup"),
        }
    }
}

/// Shutdown signal that can be awaited.
#[derive(Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<Option<ShutdownReason>>,
}

impl ShutdownSignal {
    /// Wait for shutdown and return its reason.
    ///
    /// Resolves immediately if shutdown was already triggered.
    pub async fn recv(&mut self) -> Option<ShutdownReason> {
        match self.receiver.wait_for(Option::is_some).await {
            Ok(reason) => *reason,
            Err(_) => None,
        }
    }

    /// Check if shutdown has been signaled without blocking.
    pub fn is_shutdown(&self) -> bool {
        self.receiver.borrow().is_some()
    }
}

/// Controller that fans a single shutdown out to every listener.
pub struct ShutdownController {
    sender: watch::Sender<Option<ShutdownReason>>,
    triggered: AtomicBool,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender,
            triggered: AtomicBool::new(false),
        }
    }

    /// Get a shutdown signal receiver.
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Trigger shutdown. Only the first call has any effect.
    pub fn shutdown(&self, reason: ShutdownReason) {
        if self
            .triggered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("Shutting down ({})", reason);
            self.sender.send_replace(Some(reason));
        }
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared shutdown controller type.
pub type SharedShutdownController = Arc<ShutdownController>;

/// Create a new shared shutdown controller.
pub fn new_shutdown_controller() -> SharedShutdownController {
    Arc::new(ShutdownController::new())
}

/// Install handlers for SIGINT/Ctrl+C and, on Unix, SIGTERM and SIGHUP.
pub fn install_signal_handlers(controller: SharedShutdownController) {
    let ctrl_c_controller = controller.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => ctrl_c_controller.shutdown(ShutdownReason::Interrupt),
            Err(e) => error!("Failed to listen for Ctrl+C signal: {}", e),
        }
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        for (kind, reason) in [
            (SignalKind::terminate(), ShutdownReason::Terminate),
            (SignalKind::hangup(), ShutdownReason::Hangup),
        ] {
            let controller = controller.clone();
            tokio::spawn(async move {
                match signal(kind) {
                    Ok(mut stream) => {
                        stream.recv().await;
                        controller.shutdown(reason);
                    }
                    Err(e) => error!("Failed to install {} handler: {}", reason, e),
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_signal_observes_shutdown() {
        let controller = ShutdownController::new();
        let signal = controller.signal();
        assert!(!signal.is_shutdown());

        controller.shutdown(ShutdownReason::Terminate);
        assert!(controller.is_shutting_down());
        assert!(signal.is_shutdown());
    }

    #[tokio::test]
    async fn test_first_reason_wins() {
        let controller = new_shutdown_controller();
        let mut signal = controller.signal();

        controller.shutdown(ShutdownReason::Hangup);
        controller.shutdown(ShutdownReason::Interrupt);

        assert_eq!(signal.recv().await, Some(ShutdownReason::Hangup));
    }

    #[tokio::test]
    async fn test_recv_wakes_waiting_task() {
        let controller = new_shutdown_controller();
        let mut signal = controller.signal();

        let waiter = tokio::spawn(async move { signal.recv().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        controller.shutdown(ShutdownReason::Interrupt);

        let reason = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reason, Some(ShutdownReason::Interrupt));
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(ShutdownReason::Interrupt.to_string(), "interrupt");
        assert_eq!(ShutdownReason::Terminate.to_string(), "terminate");
        assert_eq!(ShutdownReason::Hangup.to_string(), "hangup");
    }
}
