use std::time::Duration;

use feed_logging::feed_debug;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Collapses bursts of signals into one call, `delay` after the last signal.
///
/// Signals are queued in a channel of capacity one; a signal arriving while
/// one is already queued is merged into it.
#[derive(Debug, Clone)]
pub struct Debouncer {
    tx: mpsc::Sender<()>,
}

impl Debouncer {
    /// Must be called from within a tokio runtime. Dropping every clone
    /// discards a pending call.
    pub fn spawn<F>(delay: Duration, mut on_fire: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<()>(1);
        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                loop {
                    tokio::select! {
                        signal = rx.recv() => {
                            if signal.is_none() {
                                return;
                            }
                        }
                        _ = tokio::time::sleep(delay) => {
                            on_fire();
                            break;
                        }
                    }
                }
            }
        });
        Self { tx }
    }

    pub fn signal(&self) {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Closed(())) => {
                feed_debug!("Debouncer task gone, signal dropped");
            }
        }
    }
}
