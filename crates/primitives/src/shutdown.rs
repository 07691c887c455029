use std::sync::Arc;

use tokio::sync::watch;

/// A clonable cooperative cancellation token.
///
/// The signal starts out clear. [`ShutdownSignal::cancel`] trips it exactly
/// once and wakes every pending [`ShutdownSignal::cancelled`] future; later
/// calls are no-ops. Every suspension point in a worker should race against
/// `cancelled()` so that shutdown is never blocked on a sleeping task.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Create a new, untripped shutdown signal.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Trip the signal, waking all waiters.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Whether the signal has been tripped.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the signal is tripped.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender is kept alive by `self`, so this can only fail if the
        // predicate is already satisfied and the channel closes mid-wait.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}
