//! Shutdown coordination.

use std::future::Future;

use tokio::sync::watch;

/// Coordinator for graceful shutdown of one or more servers.
///
/// The trigger is sticky: signals created after triggering resolve at once.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// A future resolving once shutdown is triggered.
    pub fn signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            // An error means the coordinator was dropped; stop as well.
            let _ = rx.wait_for(|triggered| *triggered).await;
        }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
