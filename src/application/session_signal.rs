// Session invalidation signal shared between loaders and the dashboard shell
use std::sync::Arc;
use tokio::sync::watch;

/// Raised once by any loader that sees an unauthenticated response.
#[derive(Debug, Clone)]
pub struct SessionSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for SessionSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn invalidate(&self) {
        if !self.tx.send_replace(true) {
            tracing::warn!("Session invalidated by backend");
        }
    }

    pub fn is_invalidated(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the session has been invalidated.
    pub async fn invalidated(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot observe a close.
        let _ = rx.wait_for(|invalid| *invalid).await;
    }
}
