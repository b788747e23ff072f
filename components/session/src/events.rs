use std::sync::Arc;

use tokio::sync::broadcast;

use schema::Session;

/// A change to the cached session, broadcast to every subscriber.
#[derive(Debug, Clone)]
pub enum SessionChange {
    /// A credential exchange produced a fresh session.
    SignedIn(Arc<Session>),
    /// The session was renewed or restored without new credentials.
    Refreshed(Arc<Session>),
    SignedOut,
}

impl SessionChange {
    pub fn name(&self) -> &'static str {
        match self {
            SessionChange::SignedIn(_) => "SIGNED_IN",
            SessionChange::Refreshed(_) => "TOKEN_REFRESHED",
            SessionChange::SignedOut => "SIGNED_OUT",
        }
    }

    pub fn session(&self) -> Option<&Arc<Session>> {
        match self {
            SessionChange::SignedIn(session) | SessionChange::Refreshed(session) => Some(session),
            SessionChange::SignedOut => None,
        }
    }
}

/// Live subscription to session changes. Dropping it unsubscribes.
pub struct SessionEvents {
    pub(crate) rx: broadcast::Receiver<SessionChange>,
}

impl SessionEvents {
    /// Waits for the next change, or `None` once the sender side is gone.
    ///
    /// A receiver too slow to keep up skips the overwritten events and
    /// resumes with the ones still buffered.
    pub async fn next(&mut self) -> Option<SessionChange> {
        use broadcast::error::RecvError;

        loop {
            match self.rx.recv().await {
                Ok(change) => return Some(change),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Session event subscriber lagged, skipped {skipped} events");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
