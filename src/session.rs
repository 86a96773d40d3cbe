use tokio::sync::broadcast;
use tracing::debug;

const DEFAULT_CAPACITY: usize = 16;

/// Lifecycle changes of the stored session, broadcast so UI layers can react
/// (e.g. route back to login on `Invalidated`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Login stored a new credential pair.
    Established,
    /// A refresh exchange stored a new credential pair.
    Refreshed,
    /// A dispatch gave up on authentication.
    Invalidated { reason: String },
    LoggedOut,
}

#[derive(Clone, Debug)]
pub struct SessionSignal {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionSignal {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        if let Err(broadcast::error::SendError(event)) = self.sender.send(event) {
            debug!(event = ?event, "no session subscribers");
        }
    }
}

impl Default for SessionSignal {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
