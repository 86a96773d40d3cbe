use jiff::Timestamp;
use tracing::{Level, event};
use uuid::Uuid;

use crate::errors::Error;

/// Why a refresh exchange was started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The stored access token was already invalid before the request.
    Preflight,
    /// The server answered the request with 401.
    Unauthorized,
    /// A caller asked whether the session is still usable.
    SessionCheck,
}

#[derive(Clone, Debug)]
pub struct RefreshTelemetry {
    attempt_id: Uuid,
    trigger: RefreshTrigger,
}

impl RefreshTelemetry {
    pub fn new(trigger: RefreshTrigger) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            trigger,
        }
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn trigger(&self) -> RefreshTrigger {
        self.trigger
    }

    pub fn emit_start(&self, at: Timestamp) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            trigger = ?self.trigger,
            timestamp = %at,
            "refresh.start"
        );
    }

    pub fn emit_success(&self, at: Timestamp) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            trigger = ?self.trigger,
            timestamp = %at,
            "refresh.success"
        );
    }

    pub fn emit_failure(&self, error: &Error, at: Timestamp) {
        event!(
            Level::ERROR,
            attempt_id = %self.attempt_id,
            trigger = ?self.trigger,
            timestamp = %at,
            error = %error,
            "refresh.failure"
        );
    }
}
