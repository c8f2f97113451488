use tracing::{Level, event};
use uuid::Uuid;

use crate::errors::RefreshError;
use crate::types::RefreshedToken;

/// What caused a refresh attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshTrigger {
    Webhook,
    Manual,
}

impl RefreshTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            RefreshTrigger::Webhook => "webhook",
            RefreshTrigger::Manual => "manual",
        }
    }
}

/// Structured events for one refresh attempt, correlated by `attempt_id`.
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

    pub fn emit_start(&self) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            trigger = self.trigger.as_str(),
            "refresh.start"
        );
    }

    pub fn emit_success(&self, token: &RefreshedToken) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            trigger = self.trigger.as_str(),
            expires_at = token.expires_at.as_deref().unwrap_or("unknown"),
            expires_in_seconds = ?token.expires_in_seconds,
            "refresh.success"
        );
    }

    pub fn emit_failure(&self, error: &RefreshError) {
        event!(
            Level::ERROR,
            attempt_id = %self.attempt_id,
            trigger = self.trigger.as_str(),
            error = %error,
            "refresh.failure"
        );
    }
}
