//! Message channel seam for host-application notifications
//!
//! The broker announces flow events (login, loaded, ...) to the host
//! application over a channel. The transport itself lives with the host;
//! this crate defines the trait plus in-memory implementations for hosts
//! without a transport attached and for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Host rejected `{event}`: {reason}")]
    Rejected { event: String, reason: String },

    #[error("Host unreachable: {0}")]
    Unreachable(String),
}

pub type ChannelResult<T> = Result<T, ChannelError>;

/// Channel trait for host-application notifications
///
/// Sends are fire-and-forget from the caller's perspective; retry and
/// backoff are the transport's responsibility, never the caller's.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Send a named event with a JSON payload to the host
    async fn send(&self, event: &str, payload: Value) -> ChannelResult<()>;
}

/// Channel that accepts and discards every message
///
/// Substitutable wherever no host transport is attached.
pub struct NullChannel;

#[async_trait]
impl Channel for NullChannel {
    async fn send(&self, event: &str, _payload: Value) -> ChannelResult<()> {
        trace!("NullChannel: discarding `{}`", event);
        Ok(())
    }
}

/// Channel that records every message for later assertions
#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<(String, Value)>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events and payloads sent so far, in order
    pub fn sent(&self) -> Vec<(String, Value)> {
        self.sent.lock().clone()
    }

    /// Whether a message with the given event name was sent
    pub fn sent_event(&self, event: &str) -> bool {
        self.sent.lock().iter().any(|(name, _)| name == event)
    }

    /// Payload of the first message with the given event name
    pub fn payload_of(&self, event: &str) -> Option<Value> {
        self.sent
            .lock()
            .iter()
            .find(|(name, _)| name == event)
            .map(|(_, payload)| payload.clone())
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    async fn send(&self, event: &str, payload: Value) -> ChannelResult<()> {
        trace!("RecordingChannel: recording `{}`", event);
        self.sent.lock().push((event.to_string(), payload));
        Ok(())
    }
}

/// Channel that rejects every message, for error-path tests
pub struct FailingChannel {
    reason: String,
}

impl FailingChannel {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Channel for FailingChannel {
    async fn send(&self, event: &str, _payload: Value) -> ChannelResult<()> {
        Err(ChannelError::Rejected {
            event: event.to_string(),
            reason: self.reason.clone(),
        })
    }
}
