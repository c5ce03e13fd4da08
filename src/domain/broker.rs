//! Durable queue contract for the asynchronous export pipeline

use async_trait::async_trait;

use super::DomainError;

/// Queue carrying playlist export requests
pub const EXPORT_PLAYLIST_QUEUE: &str = "export:playlist";

/// A message handed to a consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub id: String,
    pub queue: String,
    pub payload: Vec<u8>,
    /// 1 on first delivery, incremented on every redelivery
    pub attempts: u32,
}

impl Delivery {
    pub fn redelivered(&self) -> bool {
        self.attempts > 1
    }
}

/// When a delivery is acknowledged relative to its handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AckMode {
    /// Ack once the handler returned; a crash mid-handling leads to redelivery
    #[default]
    AfterHandle,
    /// Ack before the handler runs; a crash mid-handling loses the message
    OnReceive,
}

impl AckMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "after_handle" | "manual" => Some(AckMode::AfterHandle),
            "on_receive" | "auto" => Some(AckMode::OnReceive),
            _ => None,
        }
    }
}

/// Invoked once per delivered message.
///
/// Delivery is at-least-once without deduplication, so implementations
/// must tolerate seeing the same payload more than once. Failures are the
/// handler's to log; the consumer never requeues.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, delivery: &Delivery);
}

/// Named durable queues with at-least-once delivery
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Declare a durable queue. Declaring an existing queue is a no-op.
    async fn declare_queue(&self, queue: &str) -> Result<(), DomainError>;

    /// Append an opaque payload to a declared queue
    async fn publish(&self, queue: &str, payload: &[u8]) -> Result<(), DomainError>;

    /// Claim the oldest ready message, if any
    async fn receive(&self, queue: &str) -> Result<Option<Delivery>, DomainError>;

    /// Remove a claimed message for good
    async fn ack(&self, delivery: &Delivery) -> Result<(), DomainError>;
}
