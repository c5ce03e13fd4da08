//! Subscription loop: one delivery at a time per worker

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::domain::{AckMode, DomainError, MessageBroker, MessageHandler};

/// Back-off after the broker itself fails
const BROKER_ERROR_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ConsumerOptions {
    pub ack_mode: AckMode,
    pub poll_interval: Duration,
}

impl Default for ConsumerOptions {
    fn default() -> Self {
        Self {
            ack_mode: AckMode::default(),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Receive and handle at most one message. Returns `Ok(false)` when the
/// queue was empty.
pub async fn consume_one(
    broker: &dyn MessageBroker,
    queue: &str,
    handler: &dyn MessageHandler,
    ack_mode: AckMode,
) -> Result<bool, DomainError> {
    let Some(delivery) = broker.receive(queue).await? else {
        return Ok(false);
    };

    if delivery.redelivered() {
        tracing::warn!(
            "Redelivery #{} of message {} on {}",
            delivery.attempts,
            delivery.id,
            queue
        );
    }

    match ack_mode {
        AckMode::OnReceive => {
            broker.ack(&delivery).await?;
            handler.handle(&delivery).await;
        }
        AckMode::AfterHandle => {
            handler.handle(&delivery).await;
            broker.ack(&delivery).await?;
        }
    }

    Ok(true)
}

/// Register `handler` on `queue` and pump deliveries until `shutdown` flips
/// to true. Declares the queue first.
pub async fn subscribe(
    broker: Arc<dyn MessageBroker>,
    queue: &str,
    handler: Arc<dyn MessageHandler>,
    options: ConsumerOptions,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), DomainError> {
    broker.declare_queue(queue).await?;
    tracing::info!(
        "Consumer is listening on {} (ack mode: {:?})",
        queue,
        options.ack_mode
    );

    while !*shutdown.borrow() {
        let idle = match consume_one(broker.as_ref(), queue, handler.as_ref(), options.ack_mode)
            .await
        {
            Ok(true) => continue,
            Ok(false) => options.poll_interval,
            Err(e) => {
                tracing::error!("Broker error on {}: {}", queue, e);
                BROKER_ERROR_BACKOFF
            }
        };

        tokio::select! {
            _ = tokio::time::sleep(idle) => {}
            _ = shutdown.changed() => {}
        }
    }

    tracing::info!("Consumer on {} stopped", queue);
    Ok(())
}
