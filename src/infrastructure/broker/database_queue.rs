//! MessageBroker backed by the application database
//!
//! Messages are rows in `queue_messages`. A delivery is claimed by flipping
//! its status from `ready` to `unacked` with a conditional update, so two
//! workers polling the same queue never hold the same message at once.
//! Claimed rows whose visibility timeout has elapsed go back to `ready`,
//! which is what gives at-least-once delivery after a worker crash.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::time::Duration;

use crate::domain::{Delivery, DomainError, MessageBroker};
use crate::models::queue::{self, Entity as QueueEntity};
use crate::models::queue_message::{
    self, Column, Entity as MessageEntity, STATUS_READY, STATUS_UNACKED,
};
use crate::utils::ids::nanoid;

/// Claim attempts per `receive` before giving up to a competing worker
const MAX_CLAIM_ATTEMPTS: usize = 5;

fn timestamp(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn unavailable(e: sea_orm::DbErr) -> DomainError {
    DomainError::Transient(format!("queue store: {}", e))
}

pub struct DatabaseBroker {
    db: DatabaseConnection,
    visibility_timeout: Duration,
}

impl DatabaseBroker {
    pub fn new(db: DatabaseConnection, visibility_timeout: Duration) -> Self {
        Self {
            db,
            visibility_timeout,
        }
    }

    /// Return deliveries whose consumer went silent to the ready state
    pub async fn requeue_expired(&self, queue: &str) -> Result<u64, DomainError> {
        let timeout = chrono::Duration::from_std(self.visibility_timeout)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let cutoff = timestamp(Utc::now() - timeout);

        let result = MessageEntity::update_many()
            .col_expr(Column::Status, Expr::value(STATUS_READY))
            .col_expr(Column::ClaimedAt, Expr::value(Option::<String>::None))
            .filter(Column::Queue.eq(queue))
            .filter(Column::Status.eq(STATUS_UNACKED))
            .filter(Column::ClaimedAt.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(unavailable)?;

        if result.rows_affected > 0 {
            tracing::warn!(
                "Requeued {} unacknowledged message(s) on {}",
                result.rows_affected,
                queue
            );
        }
        Ok(result.rows_affected)
    }

    /// Messages not yet acknowledged, ready or in flight
    pub async fn pending_count(&self, queue: &str) -> Result<u64, DomainError> {
        MessageEntity::find()
            .filter(Column::Queue.eq(queue))
            .count(&self.db)
            .await
            .map_err(unavailable)
    }

    async fn queue_exists(&self, queue: &str) -> Result<bool, DomainError> {
        Ok(QueueEntity::find_by_id(queue)
            .one(&self.db)
            .await
            .map_err(unavailable)?
            .is_some())
    }
}

#[async_trait]
impl MessageBroker for DatabaseBroker {
    async fn declare_queue(&self, queue: &str) -> Result<(), DomainError> {
        if self.queue_exists(queue).await? {
            return Ok(());
        }

        let inserted = queue::ActiveModel {
            name: Set(queue.to_string()),
            durable: Set(true),
            created_at: Set(timestamp(Utc::now())),
        }
        .insert(&self.db)
        .await;

        match inserted {
            Ok(_) => {
                tracing::info!("Declared durable queue {}", queue);
                Ok(())
            }
            // Lost a declaration race to another process
            Err(_) if self.queue_exists(queue).await? => Ok(()),
            Err(e) => Err(unavailable(e)),
        }
    }

    async fn publish(&self, queue: &str, payload: &[u8]) -> Result<(), DomainError> {
        self.declare_queue(queue).await?;

        let id = nanoid(21);
        queue_message::ActiveModel {
            id: Set(id.clone()),
            queue: Set(queue.to_string()),
            payload: Set(payload.to_vec()),
            status: Set(STATUS_READY.to_string()),
            attempts: Set(0),
            enqueued_at: Set(timestamp(Utc::now())),
            claimed_at: Set(None),
        }
        .insert(&self.db)
        .await
        .map_err(unavailable)?;

        tracing::debug!("Published message {} to {} ({} bytes)", id, queue, payload.len());
        Ok(())
    }

    async fn receive(&self, queue: &str) -> Result<Option<Delivery>, DomainError> {
        self.requeue_expired(queue).await?;

        for _ in 0..MAX_CLAIM_ATTEMPTS {
            let candidate = MessageEntity::find()
                .filter(Column::Queue.eq(queue))
                .filter(Column::Status.eq(STATUS_READY))
                .order_by_asc(Column::EnqueuedAt)
                .order_by_asc(Column::Id)
                .one(&self.db)
                .await
                .map_err(unavailable)?;

            let Some(message) = candidate else {
                return Ok(None);
            };

            let claimed = MessageEntity::update_many()
                .col_expr(Column::Status, Expr::value(STATUS_UNACKED))
                .col_expr(Column::Attempts, Expr::col(Column::Attempts).add(1))
                .col_expr(Column::ClaimedAt, Expr::value(Some(timestamp(Utc::now()))))
                .filter(Column::Id.eq(message.id.as_str()))
                .filter(Column::Status.eq(STATUS_READY))
                .exec(&self.db)
                .await
                .map_err(unavailable)?;

            if claimed.rows_affected == 1 {
                return Ok(Some(Delivery {
                    id: message.id,
                    queue: message.queue,
                    payload: message.payload,
                    attempts: (message.attempts + 1) as u32,
                }));
            }
        }

        Ok(None)
    }

    async fn ack(&self, delivery: &Delivery) -> Result<(), DomainError> {
        MessageEntity::delete_by_id(delivery.id.as_str())
            .exec(&self.db)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}
